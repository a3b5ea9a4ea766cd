//! 题目生成流程 - 流程层
//!
//! 核心职责：定义"一道题"的完整生成流程
//!
//! 流程顺序：
//! 1. 按每一项的取值范围生成运算数
//! 2. OperationEngine 整理运算数并计算答案
//! 3. StepFormatter 推导解题步骤

use tracing::debug;

use crate::error::AppResult;
use crate::infrastructure::RandomSource;
use crate::models::{Number, Question};
use crate::services::operation_engine::OperationEngine;
use crate::services::step_formatter::format_steps;
use crate::services::NumberGenerator;
use crate::workflow::question_ctx::GenerationCtx;

/// 连减出现负数时重新抽取的最多次数，超过后由 OperationEngine 调整被减数
const MAX_REDRAWS: usize = 20;

/// 题目生成流程
///
/// - 编排单道题的生成步骤
/// - 不持有随机数来源，由调用方传入
/// - 只依赖业务能力（services）
pub struct QuestionFlow {
    ctx: GenerationCtx,
    generator: NumberGenerator,
    engine: OperationEngine,
}

impl QuestionFlow {
    /// 创建新的题目生成流程
    pub fn new(ctx: GenerationCtx) -> Self {
        let generator = match ctx.decimal_places {
            Some(places) => NumberGenerator::with_decimals(places),
            None => NumberGenerator::integers(),
        };
        let engine = OperationEngine::new(ctx.operation, ctx.decimal_places);
        Self {
            ctx,
            generator,
            engine,
        }
    }

    /// 生成一道题
    ///
    /// # 参数
    /// - `source`: 随机数来源
    /// - `index`: 题号（从 1 开始，仅用于日志）
    pub fn run(&self, source: &mut dyn RandomSource, index: usize) -> AppResult<Question> {
        let mut operands = self.draw_operands(source)?;
        for attempt in 1..=MAX_REDRAWS {
            if !self.engine.would_overdraw(&operands) {
                break;
            }
            debug!("[题目 {}] 连减结果为负，第 {} 次重新抽取", index, attempt);
            operands = self.draw_operands(source)?;
        }

        let outcome = self.engine.apply(operands)?;
        let trace = format_steps(
            self.ctx.operation,
            &outcome.operands,
            outcome.answer,
            self.ctx.scale(),
        );

        let question = Question::new(
            outcome.operands,
            self.ctx.operation,
            outcome.answer,
            self.ctx.scale(),
            self.ctx.long_division,
            trace,
        );

        debug!(
            "[题目 {}] {} = {} ({})",
            index,
            question.problem_text(),
            question.answer(),
            question.step_trace().kind()
        );

        Ok(question)
    }

    fn draw_operands(&self, source: &mut dyn RandomSource) -> AppResult<Vec<Number>> {
        let operands = self
            .ctx
            .bounds
            .iter()
            .map(|bounds| self.generator.generate(source, bounds))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(operands)
    }
}
