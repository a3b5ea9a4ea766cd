//! 批量题目生成器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责一批题目的生成和输出。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：校验配置、计算每一项的取值范围、准备随机数来源
//! 2. **批量生成**：按题目数量重复调用 `QuestionFlow`
//! 3. **整体替换**：整批生成完成后才写入 `BatchStore`，不会暴露半成品
//! 4. **输出**：写出题目页，再由答案页读取批次
//!
//! ## 设计特点
//!
//! - **顶层编排**：不处理单道题的细节
//! - **资源所有者**：唯一持有随机数来源和批次存储的模块
//! - **向下委托**：委托 workflow 生成单道题

use anyhow::{Context, Result};
use std::fs;
use std::time::Instant;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::AppResult;
use crate::infrastructure::{BatchStore, FileBatchStore, RandomSource, StdRandom};
use crate::models::QuestionBatch;
use crate::orchestrator::answer_key;
use crate::services::markup::{render_problem, render_worksheet};
use crate::utils::logging::{log_batch_complete, log_startup, print_final_stats};
use crate::utils::truncate_text;
use crate::workflow::{GenerationCtx, QuestionFlow};

/// 应用主结构
pub struct App {
    config: Config,
    flow: QuestionFlow,
    store: Box<dyn BatchStore>,
    source: Box<dyn RandomSource>,
}

/// 一次运行的输出
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub total: usize,
    pub worksheet_path: String,
    pub answer_key_path: String,
}

impl App {
    /// 初始化应用
    ///
    /// 配置错误在这里直接返回，不会开始生成
    pub fn initialize(config: Config) -> AppResult<Self> {
        let ctx = GenerationCtx::from_config(&config)?;
        log_startup(&config, &ctx);

        let store = Box::new(FileBatchStore::new(config.batch_store_path()));
        let source: Box<dyn RandomSource> = match config.rng_seed {
            Some(seed) => {
                info!("🎲 使用固定随机种子: {}", seed);
                Box::new(StdRandom::seeded(seed))
            }
            None => Box::new(StdRandom::from_entropy()),
        };

        Ok(Self::with_parts(config, ctx, store, source))
    }

    /// 使用指定的存储和随机数来源创建应用
    pub fn with_parts(
        config: Config,
        ctx: GenerationCtx,
        store: Box<dyn BatchStore>,
        source: Box<dyn RandomSource>,
    ) -> Self {
        Self {
            config,
            flow: QuestionFlow::new(ctx),
            store,
            source,
        }
    }

    /// 生成新批次并写入存储（整体替换上一批）
    pub fn generate(&mut self) -> AppResult<QuestionBatch> {
        let batch = generate_batch(&self.flow, self.source.as_mut(), self.config.num_questions)?;

        if self.config.verbose_logging {
            for (i, question) in batch.iter().enumerate() {
                let problem = render_problem(question, self.config.orientation);
                debug!("[题目 {}] {}", i + 1, truncate_text(&problem.markup, 80));
            }
        }

        self.store.put(&batch)?;
        Ok(batch)
    }

    /// 运行应用主逻辑：生成 → 题目页 → 答案页
    pub fn run(&mut self) -> Result<RunSummary> {
        let batch = self.generate()?;

        fs::create_dir_all(&self.config.output_dir)
            .with_context(|| format!("无法创建输出目录: {}", self.config.output_dir))?;

        let worksheet_path = self.config.worksheet_path();
        fs::write(&worksheet_path, render_worksheet(&batch, self.config.orientation))
            .with_context(|| format!("无法写入题目页: {}", worksheet_path.display()))?;
        info!("📄 题目页已写入: {}", worksheet_path.display());

        let answer_key_path = self.config.answer_key_path();
        answer_key::write_answer_key(self.store.as_mut(), &answer_key_path)?;

        let summary = RunSummary {
            total: batch.len(),
            worksheet_path: worksheet_path.display().to_string(),
            answer_key_path: answer_key_path.display().to_string(),
        };
        print_final_stats(
            summary.total,
            &summary.worksheet_path,
            &summary.answer_key_path,
        );

        Ok(summary)
    }
}

/// 按题目数量生成一批题
///
/// 任意一道题出错时整批作废
pub fn generate_batch(
    flow: &QuestionFlow,
    source: &mut dyn RandomSource,
    count: usize,
) -> AppResult<QuestionBatch> {
    let started = Instant::now();
    info!("\n🧮 正在生成 {} 道题...", count);

    let questions = (1..=count)
        .map(|index| flow.run(source, index))
        .collect::<AppResult<Vec<_>>>()?;

    log_batch_complete(questions.len(), started.elapsed().as_millis());
    Ok(QuestionBatch::new(questions))
}
