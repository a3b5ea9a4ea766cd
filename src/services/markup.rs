//! 公式文本生成 - 业务能力层
//!
//! 只输出 MathJax 能识别的 TeX 文本（运算符、对齐、`\phantom{0}` 占位），
//! 不做任何实际排版。

use crate::models::step_trace::{
    AdditionTrace, ChainTrace, DigitRow, LongDivisionTrace, MultiplicationTrace, SubtractionTrace,
};
use crate::models::{Layout, Number, Operation, Question, QuestionBatch, StepTrace};

/// 数位占位符
pub const DIGIT_PLACEHOLDER: &str = "\\phantom{0}";

/// 小数点占位符
const POINT_PLACEHOLDER: &str = "\\phantom{.}";

/// 每行题目数量
const QUESTIONS_PER_ROW: usize = 3;

const MATHJAX_SCRIPT: &str = r#"<script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>"#;

/// 一道题的题面
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedProblem {
    pub markup: String,
    /// 题目下方留给学生作答的高度（像素）
    pub solution_space_px: u32,
}

/// 生成题面
pub fn render_problem(question: &Question, layout: Layout) -> RenderedProblem {
    let operands = question.operands();
    let operation = question.operation();

    if operation == Operation::Division {
        let dividend = operands.first().copied().unwrap_or(Number::ZERO);
        let divisor = operands.get(1).copied().unwrap_or(Number::integer(1));
        return if question.long_division() {
            RenderedProblem {
                markup: format!("\\[ {} \\enclose{{longdiv}}{{{}}} \\]", divisor, dividend),
                solution_space_px: 150,
            }
        } else {
            RenderedProblem {
                markup: format!("\\({} \\div {} = \\)", dividend, divisor),
                solution_space_px: 80,
            }
        };
    }

    let markup = match layout {
        Layout::Traditional => format_traditional(operands, operation.tex_symbol()),
        Layout::Inline => format!("\\({}\\)", join_inline(operands, operation.tex_symbol())),
    };
    let solution_space_px = match operation {
        Operation::Multiplication => 120,
        _ => 100,
    };

    RenderedProblem {
        markup,
        solution_space_px,
    }
}

fn join_inline(numbers: &[Number], symbol: &str) -> String {
    numbers
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(&format!(" {} ", symbol))
}

/// 生成竖式题面
///
/// 所有数右对齐，位数不足的数在左侧补 `\phantom{0}`，最后一行带运算符和横线
pub fn format_traditional(numbers: &[Number], symbol: &str) -> String {
    let texts: Vec<String> = numbers.iter().map(|n| n.to_string()).collect();
    let max_len = texts.iter().map(String::len).max().unwrap_or(0);

    let padded: Vec<String> = texts
        .iter()
        .map(|text| format!("{}{}", DIGIT_PLACEHOLDER.repeat(max_len - text.len()), text))
        .collect();

    let mut content = String::new();
    for (i, row) in padded.iter().enumerate() {
        if i + 1 == padded.len() {
            content.push_str(&format!("\\underline{{{} \\quad {}}}", symbol, row));
        } else {
            content.push_str(&format!("{} \\\\ ", row));
        }
    }
    format!("\\[ \\begin{{array}}{{r}} {} \\end{{array}} \\]", content)
}

// ========== 解题步骤 ==========

/// 生成解题步骤
pub fn render_steps(trace: &StepTrace) -> String {
    match trace {
        StepTrace::Addition(t) => render_addition(t),
        StepTrace::Subtraction(t) => render_subtraction(t),
        StepTrace::ChainedSubtraction(t) | StepTrace::ChainedMultiplication(t) => render_chain(t),
        StepTrace::Multiplication(t) => render_multiplication(t),
        StepTrace::LongDivision(t) => render_long_division(t),
    }
}

/// 拼接一行单元格（最后一个单元格为个位），在第 `scale` 位前插入小数点
fn join_cells(cells: &[String], scale: u32, point: &str) -> String {
    let scale = scale as usize;
    let mut out = String::new();
    for (i, cell) in cells.iter().enumerate() {
        let place = cells.len() - 1 - i;
        out.push_str(cell);
        if scale > 0 && place == scale {
            out.push_str(point);
        }
    }
    out
}

fn digit_row(row: &DigitRow, scale: u32) -> String {
    let cells: Vec<String> = row
        .iter()
        .map(|d| match d {
            Some(d) => d.to_string(),
            None => DIGIT_PLACEHOLDER.to_string(),
        })
        .collect();
    join_cells(&cells, scale, ".")
}

fn small(value: impl std::fmt::Display) -> String {
    format!("{{\\scriptstyle {}}}", value)
}

fn array_r(rows: &[String]) -> String {
    format!("\\[ \\begin{{array}}{{r}} {} \\end{{array}} \\]", rows.join(" \\\\ "))
}

fn render_addition(trace: &AdditionTrace) -> String {
    let mut rows = Vec::new();
    if let Some(carries) = &trace.carry_line {
        let mut cells: Vec<String> = carries
            .iter()
            .map(|c| {
                if *c > 0 {
                    small(c)
                } else {
                    DIGIT_PLACEHOLDER.to_string()
                }
            })
            .collect();
        cells.push(DIGIT_PLACEHOLDER.to_string());
        rows.push(join_cells(&cells, trace.scale, POINT_PLACEHOLDER));
    }
    push_operand_rows(&mut rows, &trace.rows, trace.scale, "+");
    rows.push(trace.answer.to_string());
    array_r(&rows)
}

fn push_operand_rows(rows: &mut Vec<String>, operands: &[DigitRow], scale: u32, symbol: &str) {
    for (i, row) in operands.iter().enumerate() {
        let text = digit_row(row, scale);
        if i + 1 == operands.len() {
            rows.push(format!("\\underline{{{} \\quad {}}}", symbol, text));
        } else {
            rows.push(text);
        }
    }
}

fn render_subtraction(trace: &SubtractionTrace) -> String {
    let mut rows = Vec::new();
    if let (Some(adjusted), Some(borrows)) = (&trace.adjusted_minuend, &trace.borrow_line) {
        let original: Vec<u8> = trace.minuend.iter().map(|d| d.unwrap_or(0)).collect();
        let adjusted_cells: Vec<String> = adjusted
            .iter()
            .zip(&original)
            .map(|(a, o)| {
                if a != o {
                    small(a)
                } else {
                    DIGIT_PLACEHOLDER.to_string()
                }
            })
            .collect();
        let borrow_cells: Vec<String> = borrows
            .iter()
            .map(|b| {
                if *b {
                    small("1")
                } else {
                    DIGIT_PLACEHOLDER.to_string()
                }
            })
            .collect();
        rows.push(join_cells(&adjusted_cells, trace.scale, POINT_PLACEHOLDER));
        rows.push(join_cells(&borrow_cells, trace.scale, POINT_PLACEHOLDER));
    }
    push_operand_rows(
        &mut rows,
        &[trace.minuend.clone(), trace.subtrahend.clone()],
        trace.scale,
        "-",
    );
    rows.push(trace.answer.to_string());
    array_r(&rows)
}

fn render_multiplication(trace: &MultiplicationTrace) -> String {
    let mut rows = vec![
        trace.multiplicand.to_string(),
        format!("\\underline{{\\times \\quad {}}}", trace.multiplier),
    ];

    let partials = &trace.partial_products;
    for (i, partial) in partials.iter().enumerate() {
        // 位移用占位表示，和数位上的 0 区分开
        let text = format!("{}{}", partial.value, DIGIT_PLACEHOLDER.repeat(partial.place));
        if partials.len() > 1 && i + 1 == partials.len() {
            rows.push(format!("\\underline{{+ \\quad {}}}", text));
        } else {
            rows.push(text);
        }
    }
    if partials.len() != 1 {
        rows.push(trace.product.to_string());
    } else if trace.product.scale() > 0 {
        rows.push(format!("= {}", trace.product));
    }
    if trace.answer != trace.product {
        rows.push(format!("\\approx {}", trace.answer));
    }
    array_r(&rows)
}

fn render_chain(trace: &ChainTrace) -> String {
    let symbol = trace.operation.tex_symbol();
    let mut lines: Vec<String> = trace
        .steps
        .iter()
        .map(|step| format!("{} {} {} = {}", step.left, symbol, step.right, step.result))
        .collect();
    if let Some(last) = trace.steps.last() {
        if last.result != trace.answer {
            lines.push(format!("\\approx {}", trace.answer));
        }
    }
    format!("\\[ \\begin{{array}}{{l}} {} \\end{{array}} \\]", lines.join(" \\\\ "))
}

fn render_long_division(trace: &LongDivisionTrace) -> String {
    let mut lines = Vec::new();
    if trace.scale > 0 {
        let dividend = Number::new(trace.dividend, trace.scale);
        let divisor = Number::new(trace.divisor, trace.scale);
        lines.push(format!(
            "{} \\div {} = {} \\div {}",
            dividend, divisor, trace.dividend, trace.divisor
        ));
    }
    for step in &trace.steps {
        lines.push(format!(
            "{} \\div {} \\to {},\\ {} \\times {} = {},\\ {} - {} = {}",
            step.working,
            trace.divisor,
            step.quotient_digit,
            step.quotient_digit,
            trace.divisor,
            step.subtracted,
            step.working,
            step.subtracted,
            step.remainder
        ));
    }
    lines.push(format!(
        "\\text{{quotient}} = {},\\ \\text{{remainder}} = {}",
        trace.quotient, trace.remainder
    ));
    format!("\\[ \\begin{{array}}{{l}} {} \\end{{array}} \\]", lines.join(" \\\\ "))
}

// ========== 文档 ==========

/// 生成题目页（每行三题）
pub fn render_worksheet(batch: &QuestionBatch, layout: Layout) -> String {
    let mut html = format!(
        "<html><head><title>Arithmetic Worksheet</title>{}</head><body>\n<div id=\"print-header\">Generated: {}</div>\n<table id=\"arithmetic-table\">\n",
        MATHJAX_SCRIPT,
        batch.generated_at().format("%Y-%m-%d %H:%M:%S")
    );

    for (row_idx, row) in batch.questions().chunks(QUESTIONS_PER_ROW).enumerate() {
        html.push_str("<tr>");
        for (col_idx, question) in row.iter().enumerate() {
            let index = row_idx * QUESTIONS_PER_ROW + col_idx + 1;
            let problem = render_problem(question, layout);
            html.push_str(&format!(
                "<td><div class=\"question-box\"><strong>{}.</strong> {}</div><div style=\"height: {}px;\"></div></td>",
                index, problem.markup, problem.solution_space_px
            ));
        }
        html.push_str("</tr>\n");
    }

    html.push_str("</table>\n</body></html>\n");
    html
}

/// 生成答案页
pub fn render_answer_key(batch: &QuestionBatch) -> String {
    let mut html = format!(
        "<html><head><title>Answer Key</title>{}</head><body><h1>Answer Key</h1><div class=\"key-grid\">\n",
        MATHJAX_SCRIPT
    );

    for (i, question) in batch.iter().enumerate() {
        html.push_str(&format!(
            "<div class=\"key-item\"><strong>{}.</strong> Answer: <b>{}</b><br><small>Problem: {}</small><div class=\"steps\">{}</div></div>\n",
            i + 1,
            question.answer(),
            question.problem_text(),
            render_steps(question.step_trace())
        ));
    }

    html.push_str("</div></body></html>\n");
    html
}
