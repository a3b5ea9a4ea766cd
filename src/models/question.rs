use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::models::number::Number;
use crate::models::operation::Operation;
use crate::models::step_trace::StepTrace;

/// 一道生成好的题目
///
/// 生成之后不再修改，字段只读
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    operands: Vec<Number>,
    #[serde(rename = "operationLabel")]
    operation: Operation,
    answer: Number,
    decimal_places: u32,
    long_division: bool,
    step_trace: StepTrace,
}

impl Question {
    pub fn new(
        operands: Vec<Number>,
        operation: Operation,
        answer: Number,
        decimal_places: u32,
        long_division: bool,
        step_trace: StepTrace,
    ) -> Self {
        Self {
            operands,
            operation,
            answer,
            decimal_places,
            long_division,
            step_trace,
        }
    }

    pub fn operands(&self) -> &[Number] {
        &self.operands
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn answer(&self) -> Number {
        self.answer
    }

    pub fn long_division(&self) -> bool {
        self.long_division
    }

    pub fn step_trace(&self) -> &StepTrace {
        &self.step_trace
    }

    /// 纯文本题面，例如 `84 ÷ 7`
    pub fn problem_text(&self) -> String {
        self.operands
            .iter()
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join(self.operation.plain_symbol())
    }
}

/// 一次生成请求产生的全部题目
///
/// 每次生成都创建新的批次，整体替换上一批
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionBatch {
    generated_at: DateTime<Local>,
    questions: Vec<Question>,
}

impl QuestionBatch {
    pub fn new(questions: Vec<Question>) -> Self {
        Self {
            generated_at: Local::now(),
            questions,
        }
    }

    pub fn generated_at(&self) -> DateTime<Local> {
        self.generated_at
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Question> {
        self.questions.iter()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

impl<'a> IntoIterator for &'a QuestionBatch {
    type Item = &'a Question;
    type IntoIter = std::slice::Iter<'a, Question>;

    fn into_iter(self) -> Self::IntoIter {
        self.questions.iter()
    }
}
