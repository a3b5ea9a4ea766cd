//! 解题步骤数据结构
//!
//! 由 `services::step_formatter` 生成，`services::markup` 负责转换成公式文本。
//! 所有数位都按"个位在 place = 0"的方式编号，行数据（`DigitRow`）按从左到右存放。

use serde::{Deserialize, Serialize};

use crate::models::number::Number;
use crate::models::operation::Operation;

/// 对齐后的一行数位，`None` 表示占位（不是前导零）
pub type DigitRow = Vec<Option<u8>>;

/// 某种运算的解题步骤
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepTrace {
    /// 竖式加法（进位）
    Addition(AdditionTrace),
    /// 两数竖式减法（借位）
    Subtraction(SubtractionTrace),
    /// 多个数连减，从左到右逐步计算
    ChainedSubtraction(ChainTrace),
    /// 两数竖式乘法（部分积）
    Multiplication(MultiplicationTrace),
    /// 多个数连乘，从左到右逐步计算
    ChainedMultiplication(ChainTrace),
    /// 长除法
    LongDivision(LongDivisionTrace),
}

impl StepTrace {
    pub fn kind(&self) -> &'static str {
        match self {
            StepTrace::Addition(_) => "addition",
            StepTrace::Subtraction(_) => "subtraction",
            StepTrace::ChainedSubtraction(_) => "chained_subtraction",
            StepTrace::Multiplication(_) => "multiplication",
            StepTrace::ChainedMultiplication(_) => "chained_multiplication",
            StepTrace::LongDivision(_) => "long_division",
        }
    }
}

/// 加法的一列
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdditionColumn {
    pub place: usize,
    /// 本列各运算数的数位（占位的运算数不计入）
    pub digits: Vec<u8>,
    pub carry_in: u32,
    /// 本列数位之和加上进位
    pub total: u32,
    pub carry_out: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdditionTrace {
    pub width: usize,
    pub scale: u32,
    pub rows: Vec<DigitRow>,
    /// 从个位开始
    pub columns: Vec<AdditionColumn>,
    /// 每列向左一列写下的进位（从左到右，第一个落在最高位左侧），没有任何进位时为 `None`
    pub carry_line: Option<Vec<u32>>,
    pub answer: Number,
}

impl AdditionTrace {
    /// 按列写下的数字还原出的和（以 `units` 表示）
    pub fn reconstruct_units(&self) -> i128 {
        let mut value: i128 = 0;
        let mut weight: i128 = 1;
        for column in &self.columns {
            value += i128::from(column.total % 10) * weight;
            weight *= 10;
        }
        let final_carry = self.columns.last().map_or(0, |c| c.carry_out);
        value + i128::from(final_carry) * weight
    }
}

/// 减法的一列
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtractionColumn {
    pub place: usize,
    pub minuend_digit: u8,
    /// 被左边借走之后、本列借位之前的数位
    pub available: u8,
    pub subtrahend_digit: u8,
    /// 本列是否向左借位
    pub borrowed: bool,
    pub result_digit: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtractionTrace {
    pub width: usize,
    pub scale: u32,
    pub minuend: DigitRow,
    pub subtrahend: DigitRow,
    /// 从个位开始
    pub columns: Vec<SubtractionColumn>,
    /// 每列是否借位（从左到右），没有借位时为 `None`
    pub borrow_line: Option<Vec<bool>>,
    /// 借位之后被减数每一位的值（从左到右），没有借位时为 `None`
    pub adjusted_minuend: Option<Vec<u8>>,
    pub answer: Number,
}

/// 连续运算中的一步
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainStep {
    pub left: Number,
    pub right: Number,
    pub result: Number,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainTrace {
    pub operation: Operation,
    pub steps: Vec<ChainStep>,
    pub answer: Number,
}

/// 乘数某一位对应的部分积
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialProduct {
    /// 乘数中的数位位置，也是部分积左移的位数
    pub place: usize,
    pub digit: u8,
    /// 数位乘以被乘数（不含移位）
    #[serde(with = "wide_int")]
    pub value: i128,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiplicationTrace {
    pub multiplicand: Number,
    pub multiplier: Number,
    /// 只包含乘数中非零的数位
    pub partial_products: Vec<PartialProduct>,
    /// 精确乘积，小数位数为两数之和
    pub product: Number,
    pub answer: Number,
}

impl MultiplicationTrace {
    /// 各部分积按位移相加
    pub fn sum_of_partials(&self) -> i128 {
        self.partial_products
            .iter()
            .map(|p| p.value * 10i128.pow(p.place as u32))
            .sum()
    }
}

/// 长除法中商一次的步骤
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DivisionStep {
    /// 本步最后落下的被除数数位下标（从左开始）
    pub digit_index: usize,
    #[serde(with = "wide_int")]
    pub working: i128,
    pub quotient_digit: u8,
    #[serde(with = "wide_int")]
    pub subtracted: i128,
    #[serde(with = "wide_int")]
    pub remainder: i128,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LongDivisionTrace {
    /// 被除数和除数都按相同小数位数放大为整数
    #[serde(with = "wide_int")]
    pub dividend: i128,
    #[serde(with = "wide_int")]
    pub divisor: i128,
    pub scale: u32,
    pub steps: Vec<DivisionStep>,
    pub quotient_digits: Vec<u8>,
    #[serde(with = "wide_int")]
    pub quotient: i128,
    #[serde(with = "wide_int")]
    pub remainder: i128,
}

/// `i128` 按十进制字符串读写
///
/// `StepTrace` 是内部标签枚举，反序列化时会先缓存内容，缓存不支持 `i128`
mod wide_int {
    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};
    use std::fmt;

    pub fn serialize<S>(value: &i128, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<i128, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct WideIntVisitor;

        impl<'de> Visitor<'de> for WideIntVisitor {
            type Value = i128;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("整数或十进制整数字符串")
            }

            fn visit_str<E>(self, value: &str) -> Result<i128, E>
            where
                E: de::Error,
            {
                value.trim().parse().map_err(de::Error::custom)
            }

            fn visit_i64<E>(self, value: i64) -> Result<i128, E>
            where
                E: de::Error,
            {
                Ok(i128::from(value))
            }

            fn visit_u64<E>(self, value: u64) -> Result<i128, E>
            where
                E: de::Error,
            {
                Ok(i128::from(value))
            }
        }

        deserializer.deserialize_any(WideIntVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_long_division_trace_survives_json() {
        let trace = StepTrace::LongDivision(LongDivisionTrace {
            dividend: 100_000_000_000_000_000_000,
            divisor: 7,
            scale: 2,
            steps: vec![DivisionStep {
                digit_index: 0,
                working: 10,
                quotient_digit: 1,
                subtracted: 7,
                remainder: 3,
            }],
            quotient_digits: vec![1],
            quotient: 14_285_714_285_714_285_714,
            remainder: 2,
        });
        let json = serde_json::to_string(&trace).unwrap();
        assert!(json.contains("\"dividend\":\"100000000000000000000\""));
        assert_eq!(serde_json::from_str::<StepTrace>(&json).unwrap(), trace);
    }

    #[test]
    fn test_multiplication_trace_survives_json() {
        let trace = StepTrace::Multiplication(MultiplicationTrace {
            multiplicand: Number::new(2345, 2),
            multiplier: Number::new(41, 1),
            partial_products: vec![
                PartialProduct { place: 0, digit: 1, value: 2345 },
                PartialProduct { place: 1, digit: 4, value: 9380 },
            ],
            product: Number::new(96145, 3),
            answer: Number::new(9615, 2),
        });
        let json = serde_json::to_string(&trace).unwrap();
        let back: StepTrace = serde_json::from_str(&json).unwrap();
        assert_eq!(back, trace);
        assert_eq!(back.kind(), "multiplication");
    }

    #[test]
    fn test_plain_integers_still_accepted() {
        let json = r#"{"digit_index":1,"working":12,"quotient_digit":1,"subtracted":7,"remainder":5}"#;
        let step: DivisionStep = serde_json::from_str(json).unwrap();
        assert_eq!(step.working, 12);
        assert_eq!(step.remainder, 5);
    }
}
