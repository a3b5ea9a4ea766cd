//! 数位设置解析
//!
//! 把 `"3x2x1"` 这样的紧凑写法解析成每个运算数的位数，
//! 把 `"50x9"` 或 `"50"` 解析成每个运算数的上限。

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::error::ConfigError;

/// 数位设置的分隔符
pub const TERM_DELIMITER: char = 'x';

/// 支持的最大位数（保证 i128 运算不溢出）
pub const MAX_DIGIT_COUNT: u32 = 12;

/// 小数位数上限，保证 12 位整数部分放大后两数相乘仍在 i128 内
pub const MAX_DECIMAL_PLACES: u32 = 6;

static SPEC_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\dxX\s]+$").expect("数位设置正则表达式无效"));

/// 单个运算数的位数设置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermSpec {
    pub digit_count: u32,
}

impl TermSpec {
    pub fn new(digit_count: u32) -> Self {
        Self { digit_count }
    }
}

/// 按分隔符拆分，忽略大小写并去掉空白
fn split_tokens(input: &str) -> Vec<String> {
    input
        .to_lowercase()
        .split(TERM_DELIMITER)
        .map(|token| token.trim().to_string())
        .collect()
}

/// 解析数位设置
///
/// # 参数
/// - `input`: 形如 `"3x2x1"` 的数位设置
/// - `operand_count`: 每道题的运算数个数
///
/// # 返回
/// 返回长度为 `operand_count` 的位数列表；只给出一个位数时应用到所有运算数
pub fn parse_term_specs(input: &str, operand_count: usize) -> Result<Vec<TermSpec>, ConfigError> {
    if operand_count == 0 {
        return Err(ConfigError::ZeroOperandCount);
    }
    if !SPEC_PATTERN.is_match(input) {
        return Err(ConfigError::InvalidCharacters {
            input: input.to_string(),
        });
    }

    let mut specs = Vec::new();
    for token in split_tokens(input) {
        let digit_count = token
            .parse::<u32>()
            .ok()
            .filter(|d| *d >= 1)
            .ok_or_else(|| ConfigError::InvalidDigitCount {
                token: token.clone(),
            })?;
        if digit_count > MAX_DIGIT_COUNT {
            return Err(ConfigError::DigitCountTooLarge {
                digits: digit_count,
                max: MAX_DIGIT_COUNT,
            });
        }
        specs.push(TermSpec::new(digit_count));
    }

    if specs.len() > 1 && specs.len() != operand_count {
        return Err(ConfigError::TermCountMismatch {
            expected: operand_count,
            found: specs.len(),
        });
    }

    Ok(recycle_last(specs, operand_count))
}

/// 解析上限设置
///
/// 空字符串表示没有上限。不足的位置沿用最后一个上限，多余的上限被忽略。
pub fn parse_range_limits(
    input: &str,
    operand_count: usize,
) -> Result<Vec<Option<i128>>, ConfigError> {
    if input.trim().is_empty() {
        return Ok(vec![None; operand_count]);
    }

    let limits = split_tokens(input)
        .into_iter()
        .map(|token| {
            token
                .parse::<i128>()
                .map_err(|_| ConfigError::InvalidCap { token })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut limits = recycle_last(limits, operand_count);
    limits.truncate(operand_count);
    Ok(limits.into_iter().map(Some).collect())
}

/// 用最后一项补齐到 `len` 个
fn recycle_last<T: Copy>(mut items: Vec<T>, len: usize) -> Vec<T> {
    if let Some(&last) = items.last() {
        while items.len() < len {
            items.push(last);
        }
    }
    items
}
