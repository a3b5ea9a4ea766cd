//! 取值范围计算 - 业务能力层
//!
//! 只负责"某一项能取哪些值"，不关心随机数和运算

use serde::{Deserialize, Serialize};

use crate::error::RangeError;
use crate::models::number::pow10;
use crate::models::TermSpec;

/// 闭区间 `[min, max]`，保证 `min <= max`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: i128,
    pub max: i128,
    /// 用户设置的上限（生成小数后也不能超过它）
    pub cap: Option<i128>,
}

impl Bounds {
    pub fn contains(&self, value: i128) -> bool {
        self.min <= value && value <= self.max
    }
}

/// 按位数得到的自然范围（1 位数从 1 开始，不含 0）
pub fn natural_bounds(digit_count: u32) -> (i128, i128) {
    let min = if digit_count <= 1 {
        1
    } else {
        pow10(digit_count - 1)
    };
    (min, pow10(digit_count) - 1)
}

/// 计算某一项的取值范围
///
/// # 参数
/// - `term`: 该项在题目中的位置（从 1 开始，仅用于报错）
/// - `spec`: 位数设置
/// - `cap`: 用户设置的上限
///
/// # 返回
/// 有上限时 `max = min(自然上界, cap)`；若上限小于自然下界，下界放宽到 1。
/// 上限小于 1 时没有可用的值，返回 `RangeError`。
pub fn resolve_bounds(term: usize, spec: TermSpec, cap: Option<i128>) -> Result<Bounds, RangeError> {
    let (natural_min, natural_max) = natural_bounds(spec.digit_count);
    let mut min = natural_min;
    let mut max = natural_max;

    if let Some(cap) = cap {
        max = natural_max.min(cap);
        if max < natural_min {
            min = 1;
        }
        if max < 1 {
            return Err(RangeError::NoValidValue {
                term,
                digit_count: spec.digit_count,
                cap,
            });
        }
    }

    if max < min {
        max = min;
    }

    Ok(Bounds { min, max, cap })
}

/// 批量计算每一项的取值范围
pub fn resolve_all(specs: &[TermSpec], caps: &[Option<i128>]) -> Result<Vec<Bounds>, RangeError> {
    specs
        .iter()
        .enumerate()
        .map(|(idx, spec)| resolve_bounds(idx + 1, *spec, caps.get(idx).copied().flatten()))
        .collect()
}

/// 上限输入框的提示文字，例如 `"99x9"`
pub fn natural_max_hint(specs: &[TermSpec]) -> String {
    specs
        .iter()
        .map(|spec| natural_bounds(spec.digit_count).1.to_string())
        .collect::<Vec<_>>()
        .join("x")
}
