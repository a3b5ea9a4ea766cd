//! 定点小数
//!
//! 题目中的所有数字都以 `units / 10^scale` 的形式保存，
//! 这样在生成页与答案页之间传递时不会丢失精度。

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// 定点小数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Number {
    units: i128,
    scale: u32,
}

/// 数字解析错误
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("无法解析数字: '{input}'")]
pub struct ParseNumberError {
    pub input: String,
}

/// 计算 10 的 `exp` 次方
pub fn pow10(exp: u32) -> i128 {
    10i128.pow(exp)
}

/// 整数除法，四舍五入（远离零）
pub fn div_round_half_away(numerator: i128, denominator: i128) -> i128 {
    let quotient = numerator / denominator;
    let remainder = numerator % denominator;
    if remainder.abs() >= denominator.abs() - remainder.abs() {
        if (numerator < 0) == (denominator < 0) {
            quotient + 1
        } else {
            quotient - 1
        }
    } else {
        quotient
    }
}

impl Number {
    pub const ZERO: Number = Number { units: 0, scale: 0 };

    pub fn new(units: i128, scale: u32) -> Self {
        Self { units, scale }
    }

    /// 创建整数
    pub fn integer(value: i128) -> Self {
        Self::new(value, 0)
    }

    pub fn units(&self) -> i128 {
        self.units
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }

    pub fn is_zero(&self) -> bool {
        self.units == 0
    }

    pub fn is_negative(&self) -> bool {
        self.units < 0
    }

    /// 整数部分（向零截断）
    pub fn trunc(&self) -> i128 {
        self.units / pow10(self.scale)
    }

    /// `units` 的十进制数位（高位在前），0 返回 `[0]`
    pub fn digits(&self) -> Vec<u8> {
        digits_of(self.units.unsigned_abs())
    }

    /// 调整小数位数，缩小位数时四舍五入
    pub fn rescale(self, scale: u32) -> Option<Number> {
        match scale.cmp(&self.scale) {
            Ordering::Equal => Some(self),
            Ordering::Greater => {
                let factor = 10i128.checked_pow(scale - self.scale)?;
                Some(Number::new(self.units.checked_mul(factor)?, scale))
            }
            Ordering::Less => {
                let factor = pow10(self.scale - scale);
                Some(Number::new(div_round_half_away(self.units, factor), scale))
            }
        }
    }

    pub fn checked_add(self, other: Number) -> Option<Number> {
        let scale = self.scale.max(other.scale);
        let (a, b) = (self.rescale(scale)?, other.rescale(scale)?);
        Some(Number::new(a.units.checked_add(b.units)?, scale))
    }

    pub fn checked_sub(self, other: Number) -> Option<Number> {
        let scale = self.scale.max(other.scale);
        let (a, b) = (self.rescale(scale)?, other.rescale(scale)?);
        Some(Number::new(a.units.checked_sub(b.units)?, scale))
    }

    /// 精确乘法，结果的小数位数为两者之和
    pub fn checked_mul(self, other: Number) -> Option<Number> {
        Some(Number::new(
            self.units.checked_mul(other.units)?,
            self.scale.checked_add(other.scale)?,
        ))
    }

    /// 除法，结果保留 `scale` 位小数并四舍五入
    pub fn checked_div(self, other: Number, scale: u32) -> Option<Number> {
        if other.units == 0 {
            return None;
        }
        // a/10^sa ÷ b/10^sb = a * 10^(sb + scale - sa) / b，单位为 10^-scale
        let shift = other.scale as i64 + scale as i64 - self.scale as i64;
        let (numerator, denominator) = if shift >= 0 {
            let factor = 10i128.checked_pow(u32::try_from(shift).ok()?)?;
            (self.units.checked_mul(factor)?, other.units)
        } else {
            let factor = 10i128.checked_pow(u32::try_from(-shift).ok()?)?;
            (self.units, other.units.checked_mul(factor)?)
        };
        Some(Number::new(
            div_round_half_away(numerator, denominator),
            scale,
        ))
    }

    /// 整数取余，仅在两者小数位数相同时有意义
    pub fn rem_units(self, other: Number) -> i128 {
        if other.units == 0 {
            0
        } else {
            self.units % other.units
        }
    }
}

/// 非负整数的十进制数位（高位在前）
pub fn digits_of(value: u128) -> Vec<u8> {
    if value == 0 {
        return vec![0];
    }
    let mut digits = Vec::new();
    let mut rest = value;
    while rest > 0 {
        digits.push((rest % 10) as u8);
        rest /= 10;
    }
    digits.reverse();
    digits
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Number {
    fn cmp(&self, other: &Self) -> Ordering {
        let scale = self.scale.max(other.scale);
        match (self.rescale(scale), other.rescale(scale)) {
            (Some(a), Some(b)) => a.units.cmp(&b.units),
            // 放大溢出时退回按整数部分比较
            _ => self.trunc().cmp(&other.trunc()),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.units < 0 { "-" } else { "" };
        let magnitude = self.units.unsigned_abs();
        if self.scale == 0 {
            return write!(f, "{}{}", sign, magnitude);
        }
        let factor = pow10(self.scale) as u128;
        write!(
            f,
            "{}{}.{:0width$}",
            sign,
            magnitude / factor,
            magnitude % factor,
            width = self.scale as usize
        )
    }
}

impl FromStr for Number {
    type Err = ParseNumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseNumberError {
            input: s.to_string(),
        };
        let trimmed = s.trim();
        let (negative, body) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };
        let (int_part, frac_part) = body.split_once('.').unwrap_or((body, ""));
        if int_part.is_empty()
            || !int_part.bytes().all(|b| b.is_ascii_digit())
            || !frac_part.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(err());
        }
        let scale = u32::try_from(frac_part.len()).map_err(|_| err())?;
        let units: i128 = format!("{}{}", int_part, frac_part)
            .parse()
            .map_err(|_| err())?;
        Ok(Number::new(if negative { -units } else { units }, scale))
    }
}

impl Serialize for Number {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

// 既接受字符串也接受整数
impl<'de> Deserialize<'de> for Number {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::Visitor;

        struct NumberVisitor;

        impl<'de> Visitor<'de> for NumberVisitor {
            type Value = Number;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a decimal string or integer")
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                value.parse().map_err(E::custom)
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(Number::integer(value as i128))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(Number::integer(value as i128))
            }
        }

        deserializer.deserialize_any(NumberVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_pads_fraction() {
        assert_eq!(Number::new(1205, 2).to_string(), "12.05");
        assert_eq!(Number::new(7, 3).to_string(), "0.007");
        assert_eq!(Number::integer(84).to_string(), "84");
    }

    #[test]
    fn test_parse_keeps_scale() {
        let n: Number = "3.10".parse().unwrap();
        assert_eq!(n, Number::new(310, 2));
        assert!("3.".parse::<Number>().is_ok());
        assert!("abc".parse::<Number>().is_err());
        assert!(".5".parse::<Number>().is_err());
    }

    #[test]
    fn test_rescale_rounds_half_away_from_zero() {
        assert_eq!(Number::new(12345, 3).rescale(2), Some(Number::new(1235, 2)));
        assert_eq!(Number::new(-12345, 3).rescale(2), Some(Number::new(-1235, 2)));
        assert_eq!(Number::new(12344, 3).rescale(2), Some(Number::new(1234, 2)));
    }

    #[test]
    fn test_div_rounds_to_scale() {
        let q = Number::integer(10).checked_div(Number::integer(3), 2).unwrap();
        assert_eq!(q, Number::new(333, 2));
        let q = Number::new(250, 2).checked_div(Number::new(150, 2), 1).unwrap();
        assert_eq!(q, Number::new(17, 1));
        assert!(Number::integer(1).checked_div(Number::ZERO, 0).is_none());
    }

    #[test]
    fn test_ordering_across_scales() {
        assert!(Number::new(150, 2) > Number::integer(1));
        assert!(Number::new(99, 1) < Number::integer(10));
    }

    #[test]
    fn test_json_accepts_string_and_integer() {
        let n: Number = serde_json::from_str("\"0.25\"").unwrap();
        assert_eq!(n, Number::new(25, 2));
        let n: Number = serde_json::from_str("42").unwrap();
        assert_eq!(n, Number::integer(42));
        assert_eq!(serde_json::to_string(&Number::new(25, 2)).unwrap(), "\"0.25\"");
    }
}
