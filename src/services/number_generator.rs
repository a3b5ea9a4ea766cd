//! 随机数生成 - 业务能力层
//!
//! 在给定范围内生成一个运算数，可选附加随机小数部分

use crate::error::GenerationError;
use crate::infrastructure::RandomSource;
use crate::models::Number;
use crate::services::bounds_resolver::Bounds;

/// 运算数生成服务
///
/// 职责：
/// - 在 `[min, max]` 内均匀生成整数
/// - 需要小数时附加 `decimal_places` 位随机小数
/// - 保证结果不超过用户上限
#[derive(Debug, Clone, Copy, Default)]
pub struct NumberGenerator {
    decimal_places: Option<u32>,
}

impl NumberGenerator {
    /// 只生成整数
    pub fn integers() -> Self {
        Self {
            decimal_places: None,
        }
    }

    /// 生成带 `places` 位小数的数
    pub fn with_decimals(places: u32) -> Self {
        Self {
            decimal_places: Some(places),
        }
    }

    /// 结果的小数位数
    pub fn scale(&self) -> u32 {
        self.decimal_places.unwrap_or(0)
    }

    /// 生成一个运算数
    ///
    /// 放大后的数超出 i128 时返回 `GenerationError::OperandOverflow`
    pub fn generate(
        &self,
        source: &mut dyn RandomSource,
        bounds: &Bounds,
    ) -> Result<Number, GenerationError> {
        let mut integer = draw_integer(source, bounds.min, bounds.max);
        if let Some(cap) = bounds.cap {
            integer = integer.min(cap);
        }

        let Some(places) = self.decimal_places else {
            return Ok(Number::integer(integer));
        };

        let overflow = || GenerationError::OperandOverflow { places };
        let factor = 10i128.checked_pow(places).ok_or_else(overflow)?;
        // f64::round 为四舍五入（远离零），0.996 保留两位会进到 1.00
        let fraction = (source.next_uniform() * factor as f64).round() as i128;
        let mut units = integer
            .checked_mul(factor)
            .and_then(|scaled| scaled.checked_add(fraction))
            .ok_or_else(overflow)?;
        if let Some(cap) = bounds.cap {
            let cap_units = cap.checked_mul(factor).ok_or_else(overflow)?;
            units = units.min(cap_units);
        }
        Ok(Number::new(units, places))
    }
}

/// 在 `[min, max]` 内均匀抽取整数
pub fn draw_integer(source: &mut dyn RandomSource, min: i128, max: i128) -> i128 {
    let span = (max - min + 1) as f64;
    let offset = (source.next_uniform() * span).floor() as i128;
    (min + offset).clamp(min, max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::{SequenceRandom, StdRandom};
    use crate::models::TermSpec;
    use crate::services::bounds_resolver::resolve_bounds;

    fn bounds(min: i128, max: i128, cap: Option<i128>) -> Bounds {
        Bounds { min, max, cap }
    }

    #[test]
    fn test_draw_hits_both_ends() {
        let mut source = SequenceRandom::new(vec![0.0, 0.999_999]);
        assert_eq!(draw_integer(&mut source, 10, 99), 10);
        assert_eq!(draw_integer(&mut source, 10, 99), 99);
    }

    #[test]
    fn test_generated_values_stay_in_bounds() {
        let mut source = StdRandom::seeded(42);
        let generator = NumberGenerator::integers();
        for digits in 1..=6 {
            let b = resolve_bounds(1, TermSpec::new(digits), None).unwrap();
            for _ in 0..200 {
                let n = generator.generate(&mut source, &b).unwrap();
                assert!(b.contains(n.units()), "{} not in {:?}", n, b);
            }
        }
    }

    #[test]
    fn test_decimal_places_added() {
        let mut source = SequenceRandom::new(vec![0.5, 0.123_4]);
        let n = NumberGenerator::with_decimals(2).generate(&mut source, &bounds(10, 99, None)).unwrap();
        // 10 + 45 = 55，小数 0.1234 -> 0.12
        assert_eq!(n, Number::new(5512, 2));
    }

    #[test]
    fn test_decimal_clamped_to_cap() {
        let mut source = SequenceRandom::new(vec![0.999, 0.9]);
        let n = NumberGenerator::with_decimals(1)
            .generate(&mut source, &bounds(1, 20, Some(20)))
            .unwrap();
        assert_eq!(n, Number::new(200, 1));
        assert_eq!(n.scale(), 1);
    }

    #[test]
    fn test_decimal_respects_cap_over_many_draws() {
        let mut source = StdRandom::seeded(9);
        let generator = NumberGenerator::with_decimals(3);
        let b = bounds(1, 50, Some(50));
        for _ in 0..500 {
            let n = generator.generate(&mut source, &b).unwrap();
            assert!(n <= Number::integer(50));
            assert!(n >= Number::integer(1));
        }
    }

    #[test]
    fn test_oversized_decimal_reports_overflow() {
        let mut source = SequenceRandom::new(vec![0.5, 0.5]);
        let b = resolve_bounds(1, TermSpec::new(12), None).unwrap();
        let err = NumberGenerator::with_decimals(30)
            .generate(&mut source, &b)
            .unwrap_err();
        assert!(matches!(err, GenerationError::OperandOverflow { places: 30 }));
    }
}
