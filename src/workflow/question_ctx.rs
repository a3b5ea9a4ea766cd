//! 题目生成上下文
//!
//! 封装"这一批题怎么出"：运算、每一项的取值范围、小数设置。
//! 在生成任何题目之前一次性校验配置，出错时直接返回，不会产生半成品批次。

use std::fmt::Display;

use crate::config::Config;
use crate::error::{AppResult, ConfigError};
use crate::models::term_spec::MAX_DECIMAL_PLACES;
use crate::models::{parse_range_limits, parse_term_specs, Operation, TermSpec};
use crate::services::bounds_resolver::{resolve_all, Bounds};

/// 题目生成上下文
#[derive(Debug, Clone)]
pub struct GenerationCtx {
    /// 运算类型
    pub operation: Operation,

    /// 每一项的位数设置
    pub term_specs: Vec<TermSpec>,

    /// 每一项的取值范围
    pub bounds: Vec<Bounds>,

    /// 启用小数时的小数位数
    pub decimal_places: Option<u32>,

    /// 除法是否使用长除法题面
    pub long_division: bool,
}

impl GenerationCtx {
    /// 从配置创建上下文
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let operand_count = config.num_values;
        if operand_count == 0 {
            return Err(ConfigError::ZeroOperandCount.into());
        }
        if config.operation.requires_two_operands() && operand_count != 2 {
            return Err(ConfigError::ArityMismatch {
                operation: config.operation,
                expected: 2,
                found: operand_count,
            }
            .into());
        }

        if let Some(places) = config.decimal_places_enabled() {
            if places > MAX_DECIMAL_PLACES {
                return Err(ConfigError::DecimalPlacesTooLarge {
                    places,
                    max: MAX_DECIMAL_PLACES,
                }
                .into());
            }
        }

        let term_specs = parse_term_specs(&config.num_numerals, operand_count)?;
        let caps = if config.max_limit_enabled {
            parse_range_limits(&config.max_value_limit, operand_count)?
        } else {
            vec![None; operand_count]
        };
        let bounds = resolve_all(&term_specs, &caps)?;

        Ok(Self {
            operation: config.operation,
            term_specs,
            bounds,
            decimal_places: config.decimal_places_enabled(),
            long_division: config.long_division_enabled(),
        })
    }

    /// 每道题的运算数个数
    pub fn operand_count(&self) -> usize {
        self.bounds.len()
    }

    /// 小数位数（整数题为 0）
    pub fn scale(&self) -> u32 {
        self.decimal_places.unwrap_or(0)
    }
}

impl Display for GenerationCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ranges = self
            .bounds
            .iter()
            .map(|b| format!("[{}, {}]", b.min, b.max))
            .collect::<Vec<_>>()
            .join(" ");
        write!(
            f,
            "[运算 {} 项数#{} 范围 {} 小数位#{}]",
            self.operation.name(),
            self.operand_count(),
            ranges,
            self.scale()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    fn config(operation: Operation, num_values: usize, numerals: &str) -> Config {
        Config {
            operation,
            num_values,
            num_numerals: numerals.to_string(),
            ..Config::default()
        }
    }

    #[test]
    fn test_bounds_per_term() {
        let ctx = GenerationCtx::from_config(&config(Operation::Addition, 2, "2x1")).unwrap();
        assert_eq!((ctx.bounds[0].min, ctx.bounds[0].max), (10, 99));
        assert_eq!((ctx.bounds[1].min, ctx.bounds[1].max), (1, 9));
        assert!(!ctx.long_division);
    }

    #[test]
    fn test_caps_only_when_enabled() {
        let mut cfg = config(Operation::Addition, 2, "3");
        cfg.max_value_limit = "50".to_string();
        let ctx = GenerationCtx::from_config(&cfg).unwrap();
        assert_eq!(ctx.bounds[0].max, 999);

        cfg.max_limit_enabled = true;
        let ctx = GenerationCtx::from_config(&cfg).unwrap();
        assert_eq!((ctx.bounds[0].min, ctx.bounds[0].max), (1, 50));
    }

    #[test]
    fn test_division_needs_two_operands() {
        let err = GenerationCtx::from_config(&config(Operation::Division, 3, "2")).unwrap_err();
        assert!(matches!(
            err,
            AppError::Config(ConfigError::ArityMismatch { found: 3, .. })
        ));
        let ctx = GenerationCtx::from_config(&config(Operation::Division, 2, "2x1")).unwrap();
        assert!(ctx.long_division);
    }

    #[test]
    fn test_zero_cap_fails_before_generation() {
        let mut cfg = config(Operation::Addition, 2, "2");
        cfg.max_limit_enabled = true;
        cfg.max_value_limit = "0".to_string();
        let err = GenerationCtx::from_config(&cfg).unwrap_err();
        assert!(matches!(err, AppError::Range(_)));
        assert!(err.is_config_error());
    }

    #[test]
    fn test_decimal_places_bounded_before_generation() {
        let mut cfg = config(Operation::Multiplication, 2, "12");
        cfg.include_decimal = true;
        cfg.decimal_places = 30;
        let err = GenerationCtx::from_config(&cfg).unwrap_err();
        assert!(matches!(
            err,
            AppError::Config(ConfigError::DecimalPlacesTooLarge { places: 30, max: 6 })
        ));

        cfg.decimal_places = MAX_DECIMAL_PLACES;
        assert!(GenerationCtx::from_config(&cfg).is_ok());

        // 未启用小数时不检查
        cfg.include_decimal = false;
        cfg.decimal_places = 30;
        assert!(GenerationCtx::from_config(&cfg).is_ok());
    }
}
