//! 运算规则 - 业务能力层
//!
//! 负责运算数的排列、退化情况的修正以及答案计算：
//! - 减法按从大到小排列，结果不为负
//! - 除法被除数不小于除数，除数为 0 时改为 1
//! - 整数除法去掉余数，保证能整除

use tracing::debug;

use crate::error::GenerationError;
use crate::models::number::pow10;
use crate::models::{Number, Operation};

/// 处理后的运算数和答案
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineOutcome {
    pub operands: Vec<Number>,
    pub answer: Number,
}

/// 运算服务
#[derive(Debug, Clone, Copy)]
pub struct OperationEngine {
    operation: Operation,
    decimal_places: Option<u32>,
}

impl OperationEngine {
    /// 创建运算服务
    ///
    /// # 参数
    /// - `operation`: 运算类型
    /// - `decimal_places`: 启用小数时的小数位数
    pub fn new(operation: Operation, decimal_places: Option<u32>) -> Self {
        Self {
            operation,
            decimal_places,
        }
    }

    fn scale(&self) -> u32 {
        self.decimal_places.unwrap_or(0)
    }

    fn overflow(&self) -> GenerationError {
        GenerationError::Overflow {
            operation: self.operation,
        }
    }

    /// 整理运算数并计算答案
    pub fn apply(&self, operands: Vec<Number>) -> Result<EngineOutcome, GenerationError> {
        let outcome = match self.operation {
            Operation::Addition => self.add(operands)?,
            Operation::Subtraction => self.subtract(operands)?,
            Operation::Multiplication => self.multiply(operands)?,
            Operation::Division => self.divide(operands)?,
        };

        match self.decimal_places {
            Some(places) => {
                let answer = outcome.answer.rescale(places).ok_or_else(|| self.overflow())?;
                Ok(EngineOutcome { answer, ..outcome })
            }
            None => Ok(outcome),
        }
    }

    /// 三项以上连减时，排序后减数之和是否超过被减数
    pub fn would_overdraw(&self, operands: &[Number]) -> bool {
        if self.operation != Operation::Subtraction || operands.len() < 3 {
            return false;
        }
        let Some(&largest) = operands.iter().max() else {
            return false;
        };
        match self.sum(operands).ok().and_then(|total| total.checked_sub(largest)) {
            Some(subtrahends) => subtrahends > largest,
            None => true,
        }
    }

    fn sum(&self, operands: &[Number]) -> Result<Number, GenerationError> {
        operands
            .iter()
            .try_fold(Number::new(0, self.scale()), |acc, n| acc.checked_add(*n))
            .ok_or_else(|| self.overflow())
    }

    fn add(&self, operands: Vec<Number>) -> Result<EngineOutcome, GenerationError> {
        let answer = self.sum(&operands)?;
        Ok(EngineOutcome { operands, answer })
    }

    fn subtract(&self, mut operands: Vec<Number>) -> Result<EngineOutcome, GenerationError> {
        sort_descending(&mut operands);
        let Some((&first, rest)) = operands.split_first() else {
            return Ok(EngineOutcome {
                operands,
                answer: Number::new(0, self.scale()),
            });
        };

        let subtrahends = self.sum(rest)?;
        if subtrahends > first {
            // 重新抽取仍不够减时，把被减数加上所有减数
            let lifted = first.checked_add(subtrahends).ok_or_else(|| self.overflow())?;
            debug!("连减结果为负，被减数 {} 调整为 {}", first, lifted);
            operands[0] = lifted;
        }

        let answer = operands[0]
            .checked_sub(subtrahends)
            .ok_or_else(|| self.overflow())?;
        Ok(EngineOutcome { operands, answer })
    }

    fn multiply(&self, operands: Vec<Number>) -> Result<EngineOutcome, GenerationError> {
        let product = operands
            .iter()
            .try_fold(Number::integer(1), |acc, n| acc.checked_mul(*n))
            .ok_or_else(|| self.overflow())?;
        let answer = product.rescale(self.scale()).ok_or_else(|| self.overflow())?;
        Ok(EngineOutcome { operands, answer })
    }

    fn divide(&self, mut operands: Vec<Number>) -> Result<EngineOutcome, GenerationError> {
        if operands.len() != 2 {
            return Err(GenerationError::OperandCount {
                operation: Operation::Division,
                expected: 2,
                found: operands.len(),
            });
        }
        sort_descending(&mut operands);

        let scale = self.scale();
        let mut dividend = operands[0];
        let mut divisor = operands[1];

        if divisor.is_zero() {
            debug!("除数为 0，改为 1");
            divisor = Number::new(pow10(scale), scale);
        }

        if self.decimal_places.is_none() {
            let remainder = dividend.rem_units(divisor);
            dividend = Number::new(dividend.units() - remainder, scale);
            if dividend.is_zero() {
                dividend = Number::new(
                    divisor.units().checked_mul(2).ok_or_else(|| self.overflow())?,
                    scale,
                );
                debug!("被除数去余数后为 0，改为除数的 2 倍: {}", dividend);
            }
        }

        let answer = dividend
            .checked_div(divisor, scale)
            .ok_or_else(|| self.overflow())?;
        Ok(EngineOutcome {
            operands: vec![dividend, divisor],
            answer,
        })
    }
}

fn sort_descending(operands: &mut [Number]) {
    operands.sort_by(|a, b| b.cmp(a));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ints(values: &[i128]) -> Vec<Number> {
        values.iter().map(|v| Number::integer(*v)).collect()
    }

    #[test]
    fn test_addition_keeps_order() {
        let outcome = OperationEngine::new(Operation::Addition, None)
            .apply(ints(&[12, 85, 3]))
            .unwrap();
        assert_eq!(outcome.operands, ints(&[12, 85, 3]));
        assert_eq!(outcome.answer, Number::integer(100));
    }

    #[test]
    fn test_subtraction_sorted_descending() {
        let outcome = OperationEngine::new(Operation::Subtraction, None)
            .apply(ints(&[120, 450]))
            .unwrap();
        assert_eq!(outcome.operands, ints(&[450, 120]));
        assert_eq!(outcome.answer, Number::integer(330));
    }

    #[test]
    fn test_chained_subtraction_never_negative() {
        let outcome = OperationEngine::new(Operation::Subtraction, None)
            .apply(ints(&[5, 9, 5]))
            .unwrap();
        assert_eq!(outcome.operands, ints(&[19, 5, 5]));
        assert_eq!(outcome.answer, Number::integer(9));

        let outcome = OperationEngine::new(Operation::Subtraction, None)
            .apply(ints(&[3, 20, 4]))
            .unwrap();
        assert_eq!(outcome.operands, ints(&[20, 4, 3]));
        assert_eq!(outcome.answer, Number::integer(13));
    }

    #[test]
    fn test_multiplication_product() {
        let outcome = OperationEngine::new(Operation::Multiplication, None)
            .apply(ints(&[23, 4]))
            .unwrap();
        assert_eq!(outcome.answer, Number::integer(92));
    }

    #[test]
    fn test_decimal_multiplication_rounds() {
        let outcome = OperationEngine::new(Operation::Multiplication, Some(1))
            .apply(vec![Number::new(25, 1), Number::new(35, 1)])
            .unwrap();
        // 2.5 × 3.5 = 8.75 -> 8.8
        assert_eq!(outcome.answer, Number::new(88, 1));
    }

    #[test]
    fn test_division_exact_example() {
        let outcome = OperationEngine::new(Operation::Division, None)
            .apply(ints(&[7, 84]))
            .unwrap();
        assert_eq!(outcome.operands, ints(&[84, 7]));
        assert_eq!(outcome.answer, Number::integer(12));
    }

    #[test]
    fn test_division_removes_remainder() {
        let outcome = OperationEngine::new(Operation::Division, None)
            .apply(ints(&[87, 7]))
            .unwrap();
        assert_eq!(outcome.operands, ints(&[84, 7]));
        assert_eq!(outcome.answer, Number::integer(12));
    }

    #[test]
    fn test_division_zero_guards() {
        let outcome = OperationEngine::new(Operation::Division, None)
            .apply(ints(&[0, 0]))
            .unwrap();
        assert_eq!(outcome.operands, ints(&[2, 1]));
        assert_eq!(outcome.answer, Number::integer(2));

        let outcome = OperationEngine::new(Operation::Division, None)
            .apply(ints(&[9, 0]))
            .unwrap();
        assert_eq!(outcome.operands, ints(&[9, 1]));
    }

    #[test]
    fn test_decimal_division_rounded() {
        let outcome = OperationEngine::new(Operation::Division, Some(2))
            .apply(vec![Number::new(300, 2), Number::new(1000, 2)])
            .unwrap();
        // 10.00 ÷ 3.00 = 3.33
        assert_eq!(outcome.operands[0], Number::new(1000, 2));
        assert_eq!(outcome.answer, Number::new(333, 2));
    }

    #[test]
    fn test_division_requires_two_operands() {
        let err = OperationEngine::new(Operation::Division, None)
            .apply(ints(&[8, 4, 2]))
            .unwrap_err();
        assert!(matches!(err, GenerationError::OperandCount { found: 3, .. }));
    }

    #[test]
    fn test_would_overdraw_only_for_long_subtraction() {
        let engine = OperationEngine::new(Operation::Subtraction, None);
        assert!(engine.would_overdraw(&ints(&[5, 9, 5])));
        assert!(!engine.would_overdraw(&ints(&[9, 1, 1])));
        assert!(!engine.would_overdraw(&ints(&[3, 9])));

        let addition = OperationEngine::new(Operation::Addition, None);
        assert!(!addition.would_overdraw(&ints(&[5, 9, 5])));
    }
}
