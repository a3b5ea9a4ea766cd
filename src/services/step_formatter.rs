//! 解题步骤推导 - 业务能力层
//!
//! 根据 `(运算数, 答案, 小数位数)` 推导竖式步骤，纯函数、无内部状态：
//! - 加法：按列从右到左累加，记录进位
//! - 减法：两数按列借位，连续借位时中间的 0 变成 9
//! - 乘法：乘数每一位对应一个部分积，按位左移
//! - 除法：长除法逐位落下被除数
//!
//! 小数题的运算数小数位数相同，直接按 `units` 的数位对齐，小数点自然对齐。

use crate::models::number::digits_of;
use crate::models::step_trace::{
    AdditionColumn, AdditionTrace, ChainStep, ChainTrace, DigitRow, DivisionStep,
    LongDivisionTrace, MultiplicationTrace, PartialProduct, StepTrace, SubtractionColumn,
    SubtractionTrace,
};
use crate::models::{Number, Operation};

/// 推导一道题的解题步骤
///
/// # 参数
/// - `operation`: 运算类型
/// - `operands`: 经过 `OperationEngine` 整理后的运算数
/// - `answer`: 最终答案
/// - `decimal_places`: 小数位数（整数题为 0）
pub fn format_steps(
    operation: Operation,
    operands: &[Number],
    answer: Number,
    decimal_places: u32,
) -> StepTrace {
    match operation {
        Operation::Addition => StepTrace::Addition(addition_trace(operands, answer, decimal_places)),
        Operation::Subtraction => match operands {
            [minuend, subtrahend] => StepTrace::Subtraction(subtraction_trace(
                *minuend,
                *subtrahend,
                answer,
                decimal_places,
            )),
            _ => StepTrace::ChainedSubtraction(chain_trace(
                operation,
                operands,
                answer,
                Number::checked_sub,
            )),
        },
        Operation::Multiplication => match operands {
            [multiplicand, multiplier] => StepTrace::Multiplication(multiplication_trace(
                *multiplicand,
                *multiplier,
                answer,
            )),
            _ => StepTrace::ChainedMultiplication(chain_trace(
                operation,
                operands,
                answer,
                Number::checked_mul,
            )),
        },
        Operation::Division => {
            let dividend = operands.first().map_or(0, |n| n.units());
            let divisor = operands.get(1).map_or(1, |n| n.units());
            StepTrace::LongDivision(long_division_trace(dividend, divisor, decimal_places))
        }
    }
}

/// 右对齐所有运算数，宽度不足的左侧用占位补齐
///
/// 小数至少保留个位的 0（`0.25` 记为 `0`、`2`、`5` 三位）
pub fn align_rows(operands: &[Number]) -> (usize, Vec<DigitRow>) {
    let digit_rows: Vec<Vec<u8>> = operands.iter().map(column_digits).collect();
    let width = digit_rows.iter().map(Vec::len).max().unwrap_or(0);
    let rows = digit_rows
        .into_iter()
        .map(|digits| {
            let mut row: DigitRow = vec![None; width - digits.len()];
            row.extend(digits.into_iter().map(Some));
            row
        })
        .collect();
    (width, rows)
}

fn column_digits(number: &Number) -> Vec<u8> {
    let digits = number.digits();
    let min_len = number.scale() as usize + 1;
    if digits.len() >= min_len {
        return digits;
    }
    let mut padded = vec![0; min_len - digits.len()];
    padded.extend(digits);
    padded
}

/// 竖式加法
pub fn addition_trace(operands: &[Number], answer: Number, scale: u32) -> AdditionTrace {
    let (width, rows) = align_rows(operands);
    let mut columns = Vec::with_capacity(width);
    let mut carry = 0u32;

    for place in 0..width {
        let idx = width - 1 - place;
        let digits: Vec<u8> = rows.iter().filter_map(|row| row[idx]).collect();
        let total = digits.iter().map(|d| u32::from(*d)).sum::<u32>() + carry;
        let carry_out = if total >= 10 { total / 10 } else { 0 };
        columns.push(AdditionColumn {
            place,
            digits,
            carry_in: carry,
            total,
            carry_out,
        });
        carry = carry_out;
    }

    // 第 k 个位置对应 place = width - k，即每列向左一列写进位
    let carries: Vec<u32> = columns.iter().rev().map(|c| c.carry_out).collect();
    let carry_line = carries.iter().any(|c| *c > 0).then_some(carries);

    AdditionTrace {
        width,
        scale,
        rows,
        columns,
        carry_line,
        answer,
    }
}

/// 两数竖式减法（要求被减数不小于减数）
pub fn subtraction_trace(
    minuend: Number,
    subtrahend: Number,
    answer: Number,
    scale: u32,
) -> SubtractionTrace {
    let (width, mut rows) = align_rows(&[minuend, subtrahend]);
    let subtrahend_row = rows.pop().unwrap_or_default();
    let minuend_row = rows.pop().unwrap_or_default();

    let top: Vec<u8> = minuend_row.iter().map(|d| d.unwrap_or(0)).collect();
    let bottom: Vec<u8> = subtrahend_row.iter().map(|d| d.unwrap_or(0)).collect();
    let mut working = top.clone();
    let mut borrows = vec![false; width];
    let mut columns = Vec::with_capacity(width);

    for place in 0..width {
        let idx = width - 1 - place;
        let available = working[idx];
        let borrowed = available < bottom[idx];
        let mut current = available;

        if borrowed {
            // 向左找最近的非零位借 1，中间的 0 都变成 9
            if let Some(lender) = (0..idx).rev().find(|&j| working[j] > 0) {
                working[lender] -= 1;
                for digit in &mut working[lender + 1..idx] {
                    *digit = 9;
                }
            }
            current += 10;
            borrows[idx] = true;
        }

        columns.push(SubtractionColumn {
            place,
            minuend_digit: top[idx],
            available,
            subtrahend_digit: bottom[idx],
            borrowed,
            result_digit: current.saturating_sub(bottom[idx]),
        });
    }

    let any_borrow = borrows.iter().any(|b| *b);
    SubtractionTrace {
        width,
        scale,
        minuend: minuend_row,
        subtrahend: subtrahend_row,
        columns,
        borrow_line: any_borrow.then_some(borrows),
        adjusted_minuend: any_borrow.then_some(working),
        answer,
    }
}

/// 两数竖式乘法
pub fn multiplication_trace(
    multiplicand: Number,
    multiplier: Number,
    answer: Number,
) -> MultiplicationTrace {
    let partial_products = multiplier
        .digits()
        .into_iter()
        .rev()
        .enumerate()
        .filter(|(_, digit)| *digit != 0)
        .map(|(place, digit)| PartialProduct {
            place,
            digit,
            value: i128::from(digit).saturating_mul(multiplicand.units().abs()),
        })
        .collect();

    let product = Number::new(
        multiplicand.units().saturating_mul(multiplier.units()),
        multiplicand.scale() + multiplier.scale(),
    );

    MultiplicationTrace {
        multiplicand,
        multiplier,
        partial_products,
        product,
        answer,
    }
}

/// 多个数从左到右逐步计算，`step` 为每一步的运算
pub fn chain_trace(
    operation: Operation,
    operands: &[Number],
    answer: Number,
    step: fn(Number, Number) -> Option<Number>,
) -> ChainTrace {
    let mut steps = Vec::new();
    if let Some((&first, rest)) = operands.split_first() {
        let mut acc = first;
        for &right in rest {
            let Some(result) = step(acc, right) else { break };
            steps.push(ChainStep {
                left: acc,
                right,
                result,
            });
            acc = result;
        }
    }
    ChainTrace {
        operation,
        steps,
        answer,
    }
}

/// 长除法
///
/// 从最高位开始逐位落下被除数，够除时商一位；商第一位之后不够除的位置商 0。
/// 除数大于被除数时商 0，余数为被除数。
pub fn long_division_trace(dividend: i128, divisor: i128, scale: u32) -> LongDivisionTrace {
    if divisor <= 0 || dividend < 0 || divisor > dividend {
        return LongDivisionTrace {
            dividend,
            divisor,
            scale,
            steps: Vec::new(),
            quotient_digits: vec![0],
            quotient: 0,
            remainder: dividend,
        };
    }

    let mut steps = Vec::new();
    let mut quotient_digits = Vec::new();
    let mut working: i128 = 0;

    for (digit_index, digit) in digits_of(dividend.unsigned_abs()).into_iter().enumerate() {
        working = working * 10 + i128::from(digit);
        if working >= divisor {
            let quotient_digit = working / divisor;
            let subtracted = quotient_digit * divisor;
            let remainder = working - subtracted;
            steps.push(DivisionStep {
                digit_index,
                working,
                quotient_digit: quotient_digit as u8,
                subtracted,
                remainder,
            });
            quotient_digits.push(quotient_digit as u8);
            working = remainder;
        } else if !quotient_digits.is_empty() {
            quotient_digits.push(0);
        }
    }

    let quotient = quotient_digits
        .iter()
        .fold(0i128, |acc, d| acc * 10 + i128::from(*d));

    LongDivisionTrace {
        dividend,
        divisor,
        scale,
        steps,
        quotient_digits,
        quotient,
        remainder: working,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::StdRandom;
    use crate::services::number_generator::draw_integer;

    fn int(v: i128) -> Number {
        Number::integer(v)
    }

    #[test]
    fn test_alignment_uses_placeholders() {
        let (width, rows) = align_rows(&[int(305), int(7)]);
        assert_eq!(width, 3);
        assert_eq!(rows[0], vec![Some(3), Some(0), Some(5)]);
        assert_eq!(rows[1], vec![None, None, Some(7)]);
    }

    #[test]
    fn test_addition_carry_line_only_when_carrying() {
        let trace = addition_trace(&[int(12), int(3)], int(15), 0);
        assert!(trace.carry_line.is_none());

        let trace = addition_trace(&[int(58), int(7)], int(65), 0);
        assert_eq!(trace.carry_line, Some(vec![0, 1]));
        assert_eq!(trace.columns[0].total, 15);
        assert_eq!(trace.columns[1].carry_in, 1);
        assert_eq!(trace.reconstruct_units(), 65);
    }

    #[test]
    fn test_addition_final_carry() {
        let trace = addition_trace(&[int(95), int(7)], int(102), 0);
        assert_eq!(trace.carry_line, Some(vec![1, 1]));
        assert_eq!(trace.reconstruct_units(), 102);
    }

    #[test]
    fn test_addition_reconstructs_random_sums() {
        let mut source = StdRandom::seeded(3);
        for _ in 0..300 {
            let count = draw_integer(&mut source, 2, 5) as usize;
            let operands: Vec<Number> = (0..count)
                .map(|_| {
                    let digits = draw_integer(&mut source, 1, 6) as u32;
                    let max = 10i128.pow(digits) - 1;
                    int(draw_integer(&mut source, 1, max))
                })
                .collect();
            let sum: i128 = operands.iter().map(|n| n.units()).sum();
            let trace = addition_trace(&operands, int(sum), 0);
            assert_eq!(trace.reconstruct_units(), sum, "{:?}", operands);
        }
    }

    #[test]
    fn test_subtraction_without_borrow() {
        let trace = subtraction_trace(int(87), int(25), int(62), 0);
        assert!(trace.borrow_line.is_none());
        assert!(trace.adjusted_minuend.is_none());
    }

    #[test]
    fn test_subtraction_cascading_borrow() {
        let trace = subtraction_trace(int(1003), int(7), int(996), 0);
        assert_eq!(trace.borrow_line, Some(vec![false, false, false, true]));
        assert_eq!(trace.adjusted_minuend, Some(vec![0, 9, 9, 3]));
        let result: Vec<u8> = trace.columns.iter().rev().map(|c| c.result_digit).collect();
        assert_eq!(result, vec![0, 9, 9, 6]);
        assert_eq!(trace.subtrahend, vec![None, None, None, Some(7)]);
    }

    #[test]
    fn test_subtraction_columns_reconstruct_difference() {
        let mut source = StdRandom::seeded(11);
        for _ in 0..300 {
            let a = draw_integer(&mut source, 1, 999_999);
            let b = draw_integer(&mut source, 1, a);
            let trace = subtraction_trace(int(a), int(b), int(a - b), 0);
            let value: i128 = trace
                .columns
                .iter()
                .map(|c| i128::from(c.result_digit) * 10i128.pow(c.place as u32))
                .sum();
            assert_eq!(value, a - b, "{} - {}", a, b);
        }
    }

    #[test]
    fn test_single_digit_multiplier() {
        let trace = multiplication_trace(int(23), int(4), int(92));
        assert_eq!(
            trace.partial_products,
            vec![PartialProduct {
                place: 0,
                digit: 4,
                value: 92
            }]
        );
        assert_eq!(trace.product, int(92));
    }

    #[test]
    fn test_zero_multiplier_digit_keeps_shift() {
        let trace = multiplication_trace(int(12), int(305), int(3660));
        let places: Vec<usize> = trace.partial_products.iter().map(|p| p.place).collect();
        assert_eq!(places, vec![0, 2]);
        assert_eq!(trace.sum_of_partials(), 3660);
    }

    #[test]
    fn test_chain_for_three_factors() {
        let trace = format_steps(
            Operation::Multiplication,
            &[int(2), int(3), int(4)],
            int(24),
            0,
        );
        let StepTrace::ChainedMultiplication(chain) = trace else {
            panic!("expected chain trace");
        };
        assert_eq!(chain.steps.len(), 2);
        assert_eq!(chain.steps[0].result, int(6));
        assert_eq!(chain.steps[1].result, int(24));
    }

    #[test]
    fn test_chained_subtraction_is_flat() {
        let trace = format_steps(Operation::Subtraction, &[int(20), int(4), int(3)], int(13), 0);
        assert_eq!(trace.kind(), "chained_subtraction");
    }

    #[test]
    fn test_long_division_example() {
        let trace = long_division_trace(725, 5, 0);
        assert_eq!(trace.quotient_digits, vec![1, 4, 5]);
        assert_eq!(trace.quotient, 145);
        assert_eq!(trace.remainder, 0);
        assert_eq!(trace.steps[1].working, 22);
        assert_eq!(trace.steps[1].subtracted, 20);
    }

    #[test]
    fn test_long_division_zero_quotient_digits() {
        let trace = long_division_trace(1001, 5, 0);
        assert_eq!(trace.quotient_digits, vec![2, 0, 0]);
        assert_eq!(trace.remainder, 1);
    }

    #[test]
    fn test_long_division_short_circuit() {
        let trace = long_division_trace(3, 7, 0);
        assert_eq!(trace.quotient, 0);
        assert_eq!(trace.remainder, 3);
        assert!(trace.steps.is_empty());
    }

    #[test]
    fn test_long_division_matches_integer_division() {
        let mut source = StdRandom::seeded(5);
        for _ in 0..300 {
            let dividend = draw_integer(&mut source, 1, 9_999_999);
            let divisor = draw_integer(&mut source, 1, 999);
            let trace = long_division_trace(dividend, divisor, 0);
            assert_eq!(trace.quotient, dividend / divisor);
            assert_eq!(trace.remainder, dividend % divisor);
        }
    }
}
