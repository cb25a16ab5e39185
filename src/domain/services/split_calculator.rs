//! 分帳計算
//!
//! 總金額先量化為最小單位（`10^-scale`），每位參與者分得
//! `floor(units * weight / total_weight)` 個單位，剩下的單位依
//! [`RemainderPolicy`] 全數交給一人，因此各項金額加總必等於四捨五入後的總額。

use crate::domain::model::{BillInput, BillOutput, Participant, SplitItem};
use crate::utils::error::{Result, SplitError};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// 未設定時使用的小數位數
pub const DEFAULT_SCALE: u32 = 1;
pub const MAX_SCALE: u32 = 4;

/// 各份無條件捨去後，剩餘單位由誰承擔
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemainderPolicy {
    #[default]
    First,
    Last,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SplitPolicy {
    /// 最小單位的小數位數
    pub scale: u32,
    pub remainder: RemainderPolicy,
}

impl Default for SplitPolicy {
    fn default() -> Self {
        Self {
            scale: DEFAULT_SCALE,
            remainder: RemainderPolicy::First,
        }
    }
}

/// 以預設規則分帳（一位小數，餘數給第一位）
pub fn split_bill(input: &BillInput) -> Result<BillOutput> {
    split_bill_with(input, &SplitPolicy::default())
}

pub fn split_bill_with(input: &BillInput, policy: &SplitPolicy) -> Result<BillOutput> {
    validate_bill(input)?;

    let total_amount = input
        .sub_total
        .checked_add(input.tip)
        .ok_or_else(|| overflow("totalAmount"))?;

    let weights: Vec<Decimal> = input
        .participants
        .iter()
        .map(Participant::effective_weight)
        .collect();
    let amounts = allocate(total_amount, &weights, policy)?;

    let items = input
        .participants
        .iter()
        .zip(amounts)
        .map(|(participant, amount)| SplitItem {
            name: participant.name.clone(),
            amount,
        })
        .collect();

    let output = BillOutput {
        date: input.date.clone(),
        location: input.location.clone(),
        sub_total: input.sub_total,
        tip: input.tip,
        total_amount,
        items,
    };
    ensure_json_exact(&output)?;
    Ok(output)
}

/// 金額以 JSON 數字（f64）寫出，無法精確表示的金額會在輸出時被默默改寫，
/// 這裡直接拒絕
fn ensure_json_exact(output: &BillOutput) -> Result<()> {
    let amounts = [
        ("subTotal".to_string(), output.sub_total),
        ("tip".to_string(), output.tip),
        ("totalAmount".to_string(), output.total_amount),
    ]
    .into_iter()
    .chain(
        output
            .items
            .iter()
            .enumerate()
            .map(|(index, item)| (format!("items[{}].amount", index), item.amount)),
    );

    for (field, amount) in amounts {
        if !is_json_exact(amount) {
            return Err(SplitError::validation(
                field,
                format!("{} has too many significant digits to be written exactly", amount),
            ));
        }
    }
    Ok(())
}

fn is_json_exact(amount: Decimal) -> bool {
    amount
        .to_f64()
        .and_then(|float| float.to_string().parse::<Decimal>().ok())
        .is_some_and(|parsed| parsed == amount)
}

fn validate_bill(input: &BillInput) -> Result<()> {
    if input.sub_total < Decimal::ZERO {
        return Err(SplitError::validation(
            "subTotal",
            format!("must not be negative (got {})", input.sub_total),
        ));
    }
    if input.tip < Decimal::ZERO {
        return Err(SplitError::validation(
            "tip",
            format!("must not be negative (got {})", input.tip),
        ));
    }
    if input.participants.is_empty() {
        return Err(SplitError::validation(
            "participants",
            "at least one participant is required",
        ));
    }

    for (index, participant) in input.participants.iter().enumerate() {
        if participant.name.trim().is_empty() {
            return Err(SplitError::validation(
                format!("participants[{}].name", index),
                "name cannot be empty",
            ));
        }
        match participant.weight {
            Some(weight) if weight <= Decimal::ZERO => {
                return Err(SplitError::validation(
                    format!("participants[{}].weight", index),
                    format!("must be greater than zero (got {})", weight),
                ));
            }
            _ => {}
        }
    }

    Ok(())
}

fn allocate(total: Decimal, weights: &[Decimal], policy: &SplitPolicy) -> Result<Vec<Decimal>> {
    if policy.scale > MAX_SCALE {
        return Err(SplitError::validation(
            "scale",
            format!("must be at most {} (got {})", MAX_SCALE, policy.scale),
        ));
    }

    let factor = Decimal::from(10_i64.pow(policy.scale));
    let units = total
        .checked_mul(factor)
        .ok_or_else(|| overflow("totalAmount"))?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);

    let total_weight = weights
        .iter()
        .try_fold(Decimal::ZERO, |acc, weight| acc.checked_add(*weight))
        .ok_or_else(|| overflow("participants.weight"))?;

    let mut shares = weights
        .iter()
        .map(|weight| {
            units
                .checked_mul(*weight)
                .and_then(|scaled| scaled.checked_div(total_weight))
                .map(|share| share.floor())
                .ok_or_else(|| overflow("totalAmount"))
        })
        .collect::<Result<Vec<_>>>()?;

    let allocated: Decimal = shares.iter().sum();
    let remainder = units - allocated;
    let target = match policy.remainder {
        RemainderPolicy::First => 0,
        RemainderPolicy::Last => shares.len() - 1,
    };
    shares[target] += remainder;

    Ok(shares
        .into_iter()
        .map(|share| {
            let mut amount = share / factor;
            amount.rescale(policy.scale);
            amount
        })
        .collect())
}

fn overflow(field: &str) -> SplitError {
    SplitError::validation(field, "amount is too large to compute")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn bill(sub_total: &str, tip: &str, participants: Vec<Participant>) -> BillInput {
        BillInput {
            date: "2024年3月21日".to_string(),
            location: "開心小館".to_string(),
            sub_total: dec(sub_total),
            tip: dec(tip),
            participants,
        }
    }

    fn amounts(output: &BillOutput) -> Vec<Decimal> {
        output.items.iter().map(|item| item.amount).collect()
    }

    #[test]
    fn test_equal_split() {
        let input = bill("100", "10", vec![Participant::new("Alice"), Participant::new("Bob")]);
        let output = split_bill(&input).unwrap();

        assert_eq!(output.total_amount, dec("110"));
        assert_eq!(amounts(&output), vec![dec("55.0"), dec("55.0")]);
        assert_eq!(output.date, input.date);
        assert_eq!(output.location, input.location);
    }

    #[test]
    fn test_remainder_goes_to_first_participant() {
        let input = bill(
            "10",
            "0",
            vec![
                Participant::new("Alice"),
                Participant::new("Bob"),
                Participant::new("Carol"),
            ],
        );
        let output = split_bill(&input).unwrap();

        assert_eq!(amounts(&output), vec![dec("3.4"), dec("3.3"), dec("3.3")]);
    }

    #[test]
    fn test_remainder_to_last_participant() {
        let input = bill(
            "10",
            "0",
            vec![
                Participant::new("Alice"),
                Participant::new("Bob"),
                Participant::new("Carol"),
            ],
        );
        let policy = SplitPolicy {
            scale: 1,
            remainder: RemainderPolicy::Last,
        };
        let output = split_bill_with(&input, &policy).unwrap();

        assert_eq!(amounts(&output), vec![dec("3.3"), dec("3.3"), dec("3.4")]);
    }

    #[test]
    fn test_weighted_split() {
        let input = bill(
            "80",
            "10",
            vec![
                Participant::weighted("Alice", dec("2")),
                Participant::new("Bob"),
            ],
        );
        let output = split_bill(&input).unwrap();

        assert_eq!(amounts(&output), vec![dec("60.0"), dec("30.0")]);
    }

    #[test]
    fn test_preserves_participant_order() {
        let names = ["Zoe", "Adam", "Mia", "Bob"];
        let input = bill(
            "123.4",
            "5.6",
            names.iter().map(|name| Participant::new(*name)).collect(),
        );
        let output = split_bill(&input).unwrap();

        let output_names: Vec<&str> = output.items.iter().map(|item| item.name.as_str()).collect();
        assert_eq!(output_names, names);
        let sum: Decimal = amounts(&output).iter().sum();
        assert_eq!(sum, dec("129.0"));
    }

    #[test]
    fn test_total_is_rounded_half_away_from_zero() {
        let input = bill("0.05", "0", vec![Participant::new("Alice"), Participant::new("Bob")]);
        let output = split_bill(&input).unwrap();

        assert_eq!(output.total_amount, dec("0.05"));
        assert_eq!(amounts(&output), vec![dec("0.1"), dec("0.0")]);
    }

    #[test]
    fn test_zero_bill() {
        let input = bill("0", "0", vec![Participant::new("Alice"), Participant::new("Bob")]);
        let output = split_bill(&input).unwrap();

        assert_eq!(amounts(&output), vec![Decimal::ZERO, Decimal::ZERO]);
    }

    #[test]
    fn test_custom_scale() {
        let input = bill("10", "0", vec![Participant::new("Alice"), Participant::new("Bob"), Participant::new("Carol")]);
        let policy = SplitPolicy {
            scale: 2,
            remainder: RemainderPolicy::First,
        };
        let output = split_bill_with(&input, &policy).unwrap();

        assert_eq!(amounts(&output), vec![dec("3.34"), dec("3.33"), dec("3.33")]);
        assert_eq!(output.items[1].amount.to_string(), "3.33");
    }

    #[test]
    fn test_amounts_carry_policy_scale() {
        let input = bill("100", "10", vec![Participant::new("Alice"), Participant::new("Bob")]);
        let output = split_bill(&input).unwrap();

        assert_eq!(output.items[0].amount.to_string(), "55.0");
    }

    #[test]
    fn test_negative_sub_total_rejected() {
        let input = bill("-1", "0", vec![Participant::new("Alice")]);
        let err = split_bill(&input).unwrap_err();
        assert!(matches!(err, SplitError::ValidationError { ref field, .. } if field == "subTotal"));
    }

    #[test]
    fn test_negative_tip_rejected() {
        let input = bill("10", "-0.5", vec![Participant::new("Alice")]);
        let err = split_bill(&input).unwrap_err();
        assert!(matches!(err, SplitError::ValidationError { ref field, .. } if field == "tip"));
    }

    #[test]
    fn test_empty_participants_rejected() {
        let input = bill("10", "1", vec![]);
        let err = split_bill(&input).unwrap_err();
        assert!(matches!(err, SplitError::ValidationError { ref field, .. } if field == "participants"));
    }

    #[test]
    fn test_blank_name_rejected() {
        let input = bill("10", "1", vec![Participant::new("Alice"), Participant::new("  ")]);
        let err = split_bill(&input).unwrap_err();
        assert!(matches!(err, SplitError::ValidationError { ref field, .. } if field == "participants[1].name"));
    }

    #[test]
    fn test_non_positive_weight_rejected() {
        let input = bill("10", "1", vec![Participant::weighted("Alice", Decimal::ZERO)]);
        let err = split_bill(&input).unwrap_err();
        assert!(matches!(err, SplitError::ValidationError { ref field, .. } if field == "participants[0].weight"));
    }

    #[test]
    fn test_scale_above_maximum_rejected() {
        let input = bill("10", "1", vec![Participant::new("Alice")]);
        let policy = SplitPolicy {
            scale: MAX_SCALE + 1,
            remainder: RemainderPolicy::First,
        };
        assert!(split_bill_with(&input, &policy).is_err());
    }

    #[test]
    fn test_total_beyond_json_precision_rejected() {
        let input = bill("1234567890123456", "0.1", vec![Participant::new("Alice")]);
        let err = split_bill(&input).unwrap_err();
        assert!(matches!(err, SplitError::ValidationError { ref field, .. } if field == "totalAmount"));
    }

    #[test]
    fn test_item_beyond_json_precision_rejected() {
        let input = bill("10000000000000", "0", vec![Participant::new("Alice"), Participant::new("Bob"), Participant::new("Carol")]);
        let policy = SplitPolicy {
            scale: 4,
            remainder: RemainderPolicy::First,
        };
        let err = split_bill_with(&input, &policy).unwrap_err();
        assert!(matches!(err, SplitError::ValidationError { ref field, .. } if field == "items[0].amount"));
    }

    #[test]
    fn test_large_total_that_fits_json_is_kept() {
        let input = bill("123456789012.5", "0.25", vec![Participant::new("Alice"), Participant::new("Bob")]);
        let output = split_bill(&input).unwrap();

        assert_eq!(output.total_amount, dec("123456789012.75"));
        let sum: Decimal = amounts(&output).iter().sum();
        assert_eq!(sum, dec("123456789012.8"));
    }

    #[test]
    fn test_share_overflow_reports_total() {
        let input = bill(
            "7000000000000000000000000000",
            "0",
            vec![Participant::weighted("Alice", dec("2")), Participant::new("Bob")],
        );
        let err = split_bill(&input).unwrap_err();
        assert!(matches!(err, SplitError::ValidationError { ref field, .. } if field == "totalAmount"));
    }

    #[test]
    fn test_deterministic() {
        let input = bill("99.9", "7.7", vec![Participant::new("A"), Participant::weighted("B", dec("1.5")), Participant::new("C")]);
        assert_eq!(split_bill(&input).unwrap(), split_bill(&input).unwrap());
    }
}
