//! Split strategies: turning an expense total into exact per-member shares.
//!
//! All three strategies uphold the same contract: the returned amounts sum
//! **exactly** to the total, for any participant count and any weight
//! distribution. Leftover cents produced by integer division are assigned
//! one at a time to participants in input order, starting from the first.
//! The ordering is a deliberate tie-break so identical requests always
//! produce identical output.

use crate::{
    EngineError, MoneyCents, ResultEngine,
    money::BASIS_POINTS_PER_WHOLE,
};

/// How an expense total is divided among its participants.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SplitType {
    Equal,
    Percent,
    Custom,
}

impl SplitType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Equal => "equal",
            Self::Percent => "percent",
            Self::Custom => "custom",
        }
    }
}

impl TryFrom<&str> for SplitType {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "equal" => Ok(Self::Equal),
            "percent" => Ok(Self::Percent),
            "custom" => Ok(Self::Custom),
            other => Err(EngineError::UnknownSplitType(other.to_string())),
        }
    }
}

/// One participant entry of a split request.
///
/// `weight` is basis points for percent splits, cents for custom splits,
/// and ignored for equal splits.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SplitShare {
    pub user_id: String,
    pub weight: Option<i64>,
}

impl SplitShare {
    #[must_use]
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            weight: None,
        }
    }

    #[must_use]
    pub fn with_weight(user_id: impl Into<String>, weight: i64) -> Self {
        Self {
            user_id: user_id.into(),
            weight: Some(weight),
        }
    }
}

/// A computed share: what one participant owes of the total.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemberSplit {
    pub user_id: String,
    pub amount: MoneyCents,
}

/// Computes the per-participant shares of `total`.
///
/// Pure and stateless; safe to call concurrently. Must only be invoked after
/// the membership gate has passed. Every strategy ends with an unconditional
/// exact-sum check; a failure there is an engine bug, surfaced as
/// [`EngineError::SplitSumInvariant`] and never silently corrected.
pub fn compute_splits(
    total: MoneyCents,
    split_type: SplitType,
    shares: &[SplitShare],
) -> ResultEngine<Vec<MemberSplit>> {
    if shares.is_empty() {
        return Err(EngineError::EmptyParticipantList);
    }

    let splits = match split_type {
        SplitType::Equal => equal_shares(total, shares),
        SplitType::Percent => percent_shares(total, shares)?,
        SplitType::Custom => custom_shares(total, shares)?,
    };

    check_exact_sum(total, &splits)?;
    Ok(splits)
}

/// Equal split: floored base share for everyone, remainder cents topped up
/// front-to-back.
fn equal_shares(total: MoneyCents, shares: &[SplitShare]) -> Vec<MemberSplit> {
    let (base, remainder) = total.floor_div(shares.len() as i64);

    shares
        .iter()
        .enumerate()
        .map(|(index, share)| {
            let extra = i64::from((index as i64) < remainder);
            MemberSplit {
                user_id: share.user_id.clone(),
                amount: base + MoneyCents::new(extra),
            }
        })
        .collect()
}

/// Percent split: weights must sum to exactly 100%; each share is the
/// floored fraction, then the leftover (< participant count) is topped up
/// front-to-back.
fn percent_shares(total: MoneyCents, shares: &[SplitShare]) -> ResultEngine<Vec<MemberSplit>> {
    let mut weights = Vec::with_capacity(shares.len());
    for share in shares {
        let basis_points = share
            .weight
            .ok_or(EngineError::MissingField("splits.amount"))?;
        if !(0..=BASIS_POINTS_PER_WHOLE).contains(&basis_points) {
            return Err(EngineError::InvalidAmount(
                "percent weight must be between 0 and 100".to_string(),
            ));
        }
        weights.push(basis_points);
    }

    let weight_sum: i64 = weights.iter().sum();
    if weight_sum != BASIS_POINTS_PER_WHOLE {
        return Err(EngineError::PercentSumMismatch(weight_sum));
    }

    let mut splits: Vec<MemberSplit> = shares
        .iter()
        .zip(&weights)
        .map(|(share, &basis_points)| {
            let (amount, _residue) = total.scale_by_basis_points(basis_points);
            MemberSplit {
                user_id: share.user_id.clone(),
                amount,
            }
        })
        .collect();

    let assigned: i64 = splits.iter().map(|split| split.amount.cents()).sum();
    let mut remainder = total.cents() - assigned;
    debug_assert!(remainder >= 0 && remainder < shares.len() as i64);
    for split in &mut splits {
        if remainder == 0 {
            break;
        }
        split.amount += MoneyCents::new(1);
        remainder -= 1;
    }

    Ok(splits)
}

/// Custom split: caller-supplied cents must already balance against the
/// total. No rounding, no remainder step.
fn custom_shares(total: MoneyCents, shares: &[SplitShare]) -> ResultEngine<Vec<MemberSplit>> {
    let mut splits = Vec::with_capacity(shares.len());
    let mut sum: i64 = 0;
    for share in shares {
        let cents = share
            .weight
            .ok_or(EngineError::MissingField("splits.amount"))?;
        if cents < 0 {
            return Err(EngineError::InvalidAmount(
                "custom share must not be negative".to_string(),
            ));
        }
        sum = sum.checked_add(cents).ok_or_else(|| {
            EngineError::InvalidAmount("custom split total overflows".to_string())
        })?;
        splits.push(MemberSplit {
            user_id: share.user_id.clone(),
            amount: MoneyCents::new(cents),
        });
    }

    if sum != total.cents() {
        return Err(EngineError::CustomSumMismatch {
            got: MoneyCents::new(sum),
            expected: total,
        });
    }

    Ok(splits)
}

fn check_exact_sum(total: MoneyCents, splits: &[MemberSplit]) -> ResultEngine<()> {
    let sum: i64 = splits.iter().map(|split| split.amount.cents()).sum();
    if sum != total.cents() {
        return Err(EngineError::SplitSumInvariant {
            got: MoneyCents::new(sum),
            expected: total,
        });
    }
    Ok(())
}
