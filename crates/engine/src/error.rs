//! The module contains the errors the engine can throw.
//!
//! Every validation failure is recoverable at the request boundary and
//! carries enough detail to correct the request (which participants are
//! missing, what the weights actually summed to). [`SplitSumInvariant`] is
//! the exception: it signals an engine bug and aborts the operation before
//! anything is persisted.
//!
//! [`SplitSumInvariant`]: EngineError::SplitSumInvariant

use sea_orm::DbErr;
use thiserror::Error;

use crate::MoneyCents;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("split has no participants")]
    EmptyParticipantList,
    #[error("payer \"{0}\" is not a member of the group")]
    PayerNotMember(String),
    #[error("participants not in group: {}", .0.join(", "))]
    ParticipantNotMember(Vec<String>),
    #[error("percent weights sum to {}%, expected 100%", percent_display(.0))]
    PercentSumMismatch(i64),
    #[error("custom split total {got} does not match expense total {expected}")]
    CustomSumMismatch { got: MoneyCents, expected: MoneyCents },
    #[error("invalid split type: {0}")]
    UnknownSplitType(String),
    #[error("\"{0}\" not found")]
    KeyNotFound(String),
    #[error("\"{0}\" already present")]
    ExistingKey(String),
    #[error("expense \"{0}\" not found")]
    ExpenseNotFound(String),
    #[error("expense \"{expense_id}\" does not belong to group \"{group_id}\"")]
    ExpenseGroupMismatch {
        expense_id: String,
        group_id: String,
    },
    #[error("split shares sum to {got}, expense total is {expected}")]
    SplitSumInvariant { got: MoneyCents, expected: MoneyCents },
    #[error(transparent)]
    Database(#[from] DbErr),
}

/// Renders basis points as a percent string ("99", "33.33").
fn percent_display(basis_points: &i64) -> String {
    let whole = basis_points / 100;
    let frac = (basis_points % 100).abs();
    if frac == 0 {
        format!("{whole}")
    } else {
        format!("{whole}.{frac:02}")
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::MissingField(a), Self::MissingField(b)) => a == b,
            (Self::EmptyParticipantList, Self::EmptyParticipantList) => true,
            (Self::PayerNotMember(a), Self::PayerNotMember(b)) => a == b,
            (Self::ParticipantNotMember(a), Self::ParticipantNotMember(b)) => a == b,
            (Self::PercentSumMismatch(a), Self::PercentSumMismatch(b)) => a == b,
            (
                Self::CustomSumMismatch { got: a, expected: b },
                Self::CustomSumMismatch { got: c, expected: d },
            ) => a == c && b == d,
            (Self::UnknownSplitType(a), Self::UnknownSplitType(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::ExpenseNotFound(a), Self::ExpenseNotFound(b)) => a == b,
            (
                Self::ExpenseGroupMismatch {
                    expense_id: a,
                    group_id: b,
                },
                Self::ExpenseGroupMismatch {
                    expense_id: c,
                    group_id: d,
                },
            ) => a == c && b == d,
            (
                Self::SplitSumInvariant { got: a, expected: b },
                Self::SplitSumInvariant { got: c, expected: d },
            ) => a == c && b == d,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_mismatch_message_shows_decimal_weights() {
        assert_eq!(
            EngineError::PercentSumMismatch(9000).to_string(),
            "percent weights sum to 90%, expected 100%"
        );
        assert_eq!(
            EngineError::PercentSumMismatch(9999).to_string(),
            "percent weights sum to 99.99%, expected 100%"
        );
    }

    #[test]
    fn participant_message_lists_every_missing_id() {
        let err =
            EngineError::ParticipantNotMember(vec!["dave".to_string(), "erin".to_string()]);
        assert_eq!(err.to_string(), "participants not in group: dave, erin");
    }
}
