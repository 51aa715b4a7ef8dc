//! Command structs for engine operations.
//!
//! These types group parameters for write operations, keeping call sites
//! readable and avoiding long argument lists. The boundary layer builds
//! them from already-parsed, already-authenticated requests; the engine
//! never sees raw wire payloads.

use chrono::{DateTime, Utc};

use crate::{MoneyCents, SplitShare, SplitType};

/// Create an expense with computed splits.
///
/// `shares` is the ordered participant list; the order matters because
/// leftover cents are assigned front-to-back.
#[derive(Clone, Debug)]
pub struct ExpenseCmd {
    pub group_id: String,
    pub description: String,
    pub category: Option<String>,
    pub amount: MoneyCents,
    pub payer_id: String,
    pub split_type: SplitType,
    pub shares: Vec<SplitShare>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

impl ExpenseCmd {
    #[must_use]
    pub fn new(
        group_id: impl Into<String>,
        created_by: impl Into<String>,
        amount: MoneyCents,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            description: String::new(),
            category: None,
            amount,
            payer_id: String::new(),
            split_type: SplitType::Equal,
            shares: Vec::new(),
            created_by: created_by.into(),
            created_at,
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[must_use]
    pub fn payer(mut self, payer_id: impl Into<String>) -> Self {
        self.payer_id = payer_id.into();
        self
    }

    #[must_use]
    pub fn split(mut self, split_type: SplitType, shares: Vec<SplitShare>) -> Self {
        self.split_type = split_type;
        self.shares = shares;
        self
    }
}
