use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod user {
    use super::*;

    /// Request body for registering a user.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserNew {
        pub username: String,
        pub password: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserView {
        pub username: String,
    }
}

pub mod group {
    use super::*;

    /// Request body for creating a group.
    ///
    /// The creator always becomes a member; `members` lists additional
    /// usernames to add right away.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct GroupNew {
        pub name: String,
        #[serde(default)]
        pub members: Vec<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GroupView {
        pub id: String,
        pub name: String,
        pub members: Vec<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GroupSummary {
        pub id: String,
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GroupsResponse {
        pub groups: Vec<GroupSummary>,
    }
}

pub mod membership {
    use super::*;

    /// Request body for adding a member.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct MemberAdd {
        pub username: String,
    }

    /// Response body for listing members.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct MembersResponse {
        pub members: Vec<String>,
    }
}

pub mod expense {
    use super::*;

    /// One split entry of an expense request.
    ///
    /// `amount` is percentage points for percent splits, a major-unit
    /// decimal for custom splits, and absent/ignored for equal splits.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct SplitEntry {
        pub user_id: String,
        pub amount: Option<f64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseNew {
        pub description: String,
        pub category: Option<String>,
        /// Major-unit decimal amount (e.g. 12.50).
        pub amount: f64,
        pub payer_id: String,
        /// One of "equal", "percent", "custom".
        pub split_type: String,
        pub splits: Vec<SplitEntry>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseSplitView {
        pub user_id: String,
        pub amount_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseView {
        pub id: Uuid,
        pub description: String,
        pub category: Option<String>,
        pub amount_minor: i64,
        pub payer_id: String,
        pub created_by: String,
        /// RFC3339 timestamp, including timezone offset.
        pub created_at: DateTime<FixedOffset>,
        pub splits: Vec<ExpenseSplitView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpensesResponse {
        pub expenses: Vec<ExpenseView>,
    }

    /// Query parameters for listing a group's expenses.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseList {
        pub limit: Option<u64>,
    }
}
