//! Expense records: a paid total plus the per-member splits that cover it.
//!
//! An `Expense` is created atomically with its splits and deleted as a
//! whole. It is never partially updated; an amendment is a delete followed
//! by a fresh create.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use uuid::Uuid;

use crate::{EngineError, MemberSplit, MoneyCents, ResultEngine};

/// An expense with its splits. The split amounts always sum to `amount`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Expense {
    pub id: Uuid,
    pub group_id: String,
    pub description: String,
    pub category: Option<String>,
    pub amount: MoneyCents,
    pub payer_id: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub splits: Vec<MemberSplit>,
}

impl Expense {
    pub(crate) fn new(
        group_id: String,
        description: String,
        category: Option<String>,
        amount: MoneyCents,
        payer_id: String,
        created_by: String,
        created_at: DateTime<Utc>,
    ) -> ResultEngine<Self> {
        if !amount.is_positive() {
            return Err(EngineError::InvalidAmount(
                "amount_minor must be > 0".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            group_id,
            description,
            category,
            amount,
            payer_id,
            created_by,
            created_at,
            splits: Vec::new(),
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub group_id: String,
    pub description: String,
    pub category: Option<String>,
    pub amount_minor: i64,
    pub payer_id: String,
    pub created_by: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::groups::Entity",
        from = "Column::GroupId",
        to = "super::groups::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Groups,
    #[sea_orm(has_many = "super::expense_splits::Entity")]
    ExpenseSplits,
}

impl Related<super::groups::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Groups.def()
    }
}

impl Related<super::expense_splits::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ExpenseSplits.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Expense> for ActiveModel {
    fn from(expense: &Expense) -> Self {
        Self {
            id: ActiveValue::Set(expense.id.to_string()),
            group_id: ActiveValue::Set(expense.group_id.clone()),
            description: ActiveValue::Set(expense.description.clone()),
            category: ActiveValue::Set(expense.category.clone()),
            amount_minor: ActiveValue::Set(expense.amount.cents()),
            payer_id: ActiveValue::Set(expense.payer_id.clone()),
            created_by: ActiveValue::Set(expense.created_by.clone()),
            created_at: ActiveValue::Set(expense.created_at),
        }
    }
}

impl TryFrom<Model> for Expense {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::ExpenseNotFound(model.id.clone()))?,
            group_id: model.group_id,
            description: model.description,
            category: model.category,
            amount: MoneyCents::new(model.amount_minor),
            payer_id: model.payer_id,
            created_by: model.created_by,
            created_at: model.created_at,
            splits: Vec::new(),
        })
    }
}
