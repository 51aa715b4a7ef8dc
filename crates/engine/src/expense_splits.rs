//! Expense split rows: one row per participant share.
//!
//! Rows exist only together with their expense; they are inserted in the
//! same transaction that creates the expense and deleted in the same
//! transaction that removes it.

use sea_orm::{ActiveValue, entity::prelude::*};
use uuid::Uuid;

use crate::{MemberSplit, MoneyCents};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "expense_splits")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub expense_id: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: String,
    pub amount_minor: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::expenses::Entity",
        from = "Column::ExpenseId",
        to = "super::expenses::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Expenses,
}

impl Related<super::expenses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Expenses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub(crate) fn active_model(expense_id: Uuid, split: &MemberSplit) -> ActiveModel {
    ActiveModel {
        expense_id: ActiveValue::Set(expense_id.to_string()),
        user_id: ActiveValue::Set(split.user_id.clone()),
        amount_minor: ActiveValue::Set(split.amount.cents()),
    }
}

impl From<Model> for MemberSplit {
    fn from(model: Model) -> Self {
        Self {
            user_id: model.user_id,
            amount: MoneyCents::new(model.amount_minor),
        }
    }
}
