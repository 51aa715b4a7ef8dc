//! Expense assembly: validation, membership gate, split computation, and
//! the atomic create/delete of an expense with its splits.

use std::collections::HashSet;

use sea_orm::{QueryFilter, QueryOrder, QuerySelect, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, Expense, ExpenseCmd, MemberSplit, ResultEngine, expense_splits, expenses, split,
};

use super::{Engine, normalize_optional_text, normalize_required, with_tx};

impl Engine {
    /// Creates an expense and its splits as one atomic write.
    ///
    /// Validation order: required fields, membership gate, split
    /// computation. The expense row and every split row are inserted in the
    /// same transaction; nothing is persisted unless every step succeeds,
    /// so a partial expense with missing splits is never observable.
    pub async fn add_expense(&self, cmd: ExpenseCmd) -> ResultEngine<Expense> {
        let description = normalize_required(&cmd.description, "description")?;
        let payer_id = normalize_required(&cmd.payer_id, "payer_id")?;
        if cmd.shares.is_empty() {
            return Err(EngineError::MissingField("splits"));
        }
        if !cmd.amount.is_positive() {
            return Err(EngineError::InvalidAmount(
                "amount_minor must be > 0".to_string(),
            ));
        }

        // One split row per participant; a duplicate would collide on the
        // (expense_id, user_id) key.
        let mut seen = HashSet::new();
        for share in &cmd.shares {
            if !seen.insert(share.user_id.as_str()) {
                return Err(EngineError::InvalidAmount(format!(
                    "duplicate split participant: {}",
                    share.user_id
                )));
            }
        }

        let category = normalize_optional_text(cmd.category.as_deref());

        with_tx!(self, |db_tx| {
            self.verify_split_membership(
                &db_tx,
                &cmd.group_id,
                &cmd.created_by,
                &payer_id,
                &cmd.shares,
            )
            .await?;

            let splits = split::compute_splits(cmd.amount, cmd.split_type, &cmd.shares)?;

            let mut expense = Expense::new(
                cmd.group_id.clone(),
                description,
                category,
                cmd.amount,
                payer_id,
                cmd.created_by.clone(),
                cmd.created_at,
            )?;
            expense.splits = splits;

            expenses::ActiveModel::from(&expense).insert(&db_tx).await?;
            for member_split in &expense.splits {
                expense_splits::active_model(expense.id, member_split)
                    .insert(&db_tx)
                    .await?;
            }

            Ok(expense)
        })
    }

    /// Deletes an expense and all its splits as one atomic operation.
    ///
    /// Returns the deleted record. Splits are never deleted independently
    /// of their expense.
    pub async fn retract_expense(
        &self,
        group_id: &str,
        expense_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<Expense> {
        with_tx!(self, |db_tx| {
            self.require_group_member(&db_tx, group_id, user_id).await?;

            let model = expenses::Entity::find_by_id(expense_id.to_string())
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::ExpenseNotFound(expense_id.to_string()))?;
            if model.group_id != group_id {
                return Err(EngineError::ExpenseGroupMismatch {
                    expense_id: expense_id.to_string(),
                    group_id: group_id.to_string(),
                });
            }

            let split_rows = expense_splits::Entity::find()
                .filter(expense_splits::Column::ExpenseId.eq(expense_id.to_string()))
                .order_by_asc(expense_splits::Column::UserId)
                .all(&db_tx)
                .await?;

            expense_splits::Entity::delete_many()
                .filter(expense_splits::Column::ExpenseId.eq(expense_id.to_string()))
                .exec(&db_tx)
                .await?;
            expenses::Entity::delete_by_id(expense_id.to_string())
                .exec(&db_tx)
                .await?;

            let mut expense = Expense::try_from(model)?;
            expense.splits = split_rows.into_iter().map(MemberSplit::from).collect();
            Ok(expense)
        })
    }

    /// Returns one expense with its splits (member-gated).
    pub async fn expense(
        &self,
        group_id: &str,
        expense_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<Expense> {
        with_tx!(self, |db_tx| {
            self.require_group_member(&db_tx, group_id, user_id).await?;

            let model = expenses::Entity::find_by_id(expense_id.to_string())
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::ExpenseNotFound(expense_id.to_string()))?;
            if model.group_id != group_id {
                return Err(EngineError::ExpenseGroupMismatch {
                    expense_id: expense_id.to_string(),
                    group_id: group_id.to_string(),
                });
            }

            self.load_with_splits(&db_tx, model).await
        })
    }

    /// Lists a group's expenses, newest first (member-gated).
    pub async fn list_group_expenses(
        &self,
        group_id: &str,
        user_id: &str,
        limit: u64,
    ) -> ResultEngine<Vec<Expense>> {
        with_tx!(self, |db_tx| {
            self.require_group_member(&db_tx, group_id, user_id).await?;

            let models = expenses::Entity::find()
                .filter(expenses::Column::GroupId.eq(group_id.to_string()))
                .order_by_desc(expenses::Column::CreatedAt)
                .limit(limit)
                .all(&db_tx)
                .await?;

            let mut out = Vec::with_capacity(models.len());
            for model in models {
                out.push(self.load_with_splits(&db_tx, model).await?);
            }
            Ok(out)
        })
    }

    async fn load_with_splits(
        &self,
        db_tx: &sea_orm::DatabaseTransaction,
        model: expenses::Model,
    ) -> ResultEngine<Expense> {
        let split_rows = expense_splits::Entity::find()
            .filter(expense_splits::Column::ExpenseId.eq(model.id.clone()))
            .order_by_asc(expense_splits::Column::UserId)
            .all(db_tx)
            .await?;
        let mut expense = Expense::try_from(model)?;
        expense.splits = split_rows.into_iter().map(MemberSplit::from).collect();
        Ok(expense)
    }
}
