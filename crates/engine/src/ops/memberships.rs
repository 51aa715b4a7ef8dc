use sea_orm::{ActiveValue, QueryFilter, TransactionTrait, prelude::*};

use crate::{EngineError, ResultEngine, group_memberships};

use super::{Engine, with_tx};

impl Engine {
    /// Adds a member to a group. Any current member may add members.
    pub async fn add_member(
        &self,
        group_id: &str,
        username: &str,
        user_id: &str,
    ) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_group_member(&db_tx, group_id, user_id).await?;
            self.require_user_exists(&db_tx, username).await?;

            let existing = group_memberships::Entity::find_by_id((
                group_id.to_string(),
                username.to_string(),
            ))
            .one(&db_tx)
            .await?;
            if existing.is_some() {
                return Err(EngineError::ExistingKey(username.to_string()));
            }

            group_memberships::ActiveModel {
                group_id: ActiveValue::Set(group_id.to_string()),
                user_id: ActiveValue::Set(username.to_string()),
            }
            .insert(&db_tx)
            .await?;

            Ok(())
        })
    }

    /// Removes a member from a group.
    ///
    /// Expenses recorded while the user was a member are left untouched;
    /// membership is only checked at expense creation time.
    pub async fn remove_member(
        &self,
        group_id: &str,
        username: &str,
        user_id: &str,
    ) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_group_member(&db_tx, group_id, user_id).await?;

            let existing = group_memberships::Entity::find_by_id((
                group_id.to_string(),
                username.to_string(),
            ))
            .one(&db_tx)
            .await?;
            if existing.is_none() {
                return Err(EngineError::KeyNotFound("membership not exists".to_string()));
            }

            group_memberships::Entity::delete_by_id((
                group_id.to_string(),
                username.to_string(),
            ))
            .exec(&db_tx)
            .await?;

            Ok(())
        })
    }

    /// Lists group members (member-gated).
    pub async fn list_members(&self, group_id: &str, user_id: &str) -> ResultEngine<Vec<String>> {
        with_tx!(self, |db_tx| {
            self.require_group_member(&db_tx, group_id, user_id).await?;

            let rows = group_memberships::Entity::find()
                .filter(group_memberships::Column::GroupId.eq(group_id.to_string()))
                .all(&db_tx)
                .await?;
            let mut members: Vec<String> = rows.into_iter().map(|m| m.user_id).collect();
            members.sort();
            Ok(members)
        })
    }
}
