//! Membership and existence gates.
//!
//! Every gate is read-only and runs inside the caller's transaction, so a
//! split request can never observe a half-applied membership change: the
//! member set it validates against is the same snapshot its expense commits
//! against.

use std::collections::HashSet;

use sea_orm::{DatabaseTransaction, QueryFilter, prelude::*};

use crate::{EngineError, ResultEngine, SplitShare, group_memberships, groups, users};

use super::Engine;

impl Engine {
    pub(super) async fn require_group_exists(
        &self,
        db: &DatabaseTransaction,
        group_id: &str,
    ) -> ResultEngine<groups::Model> {
        groups::Entity::find_by_id(group_id.to_string())
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("group not exists".to_string()))
    }

    /// Read gate: the caller must belong to the group.
    ///
    /// A non-member gets the same answer as for a missing group, so group
    /// ids leak nothing about groups the caller cannot see.
    pub(super) async fn require_group_member(
        &self,
        db: &DatabaseTransaction,
        group_id: &str,
        user_id: &str,
    ) -> ResultEngine<groups::Model> {
        let group = self.require_group_exists(db, group_id).await?;
        let member = group_memberships::Entity::find_by_id((
            group_id.to_string(),
            user_id.to_string(),
        ))
        .one(db)
        .await?;
        if member.is_none() {
            return Err(EngineError::KeyNotFound("group not exists".to_string()));
        }
        Ok(group)
    }

    pub(super) async fn require_user_exists(
        &self,
        db: &DatabaseTransaction,
        username: &str,
    ) -> ResultEngine<()> {
        let exists = users::Entity::find_by_id(username.to_string())
            .one(db)
            .await?
            .is_some();
        if !exists {
            return Err(EngineError::KeyNotFound("user not exists".to_string()));
        }
        Ok(())
    }

    /// Loads a group's member set in a single query.
    ///
    /// A group with no members yields an empty set, not an error.
    pub(super) async fn group_member_set(
        &self,
        db: &DatabaseTransaction,
        group_id: &str,
    ) -> ResultEngine<HashSet<String>> {
        let rows = group_memberships::Entity::find()
            .filter(group_memberships::Column::GroupId.eq(group_id.to_string()))
            .all(db)
            .await?;
        Ok(rows.into_iter().map(|m| m.user_id).collect())
    }

    /// Membership gate for a split request.
    ///
    /// One round trip to the membership table, then in-memory checks:
    /// caller, payer, and every participant must currently belong to the
    /// group. Missing participants are reported together, in input order,
    /// not just the first one. Must run to completion before any split is
    /// computed.
    pub(super) async fn verify_split_membership(
        &self,
        db: &DatabaseTransaction,
        group_id: &str,
        created_by: &str,
        payer_id: &str,
        shares: &[SplitShare],
    ) -> ResultEngine<()> {
        self.require_group_exists(db, group_id).await?;
        let members = self.group_member_set(db, group_id).await?;

        if !members.contains(created_by) {
            return Err(EngineError::KeyNotFound("group not exists".to_string()));
        }
        if !members.contains(payer_id) {
            return Err(EngineError::PayerNotMember(payer_id.to_string()));
        }

        let mut reported = HashSet::new();
        let missing: Vec<String> = shares
            .iter()
            .map(|share| share.user_id.as_str())
            .filter(|id| !members.contains(*id) && reported.insert(ToString::to_string(&id)))
            .map(ToString::to_string)
            .collect();
        if !missing.is_empty() {
            return Err(EngineError::ParticipantNotMember(missing));
        }

        Ok(())
    }
}
