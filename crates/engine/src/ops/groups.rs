use sea_orm::{ActiveValue, QueryFilter, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{Group, ResultEngine, group_memberships, groups};

use super::{Engine, normalize_required, with_tx};

impl Engine {
    /// Creates a group. The creator always becomes a member; every initial
    /// member must be an existing user.
    pub async fn create_group(
        &self,
        name: &str,
        initial_members: &[String],
        user_id: &str,
    ) -> ResultEngine<Group> {
        let name = normalize_required(name, "name")?;
        let user_id = user_id.to_string();

        with_tx!(self, |db_tx| {
            self.require_user_exists(&db_tx, &user_id).await?;

            let group_id = Uuid::new_v4().to_string();
            groups::ActiveModel {
                id: ActiveValue::Set(group_id.clone()),
                name: ActiveValue::Set(name.clone()),
            }
            .insert(&db_tx)
            .await?;

            let mut members = vec![user_id.clone()];
            for member in initial_members {
                if *member == user_id || members.contains(member) {
                    continue;
                }
                self.require_user_exists(&db_tx, member).await?;
                members.push(member.clone());
            }

            for member in &members {
                group_memberships::ActiveModel {
                    group_id: ActiveValue::Set(group_id.clone()),
                    user_id: ActiveValue::Set(member.clone()),
                }
                .insert(&db_tx)
                .await?;
            }

            Ok(Group {
                id: group_id,
                name,
                members,
            })
        })
    }

    /// Returns a group with its members (member-gated).
    pub async fn group(&self, group_id: &str, user_id: &str) -> ResultEngine<Group> {
        with_tx!(self, |db_tx| {
            let model = self.require_group_member(&db_tx, group_id, user_id).await?;

            let rows = group_memberships::Entity::find()
                .filter(group_memberships::Column::GroupId.eq(group_id.to_string()))
                .all(&db_tx)
                .await?;
            let mut members: Vec<String> = rows.into_iter().map(|m| m.user_id).collect();
            members.sort();

            Ok(Group {
                id: model.id,
                name: model.name,
                members,
            })
        })
    }

    /// Lists `(id, name)` of the groups the user belongs to.
    pub async fn list_groups_for_user(
        &self,
        user_id: &str,
    ) -> ResultEngine<Vec<(String, String)>> {
        with_tx!(self, |db_tx| {
            let rows: Vec<(group_memberships::Model, Option<groups::Model>)> =
                group_memberships::Entity::find()
                    .filter(group_memberships::Column::UserId.eq(user_id.to_string()))
                    .find_also_related(groups::Entity)
                    .all(&db_tx)
                    .await?;

            let mut out = Vec::with_capacity(rows.len());
            for (_, group_model) in rows {
                let Some(group) = group_model else { continue };
                out.push((group.id, group.name));
            }
            Ok(out)
        })
    }
}
