use sea_orm::{ActiveValue, TransactionTrait, prelude::*};

use crate::{EngineError, ResultEngine, users};

use super::{Engine, normalize_required, with_tx};

impl Engine {
    /// Registers a new user.
    pub async fn create_user(&self, username: &str, password: &str) -> ResultEngine<String> {
        let username = normalize_required(username, "username")?;
        if password.is_empty() {
            return Err(EngineError::MissingField("password"));
        }
        let password = password.to_string();

        with_tx!(self, |db_tx| {
            let existing = users::Entity::find_by_id(username.clone())
                .one(&db_tx)
                .await?;
            if existing.is_some() {
                return Err(EngineError::ExistingKey(username));
            }

            users::ActiveModel {
                username: ActiveValue::Set(username.clone()),
                password: ActiveValue::Set(password),
            }
            .insert(&db_tx)
            .await?;

            Ok(username)
        })
    }
}
