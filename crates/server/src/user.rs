//! User entity and registration endpoint.
//!
//! The auth middleware reads this table directly; everything else goes
//! through the engine.

use api_types::user::{UserNew, UserView};
use axum::{Json, extract::State, http::StatusCode};
use sea_orm::entity::prelude::*;

use crate::{ServerError, server::ServerState};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub username: String,
    pub password: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub async fn register(
    State(state): State<ServerState>,
    Json(payload): Json<UserNew>,
) -> Result<(StatusCode, Json<UserView>), ServerError> {
    let username = state
        .engine
        .create_user(&payload.username, &payload.password)
        .await?;
    Ok((StatusCode::CREATED, Json(UserView { username })))
}
