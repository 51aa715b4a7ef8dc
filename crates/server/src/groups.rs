//! Group endpoints.

use api_types::group::{GroupNew, GroupSummary, GroupView, GroupsResponse};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{ServerError, server::ServerState, user};

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<GroupNew>,
) -> Result<(StatusCode, Json<GroupView>), ServerError> {
    let group = state
        .engine
        .create_group(&payload.name, &payload.members, &user.username)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(GroupView {
            id: group.id,
            name: group.name,
            members: group.members,
        }),
    ))
}

pub async fn get(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(group_id): Path<String>,
) -> Result<Json<GroupView>, ServerError> {
    let group = state.engine.group(&group_id, &user.username).await?;

    Ok(Json(GroupView {
        id: group.id,
        name: group.name,
        members: group.members,
    }))
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<GroupsResponse>, ServerError> {
    let groups = state
        .engine
        .list_groups_for_user(&user.username)
        .await?
        .into_iter()
        .map(|(id, name)| GroupSummary { id, name })
        .collect();

    Ok(Json(GroupsResponse { groups }))
}
