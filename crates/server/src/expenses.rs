//! Expense endpoints.
//!
//! This is the boundary where loosely-typed wire payloads become typed
//! engine commands: the major-unit decimal amount is converted to cents
//! once, percent weights become basis points, and the split type string
//! becomes an enum. The engine itself never sees a float.

use api_types::expense::{
    ExpenseList, ExpenseNew, ExpenseSplitView, ExpenseView, ExpensesResponse,
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{FixedOffset, Utc};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, user};
use engine::{
    EngineError, Expense, ExpenseCmd, MoneyCents, SplitShare, SplitType,
    basis_points_from_percent,
};

const DEFAULT_LIST_LIMIT: u64 = 50;

fn map_expense(expense: Expense) -> Result<ExpenseView, ServerError> {
    let utc = FixedOffset::east_opt(0)
        .ok_or_else(|| ServerError::Generic("invalid UTC offset".to_string()))?;
    Ok(ExpenseView {
        id: expense.id,
        description: expense.description,
        category: expense.category,
        amount_minor: expense.amount.cents(),
        payer_id: expense.payer_id,
        created_by: expense.created_by,
        created_at: expense.created_at.with_timezone(&utc),
        splits: expense
            .splits
            .into_iter()
            .map(|split| ExpenseSplitView {
                user_id: split.user_id,
                amount_minor: split.amount.cents(),
            })
            .collect(),
    })
}

/// Converts wire split entries into typed shares for the given strategy.
fn parse_shares(
    split_type: SplitType,
    entries: &[api_types::expense::SplitEntry],
) -> Result<Vec<SplitShare>, EngineError> {
    let mut shares = Vec::with_capacity(entries.len());
    for entry in entries {
        let weight = match split_type {
            SplitType::Equal => None,
            SplitType::Percent => {
                let percent = entry
                    .amount
                    .ok_or(EngineError::MissingField("splits.amount"))?;
                Some(basis_points_from_percent(percent)?)
            }
            SplitType::Custom => {
                let major = entry
                    .amount
                    .ok_or(EngineError::MissingField("splits.amount"))?;
                Some(MoneyCents::from_major_units(major)?.cents())
            }
        };
        shares.push(SplitShare {
            user_id: entry.user_id.clone(),
            weight,
        });
    }
    Ok(shares)
}

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(group_id): Path<String>,
    Json(payload): Json<ExpenseNew>,
) -> Result<(StatusCode, Json<ExpenseView>), ServerError> {
    let amount = MoneyCents::from_major_units(payload.amount)?;
    let split_type = SplitType::try_from(payload.split_type.as_str())?;
    let shares = parse_shares(split_type, &payload.splits)?;

    let mut cmd = ExpenseCmd::new(group_id, user.username, amount, Utc::now())
        .description(&payload.description)
        .payer(&payload.payer_id)
        .split(split_type, shares);
    if let Some(category) = &payload.category {
        cmd = cmd.category(category);
    }

    let expense = state.engine.add_expense(cmd).await?;
    Ok((StatusCode::CREATED, Json(map_expense(expense)?)))
}

pub async fn get(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path((group_id, expense_id)): Path<(String, Uuid)>,
) -> Result<Json<ExpenseView>, ServerError> {
    let expense = state
        .engine
        .expense(&group_id, expense_id, &user.username)
        .await?;
    Ok(Json(map_expense(expense)?))
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(group_id): Path<String>,
    Query(query): Query<ExpenseList>,
) -> Result<Json<ExpensesResponse>, ServerError> {
    let limit = query.limit.unwrap_or(DEFAULT_LIST_LIMIT);
    let expenses = state
        .engine
        .list_group_expenses(&group_id, &user.username, limit)
        .await?;

    let expenses = expenses
        .into_iter()
        .map(map_expense)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(ExpensesResponse { expenses }))
}

pub async fn remove(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path((group_id, expense_id)): Path<(String, Uuid)>,
) -> Result<Json<ExpenseView>, ServerError> {
    let expense = state
        .engine
        .retract_expense(&group_id, expense_id, &user.username)
        .await?;
    Ok(Json(map_expense(expense)?))
}
