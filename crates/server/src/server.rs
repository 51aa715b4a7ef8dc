use axum::{
    Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Basic},
};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use std::sync::Arc;

use crate::{expenses, groups, memberships, user};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub db: DatabaseConnection,
}

async fn auth(
    auth_header: Option<TypedHeader<Authorization<Basic>>>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let Some(TypedHeader(credentials)) = auth_header else {
        return Err(StatusCode::UNAUTHORIZED);
    };
    if credentials.username().is_empty() || credentials.password().is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    let user: Option<user::Model> = user::Entity::find()
        .filter(user::Column::Username.eq(credentials.username()))
        .filter(user::Column::Password.eq(credentials.password()))
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::UNAUTHORIZED)?;

    let Some(user) = user else {
        return Err(StatusCode::UNAUTHORIZED);
    };

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

fn router(state: ServerState) -> Router {
    Router::new()
        .route("/groups", post(groups::create).get(groups::list))
        .route("/groups/{group_id}", get(groups::get))
        .route(
            "/groups/{group_id}/members",
            get(memberships::list).post(memberships::add),
        )
        .route(
            "/groups/{group_id}/members/{username}",
            axum::routing::delete(memberships::remove),
        )
        .route(
            "/groups/{group_id}/expenses",
            post(expenses::create).get(expenses::list),
        )
        .route(
            "/groups/{group_id}/expenses/{expense_id}",
            get(expenses::get).delete(expenses::remove),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), auth))
        // Registration stays outside the auth layer.
        .route("/users", post(user::register))
        .with_state(state)
}

pub async fn run(engine: Engine, db: DatabaseConnection) {
    let listener = match tokio::net::TcpListener::bind("127.0.0.1:3000").await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, db, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Engine,
    db: DatabaseConnection,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
        db,
    };

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    db: DatabaseConnection,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, db, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::body::Body;
    use axum::http::{Request as HttpRequest, header};
    use base64::Engine as _;
    use http_body_util::BodyExt;
    use migration::MigratorTrait;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    async fn test_router() -> Router {
        let db = sea_orm::Database::connect("sqlite::memory:").await.unwrap();
        migration::Migrator::up(&db, None).await.unwrap();
        let engine = engine::Engine::builder()
            .database(db.clone())
            .build()
            .await
            .unwrap();
        router(ServerState {
            engine: Arc::new(engine),
            db,
        })
    }

    fn basic_auth(username: &str) -> String {
        let encoded =
            base64::engine::general_purpose::STANDARD.encode(format!("{username}:password"));
        format!("Basic {encoded}")
    }

    async fn send_json(
        router: &Router,
        method: &str,
        uri: &str,
        auth: Option<&str>,
        body: Value,
    ) -> (StatusCode, Value) {
        let mut request = HttpRequest::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(user) = auth {
            request = request.header(header::AUTHORIZATION, basic_auth(user));
        }
        let response = router
            .clone()
            .oneshot(request.body(Body::from(body.to_string())).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn register(router: &Router, username: &str) {
        let (status, _) = send_json(
            router,
            "POST",
            "/users",
            None,
            json!({ "username": username, "password": "password" }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    async fn create_group(router: &Router, name: &str, members: &[&str], creator: &str) -> String {
        let (status, body) = send_json(
            router,
            "POST",
            "/groups",
            Some(creator),
            json!({ "name": name, "members": members }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        body["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn unauthenticated_requests_are_rejected() {
        let router = test_router().await;
        let (status, _) = send_json(&router, "GET", "/groups", None, Value::Null).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn register_create_group_and_list() {
        let router = test_router().await;
        register(&router, "alice").await;
        register(&router, "bob").await;

        let group_id = create_group(&router, "Trip", &["bob"], "alice").await;

        let (status, body) = send_json(&router, "GET", "/groups", Some("bob"), Value::Null).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["groups"][0]["id"].as_str().unwrap(), group_id);
        assert_eq!(body["groups"][0]["name"].as_str().unwrap(), "Trip");
    }

    #[tokio::test]
    async fn equal_expense_splits_to_exact_cents() {
        let router = test_router().await;
        register(&router, "alice").await;
        register(&router, "bob").await;
        let group_id = create_group(&router, "Trip", &["bob"], "alice").await;

        let (status, body) = send_json(
            &router,
            "POST",
            &format!("/groups/{group_id}/expenses"),
            Some("alice"),
            json!({
                "description": "Dinner",
                "category": "Food",
                "amount": 30.01,
                "payer_id": "alice",
                "split_type": "equal",
                "splits": [{ "user_id": "alice" }, { "user_id": "bob" }],
            }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["amount_minor"].as_i64().unwrap(), 3001);

        let splits = body["splits"].as_array().unwrap();
        let total: i64 = splits
            .iter()
            .map(|s| s["amount_minor"].as_i64().unwrap())
            .sum();
        assert_eq!(total, 3001);
    }

    #[tokio::test]
    async fn percent_sum_mismatch_is_unprocessable() {
        let router = test_router().await;
        register(&router, "alice").await;
        let group_id = create_group(&router, "Trip", &[], "alice").await;

        let (status, body) = send_json(
            &router,
            "POST",
            &format!("/groups/{group_id}/expenses"),
            Some("alice"),
            json!({
                "description": "Dinner",
                "amount": 10.0,
                "payer_id": "alice",
                "split_type": "percent",
                "splits": [{ "user_id": "alice", "amount": 90.0 }],
            }),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["error"].as_str().unwrap().contains("90"));
    }

    #[tokio::test]
    async fn unknown_split_type_is_unprocessable() {
        let router = test_router().await;
        register(&router, "alice").await;
        let group_id = create_group(&router, "Trip", &[], "alice").await;

        let (status, body) = send_json(
            &router,
            "POST",
            &format!("/groups/{group_id}/expenses"),
            Some("alice"),
            json!({
                "description": "Dinner",
                "amount": 10.0,
                "payer_id": "alice",
                "split_type": "half",
                "splits": [{ "user_id": "alice" }],
            }),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["error"].as_str().unwrap().contains("half"));
    }

    #[tokio::test]
    async fn non_member_participant_is_rejected_and_nothing_is_stored() {
        let router = test_router().await;
        register(&router, "alice").await;
        register(&router, "dave").await;
        let group_id = create_group(&router, "Trip", &[], "alice").await;

        let (status, body) = send_json(
            &router,
            "POST",
            &format!("/groups/{group_id}/expenses"),
            Some("alice"),
            json!({
                "description": "Dinner",
                "amount": 10.0,
                "payer_id": "alice",
                "split_type": "equal",
                "splits": [{ "user_id": "alice" }, { "user_id": "dave" }],
            }),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["error"].as_str().unwrap().contains("dave"));

        let (status, body) = send_json(
            &router,
            "GET",
            &format!("/groups/{group_id}/expenses"),
            Some("alice"),
            Value::Null,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["expenses"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn expense_delete_round_trip() {
        let router = test_router().await;
        register(&router, "alice").await;
        let group_id = create_group(&router, "Trip", &[], "alice").await;

        let (_, created) = send_json(
            &router,
            "POST",
            &format!("/groups/{group_id}/expenses"),
            Some("alice"),
            json!({
                "description": "Dinner",
                "amount": 10.0,
                "payer_id": "alice",
                "split_type": "equal",
                "splits": [{ "user_id": "alice" }],
            }),
        )
        .await;
        let expense_id = created["id"].as_str().unwrap().to_string();

        let (status, deleted) = send_json(
            &router,
            "DELETE",
            &format!("/groups/{group_id}/expenses/{expense_id}"),
            Some("alice"),
            Value::Null,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(deleted["id"].as_str().unwrap(), expense_id);

        let (status, _) = send_json(
            &router,
            "DELETE",
            &format!("/groups/{group_id}/expenses/{expense_id}"),
            Some("alice"),
            Value::Null,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn duplicate_member_add_conflicts() {
        let router = test_router().await;
        register(&router, "alice").await;
        register(&router, "bob").await;
        let group_id = create_group(&router, "Trip", &[], "alice").await;

        let (status, _) = send_json(
            &router,
            "POST",
            &format!("/groups/{group_id}/members"),
            Some("alice"),
            json!({ "username": "bob" }),
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = send_json(
            &router,
            "POST",
            &format!("/groups/{group_id}/members"),
            Some("alice"),
            json!({ "username": "bob" }),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, body) = send_json(
            &router,
            "GET",
            &format!("/groups/{group_id}/members"),
            Some("bob"),
            Value::Null,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["members"]
                .as_array()
                .unwrap()
                .iter()
                .map(|m| m.as_str().unwrap())
                .collect::<Vec<_>>(),
            vec!["alice", "bob"]
        );
    }
}
