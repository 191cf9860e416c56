//! # User Service
//!
//! The user management backend: CRUD over the in-memory user collection,
//! role and limit listing queries, statistics, and the plumbing endpoints
//! every service exposes.
//!
//! ## Endpoints
//! - `GET /users` with `role` / `limit` query options
//! - `POST /users`, `GET|PUT|DELETE /users/:id`
//! - `GET /stats`, `GET /health`, `GET /`
//!
//! Email uniqueness is enforced inside the store, under the same lock as
//! the write, so concurrent creates cannot slip a duplicate past the check.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::core::error::{route_not_found, ServiceError, ServiceResult};
use crate::domain::user::{seed_users, User, UserRole};
use crate::observability::StartTime;
use crate::query::UserQuery;
use crate::stats::UserStats;
use crate::store::CollectionStore;

/// Shared state of the user service
#[derive(Clone)]
pub struct UserServiceState {
    store: Arc<CollectionStore<User>>,
    started_at: StartTime,
}

impl UserServiceState {
    /// State seeded with the standard user records
    pub fn new() -> Self {
        Self::with_users(seed_users())
    }

    /// State holding the given user records
    pub fn with_users(users: Vec<User>) -> Self {
        Self {
            store: Arc::new(CollectionStore::seeded(users)),
            started_at: StartTime::now(),
        }
    }

    /// Number of user records currently stored
    pub fn user_count(&self) -> usize {
        self.store.len()
    }
}

impl Default for UserServiceState {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the user service router
pub fn router(state: UserServiceState) -> Router {
    Router::new()
        .route("/", get(service_info))
        .route("/health", get(health))
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route("/stats", get(stats))
        .fallback(route_not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Payload for `POST /users`
///
/// Every field is optional at the deserialization layer; presence rules are
/// enforced in the handler so the error bodies stay in the service's shape.
#[derive(Debug, Deserialize)]
struct CreateUserPayload {
    name: Option<String>,
    email: Option<String>,
    role: Option<String>,
}

/// Payload for `PUT /users/:id`
#[derive(Debug, Deserialize)]
struct UpdateUserPayload {
    name: Option<String>,
    email: Option<String>,
    role: Option<String>,
}

/// `GET /` service descriptor
async fn service_info() -> Json<Value> {
    Json(json!({
        "service": "user-service",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "/health",
            "users": "/users",
            "stats": "/stats",
        },
    }))
}

/// `GET /health` liveness payload
async fn health(State(state): State<UserServiceState>) -> Json<Value> {
    Json(json!({
        "service": "user-service",
        "status": "healthy",
        "timestamp": Utc::now(),
        "uptime": state.started_at.uptime_secs(),
        "totalUsers": state.store.len(),
    }))
}

/// `GET /users` with the role/limit query pipeline
async fn list_users(
    State(state): State<UserServiceState>,
    Query(query): Query<UserQuery>,
) -> Json<Vec<User>> {
    Json(query.apply(state.store.list()))
}

/// `GET /users/:id`
async fn get_user(
    State(state): State<UserServiceState>,
    Path(id): Path<String>,
) -> ServiceResult<Json<User>> {
    match state.store.get(&id) {
        Some(user) => Ok(Json(user)),
        None => Err(ServiceError::not_found("User", id)),
    }
}

/// `POST /users`
async fn create_user(
    State(state): State<UserServiceState>,
    Json(payload): Json<CreateUserPayload>,
) -> ServiceResult<(StatusCode, Json<User>)> {
    let name = payload.name.unwrap_or_default();
    let email = payload.email.unwrap_or_default();

    if name.is_empty() || email.is_empty() {
        return Err(ServiceError::validation("Name and email are required"));
    }

    let role = parse_role(payload.role.as_deref())?;

    let user = User::new(name, email, role);
    let email_key = user.email.clone();
    let created = state
        .store
        .insert_unique(user, |existing| existing.email == email_key)
        .map_err(|_| ServiceError::conflict("User with this email already exists"))?;

    info!(user_id = %created.id, "Created user");
    Ok((StatusCode::CREATED, Json(created)))
}

/// `PUT /users/:id` merge-style update
///
/// Absent and empty-string fields keep their current values; a changed
/// email must not belong to any other user.
async fn update_user(
    State(state): State<UserServiceState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateUserPayload>,
) -> ServiceResult<Json<User>> {
    let new_role = match payload.role.as_deref() {
        None | Some("") => None,
        Some(value) => Some(value.parse::<UserRole>()?),
    };
    let new_name = payload.name.filter(|name| !name.is_empty());
    let new_email = payload.email.filter(|email| !email.is_empty());

    let email_key = new_email.clone();
    let outcome = state.store.update_unique(
        &id,
        |other| {
            email_key
                .as_deref()
                .map_or(false, |email| other.email == email)
        },
        |user| {
            if let Some(name) = new_name {
                user.name = name;
            }
            if let Some(email) = new_email {
                user.email = email;
            }
            if let Some(role) = new_role {
                user.role = role;
            }
            user.touch();
        },
    );

    match outcome {
        Ok(Some(user)) => {
            info!(user_id = %user.id, "Updated user");
            Ok(Json(user))
        }
        Ok(None) => Err(ServiceError::not_found("User", id)),
        Err(_) => Err(ServiceError::conflict(
            "User with this email already exists",
        )),
    }
}

/// `DELETE /users/:id`
async fn delete_user(
    State(state): State<UserServiceState>,
    Path(id): Path<String>,
) -> ServiceResult<Json<Value>> {
    match state.store.remove(&id) {
        Some(user) => {
            info!(user_id = %id, "Deleted user");
            Ok(Json(json!({
                "message": "User deleted successfully",
                "user": user,
            })))
        }
        None => Err(ServiceError::not_found("User", id)),
    }
}

/// `GET /stats`
async fn stats(State(state): State<UserServiceState>) -> Json<UserStats> {
    Json(UserStats::compute(&state.store.list()))
}

/// An absent or empty role falls back to the default; anything else must be
/// a known role name.
fn parse_role(raw: Option<&str>) -> ServiceResult<UserRole> {
    match raw {
        None | Some("") => Ok(UserRole::default()),
        Some(value) => value.parse(),
    }
}
