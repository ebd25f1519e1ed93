use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use dockdemo_core::{HttpError, Validated, ValidationRejection};
use serde::Deserialize;
use serde_json::json;

use crate::models::{CreateUserRequest, PatchUserRequest, UpdateUserRequest, User};
use crate::state::AppState;
use crate::store::UserStore;

const FIELDS_REQUIRED: &str = "Name and email are required";

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/users", get(list).post(create))
        .route(
            "/api/users/{id}",
            get(get_by_id).put(replace).patch(patch).delete(remove),
        )
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    search: Option<String>,
    offset: Option<usize>,
    limit: Option<usize>,
}

async fn list(
    State(store): State<UserStore>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Vec<User>>, HttpError> {
    let Query(query) = query
        .map_err(|e| HttpError::BadRequest(format!("Invalid query: {}", e.body_text())))?;
    let users = store
        .list(query.search.as_deref())
        .await
        .into_iter()
        .skip(query.offset.unwrap_or(0))
        .take(query.limit.unwrap_or(usize::MAX))
        .collect();
    Ok(Json(users))
}

async fn get_by_id(
    State(store): State<UserStore>,
    id: Result<Path<u64>, PathRejection>,
) -> Result<Json<User>, HttpError> {
    let user = store.get(user_id(id)?).await?;
    Ok(Json(user))
}

async fn create(
    State(store): State<UserStore>,
    body: Result<Validated<CreateUserRequest>, ValidationRejection>,
) -> Result<impl IntoResponse, HttpError> {
    let user = store.create(required_fields(body)?).await?;
    let location = format!("/api/users/{}", user.id);
    let body = json!({
        "message": format!("User {} created!", user.name),
        "user": user,
    });
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(body)))
}

async fn replace(
    State(store): State<UserStore>,
    id: Result<Path<u64>, PathRejection>,
    body: Result<Validated<UpdateUserRequest>, ValidationRejection>,
) -> Result<Json<User>, HttpError> {
    let id = user_id(id)?;
    let user = store.replace(id, required_fields(body)?).await?;
    Ok(Json(user))
}

async fn patch(
    State(store): State<UserStore>,
    id: Result<Path<u64>, PathRejection>,
    Validated(body): Validated<PatchUserRequest>,
) -> Result<Json<User>, HttpError> {
    let user = store.patch(user_id(id)?, body).await?;
    Ok(Json(user))
}

async fn remove(
    State(store): State<UserStore>,
    id: Result<Path<u64>, PathRejection>,
) -> Result<StatusCode, HttpError> {
    store.delete(user_id(id)?).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn user_id(path: Result<Path<u64>, PathRejection>) -> Result<u64, HttpError> {
    path.map(|Path(id)| id)
        .map_err(|e| HttpError::BadRequest(format!("Invalid user id: {}", e.body_text())))
}

/// Body problems on create/replace collapse into one message; field rule
/// failures keep their per-field details.
fn required_fields<T>(body: Result<Validated<T>, ValidationRejection>) -> Result<T, HttpError> {
    match body {
        Ok(Validated(body)) => Ok(body),
        Err(ValidationRejection::Json(rejection)) => {
            tracing::debug!(reason = %rejection.body_text(), "rejected user payload");
            Err(HttpError::BadRequest(FIELDS_REQUIRED.into()))
        }
        Err(invalid) => Err(invalid.into()),
    }
}
