//! CRUD handlers for `/user`

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;

use super::error::{ApiError, ApiOperation};
use crate::{
    middleware::authorize,
    models::{
        GetUserResponse, ListUsersResponse, MessageResponse, MutationResponse, NewUser,
        UserChanges, UserFields,
    },
    repository::Pagination,
    state::AppState,
    validation::missing_fields,
};

/// Query string of `GET /user`; both values are required
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ListParams {
    pub page: i64,
    pub per_page: i64,
}

impl ListParams {
    /// Offset/limit window for this page
    fn pagination(&self) -> Result<Pagination, &'static str> {
        if self.per_page <= 0 {
            return Err("per_page must be a positive integer");
        }
        if self.page < 1 {
            return Err("page must be a positive integer");
        }
        let offset = (self.page - 1)
            .checked_mul(self.per_page)
            .ok_or("page is out of range")?;
        Ok(Pagination::new(offset, self.per_page))
    }

    /// Number of pages needed for `total` rows
    fn total_pages(&self, total: i64) -> i64 {
        total / self.per_page + i64::from(total % self.per_page != 0)
    }
}

fn parse_payload(
    operation: ApiOperation,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Value, ApiError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| ApiError::bad_request(operation, rejection.body_text()))
}

fn parse_fields(operation: ApiOperation, payload: &Value) -> Result<UserFields, ApiError> {
    UserFields::from_payload(payload).map_err(|e| ApiError::bad_request(operation, e.to_string()))
}

/// `POST /user`
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let op = ApiOperation::Create;
    let payload = parse_payload(op, payload)?;

    let missing = missing_fields(&payload);
    if !missing.is_empty() {
        return Err(ApiError::validation(op, missing));
    }

    let fields = parse_fields(op, &payload)?;
    let user = state
        .users()
        .create(NewUser::new(fields, Utc::now()))
        .await
        .map_err(|e| ApiError::persistence(op, e))?;

    tracing::info!(user_id = user.id, "User created");

    let body = MutationResponse {
        message: "user created".to_string(),
        data: payload,
    };
    Ok((StatusCode::CREATED, Json(body)))
}

/// `GET /user?page=&per_page=`
pub async fn list_users(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<ListUsersResponse>, ApiError> {
    let op = ApiOperation::List;
    let Query(params) = params.map_err(|rejection| ApiError::bad_request(op, rejection.body_text()))?;
    let pagination = params
        .pagination()
        .map_err(|reason| ApiError::bad_request(op, reason))?;

    let data = state
        .users()
        .find_page(pagination)
        .await
        .map_err(|e| ApiError::persistence(op, e))?;
    let total = state
        .users()
        .count()
        .await
        .map_err(|e| ApiError::persistence(op, e))?;

    Ok(Json(ListUsersResponse {
        page: params.page,
        per_page: params.per_page,
        total_page: params.total_pages(total),
        total,
        data,
    }))
}

/// `GET /user/{id}`
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<GetUserResponse>, ApiError> {
    let op = ApiOperation::Get;
    let user = state
        .users()
        .find_by_id(id)
        .await
        .map_err(|e| ApiError::persistence(op, e))?
        .ok_or_else(|| ApiError::not_found(op))?;

    Ok(Json(GetUserResponse { user }))
}

/// `PUT /user/{id}`
///
/// A missing user is reported before missing fields.
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<MutationResponse>, ApiError> {
    let op = ApiOperation::Update;
    let payload = parse_payload(op, payload)?;
    let missing = missing_fields(&payload);

    state
        .users()
        .find_by_id(id)
        .await
        .map_err(|e| ApiError::persistence(op, e))?
        .ok_or_else(|| ApiError::not_found(op))?;

    if !missing.is_empty() {
        return Err(ApiError::validation(op, missing));
    }

    let fields = parse_fields(op, &payload)?;
    state
        .users()
        .update(id, UserChanges::new(fields, Utc::now()))
        .await
        .map_err(|e| ApiError::persistence(op, e))?
        .ok_or_else(|| ApiError::not_found(op))?;

    tracing::info!(user_id = id, "User updated");

    Ok(Json(MutationResponse {
        message: "user updated".to_string(),
        data: payload,
    }))
}

/// `DELETE /user/{id}`, guarded by a bearer token
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    headers: HeaderMap,
) -> Result<Json<MessageResponse>, ApiError> {
    let op = ApiOperation::Delete;
    authorize(&headers, state.verifier()).map_err(|reason| ApiError::authorization(op, &reason))?;

    state
        .users()
        .find_by_id(id)
        .await
        .map_err(|e| ApiError::persistence(op, e))?
        .ok_or_else(|| ApiError::not_found(op))?;

    let removed = state
        .users()
        .delete(id)
        .await
        .map_err(|e| ApiError::persistence(op, e))?;
    if !removed {
        return Err(ApiError::not_found(op));
    }

    tracing::info!(user_id = id, "User deleted");
    Ok(Json(MessageResponse::new("user deleted")))
}
