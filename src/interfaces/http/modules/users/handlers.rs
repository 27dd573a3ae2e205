//! User administration handlers

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};

use super::dto::{
    ChangePasswordRequest, ListUsersQuery, UpdateRoleRequest, UpdateStatusRequest, UserStatsDto,
};
use crate::domain::Principal;
use crate::interfaces::http::common::{ApiResponse, ApiResult, EmptyData, ValidatedJson};
use crate::interfaces::http::modules::auth::UserInfo;
use crate::interfaces::http::state::AppState;

#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(ListUsersQuery),
    responses(
        (status = 200, description = "Accounts ordered by id", body = ApiResponse<Vec<UserInfo>>),
        (status = 403, description = "Managers and admins only")
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(query): Query<ListUsersQuery>,
) -> ApiResult<Vec<UserInfo>> {
    let items = state
        .identity
        .list_users(query.parse()?, &principal)
        .await?
        .into_iter()
        .map(UserInfo::from)
        .collect();
    Ok(Json(ApiResponse::success(items)))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/stats",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Account counts", body = ApiResponse<UserStatsDto>),
        (status = 403, description = "Managers and admins only")
    )
)]
pub async fn user_stats(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> ApiResult<UserStatsDto> {
    let stats = state.identity.user_stats(&principal).await?;
    Ok(Json(ApiResponse::success(stats.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "Account", body = ApiResponse<UserInfo>),
        (status = 403, description = "Managers and admins, or the user themself"),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i32>,
) -> ApiResult<UserInfo> {
    let user = state.identity.get_user(id, &principal).await?;
    Ok(Json(ApiResponse::success(user.into())))
}

#[utoipa::path(
    patch,
    path = "/api/v1/users/{id}/role",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "User ID")),
    request_body = UpdateRoleRequest,
    responses(
        (status = 200, description = "Role changed", body = ApiResponse<UserInfo>),
        (status = 400, description = "Last active admin, or customer/staff mix-up"),
        (status = 403, description = "Admins only")
    )
)]
pub async fn update_user_role(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i32>,
    Json(request): Json<UpdateRoleRequest>,
) -> ApiResult<UserInfo> {
    let user = state
        .identity
        .update_role(id, request.parse()?, &principal)
        .await?;
    Ok(Json(ApiResponse::success(user.into())))
}

#[utoipa::path(
    patch,
    path = "/api/v1/users/{id}/status",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "User ID")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Account enabled or disabled", body = ApiResponse<UserInfo>),
        (status = 400, description = "Last active admin"),
        (status = 403, description = "Managers and admins only")
    )
)]
pub async fn update_user_status(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i32>,
    Json(request): Json<UpdateStatusRequest>,
) -> ApiResult<UserInfo> {
    let user = state
        .identity
        .update_status(id, request.is_active, &principal)
        .await?;
    Ok(Json(ApiResponse::success(user.into())))
}

#[utoipa::path(
    put,
    path = "/api/v1/users/me/password",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed"),
        (status = 400, description = "Current password is wrong")
    )
)]
pub async fn change_password(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ValidatedJson(request): ValidatedJson<ChangePasswordRequest>,
) -> ApiResult<EmptyData> {
    state
        .identity
        .change_password(&principal, &request.current_password, &request.new_password)
        .await?;
    Ok(Json(ApiResponse::success(EmptyData {})))
}

#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "Account deleted"),
        (status = 400, description = "Last active admin"),
        (status = 403, description = "Admins only")
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i32>,
) -> ApiResult<EmptyData> {
    state.identity.remove_user(id, &principal).await?;
    Ok(Json(ApiResponse::success(EmptyData {})))
}
