//! 역할 관리 엔드포인트.
//!
//! 역할 부여/회수는 ADMIN 전용입니다. 부여/회수의 비즈니스 결과
//! (변경됨/이미 그 상태)는 전송 상태 코드가 아니라 응답 본문의
//! `success` 불리언으로 구분합니다 — 둘 다 200입니다.

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::AdminAuth;
use crate::error::ApiResult;
use crate::state::AppState;

/// 역할 라우터 생성.
pub fn roles_router() -> Router<AppState> {
    Router::new()
        .route("/{id}", get(list_roles))
        .route("/{id}/assign", post(assign_role))
        .route("/{id}/revoke", post(revoke_role))
}

/// 역할 변경 응답.
#[derive(Debug, Serialize, Deserialize)]
pub struct RoleMutationResponse {
    /// 멤버십이 실제로 변경되었는지 여부
    pub success: bool,
    pub message: String,
}

/// 역할 부여 (ADMIN 전용).
///
/// 본문은 원시 역할 이름 텍스트입니다. 이미 보유 중이면 멱등
/// no-op으로 `success: false`를 돌려줍니다.
async fn assign_role(
    AdminAuth(claims): AdminAuth,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    role_name: String,
) -> ApiResult<Json<RoleMutationResponse>> {
    let role_name = role_name.trim();
    let assigned = state.role_service().assign(id, role_name).await?;

    tracing::debug!(admin = %claims.username, account_id = %id, role = %role_name, assigned, "assign request");
    let message = if assigned {
        "Role assigned successfully"
    } else {
        "Account already has this role"
    };
    Ok(Json(RoleMutationResponse {
        success: assigned,
        message: message.to_string(),
    }))
}

/// 역할 회수 (ADMIN 전용).
///
/// 일치하는 멤버십이 없으면 `success: false` (remove-if-present).
async fn revoke_role(
    AdminAuth(claims): AdminAuth,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    role_name: String,
) -> ApiResult<Json<RoleMutationResponse>> {
    let role_name = role_name.trim();
    let revoked = state.role_service().revoke(id, role_name).await?;

    tracing::debug!(admin = %claims.username, account_id = %id, role = %role_name, revoked, "revoke request");
    let message = if revoked {
        "Role revoked successfully"
    } else {
        "Account does not have this role"
    };
    Ok(Json(RoleMutationResponse {
        success: revoked,
        message: message.to_string(),
    }))
}

/// 계정의 역할 이름 목록 조회.
async fn list_roles(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Vec<String>>> {
    Ok(Json(state.role_service().list_roles(id).await?))
}
