//! 헬스 체크 endpoint.
//!
//! 서버 상태 확인을 위한 헬스 체크 엔드포인트를 제공합니다.
//! 로드밸런서나 오케스트레이션 시스템(Kubernetes 등)에서 사용됩니다.

use axum::{extract::State, routing::get, Json, Router};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

/// 헬스 체크 응답 구조체.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// 전체 서비스 상태 ("healthy" | "degraded")
    pub status: String,

    /// API 버전
    pub version: String,

    /// 서버 업타임(초)
    pub uptime_secs: i64,

    /// 현재 시간 (ISO 8601)
    pub timestamp: String,

    /// 데이터베이스 연결 상태
    pub database: ComponentStatus,
}

/// 컴포넌트 상태.
#[derive(Debug, Serialize, Deserialize)]
pub struct ComponentStatus {
    /// 상태 ("up" | "down" | "not_configured")
    pub status: String,
}

/// 헬스 체크 라우터 생성.
pub fn health_router() -> Router<AppState> {
    Router::new()
        .route("/", get(liveness))
        .route("/ready", get(readiness))
}

/// Liveness 체크. 프로세스가 살아 있으면 항상 200.
async fn liveness() -> &'static str {
    "OK"
}

/// Readiness 체크. 데이터베이스 연결 상태를 포함합니다.
async fn readiness(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_up = state.is_db_healthy().await;
    let database = ComponentStatus {
        status: if db_up {
            "up".to_string()
        } else if state.db_pool.is_none() {
            "not_configured".to_string()
        } else {
            "down".to_string()
        },
    };

    Json(HealthResponse {
        status: if db_up { "healthy" } else { "degraded" }.to_string(),
        version: state.version.clone(),
        uptime_secs: state.uptime_secs(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        database,
    })
}
