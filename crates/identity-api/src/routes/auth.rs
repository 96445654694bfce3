//! 인증 엔드포인트.
//!
//! 등록, 로그인, 로그아웃, 토큰 검증, 권한 질의.
//!
//! 핸들러는 DTO 변환과 상태 코드 결정만 담당하고, 판단은 전부
//! [`IdentityService`](crate::services::IdentityService)에 위임합니다.

use axum::{
    extract::{Query, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use identity_core::{AccountInfo, IdentityError};

use crate::auth::{validate_password_strength, UserAuth};
use crate::error::ApiResult;
use crate::services::Registration;
use crate::state::AppState;

/// 인증 라우터 생성.
pub fn auth_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/validate-token", get(validate_token))
        .route("/authorization", get(authorization))
}

/// 등록 요청.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 64))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 32))]
    pub phone: String,
    pub password: String,
    pub fullname: Option<String>,
    pub avatar: Option<String>,
    pub gender: Option<String>,
    /// 요청 역할 이름. 생략 시 빈 집합.
    #[serde(default)]
    pub roles: Vec<String>,
}

/// 등록 성공 응답.
#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub message: String,
    pub access_token: String,
}

/// 로그인 요청. identifier는 username 또는 email입니다.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub identifier: String,
    #[serde(default)]
    pub password: String,
}

/// 로그인 성공 응답.
///
/// `refresh_token`은 와이어 호환을 위한 빈 슬롯입니다 — 토큰 갱신은
/// 범위 밖이며 발급되지 않습니다.
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub account: AccountInfo,
}

/// 토큰 검증/권한 질의 응답.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenMessage {
    pub message: String,
}

/// 계정 등록.
///
/// 요청 형태 검증(필드 길이, 이메일 형식, 비밀번호 정책)은 여기서
/// 끝내고, 중복 검사부터는 파이프라인의 실패 모드 순서를 따릅니다.
async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<RegisterResponse>)> {
    req.validate()
        .map_err(|e| IdentityError::Validation(e.to_string()))?;
    validate_password_strength(&req.password).map_err(IdentityError::from)?;

    let (_, access_token) = state
        .identity_service()
        .register(Registration {
            username: req.username,
            email: req.email,
            phone: req.phone,
            password: req.password,
            fullname: req.fullname,
            avatar: req.avatar,
            gender: req.gender,
            roles: req.roles,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User registered successfully".to_string(),
            access_token,
        }),
    ))
}

/// 로그인.
async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let (account, access_token) = state
        .identity_service()
        .login(&req.identifier, &req.password)
        .await?;

    Ok(Json(LoginResponse {
        access_token,
        refresh_token: String::new(),
        account: account.info(),
    }))
}

/// 로그아웃.
///
/// 토큰은 무상태이므로 서버 측 무효화는 없습니다. USER 역할의 유효한
/// 토큰을 요구하고 성공 신호만 돌려줍니다.
async fn logout(UserAuth(claims): UserAuth) -> Json<TokenMessage> {
    tracing::info!(username = %claims.username, "logout");
    Json(TokenMessage {
        message: "Logged out successfully".to_string(),
    })
}

fn authorization_header(headers: &HeaderMap) -> &str {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("")
}

/// 토큰 검증 엔드포인트.
///
/// 요청 게이트와 같은 검증 구현을 통과하며, 부작용 없이 유효성만
/// 보고합니다.
async fn validate_token(State(state): State<AppState>, headers: HeaderMap) -> Response {
    match state
        .identity_service()
        .validate_header(authorization_header(&headers))
    {
        Ok(_) => (
            StatusCode::OK,
            Json(TokenMessage {
                message: "Valid token".to_string(),
            }),
        )
            .into_response(),
        Err(_) => (
            StatusCode::UNAUTHORIZED,
            Json(TokenMessage {
                message: "Invalid token".to_string(),
            }),
        )
            .into_response(),
    }
}

#[derive(Debug, Deserialize)]
struct AuthorizationQuery {
    #[serde(rename = "requiredRole")]
    required_role: String,
}

/// 권한 질의 엔드포인트.
///
/// 토큰이 유효하고 요구 역할을 정확히 보유할 때만 200입니다.
async fn authorization(
    State(state): State<AppState>,
    Query(query): Query<AuthorizationQuery>,
    headers: HeaderMap,
) -> Response {
    match state
        .identity_service()
        .authorize_header(authorization_header(&headers), &query.required_role)
    {
        Ok(_) => (
            StatusCode::OK,
            Json(TokenMessage {
                message: "Valid token".to_string(),
            }),
        )
            .into_response(),
        Err(_) => (
            StatusCode::UNAUTHORIZED,
            Json(TokenMessage {
                message: "Invalid token".to_string(),
            }),
        )
            .into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::create_test_state;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app() -> Router {
        create_api_router_with_state()
    }

    fn create_api_router_with_state() -> Router {
        crate::routes::create_api_router().with_state(create_test_state())
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn register_body(username: &str, email: &str, phone: &str) -> Value {
        json!({
            "username": username,
            "email": email,
            "phone": phone,
            "password": "password1",
            "roles": ["USER"]
        })
    }

    #[tokio::test]
    async fn register_returns_created_with_token() {
        let app = app();
        let response = app
            .oneshot(json_request(
                "POST",
                "/api/auth/register",
                register_body("alice", "alice@example.com", "010-1111"),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert_eq!(body["message"], "User registered successfully");
        assert!(!body["access_token"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn duplicate_registration_is_conflict() {
        let app = app();
        let first = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/auth/register",
                register_body("bob", "bob@example.com", "010-2222"),
            ))
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::CREATED);

        let second = app
            .oneshot(json_request(
                "POST",
                "/api/auth/register",
                register_body("bob", "other@example.com", "010-3333"),
            ))
            .await
            .unwrap();
        assert_eq!(second.status(), StatusCode::CONFLICT);
        let body = body_json(second).await;
        assert_eq!(body["error"]["code"], "DUPLICATE_USERNAME");
    }

    #[tokio::test]
    async fn weak_password_is_rejected() {
        let app = app();
        let mut body = register_body("carol", "carol@example.com", "010-4444");
        body["password"] = json!("short1");

        let response = app
            .oneshot(json_request("POST", "/api/auth/register", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn login_flow_and_validate_token() {
        let app = app();
        app.clone()
            .oneshot(json_request(
                "POST",
                "/api/auth/register",
                register_body("dave", "dave@example.com", "010-5555"),
            ))
            .await
            .unwrap();

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/auth/login",
                json!({"identifier": "dave", "password": "password1"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        let token = body["access_token"].as_str().unwrap().to_string();
        assert_eq!(body["refresh_token"], "");
        assert_eq!(body["account"]["username"], "dave");
        // 해시는 어떤 응답에도 실리지 않는다.
        assert!(body["account"].get("password_hash").is_none());

        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/api/auth/validate-token")
                    .header("authorization", format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["message"], "Valid token");
    }

    #[tokio::test]
    async fn login_empty_identifier_is_bad_request() {
        let app = app();
        let response = app
            .oneshot(json_request(
                "POST",
                "/api/auth/login",
                json!({"identifier": "", "password": "password1"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn login_wrong_password_is_unauthorized() {
        let app = app();
        app.clone()
            .oneshot(json_request(
                "POST",
                "/api/auth/register",
                register_body("erin", "erin@example.com", "010-6666"),
            ))
            .await
            .unwrap();

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/auth/login",
                json!({"identifier": "erin", "password": "wrong-pass9"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn validate_token_without_header_is_unauthorized() {
        let app = app();
        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/api/auth/validate-token")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["message"], "Invalid token");
    }

    #[tokio::test]
    async fn authorization_query_checks_exact_role() {
        let app = app();
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/auth/register",
                register_body("frank", "frank@example.com", "010-7777"),
            ))
            .await
            .unwrap();
        let token = body_json(response).await["access_token"]
            .as_str()
            .unwrap()
            .to_string();

        let get = |role: &str| {
            Request::builder()
                .method("GET")
                .uri(format!("/api/auth/authorization?requiredRole={role}"))
                .header("authorization", format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap()
        };

        let ok = app.clone().oneshot(get("USER")).await.unwrap();
        assert_eq!(ok.status(), StatusCode::OK);

        // USER 토큰은 ADMIN 요구를 충족하지 못한다.
        let denied = app.oneshot(get("ADMIN")).await.unwrap();
        assert_eq!(denied.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn logout_requires_user_role() {
        let app = app();
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/auth/register",
                register_body("grace", "grace@example.com", "010-8888"),
            ))
            .await
            .unwrap();
        let token = body_json(response).await["access_token"]
            .as_str()
            .unwrap()
            .to_string();

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/auth/logout")
                    .header("authorization", format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await["message"],
            "Logged out successfully"
        );

        let unauthenticated = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/auth/logout")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(unauthenticated.status(), StatusCode::UNAUTHORIZED);
    }
}
