//! 등록 및 인증 파이프라인.

use std::sync::Arc;

use secrecy::ExposeSecret;
use uuid::Uuid;

use identity_core::{
    Account, AccountStore, IdentityError, IdentityResult, JwtConfig, NewAccount, RoleName,
    StoreError, UniqueField,
};

use crate::auth::{create_token, decode_token, extract_bearer, hash_password, Claims};

/// 등록 요청 입력.
///
/// 평문 비밀번호는 해싱 단계 이후 어디에도 남지 않습니다.
#[derive(Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub fullname: Option<String>,
    pub avatar: Option<String>,
    pub gender: Option<String>,
    /// 요청된 역할 이름 (원시 문자열, 미해석)
    pub roles: Vec<String>,
}

/// 등록/인증/토큰 검증 서비스.
pub struct IdentityService {
    store: Arc<dyn AccountStore>,
    jwt: JwtConfig,
}

impl IdentityService {
    pub fn new(store: Arc<dyn AccountStore>, jwt: JwtConfig) -> Self {
        Self { store, jwt }
    }

    /// 계정 등록 파이프라인.
    ///
    /// 단계 순서가 곧 실패 모드 순서입니다:
    /// username 중복 → email 중복 → phone 중복 → 해싱 → 역할 해석 →
    /// 원자적 저장. 사전 검사는 advisory일 뿐이며, 동시 등록 경합의
    /// 최종 판정은 저장소의 유니크 제약입니다. 제약 위반은 해당 필드의
    /// 중복 에러로 재매핑됩니다.
    pub async fn register(&self, input: Registration) -> IdentityResult<(Account, String)> {
        if self.store.find_by_username(&input.username).await?.is_some() {
            return Err(IdentityError::DuplicateUsername(input.username));
        }
        if self.store.find_by_email(&input.email).await?.is_some() {
            return Err(IdentityError::DuplicateEmail(input.email));
        }
        if self.store.find_by_phone(&input.phone).await?.is_some() {
            return Err(IdentityError::DuplicatePhone(input.phone));
        }

        let password_hash = hash_password(&input.password)?;
        let roles = resolve_roles(&input.roles);

        let created = self
            .store
            .create(NewAccount {
                username: input.username.clone(),
                email: input.email.clone(),
                phone: input.phone.clone(),
                password_hash,
                fullname: input.fullname,
                avatar: input.avatar,
                gender: input.gender,
                roles,
            })
            .await
            .map_err(|e| remap_unique_violation(e, &input.username, &input.email, &input.phone))?;

        let token = self.issue_token(&created)?;
        tracing::info!(account_id = %created.id, username = %created.username, "account registered");
        Ok((created, token))
    }

    /// 로그인 파이프라인.
    ///
    /// identifier는 username 또는 email로 과적된 필드입니다.
    /// username 조회 후 없으면 email로 폴백합니다. "계정 없음"과
    /// "비밀번호 불일치"는 의도적으로 구분하지 않습니다 (사용자
    /// 열거 방지).
    pub async fn login(&self, identifier: &str, password: &str) -> IdentityResult<(Account, String)> {
        let identifier = identifier.trim();
        // 저장소 접근 전에 거부한다.
        if identifier.is_empty() {
            return Err(IdentityError::InvalidCredentialsInput);
        }

        let account = match self.store.find_by_username(identifier).await? {
            Some(account) => Some(account),
            None => self.store.find_by_email(identifier).await?,
        };

        let Some(account) = account else {
            return Err(IdentityError::AuthenticationFailed);
        };

        if !crate::auth::verify_password(password, &account.password_hash) {
            return Err(IdentityError::AuthenticationFailed);
        }

        let token = self.issue_token(&account)?;
        tracing::info!(account_id = %account.id, "login succeeded");
        Ok((account, token))
    }

    /// 계정의 현재 역할 집합을 담은 액세스 토큰 발급.
    pub fn issue_token(&self, account: &Account) -> IdentityResult<String> {
        let claims = Claims::new(
            account.id,
            &account.username,
            account.roles.clone(),
            self.jwt.token_ttl_minutes,
        );
        Ok(create_token(&claims, self.jwt.secret.expose_secret())?)
    }

    /// Authorization 헤더 값의 토큰 검증.
    ///
    /// 요청 게이트([`crate::auth::JwtAuth`])와 동일한 구현을 사용합니다.
    pub fn validate_header(&self, header_value: &str) -> IdentityResult<Claims> {
        let token = extract_bearer(header_value)?;
        Ok(decode_token(token, self.jwt.secret.expose_secret())?)
    }

    /// 토큰 + 요구 역할 검사.
    ///
    /// 요구 역할이 토큰의 역할 집합에 정확히 포함될 때만 통과합니다.
    /// 닫힌 열거형 밖의 이름은 어느 집합에도 속하지 않으므로 거부됩니다.
    pub fn authorize_header(
        &self,
        header_value: &str,
        required_role: &str,
    ) -> IdentityResult<Claims> {
        let claims = self.validate_header(header_value)?;
        if !claims.has_role_named(required_role) {
            return Err(IdentityError::AuthenticationFailed);
        }
        Ok(claims)
    }

    /// ID로 계정 조회.
    pub async fn find_account(&self, id: Uuid) -> IdentityResult<Account> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or(IdentityError::AccountNotFound(id))
    }
}

/// 요청된 역할 이름을 닫힌 열거형으로 해석합니다.
///
/// 알 수 없는 이름은 등록 전체를 실패시키지 않고 버립니다.
/// 버려진 이름은 WARN으로 기록합니다. 중복은 제거되며, 결과는 각
/// 역할의 첫 등장 순서를 유지합니다.
fn resolve_roles(requested: &[String]) -> Vec<RoleName> {
    let mut resolved: Vec<RoleName> = Vec::new();
    for name in requested {
        match RoleName::parse(name) {
            Some(role) => {
                if !resolved.contains(&role) {
                    resolved.push(role);
                }
            }
            None => {
                tracing::warn!(role = %name, "unrecognized role name in registration, dropping");
            }
        }
    }
    resolved
}

/// 저장소 제약 위반을 해당 필드의 중복 에러로 재매핑합니다.
///
/// 사전 검사를 통과하고 저장 단계에서 경합에 패배한 경우입니다.
fn remap_unique_violation(
    err: StoreError,
    username: &str,
    email: &str,
    phone: &str,
) -> IdentityError {
    match err {
        StoreError::UniqueViolation(UniqueField::Username) => {
            IdentityError::DuplicateUsername(username.to_string())
        }
        StoreError::UniqueViolation(UniqueField::Email) => {
            IdentityError::DuplicateEmail(email.to_string())
        }
        StoreError::UniqueViolation(UniqueField::Phone) => {
            IdentityError::DuplicatePhone(phone.to_string())
        }
        other => IdentityError::Store(other),
    }
}
