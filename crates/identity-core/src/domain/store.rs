//! 계정 저장소 추상화.
//!
//! 파이프라인은 특정 데이터베이스가 아니라 이 trait를 소비합니다.
//! 저장소는 username/email/phone 각각에 대한 유니크 제약을 원자적으로
//! 강제해야 하며, 이것이 동시 등록 간 유일한 직렬화 지점입니다
//! (파이프라인의 사전 검사는 advisory일 뿐입니다).

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use super::account::{Account, NewAccount};
use super::role::RoleName;

/// 유니크 제약이 걸린 필드.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    Username,
    Email,
    Phone,
}

impl std::fmt::Display for UniqueField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            UniqueField::Username => "username",
            UniqueField::Email => "email",
            UniqueField::Phone => "phone",
        };
        write!(f, "{}", s)
    }
}

/// 저장소 에러.
#[derive(Debug, Error)]
pub enum StoreError {
    /// 유니크 제약 위반.
    ///
    /// 동시 등록 경합에서 패배한 쪽이 받는 권위 있는 신호입니다.
    /// 파이프라인은 이를 해당 필드의 중복 에러로 재매핑해야 합니다.
    #[error("unique constraint violated on {0}")]
    UniqueViolation(UniqueField),

    /// 저장소 작업 타임아웃. 행잉이 아니라 구분된 실패로 표면화됩니다.
    #[error("store operation timed out: {0}")]
    Timeout(String),

    /// 기타 데이터베이스 에러
    #[error("database error: {0}")]
    Database(String),
}

/// 계정 저장소 trait.
///
/// 조회 메서드는 부재를 에러가 아닌 `None`으로 표현합니다.
///
/// # 구현 예시
///
/// ```ignore
/// pub struct PgAccountStore {
///     pool: PgPool,
/// }
///
/// #[async_trait]
/// impl AccountStore for PgAccountStore {
///     async fn find_by_username(&self, username: &str) -> Result<Option<Account>, StoreError> {
///         // SELECT ... WHERE username = $1
///     }
///
///     // ... 나머지 메서드 구현
/// }
/// ```
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// 사용자 이름으로 계정 조회.
    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, StoreError>;

    /// 이메일로 계정 조회.
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError>;

    /// 전화번호로 계정 조회.
    async fn find_by_phone(&self, phone: &str) -> Result<Option<Account>, StoreError>;

    /// ID로 계정 조회.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, StoreError>;

    /// 계정 생성 (원자적, 제약 강제).
    ///
    /// 계정 행과 역할 멤버십 엣지를 단일 원자적 쓰기로 저장합니다.
    /// 실패 시 어떤 부분 계정도 읽기에 노출되지 않아야 합니다.
    ///
    /// # Errors
    ///
    /// - `StoreError::UniqueViolation`: username/email/phone 중복
    ///   (사전 검사를 통과한 동시 등록 경합 포함)
    async fn create(&self, account: NewAccount) -> Result<Account, StoreError>;

    /// 계정의 역할 집합을 교체합니다.
    ///
    /// 역할 부여/회수는 계정의 멤버십 엣지만 변경하며 역할 정의
    /// 자체는 건드리지 않습니다.
    async fn replace_roles(&self, id: Uuid, roles: &[RoleName]) -> Result<(), StoreError>;
}
