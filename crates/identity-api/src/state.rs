//! 모든 핸들러에서 공유되는 애플리케이션 상태.
//!
//! AppState는 모든 API 핸들러에서 공유되는 상태를 관리합니다.
//! 내부 리소스는 Arc로 래핑되어 여러 요청 간에 안전하게 공유됩니다.

use std::sync::Arc;

use secrecy::ExposeSecret;

use identity_core::{AccountStore, AppConfig};

/// 애플리케이션 공유 상태.
///
/// 이 구조체는 모든 API 핸들러에서 접근할 수 있는 공유 리소스를 포함합니다.
/// Axum의 State extractor를 통해 핸들러에 주입됩니다.
#[derive(Clone)]
pub struct AppState {
    /// 계정 저장소 (PostgreSQL 또는 테스트용 인메모리)
    pub store: Arc<dyn AccountStore>,

    /// 애플리케이션 설정.
    ///
    /// JWT 서명 키가 여기 담겨 있으며 프로세스 수명 동안 불변입니다.
    pub config: Arc<AppConfig>,

    /// 데이터베이스 연결 풀 (헬스체크용)
    pub db_pool: Option<sqlx::PgPool>,

    /// 서버 시작 시간 (업타임 계산용)
    pub started_at: chrono::DateTime<chrono::Utc>,

    /// API 버전
    pub version: String,
}

impl AppState {
    /// 새로운 AppState 생성.
    pub fn new(store: Arc<dyn AccountStore>, config: AppConfig) -> Self {
        Self {
            store,
            config: Arc::new(config),
            db_pool: None,
            started_at: chrono::Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// 헬스체크용 데이터베이스 연결 설정.
    pub fn with_db_pool(mut self, pool: sqlx::PgPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// 등록/인증 서비스 생성.
    ///
    /// 내부가 Arc 클론이므로 요청마다 만들어도 비용이 없습니다.
    pub fn identity_service(&self) -> crate::services::IdentityService {
        crate::services::IdentityService::new(self.store.clone(), self.config.jwt.clone())
    }

    /// 역할 관리 서비스 생성.
    pub fn role_service(&self) -> crate::services::RoleService {
        crate::services::RoleService::new(self.store.clone())
    }

    /// JWT 서명 키 반환.
    pub fn jwt_secret(&self) -> &str {
        self.config.jwt.secret.expose_secret()
    }

    /// 토큰 TTL (분) 반환.
    pub fn token_ttl_minutes(&self) -> i64 {
        self.config.jwt.token_ttl_minutes
    }

    /// 서버 업타임(초) 반환.
    pub fn uptime_secs(&self) -> i64 {
        chrono::Utc::now()
            .signed_duration_since(self.started_at)
            .num_seconds()
    }

    /// 데이터베이스 연결 상태 확인.
    pub async fn is_db_healthy(&self) -> bool {
        if let Some(pool) = &self.db_pool {
            sqlx::query("SELECT 1").fetch_one(pool).await.is_ok()
        } else {
            false
        }
    }
}

/// 테스트용 인메모리 계정 저장소.
///
/// 유니크 제약을 단일 락 아래에서 강제하므로 저장소 경합 의미론이
/// PostgreSQL 구현과 동일하게 동작합니다.
#[cfg(any(test, feature = "test-utils"))]
pub use memory::MemoryAccountStore;

#[cfg(any(test, feature = "test-utils"))]
mod memory {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use uuid::Uuid;

    use identity_core::{Account, AccountStore, NewAccount, RoleName, StoreError, UniqueField};

    /// 인메모리 [`AccountStore`] 구현.
    #[derive(Default)]
    pub struct MemoryAccountStore {
        accounts: Mutex<HashMap<Uuid, Account>>,
    }

    impl MemoryAccountStore {
        pub fn new() -> Self {
            Self::default()
        }

        fn find_where(
            &self,
            pred: impl Fn(&Account) -> bool,
        ) -> Result<Option<Account>, StoreError> {
            let guard = self
                .accounts
                .lock()
                .map_err(|e| StoreError::Database(e.to_string()))?;
            Ok(guard.values().find(|a| pred(a)).cloned())
        }
    }

    #[async_trait]
    impl AccountStore for MemoryAccountStore {
        async fn find_by_username(&self, username: &str) -> Result<Option<Account>, StoreError> {
            self.find_where(|a| a.username == username)
        }

        async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
            self.find_where(|a| a.email == email)
        }

        async fn find_by_phone(&self, phone: &str) -> Result<Option<Account>, StoreError> {
            self.find_where(|a| a.phone == phone)
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, StoreError> {
            let guard = self
                .accounts
                .lock()
                .map_err(|e| StoreError::Database(e.to_string()))?;
            Ok(guard.get(&id).cloned())
        }

        async fn create(&self, account: NewAccount) -> Result<Account, StoreError> {
            // 단일 락 구간 안에서 검사와 삽입을 함께 수행한다 (원자성).
            let mut guard = self
                .accounts
                .lock()
                .map_err(|e| StoreError::Database(e.to_string()))?;

            for existing in guard.values() {
                if existing.username == account.username {
                    return Err(StoreError::UniqueViolation(UniqueField::Username));
                }
                if existing.email == account.email {
                    return Err(StoreError::UniqueViolation(UniqueField::Email));
                }
                if existing.phone == account.phone {
                    return Err(StoreError::UniqueViolation(UniqueField::Phone));
                }
            }

            let created = Account {
                id: Uuid::new_v4(),
                username: account.username,
                email: account.email,
                phone: account.phone,
                password_hash: account.password_hash,
                fullname: account.fullname,
                avatar: account.avatar,
                gender: account.gender,
                roles: account.roles,
                created_at: chrono::Utc::now(),
            };
            guard.insert(created.id, created.clone());
            Ok(created)
        }

        async fn replace_roles(&self, id: Uuid, roles: &[RoleName]) -> Result<(), StoreError> {
            let mut guard = self
                .accounts
                .lock()
                .map_err(|e| StoreError::Database(e.to_string()))?;
            match guard.get_mut(&id) {
                Some(account) => {
                    account.roles = roles.to_vec();
                    Ok(())
                }
                None => Err(StoreError::Database(format!("account {} not found", id))),
            }
        }
    }
}

/// 테스트용 AppState 생성 헬퍼.
///
/// 실제 DB 연결 없이 테스트할 수 있는 최소한의 상태를 생성합니다.
#[cfg(any(test, feature = "test-utils"))]
pub fn create_test_state() -> AppState {
    use identity_core::JwtConfig;

    let mut config = AppConfig::default();
    config.jwt = JwtConfig {
        secret: String::from("test-secret-key-for-jwt-testing-minimum-32-chars").into(),
        token_ttl_minutes: 60,
    };

    AppState::new(Arc::new(MemoryAccountStore::new()), config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use identity_core::{NewAccount, RoleName, StoreError, UniqueField};

    fn new_account(username: &str, email: &str, phone: &str) -> NewAccount {
        NewAccount {
            username: username.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
            password_hash: "$argon2id$stub".to_string(),
            fullname: None,
            avatar: None,
            gender: None,
            roles: vec![RoleName::User],
        }
    }

    #[tokio::test]
    async fn memory_store_enforces_uniqueness() {
        let store = MemoryAccountStore::new();
        store
            .create(new_account("alice", "a@example.com", "010-1111"))
            .await
            .unwrap();

        let err = store
            .create(new_account("alice", "b@example.com", "010-2222"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::UniqueViolation(UniqueField::Username)
        ));

        let err = store
            .create(new_account("bob", "a@example.com", "010-2222"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::UniqueViolation(UniqueField::Email)
        ));

        let err = store
            .create(new_account("bob", "b@example.com", "010-1111"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::UniqueViolation(UniqueField::Phone)
        ));
    }

    #[tokio::test]
    async fn memory_store_lookup_and_role_replacement() {
        let store = MemoryAccountStore::new();
        let created = store
            .create(new_account("carol", "c@example.com", "010-3333"))
            .await
            .unwrap();

        let found = store.find_by_username("carol").await.unwrap().unwrap();
        assert_eq!(found.id, created.id);
        assert!(store.find_by_username("nobody").await.unwrap().is_none());

        store
            .replace_roles(created.id, &[RoleName::User, RoleName::Admin])
            .await
            .unwrap();
        let updated = store.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(updated.roles, vec![RoleName::User, RoleName::Admin]);
    }
}
