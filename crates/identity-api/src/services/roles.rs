//! 역할 부여/회수/조회.
//!
//! 역할 정의는 참조 데이터이며 여기서는 절대 변경하지 않습니다.
//! 모든 변경은 계정의 멤버십 엣지에만 닿습니다.

use std::sync::Arc;

use uuid::Uuid;

use identity_core::{AccountStore, IdentityError, IdentityResult, RoleName};

/// 역할 관리 서비스.
pub struct RoleService {
    store: Arc<dyn AccountStore>,
}

impl RoleService {
    pub fn new(store: Arc<dyn AccountStore>) -> Self {
        Self { store }
    }

    /// 역할 부여.
    ///
    /// 이미 보유 중이면 `false` (멱등 no-op, 에러 아님). 계정을 먼저
    /// 해석하고 역할 이름을 그다음에 해석합니다: 둘 다 잘못된 요청은
    /// `AccountNotFound`로 실패합니다. 닫힌 열거형 밖의 이름은
    /// `RoleNotFound`입니다.
    pub async fn assign(&self, account_id: Uuid, role_name: &str) -> IdentityResult<bool> {
        let mut account = self
            .store
            .find_by_id(account_id)
            .await?
            .ok_or(IdentityError::AccountNotFound(account_id))?;

        let role = RoleName::parse(role_name)
            .ok_or_else(|| IdentityError::RoleNotFound(role_name.to_string()))?;

        if account.has_role(role) {
            return Ok(false);
        }

        account.roles.push(role);
        self.store.replace_roles(account_id, &account.roles).await?;
        tracing::info!(account_id = %account_id, role = %role, "role assigned");
        Ok(true)
    }

    /// 역할 회수.
    ///
    /// 일치하는 멤버십을 제거하고 `true`, 없었으면 `false`.
    /// 닫힌 열거형 밖의 이름은 어떤 멤버십과도 일치할 수 없으므로
    /// `false`로 수렴합니다 (remove-if-present 의미론).
    pub async fn revoke(&self, account_id: Uuid, role_name: &str) -> IdentityResult<bool> {
        let mut account = self
            .store
            .find_by_id(account_id)
            .await?
            .ok_or(IdentityError::AccountNotFound(account_id))?;

        let Some(role) = RoleName::parse(role_name) else {
            return Ok(false);
        };

        let before = account.roles.len();
        account.roles.retain(|r| *r != role);
        if account.roles.len() == before {
            return Ok(false);
        }

        self.store.replace_roles(account_id, &account.roles).await?;
        tracing::info!(account_id = %account_id, role = %role, "role revoked");
        Ok(true)
    }

    /// 계정의 역할 이름 목록 조회.
    ///
    /// 순서에 의미는 없습니다.
    pub async fn list_roles(&self, account_id: Uuid) -> IdentityResult<Vec<String>> {
        let account = self
            .store
            .find_by_id(account_id)
            .await?
            .ok_or(IdentityError::AccountNotFound(account_id))?;

        Ok(account
            .roles
            .iter()
            .map(|r| r.as_str().to_string())
            .collect())
    }
}
