//! 계정 저장소의 PostgreSQL 구현.
//!
//! 유니크 제약(username/email/phone)은 데이터베이스가 강제합니다.
//! 서비스 계층의 사전 검사를 통과한 동시 등록 경합은 여기서
//! `23505` 제약 위반으로 패배가 확정되며, 제약 이름으로 어느 필드가
//! 충돌했는지 복원합니다.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use identity_core::{Account, AccountStore, NewAccount, RoleName, StoreError, UniqueField};

/// PostgreSQL 기반 [`AccountStore`] 구현.
pub struct PgAccountStore {
    pool: PgPool,
}

/// accounts 조인 조회 결과 행.
#[derive(Debug, sqlx::FromRow)]
struct AccountRow {
    id: Uuid,
    username: String,
    email: String,
    phone: String,
    password_hash: String,
    fullname: Option<String>,
    avatar: Option<String>,
    gender: Option<String>,
    roles: Vec<String>,
    created_at: DateTime<Utc>,
}

impl AccountRow {
    fn into_account(self) -> Account {
        Account {
            id: self.id,
            username: self.username,
            email: self.email,
            phone: self.phone,
            password_hash: self.password_hash,
            fullname: self.fullname,
            avatar: self.avatar,
            gender: self.gender,
            roles: parse_role_names(&self.roles),
            created_at: self.created_at,
        }
    }
}

/// 저장된 역할 이름을 도메인 열거형으로 복원합니다.
///
/// roles 테이블은 닫힌 열거형과 동기화되어 있으므로 알 수 없는
/// 이름은 스키마 드리프트입니다. 요청을 죽이는 대신 기록하고
/// 건너뜁니다.
fn parse_role_names(names: &[String]) -> Vec<RoleName> {
    names
        .iter()
        .filter_map(|name| {
            let parsed = RoleName::parse(name);
            if parsed.is_none() {
                tracing::warn!(role = %name, "unknown role name in database, skipping");
            }
            parsed
        })
        .collect()
}

/// sqlx 에러를 저장소 에러로 변환.
fn map_sqlx_err(err: sqlx::Error) -> StoreError {
    match &err {
        sqlx::Error::PoolTimedOut => StoreError::Timeout("connection pool timed out".to_string()),
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505") => {
            match db_err.constraint() {
                Some("accounts_username_key") => StoreError::UniqueViolation(UniqueField::Username),
                Some("accounts_email_key") => StoreError::UniqueViolation(UniqueField::Email),
                Some("accounts_phone_key") => StoreError::UniqueViolation(UniqueField::Phone),
                _ => StoreError::Database(err.to_string()),
            }
        }
        _ => StoreError::Database(err.to_string()),
    }
}

const SELECT_ACCOUNT: &str = r#"
SELECT a.id, a.username, a.email, a.phone, a.password_hash,
       a.fullname, a.avatar, a.gender, a.created_at,
       COALESCE(array_agg(r.name) FILTER (WHERE r.name IS NOT NULL), '{}') AS roles
FROM accounts a
LEFT JOIN account_roles ar ON ar.account_id = a.id
LEFT JOIN roles r ON r.id = ar.role_id
"#;

impl PgAccountStore {
    /// 새로운 저장소 생성.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_one(
        &self,
        where_clause: &str,
        bind: &str,
    ) -> Result<Option<Account>, StoreError> {
        let query = format!("{SELECT_ACCOUNT} {where_clause} GROUP BY a.id");
        let row = sqlx::query_as::<_, AccountRow>(&query)
            .bind(bind)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_err)?;
        Ok(row.map(AccountRow::into_account))
    }

    /// 역할 멤버십 엣지 삽입.
    ///
    /// roles 테이블의 정의 행은 건드리지 않고 account_roles만 변경합니다.
    async fn insert_role_edges(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        account_id: Uuid,
        roles: &[RoleName],
    ) -> Result<(), sqlx::Error> {
        let names: Vec<String> = roles.iter().map(|r| r.as_str().to_string()).collect();
        sqlx::query(
            r#"
            INSERT INTO account_roles (account_id, role_id)
            SELECT $1, id FROM roles WHERE name = ANY($2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(account_id)
        .bind(&names)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, StoreError> {
        self.find_one("WHERE a.username = $1", username).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        self.find_one("WHERE a.email = $1", email).await
    }

    async fn find_by_phone(&self, phone: &str) -> Result<Option<Account>, StoreError> {
        self.find_one("WHERE a.phone = $1", phone).await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, StoreError> {
        let query = format!("{SELECT_ACCOUNT} WHERE a.id = $1 GROUP BY a.id");
        let row = sqlx::query_as::<_, AccountRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_err)?;
        Ok(row.map(AccountRow::into_account))
    }

    async fn create(&self, account: NewAccount) -> Result<Account, StoreError> {
        // 계정 행과 역할 엣지를 하나의 트랜잭션으로 기록한다.
        // 실패 시 롤백되어 부분 계정이 읽기에 노출되지 않는다.
        let mut tx = self.pool.begin().await.map_err(map_sqlx_err)?;

        let (id, created_at): (Uuid, DateTime<Utc>) = sqlx::query_as(
            r#"
            INSERT INTO accounts (username, email, phone, password_hash, fullname, avatar, gender)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, created_at
            "#,
        )
        .bind(&account.username)
        .bind(&account.email)
        .bind(&account.phone)
        .bind(&account.password_hash)
        .bind(&account.fullname)
        .bind(&account.avatar)
        .bind(&account.gender)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_sqlx_err)?;

        Self::insert_role_edges(&mut tx, id, &account.roles)
            .await
            .map_err(map_sqlx_err)?;

        tx.commit().await.map_err(map_sqlx_err)?;

        Ok(Account {
            id,
            username: account.username,
            email: account.email,
            phone: account.phone,
            password_hash: account.password_hash,
            fullname: account.fullname,
            avatar: account.avatar,
            gender: account.gender,
            roles: account.roles,
            created_at,
        })
    }

    async fn replace_roles(&self, id: Uuid, roles: &[RoleName]) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_err)?;

        sqlx::query("DELETE FROM account_roles WHERE account_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_err)?;

        Self::insert_role_edges(&mut tx, id, roles)
            .await
            .map_err(map_sqlx_err)?;

        tx.commit().await.map_err(map_sqlx_err)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_role_names_skips_unknown() {
        let names = vec![
            "ADMIN".to_string(),
            "STALE_ROLE".to_string(),
            "USER".to_string(),
        ];
        assert_eq!(
            parse_role_names(&names),
            vec![RoleName::Admin, RoleName::User]
        );
    }

    #[test]
    fn parse_role_names_empty_is_empty() {
        assert!(parse_role_names(&[]).is_empty());
    }
}
