//! PostgreSQL 저장소 계층.
//!
//! `AccountStore` trait의 PostgreSQL 구현과 연결 풀 관리를 제공합니다.

mod accounts;

pub use accounts::PgAccountStore;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;

use identity_core::DatabaseConfig;

/// 데이터베이스 연결 풀 생성.
///
/// 접속 URL은 자격증명을 설정 파일에 남기지 않도록 호출자가
/// 환경에서 읽어 전달합니다.
pub async fn connect_pool(url: &str, config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.connection_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .connect(url)
        .await
}

/// 마이그레이션 실행.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
