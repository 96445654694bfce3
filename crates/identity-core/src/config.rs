//! 설정 관리.
//!
//! 이 모듈은 애플리케이션 설정을 정의하고 관리합니다.
//! 설정은 TOML 파일에서 로드되며 `IDENTITY__` 접두사의 환경 변수로
//! 오버라이드할 수 있습니다.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::path::Path;

use crate::error::IdentityError;

/// 서명 키 최소 길이 (바이트). HMAC 계열 서명에는 256비트 이상을 요구합니다.
pub const MIN_JWT_SECRET_BYTES: usize = 32;

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 서버 설정
    #[serde(default)]
    pub server: ServerConfig,
    /// 데이터베이스 설정
    #[serde(default)]
    pub database: DatabaseConfig,
    /// 토큰 서명 설정
    #[serde(default)]
    pub jwt: JwtConfig,
    /// 로깅 설정
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// 서버 설정.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 바인딩할 호스트
    pub host: String,
    /// 리스닝할 포트
    pub port: u16,
    /// 요청 타임아웃 (초)
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            request_timeout_secs: 30,
        }
    }
}

/// 데이터베이스 설정.
///
/// 접속 URL은 환경 변수 `DATABASE_URL`에서 읽습니다 (자격증명을 파일에
/// 남기지 않기 위함).
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// 최대 연결 수
    pub max_connections: u32,
    /// 연결 타임아웃 (초)
    pub connection_timeout_secs: u64,
    /// 유휴 타임아웃 (초)
    pub idle_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            max_connections: 10,
            connection_timeout_secs: 30,
            idle_timeout_secs: 300,
        }
    }
}

/// 토큰 서명 설정.
///
/// 서명 키는 프로세스 시작 시 한 번 로드되는 불변 상태입니다.
/// 키가 없거나 너무 짧으면 시작 자체가 실패해야 하며 (`validate`),
/// 요청 처리 중에 교체되지 않습니다.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    /// HMAC 서명 비밀 키 (256비트 이상)
    pub secret: SecretString,
    /// 액세스 토큰 TTL (분)
    pub token_ttl_minutes: i64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            // 빈 키는 validate()에서 거부된다.
            secret: SecretString::from(String::new()),
            token_ttl_minutes: 60,
        }
    }
}

impl JwtConfig {
    /// 서명 키를 검증합니다.
    ///
    /// # Errors
    ///
    /// 키가 비어 있거나 [`MIN_JWT_SECRET_BYTES`]보다 짧으면
    /// `IdentityError::Config`를 반환합니다. 이 에러는 치명적이며
    /// 프로세스 시작을 중단시켜야 합니다.
    pub fn validate(&self) -> Result<(), IdentityError> {
        let secret = self.secret.expose_secret();
        if secret.is_empty() {
            return Err(IdentityError::Config(
                "JWT secret key is missing in configuration.".to_string(),
            ));
        }
        if secret.len() < MIN_JWT_SECRET_BYTES {
            return Err(IdentityError::Config(format!(
                "JWT secret key must be at least {} bytes",
                MIN_JWT_SECRET_BYTES
            )));
        }
        Ok(())
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            // 기본값으로 시작
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            // 파일에서 로드 (없어도 환경 변수만으로 동작 가능)
            .add_source(config::File::from(path.as_ref()).required(false))
            // 환경 변수로 오버라이드 (예: IDENTITY__JWT__SECRET)
            .add_source(
                config::Environment::with_prefix("IDENTITY")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// 기본 경로에서 설정을 로드합니다.
    pub fn load_default() -> Result<Self, config::ConfigError> {
        Self::load("config/default.toml")
    }
}
