//! # Identity Core
//!
//! 계정/인증 서비스의 핵심 도메인 모델 및 타입을 제공합니다.
//!
//! 이 크레이트는 서비스 전반에서 사용되는 기본 타입을 제공합니다:
//! - 계정 및 역할 도메인 타입
//! - 저장소 추상화 (`AccountStore`)
//! - 에러 분류 체계
//! - 설정 관리
//! - 로깅 인프라

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;

pub use config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
