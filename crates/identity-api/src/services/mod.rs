//! 비즈니스 파이프라인.
//!
//! 등록/인증 파이프라인과 역할 관리 로직. 핸들러는 DTO 변환만 하고
//! 모든 판단은 이 계층에서 내립니다. 각 파이프라인 단계는 선언된
//! 순서대로 실행되며 첫 실패에서 단락(short-circuit)합니다.

mod identity;
mod roles;

pub use identity::{IdentityService, Registration};
pub use roles::RoleService;
