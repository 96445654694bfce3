//! 계정 서비스 도메인 모델.
//!
//! 계정, 역할, 저장소 추상화를 정의합니다.

pub mod account;
pub mod role;
pub mod store;

pub use account::{Account, AccountInfo, NewAccount};
pub use role::RoleName;
pub use store::{AccountStore, StoreError, UniqueField};
