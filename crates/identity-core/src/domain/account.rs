//! 계정 도메인 타입.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::role::RoleName;

/// 계정 레코드.
///
/// # 불변 조건
///
/// - `id`는 생성 시 부여되며 이후 변경되지 않습니다.
/// - `username`, `email`, `phone`은 전체 저장소에서 전역적으로 유일합니다
///   (저장소의 유니크 제약이 최종 권위).
/// - `password_hash`는 불투명한 PHC 문자열이며 평문은 어디에도 남지 않습니다.
/// - `roles`는 null이 될 수 없습니다 (빈 벡터는 허용).
#[derive(Debug, Clone, Serialize)]
pub struct Account {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub phone: String,
    /// 비밀번호 해시. 직렬화에서 제외되어 응답 본문으로 새어 나갈 수 없습니다.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub fullname: Option<String>,
    pub avatar: Option<String>,
    pub gender: Option<String>,
    pub roles: Vec<RoleName>,
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// 계정이 특정 역할을 보유하는지 확인합니다 (정확한 멤버십, 계층 없음).
    pub fn has_role(&self, role: RoleName) -> bool {
        self.roles.contains(&role)
    }

    /// 민감 정보를 제외한 계정 정보 프로젝션을 반환합니다.
    pub fn info(&self) -> AccountInfo {
        AccountInfo {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            fullname: self.fullname.clone(),
            avatar: self.avatar.clone(),
            gender: self.gender.clone(),
            roles: self.roles.clone(),
        }
    }
}

/// 클라이언트에 노출 가능한 계정 정보.
///
/// 비밀번호 해시를 구조적으로 포함할 수 없습니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountInfo {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub phone: String,
    pub fullname: Option<String>,
    pub avatar: Option<String>,
    pub gender: Option<String>,
    pub roles: Vec<RoleName>,
}

/// 계정 생성 입력.
///
/// 비밀번호는 이미 해싱된 형태로만 전달됩니다. 등록 파이프라인이
/// 해싱 직후 평문을 폐기하므로 이 타입에 평문 필드는 존재하지 않습니다.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub phone: String,
    pub password_hash: String,
    pub fullname: Option<String>,
    pub avatar: Option<String>,
    pub gender: Option<String>,
    pub roles: Vec<RoleName>,
}
