//! 역할 정의.
//!
//! 역할은 닫힌 열거형 {ADMIN, PM, USER}이며, 부트스트랩 시 한 번 생성되는
//! 참조 데이터입니다. 역할 간 계층은 없습니다: ADMIN이 USER 권한을
//! 암묵적으로 포함하지 않으며, 권한 검사는 항상 정확한 집합 멤버십입니다.

use serde::{Deserialize, Serialize};

/// 사용자 역할 이름.
///
/// 와이어 형식은 대문자 문자열("ADMIN", "PM", "USER")입니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoleName {
    /// 관리자
    Admin,
    /// 프로젝트 매니저
    Pm,
    /// 일반 사용자
    User,
}

impl RoleName {
    /// 시스템에 존재하는 모든 역할.
    pub const ALL: [RoleName; 3] = [RoleName::Admin, RoleName::Pm, RoleName::User];

    /// 문자열에서 역할 파싱 (대소문자 무시).
    ///
    /// 전함수(total function)입니다: 닫힌 열거형 밖의 이름은 `None`으로
    /// 표현되며, 이를 어떻게 다룰지는 호출자가 명시적으로 결정합니다
    /// (등록 파이프라인은 버리고, 역할 부여는 `RoleNotFound`로 실패).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Some(RoleName::Admin),
            "pm" => Some(RoleName::Pm),
            "user" => Some(RoleName::User),
            _ => None,
        }
    }

    /// 와이어 형식 문자열로 변환.
    pub fn as_str(&self) -> &'static str {
        match self {
            RoleName::Admin => "ADMIN",
            RoleName::Pm => "PM",
            RoleName::User => "USER",
        }
    }
}

impl std::fmt::Display for RoleName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(RoleName::parse("admin"), Some(RoleName::Admin));
        assert_eq!(RoleName::parse("ADMIN"), Some(RoleName::Admin));
        assert_eq!(RoleName::parse("Pm"), Some(RoleName::Pm));
        assert_eq!(RoleName::parse("user"), Some(RoleName::User));
        assert_eq!(RoleName::parse(" USER "), Some(RoleName::User));
    }

    #[test]
    fn parse_rejects_unknown_names() {
        assert_eq!(RoleName::parse("superuser"), None);
        assert_eq!(RoleName::parse(""), None);
        assert_eq!(RoleName::parse("admin1"), None);
    }

    #[test]
    fn wire_format_is_uppercase() {
        assert_eq!(RoleName::Admin.as_str(), "ADMIN");
        assert_eq!(RoleName::Pm.to_string(), "PM");

        let json = serde_json::to_string(&RoleName::User).unwrap();
        assert_eq!(json, "\"USER\"");

        let parsed: RoleName = serde_json::from_str("\"ADMIN\"").unwrap();
        assert_eq!(parsed, RoleName::Admin);
    }

    #[test]
    fn roundtrip_through_parse() {
        for role in RoleName::ALL {
            assert_eq!(RoleName::parse(role.as_str()), Some(role));
        }
    }
}
