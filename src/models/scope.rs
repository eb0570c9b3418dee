//! Which schools a caller may see, derived from their role

use super::{enums::Role, school::School, user::UserClaims};
use crate::error::{AppError, AppResult};

/// Visibility of schools for one caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchoolScope {
    /// Super admin
    All,
    /// State admin
    State(String),
    /// PPD admin
    District(String),
    /// School admin: schools owned by this user
    Owner(i32),
    /// Students and callers missing their scoping field see nothing
    Nothing,
}

impl SchoolScope {
    pub fn for_claims(claims: &UserClaims) -> Self {
        let non_empty = |v: &Option<String>| v.as_deref().filter(|s| !s.trim().is_empty()).map(str::to_string);
        match claims.role {
            Role::SuperAdmin => SchoolScope::All,
            Role::StateAdmin => non_empty(&claims.state)
                .map(SchoolScope::State)
                .unwrap_or(SchoolScope::Nothing),
            Role::PpdAdmin => non_empty(&claims.district)
                .map(SchoolScope::District)
                .unwrap_or(SchoolScope::Nothing),
            Role::SchoolAdmin => SchoolScope::Owner(claims.user_id),
            Role::Student => SchoolScope::Nothing,
        }
    }

    pub fn permits(&self, school: &School) -> bool {
        match self {
            SchoolScope::All => true,
            SchoolScope::State(state) => school.state.eq_ignore_ascii_case(state),
            SchoolScope::District(district) => school.district.eq_ignore_ascii_case(district),
            SchoolScope::Owner(user_id) => school.user_id == Some(*user_id),
            SchoolScope::Nothing => false,
        }
    }

    /// Error unless the school is visible; hidden schools look like missing ones
    pub fn ensure(&self, school: &School) -> AppResult<()> {
        if self.permits(school) {
            Ok(())
        } else {
            Err(AppError::NotFound("School not found.".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(role: Role, state: Option<&str>, district: Option<&str>) -> UserClaims {
        UserClaims {
            sub: "x@moe.gov.my".to_string(),
            user_id: 5,
            role,
            state: state.map(str::to_string),
            district: district.map(str::to_string),
            exp: 0,
            iat: 0,
        }
    }

    fn school(state: &str, district: &str, owner: Option<i32>) -> School {
        School {
            id: 1,
            code: "JBA1234".to_string(),
            name: "SK Taman Universiti".to_string(),
            officer_name: None,
            district: district.to_string(),
            state: state.to_string(),
            user_id: owner,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_scope_per_role() {
        assert_eq!(SchoolScope::for_claims(&claims(Role::SuperAdmin, None, None)), SchoolScope::All);
        assert_eq!(
            SchoolScope::for_claims(&claims(Role::PpdAdmin, Some("Johor"), Some("Kluang"))),
            SchoolScope::District("Kluang".to_string())
        );
        assert_eq!(
            SchoolScope::for_claims(&claims(Role::StateAdmin, Some("Johor"), None)),
            SchoolScope::State("Johor".to_string())
        );
        assert_eq!(
            SchoolScope::for_claims(&claims(Role::SchoolAdmin, None, None)),
            SchoolScope::Owner(5)
        );
    }

    #[test]
    fn test_ppd_without_district_sees_nothing() {
        let scope = SchoolScope::for_claims(&claims(Role::PpdAdmin, Some("Johor"), Some(" ")));
        assert_eq!(scope, SchoolScope::Nothing);
        assert!(!scope.permits(&school("Johor", "Kluang", None)));
    }

    #[test]
    fn test_permits() {
        let s = school("Johor", "Kluang", Some(5));
        assert!(SchoolScope::District("kluang".to_string()).permits(&s));
        assert!(!SchoolScope::District("Batu Pahat".to_string()).permits(&s));
        assert!(SchoolScope::State("Johor".to_string()).permits(&s));
        assert!(SchoolScope::Owner(5).permits(&s));
        assert!(!SchoolScope::Owner(6).permits(&s));
        assert!(matches!(
            SchoolScope::Owner(6).ensure(&s),
            Err(AppError::NotFound(_))
        ));
    }
}
