//! User model, JWT claims and role checks

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError, ValidationErrors};

use super::enums::Role;
use crate::error::AppError;

/// Internal row structure for database queries (role as stored smallint)
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    id: i32,
    name: String,
    email: String,
    password: Option<String>,
    role: i16,
    state: Option<String>,
    district: Option<String>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl TryFrom<UserRow> for User {
    type Error = AppError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: row.id,
            name: row.name,
            email: row.email,
            password: row.password,
            role: Role::try_from(row.role).map_err(AppError::Internal)?,
            state: row.state,
            district: row.district,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Full user model
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    /// Hashed password (argon2)
    #[serde(skip_serializing)]
    pub password: Option<String>,
    pub role: Role,
    pub state: Option<String>,
    pub district: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// User query parameters
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct UserQuery {
    /// Search in name or email
    pub name: Option<String>,
    /// Restrict to one role (1-5)
    pub role: Option<i16>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Reject a password whose confirmation is missing or different
pub fn check_password_confirmation(
    password: Option<&str>,
    confirmation: Option<&str>,
) -> Result<(), ValidationErrors> {
    match password {
        Some(p) if Some(p) != confirmation => {
            let mut errors = ValidationErrors::new();
            let mut err = ValidationError::new("confirmed");
            err.message = Some("The password confirmation does not match.".into());
            errors.add("password", err);
            Err(errors)
        }
        _ => Ok(()),
    }
}

/// Create user request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUser {
    #[validate(length(min = 1, max = 255, message = "The name field is required."))]
    pub name: String,
    #[validate(email(message = "The email must be a valid email address."))]
    pub email: String,
    #[validate(length(min = 8, message = "The password must be at least 8 characters."))]
    pub password: String,
    pub password_confirmation: String,
    #[validate(length(min = 1, max = 255, message = "The state field is required."))]
    pub state: String,
    #[validate(length(min = 1, max = 255, message = "The district field is required."))]
    pub district: String,
    #[validate(range(min = 1, max = 5, message = "The selected role is invalid."))]
    pub role: i16,
}

/// Update user request; a missing password keeps the current one
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateUser {
    #[validate(length(min = 1, max = 255, message = "The name field is required."))]
    pub name: String,
    #[validate(email(message = "The email must be a valid email address."))]
    pub email: String,
    #[validate(length(min = 8, message = "The password must be at least 8 characters."))]
    pub password: Option<String>,
    pub password_confirmation: Option<String>,
    #[validate(length(min = 1, max = 255, message = "The state field is required."))]
    pub state: String,
    #[validate(length(min = 1, max = 255, message = "The district field is required."))]
    pub district: String,
    #[validate(range(min = 1, max = 5, message = "The selected role is invalid."))]
    pub role: i16,
}

/// JWT Claims for authenticated users
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    pub sub: String,
    pub user_id: i32,
    pub role: Role,
    pub state: Option<String>,
    pub district: Option<String>,
    pub exp: i64,
    pub iat: i64,
}

impl UserClaims {
    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }

    /// Require one of the given roles
    pub fn require_role(&self, allowed: &[Role]) -> Result<(), AppError> {
        if allowed.contains(&self.role) {
            Ok(())
        } else {
            Err(AppError::Authorization(format!(
                "{} is not allowed to perform this action",
                self.role
            )))
        }
    }

    pub fn require_super_admin(&self) -> Result<(), AppError> {
        self.require_role(&[Role::SuperAdmin])
    }

    pub fn require_state_admin(&self) -> Result<(), AppError> {
        self.require_role(&[Role::StateAdmin])
    }

    pub fn require_ppd_admin(&self) -> Result<(), AppError> {
        self.require_role(&[Role::PpdAdmin])
    }

    pub fn require_school_admin(&self) -> Result<(), AppError> {
        self.require_role(&[Role::SchoolAdmin])
    }

    pub fn require_student(&self) -> Result<(), AppError> {
        self.require_role(&[Role::Student])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(role: Role) -> UserClaims {
        UserClaims {
            sub: "officer@moe.gov.my".to_string(),
            user_id: 7,
            role,
            state: Some("Johor".to_string()),
            district: Some("Johor Bahru".to_string()),
            exp: Utc::now().timestamp() + 3600,
            iat: Utc::now().timestamp(),
        }
    }

    #[test]
    fn test_token_roundtrip() {
        let c = claims(Role::PpdAdmin);
        let token = c.create_token("secret").unwrap();
        let parsed = UserClaims::from_token(&token, "secret").unwrap();
        assert_eq!(parsed.user_id, 7);
        assert_eq!(parsed.role, Role::PpdAdmin);
        assert_eq!(parsed.district.as_deref(), Some("Johor Bahru"));
        assert!(UserClaims::from_token(&token, "other").is_err());
    }

    #[test]
    fn test_role_guards() {
        let c = claims(Role::SchoolAdmin);
        assert!(c.require_school_admin().is_ok());
        assert!(c.require_ppd_admin().is_err());
        assert!(c.require_role(&[Role::PpdAdmin, Role::SchoolAdmin]).is_ok());
    }

    #[test]
    fn test_create_user_validation() {
        let user = CreateUser {
            name: "Aminah".to_string(),
            email: "not-an-email".to_string(),
            password: "short".to_string(),
            password_confirmation: "different".to_string(),
            state: "Johor".to_string(),
            district: String::new(),
            role: 9,
        };
        let errors = user.validate().unwrap_err();
        let fields = errors.field_errors();
        for field in ["email", "password", "district", "role"] {
            assert!(fields.contains_key(field), "missing error for {}", field);
        }
        assert!(!fields.contains_key("name"));
    }

    #[test]
    fn test_update_user_without_password_is_valid() {
        let user = UpdateUser {
            name: "Aminah".to_string(),
            email: "aminah@moe.gov.my".to_string(),
            password: None,
            password_confirmation: None,
            state: "Johor".to_string(),
            district: "Kluang".to_string(),
            role: 3,
        };
        assert!(user.validate().is_ok());
    }

    #[test]
    fn test_password_confirmation() {
        assert!(check_password_confirmation(None, None).is_ok());
        assert!(check_password_confirmation(Some("secret123"), Some("secret123")).is_ok());
        let errors = check_password_confirmation(Some("secret123"), Some("secret124")).unwrap_err();
        assert!(errors.field_errors().contains_key("password"));
        assert!(check_password_confirmation(Some("secret123"), None).is_err());
    }
}
