//! Authentication and user management service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use validator::Validate;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::{
        enums::Role,
        user::{check_password_confirmation, CreateUser, UpdateUser, User, UserClaims, UserQuery},
    },
    repository::Repository,
};

const BAD_CREDENTIALS: &str = "These credentials do not match our records.";

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
    config: AuthConfig,
}

impl UsersService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Authenticate by email and password and return a JWT token
    pub async fn authenticate(&self, email: &str, password: &str) -> AppResult<(String, User)> {
        let user = self
            .repository
            .users_get_by_email(email.trim())
            .await?
            .ok_or_else(|| AppError::Authentication(BAD_CREDENTIALS.to_string()))?;

        if !self.verify_password(&user, password)? {
            return Err(AppError::Authentication(BAD_CREDENTIALS.to_string()));
        }

        let token = self.create_token_for_user(&user)?;
        tracing::info!(user_id = user.id, role = %user.role, "User logged in");
        Ok((token, user))
    }

    /// Token lifetime in seconds
    pub fn token_lifetime(&self) -> i64 {
        self.config.jwt_expiration_hours as i64 * 3600
    }

    fn create_token_for_user(&self, user: &User) -> AppResult<String> {
        let now = Utc::now().timestamp();
        let claims = UserClaims {
            sub: user.email.clone(),
            user_id: user.id,
            role: user.role,
            state: user.state.clone(),
            district: user.district.clone(),
            exp: now + self.token_lifetime(),
            iat: now,
        };

        claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    fn verify_password(&self, user: &User, password: &str) -> AppResult<bool> {
        if let Some(ref hash) = user.password {
            let parsed_hash = PasswordHash::new(hash)
                .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
            return Ok(Argon2::default()
                .verify_password(password.as_bytes(), &parsed_hash)
                .is_ok());
        }

        Ok(false)
    }

    /// Hash a password using Argon2
    pub fn hash_password(&self, password: &str) -> AppResult<String> {
        hash_password(password)
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<User> {
        self.repository.users_get_by_id(id).await
    }

    pub async fn search_users(&self, query: &UserQuery, limit: i64, offset: i64) -> AppResult<(Vec<User>, i64)> {
        self.repository.users_search(query, limit, offset).await
    }

    pub async fn create_user(&self, user: CreateUser) -> AppResult<User> {
        user.validate()?;
        check_password_confirmation(Some(&user.password), Some(&user.password_confirmation))?;

        if self.repository.users_email_exists(&user.email, None).await? {
            return Err(AppError::Conflict("The email has already been taken.".to_string()));
        }

        let hash = self.hash_password(&user.password)?;
        let created = self.repository.users_create(&user, &hash).await?;
        tracing::info!(user_id = created.id, role = %created.role, "User created");
        Ok(created)
    }

    pub async fn update_user(&self, id: i32, user: UpdateUser) -> AppResult<User> {
        user.validate()?;
        check_password_confirmation(user.password.as_deref(), user.password_confirmation.as_deref())?;

        if self.repository.users_email_exists(&user.email, Some(id)).await? {
            return Err(AppError::Conflict("The email has already been taken.".to_string()));
        }

        let hash = user
            .password
            .as_deref()
            .map(|password| self.hash_password(password))
            .transpose()?;
        let updated = self.repository.users_update(id, &user, hash.as_deref()).await?;
        tracing::info!(user_id = id, "User updated");
        Ok(updated)
    }

    /// Delete a user; an account cannot delete itself
    pub async fn delete_user(&self, id: i32, caller_id: i32) -> AppResult<()> {
        if id == caller_id {
            return Err(AppError::BadRequest("You cannot delete your own account.".to_string()));
        }
        self.repository.users_delete(id).await?;
        tracing::info!(user_id = id, "User deleted");
        Ok(())
    }

    /// Create the first super admin from configuration when the users table is empty
    pub async fn bootstrap_super_admin(&self) -> AppResult<Option<User>> {
        let (Some(email), Some(password)) = (
            self.config.bootstrap_email.as_deref(),
            self.config.bootstrap_password.as_deref(),
        ) else {
            return Ok(None);
        };

        if self.repository.users_count().await? > 0 {
            return Ok(None);
        }

        let user = CreateUser {
            name: "Super Admin".to_string(),
            email: email.to_string(),
            password: password.to_string(),
            password_confirmation: password.to_string(),
            state: "-".to_string(),
            district: "-".to_string(),
            role: Role::SuperAdmin.into(),
        };
        let created = self.create_user(user).await?;
        tracing::warn!(email = %created.email, "Bootstrapped super admin account");
        Ok(Some(created))
    }
}

/// Hash a password using Argon2 with a random salt
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_verifies_and_is_salted() {
        let first = hash_password("rahsia123").unwrap();
        let second = hash_password("rahsia123").unwrap();
        assert_ne!(first, second);

        let parsed = PasswordHash::new(&first).unwrap();
        assert!(Argon2::default().verify_password(b"rahsia123", &parsed).is_ok());
        assert!(Argon2::default().verify_password(b"salah", &parsed).is_err());
    }
}
