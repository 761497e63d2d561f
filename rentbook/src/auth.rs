use std::sync::{Arc, OnceLock};

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use chrono::Utc;
use password_hash::SaltString;
use rand_core::OsRng;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set,
};

use crate::entity::app_user;
use crate::validation::ValidationError;

/// Error type for the credential store.
#[derive(Debug)]
pub enum AuthError {
    Validation(ValidationError),
    DuplicateEmail,
    /// Unknown email and wrong password both map here.
    InvalidCredentials,
    NotFound,
    Db(sea_orm::DbErr),
    Hash(String),
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::Validation(e) => write!(f, "{e}"),
            AuthError::DuplicateEmail => write!(f, "Email already registered"),
            AuthError::InvalidCredentials => write!(f, "Invalid credentials"),
            AuthError::NotFound => write!(f, "User not found"),
            AuthError::Db(e) => write!(f, "Database error: {e}"),
            AuthError::Hash(e) => write!(f, "Hash error: {e}"),
        }
    }
}

impl std::error::Error for AuthError {}

impl From<sea_orm::DbErr> for AuthError {
    fn from(e: sea_orm::DbErr) -> Self {
        AuthError::Db(e)
    }
}

/// One-way password hashing.
pub trait Hasher: Send + Sync {
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// `false` for a mismatch and for a hash that cannot be parsed.
    fn verify(&self, password: &str, hash: &str) -> bool;
}

/// Argon2id with a random salt per hash, stored as a PHC string.
#[derive(Debug, Default, Clone, Copy)]
pub struct Argon2Hasher;

impl Hasher for Argon2Hasher {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AuthError::Hash(e.to_string()))?
            .to_string();
        Ok(hash)
    }

    fn verify(&self, password: &str, hash: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(hash) else {
            return false;
        };
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }
}

/// Owns user identities and checks passwords against their stored hashes.
pub struct CredentialStore {
    db: DatabaseConnection,
    hasher: Arc<dyn Hasher>,
    /// Hash verified against when the email is unknown, so both login
    /// failures cost one hash verification.
    dummy_hash: OnceLock<Option<String>>,
}

impl CredentialStore {
    pub fn new(db: DatabaseConnection, hasher: Arc<dyn Hasher>) -> Self {
        Self {
            db,
            hasher,
            dummy_hash: OnceLock::new(),
        }
    }

    /// Create a user. Email, password and name must all be non-blank.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<app_user::Model, AuthError> {
        let mut errs = ValidationError::default();
        for (field, value) in [("email", email), ("password", password), ("name", name)] {
            if value.trim().is_empty() {
                errs.missing.push(field);
            }
        }
        errs.into_result().map_err(AuthError::Validation)?;

        let existing = app_user::Entity::find()
            .filter(app_user::Column::Email.eq(email))
            .one(&self.db)
            .await?;
        if existing.is_some() {
            return Err(AuthError::DuplicateEmail);
        }

        let password_hash = self.hasher.hash(password)?;

        app_user::ActiveModel {
            email: Set(email.to_owned()),
            name: Set(name.to_owned()),
            password_hash: Set(password_hash),
            created_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| {
            // Lost a race with a concurrent registration of the same email.
            let msg = e.to_string();
            if msg.contains("UNIQUE") || msg.contains("unique") {
                AuthError::DuplicateEmail
            } else {
                AuthError::Db(e)
            }
        })
    }

    /// Verify email/password. Never reveals whether the email exists.
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<app_user::Model, AuthError> {
        let user = app_user::Entity::find()
            .filter(app_user::Column::Email.eq(email))
            .one(&self.db)
            .await?;

        let Some(user) = user else {
            let dummy = self
                .dummy_hash
                .get_or_init(|| self.hasher.hash("rentbook-unknown-user").ok());
            if let Some(hash) = dummy {
                let _ = self.hasher.verify(password, hash);
            }
            return Err(AuthError::InvalidCredentials);
        };

        if !self.hasher.verify(password, &user.password_hash) {
            return Err(AuthError::InvalidCredentials);
        }

        Ok(user)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<app_user::Model, AuthError> {
        app_user::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AuthError::NotFound)
    }

    /// Return the total number of registered users.
    pub async fn count_users(&self) -> Result<u64, AuthError> {
        Ok(app_user::Entity::find().count(&self.db).await?)
    }
}
