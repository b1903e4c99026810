use sqlx::PgPool;

use crate::auth::password::{hash_password, verify_password};
use crate::models::user::{Credentials, NewUser, User, UserUpdate};
use crate::utils::error::{is_unique_violation, AppError};

const USER_COLUMNS: &str = "id, name, email, password_hash, created_at, updated_at";

/// User CRUD plus credential checks over an injected pool. The unique
/// constraint on users.email is the real uniqueness guarantee; the lookups
/// here are a fast path that produces a friendlier error.
#[derive(Clone)]
pub struct UserService {
    pool: PgPool,
}

impl UserService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, payload: NewUser) -> Result<User, AppError> {
        let (name, email, password) = registration_fields(payload)?;

        if self.email_taken(&email, None).await? {
            return Err(AppError::Conflict("Email already exists".to_string()));
        }

        let password_hash = hash_password(&password)?;

        let inserted = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (name, email, password_hash) \
             VALUES ($1, $2, $3) RETURNING {USER_COLUMNS}"
        ))
        .bind(&name)
        .bind(&email)
        .bind(&password_hash)
        .fetch_one(&self.pool)
        .await;

        match inserted {
            Ok(user) => Ok(user),
            // Lost the race against a concurrent registration
            Err(e) if is_unique_violation(&e) => {
                Err(AppError::Conflict("Email already exists".to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn login(&self, credentials: Credentials) -> Result<User, AppError> {
        let user = self
            .find_by_email(&credentials.email)
            .await?
            .ok_or_else(|| AppError::Auth("User does not exist".to_string()))?;

        if !verify_password(&credentials.password, &user.password_hash)? {
            return Err(AppError::Auth("Invalid credentials".to_string()));
        }

        Ok(user)
    }

    pub async fn list(&self) -> Result<Vec<User>, AppError> {
        let users =
            sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY id"))
                .fetch_all(&self.pool)
                .await?;
        Ok(users)
    }

    pub async fn find(&self, id: i64) -> Result<Option<User>, AppError> {
        let user =
            sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(user)
    }

    pub async fn update(&self, id: i64, payload: UserUpdate) -> Result<User, AppError> {
        if let Some(email) = payload.email.as_deref() {
            if self.email_taken(email, Some(id)).await? {
                return Err(AppError::Conflict("Email already exists".to_string()));
            }
        }

        // A plaintext password in the payload is re-hashed, never stored raw
        let password_hash = match payload.password.as_deref() {
            Some(plaintext) => Some(hash_password(plaintext)?),
            None => None,
        };

        let updated = sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET \
                 name = COALESCE($2, name), \
                 email = COALESCE($3, email), \
                 password_hash = COALESCE($4, password_hash), \
                 updated_at = now() \
             WHERE id = $1 RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .bind(&payload.name)
        .bind(&payload.email)
        .bind(&password_hash)
        .fetch_optional(&self.pool)
        .await;

        match updated {
            Ok(Some(user)) => Ok(user),
            Ok(None) => Err(AppError::NotFound("User does not exist".to_string())),
            Err(e) if is_unique_violation(&e) => {
                Err(AppError::Conflict("Email already exists".to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Owned events go with the user via the ON DELETE CASCADE foreign key.
    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("User does not exist".to_string()));
        }
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn email_taken(&self, email: &str, exclude: Option<i64>) -> Result<bool, AppError> {
        let existing: Option<(i64,)> = sqlx::query_as("SELECT id FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(match (existing, exclude) {
            (Some((found,)), Some(own_id)) => found != own_id,
            (Some(_), None) => true,
            (None, _) => false,
        })
    }
}

fn registration_fields(payload: NewUser) -> Result<(String, String, String), AppError> {
    let name = payload.name.filter(|s| !s.is_empty());
    let email = payload.email.filter(|s| !s.is_empty());
    let password = payload.password.filter(|s| !s.is_empty());

    match (name, email, password) {
        (Some(name), Some(email), Some(password)) => Ok((name, email, password)),
        _ => Err(AppError::Validation(
            "All fields are required: name, email and password".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(name: &str, email: &str, password: &str) -> NewUser {
        let some = |s: &str| (!s.is_empty()).then(|| s.to_string());
        NewUser {
            name: some(name),
            email: some(email),
            password: some(password),
        }
    }

    #[test]
    fn registration_accepts_complete_payload() {
        let fields = registration_fields(payload("Ada", "ada@example.com", "pw")).unwrap();
        assert_eq!(fields.0, "Ada");
        assert_eq!(fields.1, "ada@example.com");
    }

    #[test]
    fn registration_rejects_missing_or_empty_fields() {
        for p in [
            payload("", "ada@example.com", "pw"),
            payload("Ada", "", "pw"),
            payload("Ada", "ada@example.com", ""),
            NewUser {
                name: None,
                email: None,
                password: None,
            },
        ] {
            assert!(matches!(
                registration_fields(p),
                Err(AppError::Validation(_))
            ));
        }
    }
}
