use crate::auth::{password, TokenService};
use crate::database::models::User;
use crate::database::repository::UserRepository;
use crate::error::ApiError;

/// Account management and credential checks. Sits between the handlers
/// and the repository so the handlers never see sqlx or bcrypt types.
#[derive(Clone)]
pub struct UserService {
    users: UserRepository,
    tokens: TokenService,
}

impl UserService {
    pub fn new(users: UserRepository, tokens: TokenService) -> Self {
        Self { users, tokens }
    }

    /// Create an account with a hashed password. Duplicate emails are a
    /// 409: the pre-check catches the common case, and the unique index
    /// catches a concurrent registration that slips past it.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        plain_password: &str,
    ) -> Result<User, ApiError> {
        if self.users.get_by_email(email).await?.is_some() {
            return Err(ApiError::conflict("email already exists"));
        }

        let password_hash = password::hash_password(plain_password)?;
        match self.users.create(username, email, &password_hash, "user").await {
            Ok(user) => Ok(user),
            Err(err) if is_unique_violation(&err) => {
                Err(ApiError::conflict("email already exists"))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Verify credentials and mint a session token. Unknown email and
    /// wrong password produce the same response so the endpoint does not
    /// leak which emails exist.
    pub async fn login(&self, email: &str, plain_password: &str) -> Result<(String, User), ApiError> {
        let user = self
            .users
            .get_by_email(email)
            .await?
            .ok_or_else(|| ApiError::unauthorized("invalid credentials"))?;

        if !password::verify_password(plain_password, &user.password_hash) {
            return Err(ApiError::unauthorized("invalid credentials"));
        }

        let token = self.issue_token(&user)?;
        Ok((token, user))
    }

    pub fn issue_token(&self, user: &User) -> Result<String, ApiError> {
        Ok(self.tokens.issue(user.id, &user.email)?)
    }

    pub fn token_expires_in(&self) -> i64 {
        self.tokens.expires_in_secs()
    }

    pub async fn get_user(&self, id: i32) -> Result<User, ApiError> {
        self.users
            .get_by_id(id)
            .await?
            .ok_or_else(|| ApiError::not_found("user not found"))
    }

    pub async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        Ok(self.users.list().await?)
    }

    pub async fn delete_user(&self, id: i32) -> Result<(), ApiError> {
        if !self.users.delete(id).await? {
            return Err(ApiError::not_found("user not found"));
        }
        Ok(())
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}
