use std::sync::Arc;

use argon2::{Argon2, password_hash::{PasswordHasher, PasswordVerifier, SaltString}, PasswordHash};
use rand::rngs::OsRng;
use tracing::{debug, info, instrument};

use super::domain::{AuthSession, AuthUser, LoginInput, RegisterInput};
use super::errors::AuthError;
use super::repository::{AuthRepository, NewUser};
use super::token::{self, TokenWindows};

/// Auth service configuration
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: Option<String>,
    pub windows: TokenWindows,
}

impl Default for AuthConfig {
    fn default() -> Self { Self { jwt_secret: None, windows: TokenWindows::default() } }
}

/// Auth business service independent of web framework
pub struct AuthService<R: AuthRepository> {
    repo: Arc<R>,
    cfg: AuthConfig,
}

impl<R: AuthRepository> AuthService<R> {
    pub fn new(repo: Arc<R>, cfg: AuthConfig) -> Self { Self { repo, cfg } }

    /// Register a new account with a hashed password.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, repository::mock::MockAuthRepository};
    /// use service::auth::domain::RegisterInput;
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAuthRepository::default());
    /// let svc = AuthService::new(repo, AuthConfig::default());
    /// let input = RegisterInput { username: "budi".into(), email: "budi@kampus.ac.id".into(), password: "Secret123".into(), user_type: "dosen".into(), ref_id: None };
    /// let user = tokio_test::block_on(svc.register(input)).unwrap();
    /// assert_eq!(user.username, "budi");
    /// ```
    #[instrument(skip(self, input), fields(username = %input.username, user_type = %input.user_type))]
    pub async fn register(&self, input: RegisterInput) -> Result<AuthUser, AuthError> {
        if input.password.len() < 8 {
            return Err(AuthError::Validation("password too short (>=8)".into()));
        }
        if !models::user::USER_TYPES.contains(&input.user_type.as_str()) {
            return Err(AuthError::Validation(format!("invalid user_type: {}", input.user_type)));
        }
        if let Some(existing) = self.repo.find_by_username(&input.username).await? {
            debug!("username taken: {}", existing.username);
            return Err(AuthError::Conflict);
        }
        if self.repo.email_taken(&input.email).await? {
            return Err(AuthError::Conflict);
        }

        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(input.password.as_bytes(), &salt)
            .map_err(|e| AuthError::HashError(e.to_string()))?
            .to_string();

        let user = self.repo
            .create_user(NewUser {
                username: input.username,
                email: input.email,
                password_hash: hash,
                user_type: input.user_type,
                ref_id: input.ref_id,
            })
            .await?;
        info!(user_id = %user.id, username = %user.username, user_type = %user.user_type, "user_registered");
        Ok(user)
    }

    /// Authenticate a user and issue access + refresh tokens.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, repository::mock::MockAuthRepository};
    /// use service::auth::domain::{RegisterInput, LoginInput};
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAuthRepository::default());
    /// let svc = AuthService::new(repo.clone(), AuthConfig { jwt_secret: Some("secret".into()), ..Default::default() });
    /// let _ = tokio_test::block_on(svc.register(RegisterInput { username: "siti".into(), email: "siti@kampus.ac.id".into(), password: "Passw0rd".into(), user_type: "mahasiswa".into(), ref_id: None }));
    /// let session = tokio_test::block_on(svc.login(LoginInput { username: "siti".into(), password: "Passw0rd".into() })).unwrap();
    /// assert_eq!(session.user.username, "siti");
    /// assert!(session.access_token.is_some());
    /// assert!(session.refresh_token.is_some());
    /// ```
    #[instrument(skip(self, input), fields(username = %input.username))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, AuthError> {
        let cred = self.repo
            .get_credentials(&input.username)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        let parsed = PasswordHash::new(&cred.password_hash).map_err(|e| AuthError::HashError(e.to_string()))?;
        if Argon2::default().verify_password(input.password.as_bytes(), &parsed).is_err() {
            return Err(AuthError::Unauthorized);
        }
        if !cred.user.is_active {
            return Err(AuthError::Inactive);
        }

        self.repo.touch_last_login(cred.user.id).await?;
        let session = self.issue_session(cred.user)?;
        info!(user_id = %session.user.id, username = %session.user.username, "user_logged_in");
        Ok(session)
    }

    /// Exchange a refresh token for a fresh token pair.
    #[instrument(skip(self, refresh_token))]
    pub async fn refresh(&self, refresh_token: &str) -> Result<AuthSession, AuthError> {
        let secret = self.cfg.jwt_secret.as_deref()
            .ok_or_else(|| AuthError::TokenError("no jwt secret configured".into()))?;
        let claims = token::decode_token(secret, refresh_token)?;
        if !claims.is_refresh() {
            return Err(AuthError::TokenError("not a refresh token".into()));
        }
        let user = self.repo
            .find_by_username(&claims.sub)
            .await?
            .ok_or(AuthError::Unauthorized)?;
        if !user.is_active {
            return Err(AuthError::Inactive);
        }
        self.issue_session(user)
    }

    /// Look up the account behind a set of verified access-token claims.
    pub async fn current_user(&self, username: &str) -> Result<AuthUser, AuthError> {
        let user = self.repo
            .find_by_username(username)
            .await?
            .ok_or(AuthError::Unauthorized)?;
        if !user.is_active {
            return Err(AuthError::Inactive);
        }
        Ok(user)
    }

    fn issue_session(&self, user: AuthUser) -> Result<AuthSession, AuthError> {
        let (mut access, mut refresh) = (None, None);
        if let Some(secret) = &self.cfg.jwt_secret {
            let uid = user.id.to_string();
            access = Some(token::issue_access_token(secret, &user.username, &uid, &user.user_type, self.cfg.windows)?);
            refresh = Some(token::issue_refresh_token(secret, &user.username, &uid, &user.user_type, self.cfg.windows)?);
        }
        Ok(AuthSession { user, access_token: access, refresh_token: refresh })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::repository::mock::MockAuthRepository;

    fn svc() -> AuthService<MockAuthRepository> {
        AuthService::new(
            Arc::new(MockAuthRepository::default()),
            AuthConfig { jwt_secret: Some("unit-secret".into()), ..Default::default() },
        )
    }

    fn register_input(username: &str) -> RegisterInput {
        RegisterInput {
            username: username.into(),
            email: format!("{}@kampus.ac.id", username),
            password: "Passw0rd!".into(),
            user_type: "dosen".into(),
            ref_id: None,
        }
    }

    #[tokio::test]
    async fn register_rejects_short_password() {
        let svc = svc();
        let mut input = register_input("budi");
        input.password = "short".into();
        assert!(matches!(svc.register(input).await, Err(AuthError::Validation(_))));
    }

    #[tokio::test]
    async fn register_rejects_unknown_role() {
        let svc = svc();
        let mut input = register_input("budi");
        input.user_type = "rektor".into();
        assert!(matches!(svc.register(input).await, Err(AuthError::Validation(_))));
    }

    #[tokio::test]
    async fn duplicate_username_conflicts() {
        let svc = svc();
        svc.register(register_input("budi")).await.unwrap();
        let mut second = register_input("budi");
        second.email = "other@kampus.ac.id".into();
        assert!(matches!(svc.register(second).await, Err(AuthError::Conflict)));
    }

    #[tokio::test]
    async fn login_with_wrong_password_fails() {
        let svc = svc();
        svc.register(register_input("budi")).await.unwrap();
        let res = svc.login(LoginInput { username: "budi".into(), password: "wrong".into() }).await;
        assert!(matches!(res, Err(AuthError::Unauthorized)));
    }

    #[tokio::test]
    async fn refresh_rejects_access_token() {
        let svc = svc();
        svc.register(register_input("budi")).await.unwrap();
        let session = svc.login(LoginInput { username: "budi".into(), password: "Passw0rd!".into() }).await.unwrap();
        let access = session.access_token.unwrap();
        assert!(matches!(svc.refresh(&access).await, Err(AuthError::TokenError(_))));
    }

    #[tokio::test]
    async fn refresh_issues_new_pair() {
        let svc = svc();
        svc.register(register_input("budi")).await.unwrap();
        let session = svc.login(LoginInput { username: "budi".into(), password: "Passw0rd!".into() }).await.unwrap();
        let refresh = session.refresh_token.unwrap();
        let renewed = svc.refresh(&refresh).await.unwrap();
        assert!(renewed.access_token.is_some());
        assert!(renewed.refresh_token.is_some());
        assert_eq!(renewed.user.username, "budi");
    }
}
