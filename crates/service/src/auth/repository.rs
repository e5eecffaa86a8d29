use async_trait::async_trait;
use uuid::Uuid;

use super::domain::{AuthUser, Credentials};
use super::errors::AuthError;

/// New account row, password already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub user_type: String,
    pub ref_id: Option<String>,
}

/// Repository abstraction for auth-related persistence.
#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<AuthUser>, AuthError>;
    async fn email_taken(&self, email: &str) -> Result<bool, AuthError>;
    async fn create_user(&self, input: NewUser) -> Result<AuthUser, AuthError>;

    async fn get_credentials(&self, username: &str) -> Result<Option<Credentials>, AuthError>;
    async fn touch_last_login(&self, user_id: Uuid) -> Result<(), AuthError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockAuthRepository {
        users: Mutex<HashMap<String, (AuthUser, String)>>, // key: username, value: (user, hash)
    }

    #[async_trait]
    impl AuthRepository for MockAuthRepository {
        async fn find_by_username(&self, username: &str) -> Result<Option<AuthUser>, AuthError> {
            let users = self.users.lock().unwrap();
            Ok(users.get(username).map(|(u, _)| u.clone()))
        }

        async fn email_taken(&self, email: &str) -> Result<bool, AuthError> {
            let users = self.users.lock().unwrap();
            Ok(users.values().any(|(u, _)| u.email == email))
        }

        async fn create_user(&self, input: NewUser) -> Result<AuthUser, AuthError> {
            let mut users = self.users.lock().unwrap();
            if users.contains_key(&input.username) {
                return Err(AuthError::Conflict);
            }
            let user = AuthUser {
                id: Uuid::new_v4(),
                username: input.username.clone(),
                email: input.email,
                user_type: input.user_type,
                ref_id: input.ref_id,
                is_active: true,
            };
            users.insert(input.username, (user.clone(), input.password_hash));
            Ok(user)
        }

        async fn get_credentials(&self, username: &str) -> Result<Option<Credentials>, AuthError> {
            let users = self.users.lock().unwrap();
            Ok(users.get(username).map(|(u, h)| Credentials { user: u.clone(), password_hash: h.clone() }))
        }

        async fn touch_last_login(&self, _user_id: Uuid) -> Result<(), AuthError> {
            Ok(())
        }
    }
}
