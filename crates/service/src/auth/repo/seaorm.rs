use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use uuid::Uuid;

use crate::auth::domain::{AuthUser, Credentials};
use crate::auth::errors::AuthError;
use crate::auth::repository::{AuthRepository, NewUser};

pub struct SeaOrmAuthRepository {
    pub db: DatabaseConnection,
}

fn to_auth_user(u: models::user::Model) -> AuthUser {
    AuthUser {
        id: u.id,
        username: u.username,
        email: u.email,
        user_type: u.user_type,
        ref_id: u.ref_id,
        is_active: u.is_active,
    }
}

#[async_trait::async_trait]
impl AuthRepository for SeaOrmAuthRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<AuthUser>, AuthError> {
        let res = models::user::Entity::find()
            .filter(models::user::Column::Username.eq(username.to_string()))
            .one(&self.db)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;
        Ok(res.map(to_auth_user))
    }

    async fn email_taken(&self, email: &str) -> Result<bool, AuthError> {
        let res = models::user::Entity::find()
            .filter(models::user::Column::Email.eq(email.to_string()))
            .one(&self.db)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;
        Ok(res.is_some())
    }

    async fn create_user(&self, input: NewUser) -> Result<AuthUser, AuthError> {
        let created = models::user::create(
            &self.db,
            &input.username,
            &input.email,
            &input.password_hash,
            &input.user_type,
            input.ref_id.as_deref(),
        )
        .await
        .map_err(|e| AuthError::Validation(e.to_string()))?;
        Ok(to_auth_user(created))
    }

    async fn get_credentials(&self, username: &str) -> Result<Option<Credentials>, AuthError> {
        let res = models::user::Entity::find()
            .filter(models::user::Column::Username.eq(username.to_string()))
            .one(&self.db)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;
        Ok(res.map(|u| {
            let hash = u.password_hash.clone();
            Credentials { user: to_auth_user(u), password_hash: hash }
        }))
    }

    async fn touch_last_login(&self, user_id: Uuid) -> Result<(), AuthError> {
        models::user::touch_last_login(&self.db, user_id)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))
    }
}
