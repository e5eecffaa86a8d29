use sea_orm::{entity::prelude::*, Set, DatabaseConnection};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors;

pub const USER_TYPES: &[&str] = &["admin", "kaprodi", "dosen", "mahasiswa"];

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub user_type: String,
    pub ref_id: Option<String>,
    pub is_active: bool,
    pub last_login: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef { panic!("no relations defined here") }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_username(username: &str) -> Result<(), errors::ModelError> {
    let u = username.trim();
    if u.is_empty() || u.len() > 50 {
        return Err(errors::ModelError::Validation("username must be 1..=50 chars".into()));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), errors::ModelError> {
    if !email.contains('@') || email.len() > 100 {
        return Err(errors::ModelError::Validation("invalid email".into()));
    }
    Ok(())
}

pub fn validate_user_type(user_type: &str) -> Result<(), errors::ModelError> {
    if !USER_TYPES.contains(&user_type) {
        return Err(errors::ModelError::Validation(format!("invalid user_type: {}", user_type)));
    }
    Ok(())
}

pub async fn create(
    db: &DatabaseConnection,
    username: &str,
    email: &str,
    password_hash: &str,
    user_type: &str,
    ref_id: Option<&str>,
) -> Result<Model, errors::ModelError> {
    validate_username(username)?;
    validate_email(email)?;
    validate_user_type(user_type)?;
    if password_hash.trim().is_empty() {
        return Err(errors::ModelError::Validation("password hash required".into()));
    }
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        username: Set(username.to_string()),
        email: Set(email.to_string()),
        password_hash: Set(password_hash.to_string()),
        user_type: Set(user_type.to_string()),
        ref_id: Set(ref_id.map(|s| s.to_string())),
        is_active: Set(true),
        last_login: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

pub async fn touch_last_login(db: &DatabaseConnection, id: Uuid) -> Result<(), errors::ModelError> {
    let mut found: ActiveModel = Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))?
        .ok_or_else(|| errors::ModelError::Validation("user not found".into()))?
        .into();
    found.last_login = Set(Some(Utc::now().into()));
    found.update(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_type_list_is_closed() {
        assert!(validate_user_type("kaprodi").is_ok());
        assert!(validate_user_type("superuser").is_err());
    }

    #[test]
    fn email_needs_at_sign() {
        assert!(validate_email("a@b.ac.id").is_ok());
        assert!(validate_email("not-an-email").is_err());
    }
}
