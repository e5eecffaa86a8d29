use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use models::{cpl, kurikulum};

use crate::errors::ServiceError;

#[derive(Debug, Default, Clone)]
pub struct CplUpdate {
    pub deskripsi: Option<String>,
    pub kategori: Option<String>,
    pub urutan: Option<Option<i32>>,
    pub is_active: Option<bool>,
}

/// Create a program learning outcome under an existing curriculum.
pub async fn create_cpl(
    db: &DatabaseConnection,
    id_kurikulum: Uuid,
    kode_cpl: &str,
    deskripsi: &str,
    kategori: &str,
    urutan: Option<i32>,
) -> Result<cpl::Model, ServiceError> {
    let k = kurikulum::Entity::find_by_id(id_kurikulum)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    if k.is_none() {
        return Err(ServiceError::not_found("kurikulum"));
    }

    let existing = cpl::Entity::find()
        .filter(cpl::Column::IdKurikulum.eq(id_kurikulum))
        .filter(cpl::Column::KodeCpl.eq(kode_cpl.to_string()))
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    if existing.is_some() {
        return Err(ServiceError::Conflict("kode_cpl already exists in this kurikulum".into()));
    }

    let created = cpl::create(db, id_kurikulum, kode_cpl, deskripsi, kategori, urutan).await?;
    Ok(created)
}

pub async fn get_cpl(db: &DatabaseConnection, id: Uuid) -> Result<Option<cpl::Model>, ServiceError> {
    Ok(cpl::Entity::find_by_id(id).one(db).await.map_err(|e| ServiceError::Db(e.to_string()))?)
}

/// List outcomes ordered by `urutan`, with optional filters.
pub async fn list_cpl(
    db: &DatabaseConnection,
    id_kurikulum: Option<Uuid>,
    kategori: Option<&str>,
    is_active: Option<bool>,
) -> Result<Vec<cpl::Model>, ServiceError> {
    let mut query = cpl::Entity::find();
    if let Some(k) = id_kurikulum {
        query = query.filter(cpl::Column::IdKurikulum.eq(k));
    }
    if let Some(kat) = kategori {
        query = query.filter(cpl::Column::Kategori.eq(kat.to_string()));
    }
    if let Some(active) = is_active {
        query = query.filter(cpl::Column::IsActive.eq(active));
    }
    let rows = query
        .order_by_asc(cpl::Column::Urutan)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(rows)
}

pub async fn update_cpl(db: &DatabaseConnection, id: Uuid, changes: CplUpdate) -> Result<cpl::Model, ServiceError> {
    let found = cpl::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("cpl"))?;
    let mut am: cpl::ActiveModel = found.into();
    if let Some(d) = changes.deskripsi {
        if d.trim().is_empty() {
            return Err(ServiceError::Validation("deskripsi required".into()));
        }
        am.deskripsi = Set(d);
    }
    if let Some(kat) = changes.kategori {
        cpl::validate_kategori(&kat)?;
        am.kategori = Set(kat);
    }
    if let Some(u) = changes.urutan { am.urutan = Set(u); }
    if let Some(a) = changes.is_active { am.is_active = Set(a); }
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(updated)
}

/// Delete is a soft delete; the row survives with `is_active = false`.
pub async fn delete_cpl(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
    get_cpl(db, id).await?.ok_or_else(|| ServiceError::not_found("cpl"))?;
    cpl::soft_delete(db, id).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;

    #[tokio::test]
    async fn cpl_crud_and_duplicate_kode() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
        let db = get_db().await?;

        let pid = format!("P{}", &Uuid::new_v4().simple().to_string()[..8]);
        let p = models::prodi::create(&db, &pid, "Informatika", Some("S1")).await?;
        let k = models::kurikulum::create(&db, &p.id_prodi, "K2024", "Kurikulum 2024", 2024, None).await?;

        let c = create_cpl(&db, k.id, "CPL-01", "Menguasai konsep teoritis", "pengetahuan", Some(1)).await?;
        assert!(c.is_active);

        let dup = create_cpl(&db, k.id, "CPL-01", "Lain", "sikap", Some(2)).await;
        assert!(matches!(dup, Err(ServiceError::Conflict(_))));

        let updated = update_cpl(&db, c.id, CplUpdate { kategori: Some("sikap".into()), ..Default::default() }).await?;
        assert_eq!(updated.kategori, "sikap");

        delete_cpl(&db, c.id).await?;
        let after = get_cpl(&db, c.id).await?.unwrap();
        assert!(!after.is_active);

        cpl::Entity::delete_by_id(c.id).exec(&db).await?;
        kurikulum::Entity::delete_by_id(k.id).exec(&db).await?;
        models::prodi::Entity::delete_by_id(p.id_prodi).exec(&db).await?;
        Ok(())
    }
}
