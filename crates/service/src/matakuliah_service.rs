use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use tracing::info;
use uuid::Uuid;

use models::{kurikulum, matakuliah};

use crate::errors::ServiceError;

#[derive(Debug, Default, Clone)]
pub struct MatakuliahUpdate {
    pub nama_mk: Option<String>,
    pub nama_mk_eng: Option<Option<String>>,
    pub sks: Option<i32>,
    pub semester: Option<i32>,
    pub rumpun: Option<Option<String>>,
    pub jenis_mk: Option<String>,
    pub is_active: Option<bool>,
}

/// Create a course. The key is `(kode_mk, id_kurikulum)`, so the same code
/// may already exist under a different curriculum.
#[allow(clippy::too_many_arguments)]
pub async fn create_matakuliah(
    db: &DatabaseConnection,
    kode_mk: &str,
    id_kurikulum: Uuid,
    nama_mk: &str,
    nama_mk_eng: Option<&str>,
    sks: i32,
    semester: i32,
    rumpun: Option<&str>,
    jenis_mk: &str,
) -> Result<matakuliah::Model, ServiceError> {
    let k = kurikulum::Entity::find_by_id(id_kurikulum)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    if k.is_none() {
        return Err(ServiceError::not_found("kurikulum"));
    }

    let existing = matakuliah::Entity::find_by_id((kode_mk.to_string(), id_kurikulum))
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    if existing.is_some() {
        return Err(ServiceError::Conflict("kode_mk already exists in this kurikulum".into()));
    }

    let created = matakuliah::create(db, kode_mk, id_kurikulum, nama_mk, nama_mk_eng, sks, semester, rumpun, jenis_mk).await?;
    info!(kode_mk = %created.kode_mk, id_kurikulum = %created.id_kurikulum, "matakuliah_created");
    Ok(created)
}

pub async fn get_matakuliah(
    db: &DatabaseConnection,
    kode_mk: &str,
    id_kurikulum: Uuid,
) -> Result<Option<matakuliah::Model>, ServiceError> {
    Ok(matakuliah::Entity::find_by_id((kode_mk.to_string(), id_kurikulum))
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?)
}

pub async fn list_matakuliah(
    db: &DatabaseConnection,
    id_kurikulum: Option<Uuid>,
    semester: Option<i32>,
    jenis_mk: Option<&str>,
    is_active: Option<bool>,
) -> Result<Vec<matakuliah::Model>, ServiceError> {
    let mut query = matakuliah::Entity::find();
    if let Some(k) = id_kurikulum {
        query = query.filter(matakuliah::Column::IdKurikulum.eq(k));
    }
    if let Some(s) = semester {
        query = query.filter(matakuliah::Column::Semester.eq(s));
    }
    if let Some(j) = jenis_mk {
        query = query.filter(matakuliah::Column::JenisMk.eq(j.to_string()));
    }
    if let Some(a) = is_active {
        query = query.filter(matakuliah::Column::IsActive.eq(a));
    }
    let rows = query
        .order_by_asc(matakuliah::Column::Semester)
        .order_by_asc(matakuliah::Column::KodeMk)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(rows)
}

/// Update mutable columns; the composite key itself never changes.
pub async fn update_matakuliah(
    db: &DatabaseConnection,
    kode_mk: &str,
    id_kurikulum: Uuid,
    changes: MatakuliahUpdate,
) -> Result<matakuliah::Model, ServiceError> {
    let found = get_matakuliah(db, kode_mk, id_kurikulum)
        .await?
        .ok_or_else(|| ServiceError::not_found("matakuliah"))?;
    let mut am: matakuliah::ActiveModel = found.into();
    if let Some(n) = changes.nama_mk {
        if n.trim().is_empty() {
            return Err(ServiceError::Validation("nama_mk required".into()));
        }
        am.nama_mk = Set(n);
    }
    if let Some(n) = changes.nama_mk_eng { am.nama_mk_eng = Set(n); }
    if let Some(s) = changes.sks {
        matakuliah::validate_sks(s)?;
        am.sks = Set(s);
    }
    if let Some(s) = changes.semester {
        matakuliah::validate_semester(s)?;
        am.semester = Set(s);
    }
    if let Some(r) = changes.rumpun { am.rumpun = Set(r); }
    if let Some(j) = changes.jenis_mk {
        matakuliah::validate_jenis(&j)?;
        am.jenis_mk = Set(j);
    }
    if let Some(a) = changes.is_active { am.is_active = Set(a); }
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(updated)
}

/// Courses are never physically removed; delete deactivates the row.
pub async fn delete_matakuliah(db: &DatabaseConnection, kode_mk: &str, id_kurikulum: Uuid) -> Result<(), ServiceError> {
    get_matakuliah(db, kode_mk, id_kurikulum)
        .await?
        .ok_or_else(|| ServiceError::not_found("matakuliah"))?;
    matakuliah::deactivate(db, kode_mk, id_kurikulum).await?;
    info!(kode_mk = %kode_mk, id_kurikulum = %id_kurikulum, "matakuliah_deactivated");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;

    #[tokio::test]
    async fn same_kode_coexists_across_curricula() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
        let db = get_db().await?;

        let pid = format!("P{}", &Uuid::new_v4().simple().to_string()[..8]);
        let p = models::prodi::create(&db, &pid, "Informatika", Some("S1")).await?;
        let k1 = models::kurikulum::create(&db, &p.id_prodi, "K2020", "Kurikulum 2020", 2020, None).await?;
        let k2 = models::kurikulum::create(&db, &p.id_prodi, "K2024", "Kurikulum 2024", 2024, None).await?;

        let a = create_matakuliah(&db, "IF201", k1.id, "Struktur Data", None, 3, 3, None, "wajib").await?;
        let b = create_matakuliah(&db, "IF201", k2.id, "Struktur Data", None, 4, 3, None, "wajib").await?;
        assert_eq!(a.kode_mk, b.kode_mk);

        // but duplicate within one kurikulum conflicts
        let dup = create_matakuliah(&db, "IF201", k1.id, "Lagi", None, 2, 3, None, "pilihan").await;
        assert!(matches!(dup, Err(ServiceError::Conflict(_))));

        // delete only deactivates
        delete_matakuliah(&db, "IF201", k1.id).await?;
        let after = get_matakuliah(&db, "IF201", k1.id).await?.unwrap();
        assert!(!after.is_active);

        matakuliah::Entity::delete_by_id(("IF201".to_string(), k1.id)).exec(&db).await?;
        matakuliah::Entity::delete_by_id(("IF201".to_string(), k2.id)).exec(&db).await?;
        kurikulum::Entity::delete_by_id(k1.id).exec(&db).await?;
        kurikulum::Entity::delete_by_id(k2.id).exec(&db).await?;
        models::prodi::Entity::delete_by_id(p.id_prodi).exec(&db).await?;
        Ok(())
    }
}
