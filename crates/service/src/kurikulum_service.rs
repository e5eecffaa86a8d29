use chrono::{NaiveDate, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use tracing::info;
use uuid::Uuid;

use common::pagination::Pagination;
use models::{kurikulum, prodi};

use crate::errors::ServiceError;

/// Optional fields accepted by `update_kurikulum`.
#[derive(Debug, Default, Clone)]
pub struct KurikulumUpdate {
    pub nama_kurikulum: Option<String>,
    pub tahun_berlaku: Option<i32>,
    pub tahun_berakhir: Option<Option<i32>>,
    pub deskripsi: Option<Option<String>>,
}

/// Create a curriculum version; fresh records always start in `draft`.
pub async fn create_kurikulum(
    db: &DatabaseConnection,
    id_prodi: &str,
    kode_kurikulum: &str,
    nama_kurikulum: &str,
    tahun_berlaku: i32,
    deskripsi: Option<&str>,
) -> Result<kurikulum::Model, ServiceError> {
    let prodi_row = prodi::Entity::find_by_id(id_prodi.to_string())
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    if prodi_row.is_none() {
        return Err(ServiceError::not_found("prodi"));
    }

    // kode_kurikulum is only unique within a prodi
    let existing = kurikulum::Entity::find()
        .filter(kurikulum::Column::IdProdi.eq(id_prodi.to_string()))
        .filter(kurikulum::Column::KodeKurikulum.eq(kode_kurikulum.to_string()))
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    if existing.is_some() {
        return Err(ServiceError::Conflict("kode_kurikulum already exists in this prodi".into()));
    }

    let created = kurikulum::create(db, id_prodi, kode_kurikulum, nama_kurikulum, tahun_berlaku, deskripsi).await?;
    info!(id = %created.id, id_prodi = %created.id_prodi, kode = %created.kode_kurikulum, "kurikulum_created");
    Ok(created)
}

pub async fn get_kurikulum(db: &DatabaseConnection, id: Uuid) -> Result<Option<kurikulum::Model>, ServiceError> {
    Ok(kurikulum::Entity::find_by_id(id).one(db).await.map_err(|e| ServiceError::Db(e.to_string()))?)
}

/// List with optional prodi/status filters, newest first.
pub async fn list_kurikulum(
    db: &DatabaseConnection,
    id_prodi: Option<&str>,
    status: Option<&str>,
    opts: Pagination,
) -> Result<Vec<kurikulum::Model>, ServiceError> {
    use sea_orm::PaginatorTrait;
    let (page_idx, per_page) = opts.normalize();
    let mut query = kurikulum::Entity::find();
    if let Some(p) = id_prodi {
        query = query.filter(kurikulum::Column::IdProdi.eq(p.to_string()));
    }
    if let Some(s) = status {
        query = query.filter(kurikulum::Column::Status.eq(s.to_string()));
    }
    let rows = query
        .order_by_desc(kurikulum::Column::TahunBerlaku)
        .paginate(db, per_page)
        .fetch_page(page_idx)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(rows)
}

async fn find_required(db: &DatabaseConnection, id: Uuid) -> Result<kurikulum::Model, ServiceError> {
    kurikulum::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("kurikulum"))
}

/// Content updates are only legal while the record is still in `draft` or `review`.
pub async fn update_kurikulum(
    db: &DatabaseConnection,
    id: Uuid,
    changes: KurikulumUpdate,
) -> Result<kurikulum::Model, ServiceError> {
    let found = find_required(db, id).await?;
    if found.status != kurikulum::STATUS_DRAFT && found.status != kurikulum::STATUS_REVIEW {
        return Err(ServiceError::Validation(format!(
            "cannot update kurikulum in status '{}'",
            found.status
        )));
    }
    let mut am: kurikulum::ActiveModel = found.into();
    if let Some(n) = changes.nama_kurikulum {
        if n.trim().is_empty() {
            return Err(ServiceError::Validation("nama_kurikulum required".into()));
        }
        am.nama_kurikulum = Set(n);
    }
    if let Some(t) = changes.tahun_berlaku { am.tahun_berlaku = Set(t); }
    if let Some(t) = changes.tahun_berakhir { am.tahun_berakhir = Set(t); }
    if let Some(d) = changes.deskripsi { am.deskripsi = Set(d); }
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(updated)
}

/// Approve a draft/review curriculum, recording the SK decree.
pub async fn approve_kurikulum(
    db: &DatabaseConnection,
    id: Uuid,
    nomor_sk: &str,
    tanggal_sk: NaiveDate,
) -> Result<kurikulum::Model, ServiceError> {
    let found = find_required(db, id).await?;
    if found.status != kurikulum::STATUS_DRAFT && found.status != kurikulum::STATUS_REVIEW {
        return Err(ServiceError::Validation(format!(
            "kurikulum cannot be approved from status '{}'",
            found.status
        )));
    }
    if nomor_sk.trim().is_empty() {
        return Err(ServiceError::Validation("nomor_sk required".into()));
    }
    let mut am: kurikulum::ActiveModel = found.into();
    am.status = Set(kurikulum::STATUS_APPROVED.into());
    am.nomor_sk = Set(Some(nomor_sk.to_string()));
    am.tanggal_sk = Set(Some(tanggal_sk));
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    info!(id = %updated.id, nomor_sk = %nomor_sk, "kurikulum_approved");
    Ok(updated)
}

/// Activate an approved curriculum. At most one primary curriculum per prodi:
/// setting the flag clears it on every sibling first.
pub async fn activate_kurikulum(
    db: &DatabaseConnection,
    id: Uuid,
    set_as_primary: bool,
) -> Result<kurikulum::Model, ServiceError> {
    let found = find_required(db, id).await?;
    if found.status != kurikulum::STATUS_APPROVED {
        return Err(ServiceError::Validation("kurikulum must be approved before activation".into()));
    }

    if set_as_primary {
        kurikulum::Entity::update_many()
            .col_expr(kurikulum::Column::IsPrimary, sea_orm::sea_query::Expr::value(false))
            .filter(kurikulum::Column::IdProdi.eq(found.id_prodi.clone()))
            .filter(kurikulum::Column::IsPrimary.eq(true))
            .exec(db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?;
    }

    let mut am: kurikulum::ActiveModel = found.into();
    am.status = Set(kurikulum::STATUS_AKTIF.into());
    am.is_primary = Set(set_as_primary);
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    info!(id = %updated.id, primary = set_as_primary, "kurikulum_activated");
    Ok(updated)
}

/// Deactivate an active curriculum; also drops the primary flag.
pub async fn deactivate_kurikulum(db: &DatabaseConnection, id: Uuid) -> Result<kurikulum::Model, ServiceError> {
    let found = find_required(db, id).await?;
    if found.status != kurikulum::STATUS_AKTIF {
        return Err(ServiceError::Validation("only active kurikulum can be deactivated".into()));
    }
    let mut am: kurikulum::ActiveModel = found.into();
    am.status = Set(kurikulum::STATUS_NON_AKTIF.into());
    am.is_primary = Set(false);
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    info!(id = %updated.id, "kurikulum_deactivated");
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;

    async fn make_prodi(db: &DatabaseConnection) -> Result<models::prodi::Model, anyhow::Error> {
        let id = format!("P{}", &Uuid::new_v4().simple().to_string()[..8]);
        Ok(models::prodi::create(db, &id, "Sistem Informasi", Some("S1")).await?)
    }

    #[tokio::test]
    async fn kurikulum_lifecycle() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
        let db = get_db().await?;
        let p = make_prodi(&db).await?;

        let k = create_kurikulum(&db, &p.id_prodi, "K2024", "Kurikulum OBE 2024", 2024, None).await?;
        assert_eq!(k.status, kurikulum::STATUS_DRAFT);

        // duplicate kode in same prodi conflicts
        let dup = create_kurikulum(&db, &p.id_prodi, "K2024", "Duplikat", 2024, None).await;
        assert!(matches!(dup, Err(ServiceError::Conflict(_))));

        // cannot activate before approval
        let premature = activate_kurikulum(&db, k.id, true).await;
        assert!(matches!(premature, Err(ServiceError::Validation(_))));

        let sk_date = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
        let approved = approve_kurikulum(&db, k.id, "SK/001/2024", sk_date).await?;
        assert_eq!(approved.status, kurikulum::STATUS_APPROVED);
        assert_eq!(approved.nomor_sk.as_deref(), Some("SK/001/2024"));

        // content updates are frozen after approval
        let frozen = update_kurikulum(&db, k.id, KurikulumUpdate { nama_kurikulum: Some("Late edit".into()), ..Default::default() }).await;
        assert!(matches!(frozen, Err(ServiceError::Validation(_))));

        let active = activate_kurikulum(&db, k.id, true).await?;
        assert_eq!(active.status, kurikulum::STATUS_AKTIF);
        assert!(active.is_primary);

        let inactive = deactivate_kurikulum(&db, k.id).await?;
        assert_eq!(inactive.status, kurikulum::STATUS_NON_AKTIF);
        assert!(!inactive.is_primary);

        kurikulum::Entity::delete_by_id(k.id).exec(&db).await?;
        models::prodi::Entity::delete_by_id(p.id_prodi).exec(&db).await?;
        Ok(())
    }

    #[tokio::test]
    async fn primary_flag_is_exclusive_per_prodi() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
        let db = get_db().await?;
        let p = make_prodi(&db).await?;
        let sk_date = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();

        let k1 = create_kurikulum(&db, &p.id_prodi, "K2020", "Kurikulum 2020", 2020, None).await?;
        approve_kurikulum(&db, k1.id, "SK/001/2020", sk_date).await?;
        activate_kurikulum(&db, k1.id, true).await?;

        let k2 = create_kurikulum(&db, &p.id_prodi, "K2024", "Kurikulum 2024", 2024, None).await?;
        approve_kurikulum(&db, k2.id, "SK/001/2024", sk_date).await?;
        activate_kurikulum(&db, k2.id, true).await?;

        let k1_after = get_kurikulum(&db, k1.id).await?.unwrap();
        let k2_after = get_kurikulum(&db, k2.id).await?.unwrap();
        assert!(!k1_after.is_primary);
        assert!(k2_after.is_primary);

        kurikulum::Entity::delete_by_id(k1.id).exec(&db).await?;
        kurikulum::Entity::delete_by_id(k2.id).exec(&db).await?;
        models::prodi::Entity::delete_by_id(p.id_prodi).exec(&db).await?;
        Ok(())
    }
}
