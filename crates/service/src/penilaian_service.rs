use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use tracing::info;
use uuid::Uuid;

use models::{enrollment, kelas, komponen_penilaian, nilai};

use crate::errors::ServiceError;

/// Letter bands used for the final grade.
pub fn grade_letter(nilai_akhir: Decimal) -> &'static str {
    if nilai_akhir >= Decimal::from(85) {
        "A"
    } else if nilai_akhir >= Decimal::from(80) {
        "AB"
    } else if nilai_akhir >= Decimal::from(70) {
        "B"
    } else if nilai_akhir >= Decimal::from(65) {
        "BC"
    } else if nilai_akhir >= Decimal::from(55) {
        "C"
    } else if nilai_akhir >= Decimal::from(40) {
        "D"
    } else {
        "E"
    }
}

/// Weighted score for one component: raw / max * weight, 2 decimals.
pub fn weighted_score(nilai_mentah: Decimal, nilai_maksimal: Decimal, bobot: Decimal) -> Decimal {
    (nilai_mentah / nilai_maksimal * bobot).round_dp(2)
}

/// Create an assessment component for a class section. The running sum of
/// `bobot` over the section must stay within 100.
pub async fn create_komponen(
    db: &DatabaseConnection,
    id_kelas: Uuid,
    id_cpmk: Option<Uuid>,
    nama_komponen: &str,
    bobot: Decimal,
    nilai_maksimal: Decimal,
) -> Result<komponen_penilaian::Model, ServiceError> {
    let k = kelas::Entity::find_by_id(id_kelas)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    if k.is_none() {
        return Err(ServiceError::not_found("kelas"));
    }

    komponen_penilaian::validate_bobot(bobot)?;
    let existing = komponen_penilaian::Entity::find()
        .filter(komponen_penilaian::Column::IdKelas.eq(id_kelas))
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    let taken: Decimal = existing.iter().map(|c| c.bobot).sum();
    if taken + bobot > Decimal::from(100) {
        return Err(ServiceError::Validation(format!(
            "total bobot would exceed 100 (already {})",
            taken
        )));
    }

    let created = komponen_penilaian::create(db, id_kelas, id_cpmk, nama_komponen, bobot, nilai_maksimal).await?;
    info!(id = %created.id, id_kelas = %id_kelas, bobot = %bobot, "komponen_created");
    Ok(created)
}

pub async fn list_komponen(db: &DatabaseConnection, id_kelas: Uuid) -> Result<Vec<komponen_penilaian::Model>, ServiceError> {
    let rows = komponen_penilaian::Entity::find()
        .filter(komponen_penilaian::Column::IdKelas.eq(id_kelas))
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(rows)
}

/// Record (or overwrite) a raw score for one enrollment and component. The
/// weighted value is derived here, never taken from the caller.
pub async fn upsert_nilai(
    db: &DatabaseConnection,
    id_enrollment: Uuid,
    id_komponen: Uuid,
    nilai_mentah: Decimal,
    catatan: Option<&str>,
    dinilai_oleh: Option<&str>,
) -> Result<nilai::Model, ServiceError> {
    let e = enrollment::Entity::find_by_id(id_enrollment)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("enrollment"))?;
    let komponen = komponen_penilaian::Entity::find_by_id(id_komponen)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("komponen"))?;
    if komponen.id_kelas != e.id_kelas {
        return Err(ServiceError::Validation("komponen belongs to a different kelas".into()));
    }
    if nilai_mentah < Decimal::ZERO || nilai_mentah > komponen.nilai_maksimal {
        return Err(ServiceError::Validation(format!(
            "nilai_mentah must be in 0..={}",
            komponen.nilai_maksimal
        )));
    }

    let tertimbang = weighted_score(nilai_mentah, komponen.nilai_maksimal, komponen.bobot);
    let saved = nilai::upsert(db, id_enrollment, id_komponen, nilai_mentah, tertimbang, catatan, dinilai_oleh).await?;
    info!(id = %saved.id, id_enrollment = %id_enrollment, nilai_tertimbang = %tertimbang, "nilai_recorded");
    Ok(saved)
}

pub async fn list_nilai(db: &DatabaseConnection, id_enrollment: Uuid) -> Result<Vec<nilai::Model>, ServiceError> {
    let rows = nilai::Entity::find()
        .filter(nilai::Column::IdEnrollment.eq(id_enrollment))
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(rows)
}

/// Fold the recorded weighted scores into the enrollment's final grade.
pub async fn finalize_enrollment(db: &DatabaseConnection, id_enrollment: Uuid) -> Result<enrollment::Model, ServiceError> {
    let e = enrollment::Entity::find_by_id(id_enrollment)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("enrollment"))?;

    let scores = list_nilai(db, id_enrollment).await?;
    if scores.is_empty() {
        return Err(ServiceError::Validation("no scores recorded for this enrollment".into()));
    }
    let total: Decimal = scores.iter().map(|n| n.nilai_tertimbang).sum();
    let total = total.round_dp(2);
    let huruf = grade_letter(total);

    let mut am: enrollment::ActiveModel = e.into();
    am.nilai_akhir = Set(Some(total));
    am.nilai_huruf = Set(Some(huruf.to_string()));
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    info!(id = %updated.id, nilai_akhir = %total, nilai_huruf = %huruf, "enrollment_finalized");
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal { s.parse().unwrap() }

    #[test]
    fn grade_bands_cover_the_scale() {
        assert_eq!(grade_letter(dec("92.5")), "A");
        assert_eq!(grade_letter(dec("85")), "A");
        assert_eq!(grade_letter(dec("84.99")), "AB");
        assert_eq!(grade_letter(dec("80")), "AB");
        assert_eq!(grade_letter(dec("79.99")), "B");
        assert_eq!(grade_letter(dec("70")), "B");
        assert_eq!(grade_letter(dec("65")), "BC");
        assert_eq!(grade_letter(dec("55")), "C");
        assert_eq!(grade_letter(dec("40")), "D");
        assert_eq!(grade_letter(dec("39.99")), "E");
        assert_eq!(grade_letter(Decimal::ZERO), "E");
    }

    #[test]
    fn weighted_score_scales_and_rounds() {
        // 80 out of 100 at weight 30 -> 24.00
        assert_eq!(weighted_score(dec("80"), dec("100"), dec("30")), dec("24.00"));
        // 7 out of 10 at weight 25 -> 17.50
        assert_eq!(weighted_score(dec("7"), dec("10"), dec("25")), dec("17.50"));
        // rounding to 2 decimals
        assert_eq!(weighted_score(dec("1"), dec("3"), dec("10")), dec("3.33"));
    }
}
