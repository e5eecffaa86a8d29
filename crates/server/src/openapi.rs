use chrono::NaiveDate;
use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(utoipa::ToSchema)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub user_type: String,
    pub ref_id: Option<String>,
}

#[derive(utoipa::ToSchema)]
pub struct LoginRequest { pub username: String, pub password: String }

#[derive(utoipa::ToSchema)]
pub struct RefreshRequest { pub refresh_token: String }

#[derive(utoipa::ToSchema)]
pub struct CreateKurikulumRequest {
    pub id_prodi: String,
    pub kode_kurikulum: String,
    pub nama_kurikulum: String,
    pub tahun_berlaku: i32,
    pub deskripsi: Option<String>,
}

#[derive(utoipa::ToSchema)]
pub struct ApproveKurikulumRequest {
    pub nomor_sk: String,
    pub tanggal_sk: NaiveDate,
}

#[derive(utoipa::ToSchema)]
pub struct ActivateKurikulumRequest {
    pub set_as_primary: bool,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::auth::register,
        crate::routes::auth::login,
        crate::routes::auth::refresh,
        crate::routes::auth::me,
        crate::routes::kurikulum::list,
        crate::routes::kurikulum::get,
        crate::routes::kurikulum::create,
        crate::routes::kurikulum::update,
        crate::routes::kurikulum::approve,
        crate::routes::kurikulum::activate,
        crate::routes::kurikulum::deactivate,
    ),
    components(
        schemas(
            HealthResponse,
            RegisterRequest,
            LoginRequest,
            RefreshRequest,
            CreateKurikulumRequest,
            ApproveKurikulumRequest,
            ActivateKurikulumRequest,
        )
    ),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "kurikulum")
    )
)]
pub struct ApiDoc;
