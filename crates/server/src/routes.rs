use axum::{
    middleware,
    routing::{get, post, put},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;

pub mod auth;
pub mod kurikulum;
pub mod cpl;
pub mod matakuliah;
pub mod mahasiswa;
pub mod dosen;
pub mod rps;
pub mod kelas;
pub mod penilaian;

use auth::ServerState;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK")))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router: public health/docs, auth entry points,
/// and the bearer-guarded `/api/v1` surface.
pub fn build_router(cors: CorsLayer, state: ServerState) -> Router {
    let auth_routes = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh", post(auth::refresh))
        .route("/auth/me", get(auth::me));

    let kurikulum_routes = Router::new()
        .route("/kurikulum", get(kurikulum::list).post(kurikulum::create))
        .route("/kurikulum/:id", get(kurikulum::get).put(kurikulum::update))
        .route("/kurikulum/:id/approve", post(kurikulum::approve))
        .route("/kurikulum/:id/activate", post(kurikulum::activate))
        .route("/kurikulum/:id/deactivate", post(kurikulum::deactivate));

    let cpl_routes = Router::new()
        .route("/cpl", get(cpl::list).post(cpl::create))
        .route("/cpl/:id", get(cpl::get).put(cpl::update).delete(cpl::delete));

    let matakuliah_routes = Router::new()
        .route("/matakuliah", get(matakuliah::list).post(matakuliah::create))
        .route(
            "/matakuliah/:id_kurikulum/:kode_mk",
            get(matakuliah::get).put(matakuliah::update).delete(matakuliah::delete),
        );

    let mahasiswa_routes = Router::new()
        .route("/mahasiswa", get(mahasiswa::list).post(mahasiswa::create))
        .route("/mahasiswa/:nim", get(mahasiswa::get).put(mahasiswa::update))
        .route("/mahasiswa/:nim/enrollment", get(mahasiswa::list_enrollment));

    let dosen_routes = Router::new()
        .route("/dosen", get(dosen::list).post(dosen::create))
        .route("/dosen/:id", get(dosen::get).put(dosen::update));

    let rps_routes = Router::new()
        .route("/rps", get(rps::list).post(rps::create))
        .route("/rps/:id", get(rps::get).put(rps::update))
        .route("/rps/:id/submit", post(rps::submit))
        .route("/rps/:id/approve", post(rps::approve))
        .route("/rps/:id/revise", post(rps::revise))
        .route("/rps/:id/activate", post(rps::activate))
        .route("/rps/:id/cpmk", get(rps::list_cpmk).post(rps::create_cpmk))
        .route("/cpmk/:id", put(rps::update_cpmk).delete(rps::delete_cpmk));

    let kelas_routes = Router::new()
        .route("/kelas", get(kelas::list).post(kelas::create))
        .route("/kelas/:id", get(kelas::get))
        .route("/kelas/:id/open", post(kelas::open))
        .route("/kelas/:id/close", post(kelas::close))
        .route("/kelas/:id/complete", post(kelas::complete))
        .route("/kelas/:id/enroll", post(kelas::enroll))
        .route("/kelas/:id/enrollment", get(kelas::list_enrollment))
        .route("/kelas/:id/komponen", get(penilaian::list_komponen).post(penilaian::create_komponen));

    let enrollment_routes = Router::new()
        .route("/enrollment/:id/nilai", get(penilaian::list_nilai).put(penilaian::upsert_nilai))
        .route("/enrollment/:id/finalize", post(penilaian::finalize))
        .route("/enrollment/:id/drop", post(penilaian::drop_enrollment));

    let api_v1 = auth_routes
        .merge(kurikulum_routes)
        .merge(cpl_routes)
        .merge(matakuliah_routes)
        .merge(mahasiswa_routes)
        .merge(dosen_routes)
        .merge(rps_routes)
        .merge(kelas_routes)
        .merge(enrollment_routes);

    Router::new()
        .route("/health", get(health))
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", crate::openapi::ApiDoc::openapi()))
        .nest("/api/v1", api_v1)
        .layer(middleware::from_fn_with_state(state.clone(), auth::require_bearer_token_state))
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(
                    DefaultOnRequest::new()
                        .level(Level::INFO),
                )
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_failure(
                    DefaultOnFailure::new()
                        .level(Level::ERROR),
                )
        )
}
