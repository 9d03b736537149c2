use axum::{
    http::StatusCode,
    middleware as axum_middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    middleware::{auth, request_id},
    state::AppState,
};

pub mod ia;
pub mod materias;
pub mod planes;
pub mod sesiones;
pub mod usuarios;

/// Creates the application router with all routes
///
/// Everything under /api requires a valid token; /health stays open for
/// probes. Paths keep the trailing slash the mobile client sends.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_routes(state))
        .layer(
            ServiceBuilder::new()
                .layer(axum_middleware::from_fn(request_id::request_id_middleware))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(request_id::make_span_with_request_id),
                )
                .layer(CorsLayer::permissive()),
        )
}

/// Authenticated API routes under /api
fn api_routes(state: AppState) -> Router {
    Router::new()
        // Usuarios
        .route("/usuarios/", get(usuarios::list).post(usuarios::create))
        .route(
            "/usuarios/:id/",
            get(usuarios::show)
                .put(usuarios::update)
                .patch(usuarios::update)
                .delete(usuarios::remove),
        )
        // Materias
        .route("/materias/", get(materias::list).post(materias::create))
        .route(
            "/materias/:id/",
            get(materias::show)
                .put(materias::update)
                .patch(materias::update)
                .delete(materias::remove),
        )
        // Planes
        .route("/planes/", get(planes::list).post(planes::create))
        .route(
            "/planes/:id/",
            get(planes::show)
                .put(planes::update)
                .patch(planes::update)
                .delete(planes::remove),
        )
        // Sesiones de estudio (la ruta histórica se llama "secciones")
        .route("/secciones/", get(sesiones::list).post(sesiones::create))
        .route(
            "/secciones/:id/",
            get(sesiones::show)
                .put(sesiones::update)
                .patch(sesiones::update)
                .delete(sesiones::remove),
        )
        // Recomendación y generación de calendario
        .route("/ia/", post(ia::recomendar))
        .route(
            "/inteligencia/generar_calendario/",
            post(ia::generar_calendario),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            auth::require_auth,
        ))
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
