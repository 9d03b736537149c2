use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};

use crate::{
    error::{AppError, AppResult},
    middleware::auth::{resolve_perfil, AuthUser},
    models::{ActualizarPlan, NuevoPlan, Plan},
    state::AppState,
};

/// Handler for listing the caller's planes
pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> AppResult<Json<Vec<Plan>>> {
    let perfil = resolve_perfil(state.store.as_ref(), &auth).await?;
    Ok(Json(state.store.list_planes(perfil.id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(datos): Json<NuevoPlan>,
) -> AppResult<(StatusCode, Json<Plan>)> {
    let perfil = resolve_perfil(state.store.as_ref(), &auth).await?;

    if datos.nombre.trim().is_empty() {
        return Err(AppError::InvalidInput("el nombre es obligatorio".to_string()));
    }

    let plan = state.store.create_plan(perfil.id, datos).await?;
    Ok((StatusCode::CREATED, Json(plan)))
}

pub async fn show(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i32>,
) -> AppResult<Json<Plan>> {
    let perfil = resolve_perfil(state.store.as_ref(), &auth).await?;
    Ok(Json(state.store.get_plan(id, perfil.id).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i32>,
    Json(cambios): Json<ActualizarPlan>,
) -> AppResult<Json<Plan>> {
    let perfil = resolve_perfil(state.store.as_ref(), &auth).await?;
    Ok(Json(state.store.update_plan(id, perfil.id, cambios).await?))
}

pub async fn remove(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    let perfil = resolve_perfil(state.store.as_ref(), &auth).await?;
    state.store.delete_plan(id, perfil.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
