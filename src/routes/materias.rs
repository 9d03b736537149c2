use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};

use crate::{
    error::{AppError, AppResult},
    middleware::auth::{resolve_perfil, AuthUser},
    models::{ActualizarMateria, Materia, NuevaMateria},
    state::AppState,
};

/// Handler for listing the caller's materias
pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> AppResult<Json<Vec<Materia>>> {
    let perfil = resolve_perfil(state.store.as_ref(), &auth).await?;
    Ok(Json(state.store.list_materias(perfil.id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(datos): Json<NuevaMateria>,
) -> AppResult<(StatusCode, Json<Materia>)> {
    let perfil = resolve_perfil(state.store.as_ref(), &auth).await?;

    if datos.nombre.trim().is_empty() {
        return Err(AppError::InvalidInput("el nombre es obligatorio".to_string()));
    }

    let materia = state.store.create_materia(perfil.id, datos).await?;
    Ok((StatusCode::CREATED, Json(materia)))
}

pub async fn show(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i32>,
) -> AppResult<Json<Materia>> {
    let perfil = resolve_perfil(state.store.as_ref(), &auth).await?;
    Ok(Json(state.store.get_materia(id, perfil.id).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i32>,
    Json(cambios): Json<ActualizarMateria>,
) -> AppResult<Json<Materia>> {
    let perfil = resolve_perfil(state.store.as_ref(), &auth).await?;
    Ok(Json(state.store.update_materia(id, perfil.id, cambios).await?))
}

pub async fn remove(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    let perfil = resolve_perfil(state.store.as_ref(), &auth).await?;
    state.store.delete_materia(id, perfil.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
