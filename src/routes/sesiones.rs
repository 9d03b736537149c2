use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    middleware::auth::{resolve_perfil, AuthUser},
    models::{ActualizarSesion, NuevaSesion, SesionEstudio},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub fecha: Option<NaiveDate>,
}

/// Handler for listing the caller's sesiones, optionally for one day
pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<SesionEstudio>>> {
    let perfil = resolve_perfil(state.store.as_ref(), &auth).await?;
    Ok(Json(state.store.list_sesiones(perfil.id, query.fecha).await?))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(datos): Json<NuevaSesion>,
) -> AppResult<(StatusCode, Json<SesionEstudio>)> {
    let perfil = resolve_perfil(state.store.as_ref(), &auth).await?;

    if datos.nombre.trim().is_empty() {
        return Err(AppError::InvalidInput("el nombre es obligatorio".to_string()));
    }
    if datos.duracion <= 0 {
        return Err(AppError::InvalidInput(
            "la duración debe ser mayor a cero".to_string(),
        ));
    }
    if !state.store.materia_exists(datos.materia_id).await? {
        return Err(AppError::InvalidInput(format!(
            "la materia {} no existe",
            datos.materia_id
        )));
    }

    let sesion = state.store.create_sesion(perfil.id, datos).await?;
    Ok((StatusCode::CREATED, Json(sesion)))
}

pub async fn show(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i32>,
) -> AppResult<Json<SesionEstudio>> {
    let perfil = resolve_perfil(state.store.as_ref(), &auth).await?;
    Ok(Json(state.store.get_sesion(id, perfil.id).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i32>,
    Json(cambios): Json<ActualizarSesion>,
) -> AppResult<Json<SesionEstudio>> {
    let perfil = resolve_perfil(state.store.as_ref(), &auth).await?;

    if let Some(duracion) = cambios.duracion {
        if duracion <= 0 {
            return Err(AppError::InvalidInput(
                "la duración debe ser mayor a cero".to_string(),
            ));
        }
    }
    if let Some(materia_id) = cambios.materia_id {
        if !state.store.materia_exists(materia_id).await? {
            return Err(AppError::InvalidInput(format!(
                "la materia {} no existe",
                materia_id
            )));
        }
    }

    Ok(Json(state.store.update_sesion(id, perfil.id, cambios).await?))
}

pub async fn remove(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    let perfil = resolve_perfil(state.store.as_ref(), &auth).await?;
    state.store.delete_sesion(id, perfil.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
