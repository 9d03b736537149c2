use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};

use crate::{
    error::{AppError, AppResult},
    middleware::auth::{resolve_perfil, AuthUser},
    models::{ActualizarUsuario, NuevoUsuario, Usuario},
    state::AppState,
};

/// Handler for listing usuarios (system-wide, like the rest of the catalog)
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Usuario>>> {
    Ok(Json(state.store.list_usuarios().await?))
}

/// Handler for creating the caller's study profile.
///
/// The new row is linked to the authenticated cuenta and takes its correo;
/// the body never decides the identity. One profile per cuenta.
pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(datos): Json<NuevoUsuario>,
) -> AppResult<(StatusCode, Json<Usuario>)> {
    if datos.nombre.trim().is_empty() {
        return Err(AppError::InvalidInput("el nombre es obligatorio".to_string()));
    }

    if state
        .store
        .find_usuario_by_cuenta(auth.cuenta_id)
        .await?
        .is_some()
    {
        return Err(AppError::InvalidInput(
            "esta cuenta ya tiene un usuario registrado".to_string(),
        ));
    }

    let usuario = state
        .store
        .create_usuario(auth.cuenta_id, &auth.correo, datos)
        .await?;

    tracing::info!(usuario_id = usuario.id, "Usuario creado");

    Ok((StatusCode::CREATED, Json(usuario)))
}

pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Usuario>> {
    Ok(Json(state.store.get_usuario(id).await?))
}

/// Handler for updating a usuario; only the caller's own profile is writable
pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i32>,
    Json(cambios): Json<ActualizarUsuario>,
) -> AppResult<Json<Usuario>> {
    let perfil = resolve_perfil(state.store.as_ref(), &auth).await?;
    if perfil.id != id {
        return Err(AppError::Forbidden(
            "solo puedes modificar tu propio usuario".to_string(),
        ));
    }

    Ok(Json(state.store.update_usuario(id, cambios).await?))
}

pub async fn remove(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    let perfil = resolve_perfil(state.store.as_ref(), &auth).await?;
    if perfil.id != id {
        return Err(AppError::Forbidden(
            "solo puedes eliminar tu propio usuario".to_string(),
        ));
    }

    state.store.delete_usuario(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
