use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use crate::{
    db::Store,
    error::{AppError, AppResult},
    models::Usuario,
    state::AppState,
};

/// Identity of the authenticated caller, inserted into request extensions
/// by [`require_auth`]
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub cuenta_id: i32,
    pub correo: String,
}

/// Pulls the opaque token out of an Authorization header value.
///
/// The mobile client sends `Token <key>`; `Bearer <key>` is accepted too.
fn extract_token(header_value: &str) -> Option<&str> {
    header_value
        .strip_prefix("Token ")
        .or_else(|| header_value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Middleware guarding everything under /api.
///
/// Validates the token against the cuentas table and attaches the caller's
/// identity; requests without a valid token never reach a handler.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(extract_token)
        .ok_or_else(|| AppError::Unauthorized("credenciales no proporcionadas".to_string()))?;

    let cuenta = state
        .store
        .find_cuenta_by_token(token)
        .await?
        .ok_or_else(|| AppError::Unauthorized("token inválido".to_string()))?;

    request.extensions_mut().insert(AuthUser {
        cuenta_id: cuenta.id,
        correo: cuenta.correo,
    });

    Ok(next.run(request).await)
}

/// Resolves the caller's study profile through the cuenta link.
///
/// A cuenta without a usuario row is a valid login that has not completed
/// onboarding; operations on own data reject it with a 400, never by
/// auto-creating the profile.
pub async fn resolve_perfil(store: &dyn Store, auth: &AuthUser) -> AppResult<Usuario> {
    store
        .find_usuario_by_cuenta(auth.cuenta_id)
        .await?
        .ok_or(AppError::MissingProfile)
}
