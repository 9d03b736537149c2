use axum::{extract::State, Extension, Json};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, AppResult},
    middleware::{
        auth::{resolve_perfil, AuthUser},
        request_id::RequestId,
    },
    models::{NuevaSesion, NuevoPlan, Plan, SesionEstudio},
    services::{
        calendario::{self, SolicitudCalendario},
        contexto, recomendacion,
    },
    state::AppState,
};

/// Old clients also send a usuario_id; it is ignored — the identity always
/// comes from the token.
#[derive(Debug, Deserialize)]
pub struct RecomendacionRequest {
    #[serde(default)]
    pub pregunta: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RecomendacionResponse {
    pub usuario_id: i32,
    pub pregunta: String,
    pub recomendacion: String,
}

/// Handler for the study recommendation endpoint
pub async fn recomendar(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<RecomendacionRequest>,
) -> AppResult<Json<RecomendacionResponse>> {
    let usuario = resolve_perfil(state.store.as_ref(), &auth).await?;

    let pregunta = request.pregunta.unwrap_or_default();
    let pregunta = pregunta.trim();
    if pregunta.is_empty() {
        return Err(AppError::InvalidInput(
            "Debes enviar una pregunta".to_string(),
        ));
    }

    // El usuario puede desaparecer entre la resolución del perfil y la
    // lectura del historial; cualquier falla aquí es un 400, no un 500.
    let contexto = contexto::construir_contexto(state.store.as_ref(), usuario.id)
        .await
        .map_err(|e| AppError::InvalidInput(format!("No se pudo construir contexto: {}", e)))?;

    tracing::info!(
        request_id = %request_id,
        usuario_id = usuario.id,
        provider = state.generator.name(),
        "Generando recomendación"
    );

    let recomendacion =
        recomendacion::recomendar(state.generator.as_ref(), &contexto, pregunta).await?;

    Ok(Json(RecomendacionResponse {
        usuario_id: usuario.id,
        pregunta: pregunta.to_string(),
        recomendacion,
    }))
}

#[derive(Debug, Deserialize)]
pub struct GenerarCalendarioRequest {
    pub materia_id: i32,
    pub temas: String,
    pub fecha_objetivo: NaiveDate,
    pub horas_por_dia: i32,
    #[serde(default)]
    pub preferencia_horario: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GenerarCalendarioResponse {
    pub plan: Plan,
    pub sesiones: Vec<SesionEstudio>,
}

/// Handler for calendar generation: asks the model for a JSON study
/// calendar, persists it as a plan plus its sesiones, returns the rows
pub async fn generar_calendario(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<GenerarCalendarioRequest>,
) -> AppResult<Json<GenerarCalendarioResponse>> {
    let usuario = resolve_perfil(state.store.as_ref(), &auth).await?;

    if request.temas.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "Debes enviar los temas a cubrir".to_string(),
        ));
    }
    if request.horas_por_dia <= 0 {
        return Err(AppError::InvalidInput(
            "horas_por_dia debe ser mayor a cero".to_string(),
        ));
    }

    let hoy = Utc::now().date_naive();
    if request.fecha_objetivo < hoy {
        return Err(AppError::InvalidInput(
            "fecha_objetivo no puede estar en el pasado".to_string(),
        ));
    }

    let materia = state.store.get_materia(request.materia_id, usuario.id).await?;

    let solicitud = SolicitudCalendario {
        temas: request.temas.trim(),
        hoy,
        fecha_objetivo: request.fecha_objetivo,
        horas_por_dia: request.horas_por_dia,
        preferencia_horario: request
            .preferencia_horario
            .as_deref()
            .unwrap_or(&usuario.periodo_preferencia),
    };

    let prompt = calendario::componer_prompt_calendario(&materia, &usuario, &solicitud);
    let respuesta = state.generator.generate(&prompt).await?;

    let generado = calendario::parse_calendario(&respuesta)?;
    let validas = calendario::validar_sesiones(&generado.sesiones);
    if validas.is_empty() {
        return Err(AppError::Upstream(
            "El modelo no devolvió ninguna sesión válida".to_string(),
        ));
    }

    let descartadas = generado.sesiones.len() - validas.len();
    if descartadas > 0 {
        tracing::warn!(
            request_id = %request_id,
            descartadas,
            "Sesiones generadas inválidas descartadas"
        );
    }

    let plan = state
        .store
        .create_plan(
            usuario.id,
            NuevoPlan {
                nombre: generado.plan.nombre,
                contenido: Some(generado.plan.contenido),
                fuente: Some("IA".to_string()),
                estado: Some(true),
            },
        )
        .await?;

    let mut sesiones = Vec::with_capacity(validas.len());
    for sesion in validas {
        let creada = state
            .store
            .create_sesion(
                usuario.id,
                NuevaSesion {
                    materia_id: materia.id,
                    plan_id: Some(plan.id),
                    nombre: sesion.nombre,
                    descripcion: Some(sesion.descripcion),
                    duracion: sesion.duracion,
                    estado: Some(true),
                    fecha: Some(sesion.fecha),
                    hora_inicio: sesion.hora_inicio,
                },
            )
            .await?;
        sesiones.push(creada);
    }

    tracing::info!(
        request_id = %request_id,
        plan_id = plan.id,
        sesiones = sesiones.len(),
        "Calendario generado"
    );

    Ok(Json(GenerarCalendarioResponse { plan, sesiones }))
}
