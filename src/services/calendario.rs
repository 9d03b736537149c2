use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    models::{parse_hora, Materia, Usuario},
};

/// Prompt for the calendar generation call. The reply must be a single JSON
/// object; the parser below still tolerates a markdown fence around it.
const CALENDARIO_TEMPLATE: &str = r#"Eres un planificador de estudio. Genera un calendario de sesiones de estudio para la materia "{materia}" (dificultad: {dificultad}).

Temas a cubrir: {temas}
Fecha de inicio: {hoy}
Fecha objetivo: {fecha_objetivo}
Horas de estudio por día: {horas_por_dia}
Preferencia de horario: {preferencia_horario}
Días libres del estudiante: {dias_libres}

Reparte los temas entre la fecha de inicio y la fecha objetivo. Responde SOLO con JSON válido, sin texto adicional, con exactamente esta forma:
{"plan": {"nombre": "...", "contenido": "..."}, "sesiones": [{"fecha": "YYYY-MM-DD", "hora_inicio": "HH:MM", "duracion": 60, "nombre": "...", "descripcion": "..."}]}"#;

/// Validated request parameters for one calendar generation
pub struct SolicitudCalendario<'a> {
    pub temas: &'a str,
    pub hoy: NaiveDate,
    pub fecha_objetivo: NaiveDate,
    pub horas_por_dia: i32,
    pub preferencia_horario: &'a str,
}

/// Plan/sesiones pair as the model returns it, before validation
#[derive(Debug, Deserialize)]
pub struct CalendarioGenerado {
    pub plan: PlanGenerado,
    #[serde(default)]
    pub sesiones: Vec<SesionGenerada>,
}

#[derive(Debug, Deserialize)]
pub struct PlanGenerado {
    pub nombre: String,
    #[serde(default)]
    pub contenido: String,
}

#[derive(Debug, Deserialize)]
pub struct SesionGenerada {
    pub fecha: String,
    #[serde(default)]
    pub hora_inicio: Option<String>,
    pub duracion: i32,
    pub nombre: String,
    #[serde(default)]
    pub descripcion: String,
}

/// A generated sesion whose fields all parsed and passed validation
#[derive(Debug, Clone, PartialEq)]
pub struct SesionValidada {
    pub fecha: NaiveDate,
    pub hora_inicio: Option<NaiveTime>,
    pub duracion: i32,
    pub nombre: String,
    pub descripcion: String,
}

/// Composes the calendar prompt for one materia and one usuario
pub fn componer_prompt_calendario(
    materia: &Materia,
    usuario: &Usuario,
    solicitud: &SolicitudCalendario<'_>,
) -> String {
    CALENDARIO_TEMPLATE
        .replace("{materia}", &materia.nombre)
        .replace("{dificultad}", &materia.dificultad)
        .replace("{temas}", solicitud.temas)
        .replace("{hoy}", &solicitud.hoy.to_string())
        .replace("{fecha_objetivo}", &solicitud.fecha_objetivo.to_string())
        .replace("{horas_por_dia}", &solicitud.horas_por_dia.to_string())
        .replace("{preferencia_horario}", solicitud.preferencia_horario)
        .replace("{dias_libres}", &usuario.dias_libres)
}

/// Strips an optional markdown code fence from a model reply
fn extraer_json(respuesta: &str) -> &str {
    let recortada = respuesta.trim();

    let sin_fence = recortada
        .strip_prefix("```json")
        .or_else(|| recortada.strip_prefix("```"))
        .map(|resto| resto.strip_suffix("```").unwrap_or(resto))
        .unwrap_or(recortada);

    sin_fence.trim()
}

/// Parses the model reply into a calendar, fenced or bare
pub fn parse_calendario(respuesta: &str) -> AppResult<CalendarioGenerado> {
    serde_json::from_str(extraer_json(respuesta)).map_err(|e| {
        AppError::Upstream(format!("El modelo no devolvió un calendario válido: {}", e))
    })
}

/// Keeps only the generated sesiones that are usable: parseable fecha,
/// parseable hora_inicio when present, positive duracion. Dropped rows are
/// counted by the caller for logging.
pub fn validar_sesiones(sesiones: &[SesionGenerada]) -> Vec<SesionValidada> {
    sesiones
        .iter()
        .filter_map(|sesion| {
            let fecha = NaiveDate::parse_from_str(&sesion.fecha, "%Y-%m-%d").ok()?;

            let hora_inicio = match &sesion.hora_inicio {
                Some(raw) => Some(parse_hora(raw).ok()?),
                None => None,
            };

            if sesion.duracion <= 0 {
                return None;
            }

            Some(SesionValidada {
                fecha,
                hora_inicio,
                duracion: sesion.duracion,
                nombre: sesion.nombre.clone(),
                descripcion: sesion.descripcion.clone(),
            })
        })
        .collect()
}
