use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Authenticated identity. Token issuance lives outside this service; rows
/// here are only ever read to validate incoming tokens.
#[derive(Debug, Clone, FromRow)]
pub struct Cuenta {
    pub id: i32,
    pub correo: String,
    pub token: String,
    pub created_at: DateTime<Utc>,
}

/// Study profile linked one-to-one to a Cuenta
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Usuario {
    pub id: i32,
    pub cuenta_id: Option<i32>,
    pub nombre: String,
    pub correo: String,
    pub nivel_estudios: String,
    pub disponibilidad: bool,
    pub dias_libres: String,
    pub periodo_preferencia: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A study topic owned by one usuario
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Materia {
    pub id: i32,
    pub usuario_id: i32,
    pub nombre: String,
    pub dificultad: String,
    pub notas: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Plan {
    pub id: i32,
    pub usuario_id: i32,
    pub nombre: String,
    pub contenido: String,
    pub fuente: String,
    pub estado: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SesionEstudio {
    pub id: i32,
    pub usuario_id: i32,
    pub materia_id: i32,
    pub plan_id: Option<i32>,
    pub nombre: String,
    pub descripcion: String,
    pub duracion: i32,
    pub estado: bool,
    pub fecha: Option<NaiveDate>,
    pub hora_inicio: Option<NaiveTime>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One sesion joined with its materia, as the context builder consumes it
#[derive(Debug, Clone, FromRow)]
pub struct HistorialSesion {
    pub materia_id: i32,
    pub materia: String,
    pub dificultad: String,
    pub duracion: i32,
}

// ============================================================================
// Write payloads
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct NuevoUsuario {
    pub nombre: String,
    pub nivel_estudios: String,
    #[serde(default)]
    pub disponibilidad: Option<bool>,
    #[serde(default)]
    pub dias_libres: Option<String>,
    #[serde(default)]
    pub periodo_preferencia: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActualizarUsuario {
    pub nombre: Option<String>,
    pub nivel_estudios: Option<String>,
    pub disponibilidad: Option<bool>,
    pub dias_libres: Option<String>,
    pub periodo_preferencia: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NuevaMateria {
    pub nombre: String,
    pub dificultad: String,
    #[serde(default)]
    pub notas: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActualizarMateria {
    pub nombre: Option<String>,
    pub dificultad: Option<String>,
    pub notas: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NuevoPlan {
    pub nombre: String,
    #[serde(default)]
    pub contenido: Option<String>,
    #[serde(default)]
    pub fuente: Option<String>,
    #[serde(default)]
    pub estado: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActualizarPlan {
    pub nombre: Option<String>,
    pub contenido: Option<String>,
    pub fuente: Option<String>,
    pub estado: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NuevaSesion {
    pub materia_id: i32,
    #[serde(default)]
    pub plan_id: Option<i32>,
    pub nombre: String,
    #[serde(default)]
    pub descripcion: Option<String>,
    pub duracion: i32,
    #[serde(default)]
    pub estado: Option<bool>,
    #[serde(default)]
    pub fecha: Option<NaiveDate>,
    #[serde(default, deserialize_with = "hora_flexible::deserialize")]
    pub hora_inicio: Option<NaiveTime>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActualizarSesion {
    pub materia_id: Option<i32>,
    pub plan_id: Option<i32>,
    pub nombre: Option<String>,
    pub descripcion: Option<String>,
    pub duracion: Option<i32>,
    pub estado: Option<bool>,
    pub fecha: Option<NaiveDate>,
    #[serde(default, deserialize_with = "hora_flexible::deserialize")]
    pub hora_inicio: Option<NaiveTime>,
}

/// Parses a wall-clock time as sent by the clients, with or without seconds
pub fn parse_hora(raw: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .map_err(|_| format!("hora inválida: {}", raw))
}

/// The mobile client sends `hora_inicio` as "HH:MM"; chrono's serde impl
/// only accepts "HH:MM:SS", so payloads go through this deserializer.
mod hora_flexible {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw {
            None => Ok(None),
            Some(s) => super::parse_hora(&s)
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hora_with_seconds() {
        assert_eq!(
            parse_hora("14:30:00").unwrap(),
            NaiveTime::from_hms_opt(14, 30, 0).unwrap()
        );
    }

    #[test]
    fn test_parse_hora_without_seconds() {
        assert_eq!(
            parse_hora("09:15").unwrap(),
            NaiveTime::from_hms_opt(9, 15, 0).unwrap()
        );
    }

    #[test]
    fn test_parse_hora_invalid() {
        assert!(parse_hora("mañana").is_err());
        assert!(parse_hora("25:00").is_err());
    }

    #[test]
    fn test_nueva_sesion_accepts_short_hora() {
        let sesion: NuevaSesion = serde_json::from_str(
            r#"{
                "materia_id": 3,
                "nombre": "Repaso de álgebra",
                "duracion": 45,
                "fecha": "2026-08-10",
                "hora_inicio": "16:30"
            }"#,
        )
        .unwrap();

        assert_eq!(sesion.materia_id, 3);
        assert_eq!(
            sesion.hora_inicio,
            Some(NaiveTime::from_hms_opt(16, 30, 0).unwrap())
        );
        assert_eq!(sesion.plan_id, None);
    }

    #[test]
    fn test_actualizar_sesion_partial_body() {
        let cambios: ActualizarSesion = serde_json::from_str(r#"{"estado": false}"#).unwrap();
        assert_eq!(cambios.estado, Some(false));
        assert!(cambios.nombre.is_none());
        assert!(cambios.hora_inicio.is_none());
    }
}
