use std::collections::HashMap;

use crate::{
    db::Store,
    error::AppResult,
    models::{HistorialSesion, Materia, Usuario},
};

/// Cap on the owner-independent materia listing embedded in the context
pub const MAX_MATERIAS_CATALOGO: i64 = 200;

/// Total minutes studied on one materia
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumenMateria {
    pub materia_id: i32,
    pub nombre: String,
    pub dificultad: String,
    pub minutos: i64,
}

/// Groups a user's sesiones by materia and sums their minutes, most-studied
/// first.
///
/// The sort is stable, so materias with equal totals keep the order in which
/// their first sesion appears in storage; callers must not depend on a
/// particular tie order.
pub fn resumir_historial(historial: &[HistorialSesion]) -> Vec<ResumenMateria> {
    let mut resumen: Vec<ResumenMateria> = Vec::new();
    let mut posiciones: HashMap<i32, usize> = HashMap::new();

    for sesion in historial {
        match posiciones.get(&sesion.materia_id) {
            Some(&idx) => resumen[idx].minutos += i64::from(sesion.duracion),
            None => {
                posiciones.insert(sesion.materia_id, resumen.len());
                resumen.push(ResumenMateria {
                    materia_id: sesion.materia_id,
                    nombre: sesion.materia.clone(),
                    dificultad: sesion.dificultad.clone(),
                    minutos: i64::from(sesion.duracion),
                });
            }
        }
    }

    resumen.sort_by(|a, b| b.minutos.cmp(&a.minutos));
    resumen
}

/// Renders the context block fed to the recommendation prompt.
///
/// Line order is part of the contract: profile header, blank line, history
/// summary (or the no-sessions line), blank line, system-wide materia
/// catalog.
pub fn render_contexto(
    usuario: &Usuario,
    resumen: &[ResumenMateria],
    catalogo: &[Materia],
) -> String {
    let mut partes: Vec<String> = Vec::new();

    partes.push(format!("Usuario: {} (ID={})", usuario.nombre, usuario.id));
    partes.push(format!("Nivel de estudios: {}", usuario.nivel_estudios));
    partes.push(format!("Disponibilidad: {}", usuario.disponibilidad));
    partes.push(format!("Días libres: {}", usuario.dias_libres));
    partes.push(format!("Periodo preferido: {}", usuario.periodo_preferencia));
    partes.push(String::new());

    if resumen.is_empty() {
        partes.push("Historial: no hay sesiones previas registradas.".to_string());
    } else {
        partes.push("Historial resumido por materia (minutos estudiados):".to_string());
        for materia in resumen {
            partes.push(format!(
                "- {} | Dificultad: {} | Minutos: {}",
                materia.nombre, materia.dificultad, materia.minutos
            ));
        }
    }

    partes.push(String::new());
    partes.push("Materias disponibles en el sistema:".to_string());
    for materia in catalogo {
        partes.push(format!(
            "- {} (Dificultad: {})",
            materia.nombre, materia.dificultad
        ));
    }

    partes.join("\n")
}

/// Builds the context block for one usuario.
///
/// Fails with `NotFound` when the usuario does not exist; the caller decides
/// how to surface that. Read-only, built fresh on every call.
pub async fn construir_contexto(store: &dyn Store, usuario_id: i32) -> AppResult<String> {
    let usuario = store.get_usuario(usuario_id).await?;
    let historial = store.historial_sesiones(usuario_id).await?;
    let resumen = resumir_historial(&historial);
    let catalogo = store.list_materias_catalogo(MAX_MATERIAS_CATALOGO).await?;

    Ok(render_contexto(&usuario, &resumen, &catalogo))
}
