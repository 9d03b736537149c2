use crate::{error::AppResult, services::providers::TextGenerator};

/// Fixed prompt template for the recommendation call. Context and question
/// are embedded verbatim; the template is plain text, not a structured
/// format, so nothing is escaped.
const PROMPT_TEMPLATE: &str = r#"Eres un asistente experto en planificación de estudio.

{contexto}

Pregunta del usuario:
{pregunta}

Devuelve una recomendación clara y accionable."#;

/// Embeds a context block and a question into the fixed template
pub fn componer_prompt(contexto: &str, pregunta: &str) -> String {
    PROMPT_TEMPLATE
        .replace("{contexto}", contexto)
        .replace("{pregunta}", pregunta)
}

/// Asks the model for a study recommendation.
///
/// Returns the generated text unmodified; failures surface to the caller
/// untouched, with no retry and no caching.
pub async fn recomendar(
    generator: &dyn TextGenerator,
    contexto: &str,
    pregunta: &str,
) -> AppResult<String> {
    let prompt = componer_prompt(contexto, pregunta);
    generator.generate(&prompt).await
}
