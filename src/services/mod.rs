pub mod calendario;
pub mod contexto;
pub mod providers;
pub mod recomendacion;
