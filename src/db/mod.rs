use chrono::NaiveDate;

use crate::{
    error::AppResult,
    models::{
        ActualizarMateria, ActualizarPlan, ActualizarSesion, ActualizarUsuario, Cuenta,
        HistorialSesion, Materia, NuevaMateria, NuevaSesion, NuevoPlan, NuevoUsuario, Plan,
        SesionEstudio, Usuario,
    },
};

pub mod postgres;

pub use postgres::{create_pool, PgStore};

/// Profile store abstraction
///
/// Everything the handlers and services need from persistence goes through
/// this trait, so the HTTP surface can be exercised against an in-memory
/// implementation in tests. Write operations take the owning `usuario_id`
/// and only touch rows belonging to that owner; a non-owned id behaves as
/// missing.
#[async_trait::async_trait]
pub trait Store: Send + Sync {
    // Identity
    async fn find_cuenta_by_token(&self, token: &str) -> AppResult<Option<Cuenta>>;
    async fn find_usuario_by_cuenta(&self, cuenta_id: i32) -> AppResult<Option<Usuario>>;

    // Usuarios
    async fn list_usuarios(&self) -> AppResult<Vec<Usuario>>;
    async fn get_usuario(&self, id: i32) -> AppResult<Usuario>;
    async fn create_usuario(
        &self,
        cuenta_id: i32,
        correo: &str,
        datos: NuevoUsuario,
    ) -> AppResult<Usuario>;
    async fn update_usuario(&self, id: i32, cambios: ActualizarUsuario) -> AppResult<Usuario>;
    async fn delete_usuario(&self, id: i32) -> AppResult<()>;

    // Materias
    async fn list_materias(&self, usuario_id: i32) -> AppResult<Vec<Materia>>;
    /// Owner-independent listing for the recommendation context, in id order
    async fn list_materias_catalogo(&self, limite: i64) -> AppResult<Vec<Materia>>;
    async fn materia_exists(&self, id: i32) -> AppResult<bool>;
    async fn get_materia(&self, id: i32, usuario_id: i32) -> AppResult<Materia>;
    async fn create_materia(&self, usuario_id: i32, datos: NuevaMateria) -> AppResult<Materia>;
    async fn update_materia(
        &self,
        id: i32,
        usuario_id: i32,
        cambios: ActualizarMateria,
    ) -> AppResult<Materia>;
    async fn delete_materia(&self, id: i32, usuario_id: i32) -> AppResult<()>;

    // Planes
    async fn list_planes(&self, usuario_id: i32) -> AppResult<Vec<Plan>>;
    async fn get_plan(&self, id: i32, usuario_id: i32) -> AppResult<Plan>;
    async fn create_plan(&self, usuario_id: i32, datos: NuevoPlan) -> AppResult<Plan>;
    async fn update_plan(
        &self,
        id: i32,
        usuario_id: i32,
        cambios: ActualizarPlan,
    ) -> AppResult<Plan>;
    async fn delete_plan(&self, id: i32, usuario_id: i32) -> AppResult<()>;

    // Sesiones de estudio
    async fn list_sesiones(
        &self,
        usuario_id: i32,
        fecha: Option<NaiveDate>,
    ) -> AppResult<Vec<SesionEstudio>>;
    async fn get_sesion(&self, id: i32, usuario_id: i32) -> AppResult<SesionEstudio>;
    async fn create_sesion(&self, usuario_id: i32, datos: NuevaSesion)
        -> AppResult<SesionEstudio>;
    async fn update_sesion(
        &self,
        id: i32,
        usuario_id: i32,
        cambios: ActualizarSesion,
    ) -> AppResult<SesionEstudio>;
    async fn delete_sesion(&self, id: i32, usuario_id: i32) -> AppResult<()>;

    /// All of a user's sesiones joined with materia name and dificultad,
    /// in storage (id) order
    async fn historial_sesiones(&self, usuario_id: i32) -> AppResult<Vec<HistorialSesion>>;
}
