use chrono::NaiveDate;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::Store,
    error::{AppError, AppResult},
    models::{
        ActualizarMateria, ActualizarPlan, ActualizarSesion, ActualizarUsuario, Cuenta,
        HistorialSesion, Materia, NuevaMateria, NuevaSesion, NuevoPlan, NuevoUsuario, Plan,
        SesionEstudio, Usuario,
    },
};

/// Creates a PostgreSQL connection pool
///
/// Establishes a pool of database connections for efficient reuse.
/// The pool automatically manages connection lifecycle and limits.
pub async fn create_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    Ok(pool)
}

/// Postgres-backed implementation of the profile store
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Runs the embedded migrations at startup
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }
}

/// Postgres unique-constraint violations surface as user errors, not 500s
fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .and_then(|db| db.code())
        .map(|code| code == "23505")
        .unwrap_or(false)
}

fn map_insert_error(err: sqlx::Error, detail: &str) -> AppError {
    if is_unique_violation(&err) {
        AppError::InvalidInput(detail.to_string())
    } else {
        AppError::Database(err)
    }
}

#[async_trait::async_trait]
impl Store for PgStore {
    async fn find_cuenta_by_token(&self, token: &str) -> AppResult<Option<Cuenta>> {
        let cuenta = sqlx::query_as::<_, Cuenta>(
            "SELECT id, correo, token, created_at FROM cuentas WHERE token = $1",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(cuenta)
    }

    async fn find_usuario_by_cuenta(&self, cuenta_id: i32) -> AppResult<Option<Usuario>> {
        let usuario =
            sqlx::query_as::<_, Usuario>("SELECT * FROM usuarios WHERE cuenta_id = $1")
                .bind(cuenta_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(usuario)
    }

    async fn list_usuarios(&self) -> AppResult<Vec<Usuario>> {
        let usuarios = sqlx::query_as::<_, Usuario>("SELECT * FROM usuarios ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        Ok(usuarios)
    }

    async fn get_usuario(&self, id: i32) -> AppResult<Usuario> {
        sqlx::query_as::<_, Usuario>("SELECT * FROM usuarios WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("usuario {} no existe", id)))
    }

    async fn create_usuario(
        &self,
        cuenta_id: i32,
        correo: &str,
        datos: NuevoUsuario,
    ) -> AppResult<Usuario> {
        sqlx::query_as::<_, Usuario>(
            r#"
            INSERT INTO usuarios
                (cuenta_id, nombre, correo, nivel_estudios, disponibilidad,
                 dias_libres, periodo_preferencia)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(cuenta_id)
        .bind(&datos.nombre)
        .bind(correo)
        .bind(&datos.nivel_estudios)
        .bind(datos.disponibilidad.unwrap_or(true))
        .bind(datos.dias_libres.unwrap_or_default())
        .bind(datos.periodo_preferencia.unwrap_or_default())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_insert_error(e, "ya existe un usuario con ese nombre o correo"))
    }

    async fn update_usuario(&self, id: i32, cambios: ActualizarUsuario) -> AppResult<Usuario> {
        sqlx::query_as::<_, Usuario>(
            r#"
            UPDATE usuarios SET
                nombre = COALESCE($2, nombre),
                nivel_estudios = COALESCE($3, nivel_estudios),
                disponibilidad = COALESCE($4, disponibilidad),
                dias_libres = COALESCE($5, dias_libres),
                periodo_preferencia = COALESCE($6, periodo_preferencia),
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(cambios.nombre)
        .bind(cambios.nivel_estudios)
        .bind(cambios.disponibilidad)
        .bind(cambios.dias_libres)
        .bind(cambios.periodo_preferencia)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_insert_error(e, "ya existe un usuario con ese nombre"))?
        .ok_or_else(|| AppError::NotFound(format!("usuario {} no existe", id)))
    }

    async fn delete_usuario(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM usuarios WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("usuario {} no existe", id)));
        }

        Ok(())
    }

    async fn list_materias(&self, usuario_id: i32) -> AppResult<Vec<Materia>> {
        let materias = sqlx::query_as::<_, Materia>(
            "SELECT * FROM materias WHERE usuario_id = $1 ORDER BY id",
        )
        .bind(usuario_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(materias)
    }

    async fn list_materias_catalogo(&self, limite: i64) -> AppResult<Vec<Materia>> {
        let materias = sqlx::query_as::<_, Materia>("SELECT * FROM materias ORDER BY id LIMIT $1")
            .bind(limite)
            .fetch_all(&self.pool)
            .await?;

        Ok(materias)
    }

    async fn materia_exists(&self, id: i32) -> AppResult<bool> {
        let existe: Option<(i32,)> = sqlx::query_as("SELECT id FROM materias WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(existe.is_some())
    }

    async fn get_materia(&self, id: i32, usuario_id: i32) -> AppResult<Materia> {
        sqlx::query_as::<_, Materia>("SELECT * FROM materias WHERE id = $1 AND usuario_id = $2")
            .bind(id)
            .bind(usuario_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("materia {} no existe", id)))
    }

    async fn create_materia(&self, usuario_id: i32, datos: NuevaMateria) -> AppResult<Materia> {
        let materia = sqlx::query_as::<_, Materia>(
            r#"
            INSERT INTO materias (usuario_id, nombre, dificultad, notas)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(usuario_id)
        .bind(&datos.nombre)
        .bind(&datos.dificultad)
        .bind(datos.notas.unwrap_or_default())
        .fetch_one(&self.pool)
        .await?;

        Ok(materia)
    }

    async fn update_materia(
        &self,
        id: i32,
        usuario_id: i32,
        cambios: ActualizarMateria,
    ) -> AppResult<Materia> {
        sqlx::query_as::<_, Materia>(
            r#"
            UPDATE materias SET
                nombre = COALESCE($3, nombre),
                dificultad = COALESCE($4, dificultad),
                notas = COALESCE($5, notas),
                updated_at = now()
            WHERE id = $1 AND usuario_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(usuario_id)
        .bind(cambios.nombre)
        .bind(cambios.dificultad)
        .bind(cambios.notas)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("materia {} no existe", id)))
    }

    async fn delete_materia(&self, id: i32, usuario_id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM materias WHERE id = $1 AND usuario_id = $2")
            .bind(id)
            .bind(usuario_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("materia {} no existe", id)));
        }

        Ok(())
    }

    async fn list_planes(&self, usuario_id: i32) -> AppResult<Vec<Plan>> {
        let planes =
            sqlx::query_as::<_, Plan>("SELECT * FROM planes WHERE usuario_id = $1 ORDER BY id")
                .bind(usuario_id)
                .fetch_all(&self.pool)
                .await?;

        Ok(planes)
    }

    async fn get_plan(&self, id: i32, usuario_id: i32) -> AppResult<Plan> {
        sqlx::query_as::<_, Plan>("SELECT * FROM planes WHERE id = $1 AND usuario_id = $2")
            .bind(id)
            .bind(usuario_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("plan {} no existe", id)))
    }

    async fn create_plan(&self, usuario_id: i32, datos: NuevoPlan) -> AppResult<Plan> {
        let plan = sqlx::query_as::<_, Plan>(
            r#"
            INSERT INTO planes (usuario_id, nombre, contenido, fuente, estado)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(usuario_id)
        .bind(&datos.nombre)
        .bind(datos.contenido.unwrap_or_default())
        .bind(datos.fuente.unwrap_or_default())
        .bind(datos.estado.unwrap_or(true))
        .fetch_one(&self.pool)
        .await?;

        Ok(plan)
    }

    async fn update_plan(
        &self,
        id: i32,
        usuario_id: i32,
        cambios: ActualizarPlan,
    ) -> AppResult<Plan> {
        sqlx::query_as::<_, Plan>(
            r#"
            UPDATE planes SET
                nombre = COALESCE($3, nombre),
                contenido = COALESCE($4, contenido),
                fuente = COALESCE($5, fuente),
                estado = COALESCE($6, estado),
                updated_at = now()
            WHERE id = $1 AND usuario_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(usuario_id)
        .bind(cambios.nombre)
        .bind(cambios.contenido)
        .bind(cambios.fuente)
        .bind(cambios.estado)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("plan {} no existe", id)))
    }

    async fn delete_plan(&self, id: i32, usuario_id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM planes WHERE id = $1 AND usuario_id = $2")
            .bind(id)
            .bind(usuario_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("plan {} no existe", id)));
        }

        Ok(())
    }

    async fn list_sesiones(
        &self,
        usuario_id: i32,
        fecha: Option<NaiveDate>,
    ) -> AppResult<Vec<SesionEstudio>> {
        let sesiones = match fecha {
            Some(fecha) => {
                sqlx::query_as::<_, SesionEstudio>(
                    "SELECT * FROM sesiones_estudio WHERE usuario_id = $1 AND fecha = $2 ORDER BY id",
                )
                .bind(usuario_id)
                .bind(fecha)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, SesionEstudio>(
                    "SELECT * FROM sesiones_estudio WHERE usuario_id = $1 ORDER BY id",
                )
                .bind(usuario_id)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(sesiones)
    }

    async fn get_sesion(&self, id: i32, usuario_id: i32) -> AppResult<SesionEstudio> {
        sqlx::query_as::<_, SesionEstudio>(
            "SELECT * FROM sesiones_estudio WHERE id = $1 AND usuario_id = $2",
        )
        .bind(id)
        .bind(usuario_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("sesión {} no existe", id)))
    }

    async fn create_sesion(
        &self,
        usuario_id: i32,
        datos: NuevaSesion,
    ) -> AppResult<SesionEstudio> {
        let sesion = sqlx::query_as::<_, SesionEstudio>(
            r#"
            INSERT INTO sesiones_estudio
                (usuario_id, materia_id, plan_id, nombre, descripcion,
                 duracion, estado, fecha, hora_inicio)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(usuario_id)
        .bind(datos.materia_id)
        .bind(datos.plan_id)
        .bind(&datos.nombre)
        .bind(datos.descripcion.unwrap_or_default())
        .bind(datos.duracion)
        .bind(datos.estado.unwrap_or(true))
        .bind(datos.fecha)
        .bind(datos.hora_inicio)
        .fetch_one(&self.pool)
        .await?;

        Ok(sesion)
    }

    async fn update_sesion(
        &self,
        id: i32,
        usuario_id: i32,
        cambios: ActualizarSesion,
    ) -> AppResult<SesionEstudio> {
        sqlx::query_as::<_, SesionEstudio>(
            r#"
            UPDATE sesiones_estudio SET
                materia_id = COALESCE($3, materia_id),
                plan_id = COALESCE($4, plan_id),
                nombre = COALESCE($5, nombre),
                descripcion = COALESCE($6, descripcion),
                duracion = COALESCE($7, duracion),
                estado = COALESCE($8, estado),
                fecha = COALESCE($9, fecha),
                hora_inicio = COALESCE($10, hora_inicio),
                updated_at = now()
            WHERE id = $1 AND usuario_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(usuario_id)
        .bind(cambios.materia_id)
        .bind(cambios.plan_id)
        .bind(cambios.nombre)
        .bind(cambios.descripcion)
        .bind(cambios.duracion)
        .bind(cambios.estado)
        .bind(cambios.fecha)
        .bind(cambios.hora_inicio)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("sesión {} no existe", id)))
    }

    async fn delete_sesion(&self, id: i32, usuario_id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM sesiones_estudio WHERE id = $1 AND usuario_id = $2")
            .bind(id)
            .bind(usuario_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("sesión {} no existe", id)));
        }

        Ok(())
    }

    async fn historial_sesiones(&self, usuario_id: i32) -> AppResult<Vec<HistorialSesion>> {
        let historial = sqlx::query_as::<_, HistorialSesion>(
            r#"
            SELECT s.materia_id, m.nombre AS materia, m.dificultad, s.duracion
            FROM sesiones_estudio s
            JOIN materias m ON m.id = s.materia_id
            WHERE s.usuario_id = $1
            ORDER BY s.id
            "#,
        )
        .bind(usuario_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(historial)
    }
}
