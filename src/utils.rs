use std::{error::Error, fmt::Debug, time::Duration};

use actix_web::{http::StatusCode, web, HttpResponse};
use diesel::{connection::SimpleConnection, r2d2::ConnectionManager, SqliteConnection};
use r2d2::{CustomizeConnection, Pool, PooledConnection};
use serde::Serialize;
use thiserror::Error;

use crate::{configuration::DatabaseSettings, telemetry::spawn_blocking_with_tracing};

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;
pub type DbConnection = PooledConnection<ConnectionManager<SqliteConnection>>;

pub fn error_fmt_chain(f: &mut std::fmt::Formatter<'_>, source: &Option<impl Error>) -> std::fmt::Result{
    if let Some(error) = source{
        write!(f, "\n\tCaused By:\n\t")?;
        write!(f, "{:?}", &error)?;
        error_fmt_chain(f, &error.source())
    } else {
        Ok(())
    }
}

// Applied to every connection the pool hands out
#[derive(Debug)]
struct SqlitePragmas{
    busy_timeout: Duration
}

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for SqlitePragmas {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        conn.batch_execute(&format!(
            "PRAGMA busy_timeout = {}; \
             PRAGMA journal_mode = WAL; \
             PRAGMA synchronous = NORMAL; \
             PRAGMA foreign_keys = ON;",
            self.busy_timeout.as_millis()
        ))
        .map_err(diesel::r2d2::Error::QueryError)
    }
}

pub fn get_connection_pool(settings: &DatabaseSettings) -> Result<DbPool, r2d2::Error>{
    let manager = ConnectionManager::<SqliteConnection>::new(settings.path.as_str());

    Pool::builder()
        .max_size(settings.max_connections)
        .connection_customizer(Box::new(SqlitePragmas{
            busy_timeout: Duration::from_millis(settings.busy_timeout_ms)
        }))
        .build(manager)
}

pub async fn get_pooled_connection(
    pool: &web::Data<DbPool>
) -> Result<DbConnection, PoolGetError>{
    let pool_clone = pool.clone();

    let res = spawn_blocking_with_tracing(move || {
        pool_clone.get()
    })
    .await??;

    Ok(res)
}

#[derive(Error)]
pub enum PoolGetError{
    #[error("Failed due to threadpool error")]
    ThreadpoolError(#[from] tokio::task::JoinError),
    #[error("Failed to get connection from pool")]
    DbPoolError(#[from] r2d2::Error),
}

impl Debug for PoolGetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

// Failure categories every endpoint reports in its error body
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind{
    InvalidRequest,
    Unauthorized,
    Forbidden,
    Conflict,
    ProductNotFound,
    SelfPurchaseForbidden,
    InsufficientStock,
    StorageFault
}

impl ErrorKind {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorKind::InvalidRequest => StatusCode::BAD_REQUEST,
            ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorKind::Forbidden | ErrorKind::SelfPurchaseForbidden => StatusCode::FORBIDDEN,
            ErrorKind::Conflict | ErrorKind::InsufficientStock => StatusCode::CONFLICT,
            ErrorKind::ProductNotFound => StatusCode::NOT_FOUND,
            ErrorKind::StorageFault => StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody{
    pub error_kind: ErrorKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_stock: Option<i32>
}

impl ErrorBody {
    pub fn new(error_kind: ErrorKind, message: impl Into<String>) -> Self {
        ErrorBody{
            error_kind,
            message: message.into(),
            available_stock: None
        }
    }

    pub fn with_available_stock(mut self, available_stock: i32) -> Self {
        self.available_stock = Some(available_stock);
        self
    }

    pub fn into_response(self) -> HttpResponse {
        HttpResponse::build(self.error_kind.status_code()).json(self)
    }
}
