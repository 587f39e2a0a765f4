use std::{error::Error, fmt::Debug};

use actix_web::{web, HttpResponse, ResponseError};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    db_interaction::{insert_user_into_database, UserInsertError},
    domain::{capabilities::Capabilities, phone_number::PhoneNumberDomain, user_email::UserEmail},
    models::UserSummary,
    utils::{error_fmt_chain, get_pooled_connection, DbPool, ErrorBody, ErrorKind}
};

#[derive(Deserialize, Debug)]
pub struct RegistrationJson{
    email: Option<String>,
    phone: Option<String>,
    name: Option<String>,
    password: Option<SecretString>
}

#[derive(Serialize, Deserialize, Debug)]
pub struct RegistrationResponse{
    pub message: String,
    pub user: UserSummary
}

#[derive(Error)]
pub enum RegisterError{
    #[error("{0}")]
    InvalidRequest(String),
    #[error("an account with this email is already registered")]
    UserAlreadyExists(#[source] UserInsertError),
    #[error("unexpected error occured")]
    UnexpectedError(#[from] anyhow::Error)
}

impl Debug for RegisterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

impl ResponseError for RegisterError{
    fn error_response(&self) -> HttpResponse<actix_web::body::BoxBody> {
        let kind = match self {
            RegisterError::InvalidRequest(_) => ErrorKind::InvalidRequest,
            RegisterError::UserAlreadyExists(_) => ErrorKind::Conflict,
            RegisterError::UnexpectedError(_) => {
                tracing::error!(error = ?self, "Registration failed");
                ErrorKind::StorageFault
            }
        };
        ErrorBody::new(kind, self.to_string()).into_response()
    }
}

fn required(field: Option<String>, name: &str) -> Result<String, RegisterError> {
    field.map(|f| f.trim().to_string())
        .filter(|f| !f.is_empty())
        .ok_or_else(|| RegisterError::InvalidRequest(format!("{} is required", name)))
}

#[tracing::instrument(
    "User registration started",
    skip(pool, json)
)]
pub async fn register(
    json: web::Json<RegistrationJson>,
    pool: web::Data<DbPool>
) -> Result<HttpResponse, RegisterError> {
    let json = json.into_inner();

    let email = UserEmail::parse(required(json.email, "email")?)
        .map_err(RegisterError::InvalidRequest)?;
    let phone = PhoneNumberDomain::parse(required(json.phone, "phone")?)
        .map_err(RegisterError::InvalidRequest)?;
    let name = required(json.name, "name")?;
    let password = json.password
        .filter(|p| !p.expose_secret().is_empty())
        .ok_or_else(|| RegisterError::InvalidRequest("password is required".to_string()))?;

    let conn = get_pooled_connection(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;

    let user = insert_user_into_database(conn, name, email, phone, password, Capabilities::default())
        .await
        .map_err(|e| match e {
            UserInsertError::EmailNotUnique(_) => RegisterError::UserAlreadyExists(e),
            UserInsertError::UnexpectedError(e) => RegisterError::UnexpectedError(e)
        })?;

    tracing::info!(user_id = user.id, "User registered");

    Ok(HttpResponse::Ok().json(RegistrationResponse{
        message: format!("Welcome, {}! Your registration was successful.", user.name),
        user
    }))
}
