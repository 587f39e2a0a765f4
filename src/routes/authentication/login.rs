use std::{error::Error, fmt::Debug};

use actix_web::{cookie::{time::Duration, Cookie}, web, HttpResponse, ResponseError};
use anyhow::Context;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    auth::{extractors::TOKEN_COOKIE, jwt::Tokenizer, password::verify_password},
    db_interaction::get_user_from_email,
    domain::user_email::UserEmail,
    utils::{error_fmt_chain, get_pooled_connection, DbPool, ErrorBody, ErrorKind}
};

#[derive(Deserialize, Debug)]
pub struct LoginJson{
    pub email: Option<String>,
    pub password: Option<SecretString>
}

#[derive(Serialize, Deserialize, Debug)]
pub struct LoginResponse{
    pub token: String
}

#[derive(Error)]
pub enum LoginError{
    #[error("email and password are required")]
    MissingCredentials,
    #[error("email or password is incorrect")]
    InvalidCredentials,
    #[error("Failed to login")]
    UnexpectedError(#[from] anyhow::Error)
}

impl Debug for LoginError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

impl ResponseError for LoginError {
    fn error_response(&self) -> HttpResponse<actix_web::body::BoxBody> {
        let kind = match self {
            LoginError::MissingCredentials => ErrorKind::InvalidRequest,
            LoginError::InvalidCredentials => ErrorKind::Unauthorized,
            LoginError::UnexpectedError(_) => {
                tracing::error!(error = ?self, "Login failed");
                ErrorKind::StorageFault
            }
        };
        ErrorBody::new(kind, self.to_string()).into_response()
    }
}

#[tracing::instrument(
    "Logging in user",
    skip(pool, tokenizer, json)
)]
pub async fn login(
    pool: web::Data<DbPool>,
    tokenizer: web::Data<Tokenizer>,
    json: web::Json<LoginJson>
) -> Result<HttpResponse, LoginError>{
    let json = json.into_inner();

    let (email, password) = match (json.email, json.password) {
        (Some(email), Some(password)) if !password.expose_secret().is_empty() => (email, password),
        _ => return Err(LoginError::MissingCredentials)
    };

    let email = UserEmail::parse(email)
        .map_err(|_| LoginError::InvalidCredentials)?;

    let conn = get_pooled_connection(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;

    let user = match get_user_from_email(conn, email).await? {
        Some(user) => user,
        None => {
            tracing::info!("No user registered with this email");
            return Err(LoginError::InvalidCredentials)
        }
    };

    if !verify_password(password, user.password_hash.clone()).await? {
        tracing::info!("Passwords did not match");
        return Err(LoginError::InvalidCredentials)
    }

    let token = tokenizer.generate_key(&user)
        .context("Failed to sign session token")?;

    let cookie = Cookie::build(TOKEN_COOKIE, token.clone())
        .http_only(true)
        .path("/")
        .max_age(Duration::seconds(tokenizer.expiry_seconds()))
        .finish();

    Ok(HttpResponse::Ok()
        .cookie(cookie)
        .json(LoginResponse{ token }))
}
