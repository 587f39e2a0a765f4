use actix_web::{web, FromRequest, HttpRequest, ResponseError};
use futures_util::future::{ready, Ready};

use crate::{domain::capabilities::CallerIdentity, utils::{ErrorBody, ErrorKind}};

use super::jwt::Tokenizer;

pub const TOKEN_COOKIE: &str = "token";

// Extractor for any logged in user
pub struct IsUser(pub CallerIdentity);

#[derive(thiserror::Error, Debug)]
pub enum AuthError{
    #[error("Missing session token")]
    MissingToken,
    #[error("Invalid or expired session token")]
    InvalidToken,
    #[error("Token validation is not configured")]
    MissingTokenizer
}

impl ResponseError for AuthError {
    fn error_response(&self) -> actix_web::HttpResponse<actix_web::body::BoxBody> {
        let kind = match self {
            AuthError::MissingTokenizer => ErrorKind::StorageFault,
            _ => ErrorKind::Unauthorized
        };
        ErrorBody::new(kind, self.to_string()).into_response()
    }
}

// Authorization: Bearer <token> wins over the cookie
fn read_token(req: &HttpRequest) -> Option<String> {
    let from_header = req.headers()
        .get("Authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty());

    from_header.or_else(|| req.cookie(TOKEN_COOKIE).map(|c| c.value().to_string()))
}

impl FromRequest for IsUser {
    type Error = AuthError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        let tokenizer = match req.app_data::<web::Data<Tokenizer>>() {
            Some(t) => t,
            None => {
                tracing::error!("Tokenizer missing from app data");
                return ready(Err(AuthError::MissingTokenizer))
            }
        };

        let token = match read_token(req) {
            Some(t) => t,
            None => return ready(Err(AuthError::MissingToken))
        };

        match tokenizer.decode_key(&token){
            Some(claims) => ready(Ok(IsUser(claims.identity()))),
            None => ready(Err(AuthError::InvalidToken))
        }
    }
}
