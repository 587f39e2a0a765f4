use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use crate::{configuration::JWTSettings, domain::capabilities::{CallerIdentity, Capabilities}, models::User};

// Issues and verifies the HS256 session tokens handed out on login
#[derive(Clone)]
pub struct Tokenizer{
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    pub expiry_hours: u64
}

impl Tokenizer {
    pub fn new(settings: &JWTSettings) -> Self {
        let secret = settings.secret.expose_secret().as_bytes();
        Self{
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            expiry_hours: settings.expiry_hours
        }
    }

    pub fn expiry_seconds(&self) -> i64 {
        self.expiry_hours as i64 * 3600
    }

    pub fn generate_key(&self, user: &User) -> Result<String, jsonwebtoken::errors::Error>{
        let expiry = Utc::now() + Duration::hours(self.expiry_hours as i64);

        let claims = Claims{
            sub: user.id,
            exp: expiry.timestamp() as usize,
            email: user.email.clone(),
            capabilities: user.capabilities()
        };

        jsonwebtoken::encode(&Header::default(), &claims, &self.encoding_key)
    }

    pub fn decode_key(&self, token: &str) -> Option<Claims>{
        match jsonwebtoken::decode::<Claims>(
            token,
            &self.decoding_key,
            &Validation::new(Algorithm::HS256)
        ) {
            Ok(decoded_data) => Some(decoded_data.claims),
            Err(e) => {
                tracing::debug!(error = %e, "Rejected session token");
                None
            }
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims{
    pub sub: i32,
    pub exp: usize,
    pub email: String,
    #[serde(flatten)]
    pub capabilities: Capabilities
}

impl Claims {
    pub fn identity(&self) -> CallerIdentity {
        CallerIdentity{
            id: self.sub,
            capabilities: self.capabilities
        }
    }
}
