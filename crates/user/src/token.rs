use std::time::{SystemTime, UNIX_EPOCH};

use eventbook_shared::{Error, Result};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    aud: String,
    exp: u64,
    iat: u64,
    iss: String,
    sub: String,
}

/// Mints and resolves HS256 identity tokens signed with the process-wide secret.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    audience: String,
    lifetime_secs: u64,
}

impl TokenIssuer {
    pub fn new(
        secret: &str,
        issuer: impl Into<String>,
        audience: impl Into<String>,
        lifetime_secs: u64,
    ) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            issuer: issuer.into(),
            audience: audience.into(),
            lifetime_secs,
        }
    }

    pub fn issue(&self, user_id: &str) -> Result<String> {
        let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();

        self.issue_at(user_id, now)
    }

    pub fn issue_at(&self, user_id: &str, issued_at: u64) -> Result<String> {
        let claims = Claims {
            aud: self.audience.to_owned(),
            exp: issued_at + self.lifetime_secs,
            iat: issued_at,
            iss: self.issuer.to_owned(),
            sub: user_id.to_owned(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| Error::Unknown(e.into()))
    }

    /// Returns the user id carried by a token whose signature, issuer, audience and expiry check out.
    pub fn resolve(&self, token: &str) -> Result<String> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[self.issuer.to_owned()]);
        validation.set_audience(&[self.audience.to_owned()]);
        validation.leeway = 0;

        let token_data =
            decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
                match e.kind() {
                    ErrorKind::ExpiredSignature => Error::ExpiredToken,
                    _ => {
                        tracing::debug!(error = %e, "token rejected");
                        Error::InvalidToken
                    }
                }
            })?;

        Ok(token_data.claims.sub)
    }
}
