use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Identity embedded in every issued token, whatever credentials were sent.
pub const DEMO_USERNAME: &str = "demo";

/// Token payload. Tokens carry no expiry; `iat` is informational only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
}

/// Credentials posted to `/login`. Both fields are accepted but not checked.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug)]
pub enum JwtError {
    TokenGeneration(String),
    InvalidToken(String),
}

impl std::fmt::Display for JwtError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JwtError::TokenGeneration(msg) => write!(f, "JWT generation error: {}", msg),
            JwtError::InvalidToken(msg) => write!(f, "Invalid JWT token: {}", msg),
        }
    }
}

impl std::error::Error for JwtError {}

/// HS256 signing and verification keys derived from the shared secret.
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenKeys {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Issued tokens have no `exp`; signature correctness is the only check.
        validation.required_spec_claims.clear();
        validation.validate_exp = false;

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Issue a token for the demo identity. The submitted credentials are
    /// only used for logging.
    pub fn issue_token(&self, credentials: &Credentials) -> Result<String, JwtError> {
        tracing::debug!(
            submitted_username = credentials.username.as_deref().unwrap_or(""),
            "issuing token for demo identity"
        );

        let claims = Claims {
            username: DEMO_USERNAME.to_string(),
            iat: Some(Utc::now().timestamp()),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| JwtError::TokenGeneration(e.to_string()))
    }

    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| JwtError::InvalidToken(e.to_string()))
    }
}
