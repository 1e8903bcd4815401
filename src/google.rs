//! Service-account authorization for Google APIs.
//!
//! Exchanges a self-signed RS256 JWT for an OAuth access token and caches it
//! until shortly before it expires.

use base64::{
    engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD},
    Engine as _,
};
use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use ring::{
    rand::SystemRandom,
    signature::{RsaKeyPair, RSA_PKCS1_SHA256},
};
use serde::{Deserialize, Serialize};
use std::{
    fmt,
    sync::{Arc, Mutex, PoisonError},
};

pub const SPREADSHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECONDS: i64 = 3600;
const REFRESH_MARGIN_SECONDS: i64 = 60;

/// The fields of a service-account key file that token exchange needs.
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    pub token_uri: String,
}

impl ServiceAccountKey {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("private_key", &"<redacted>")
            .field("token_uri", &self.token_uri)
            .finish()
    }
}

#[derive(Debug)]
pub enum AuthError {
    Pem(base64::DecodeError),
    Key(ring::error::KeyRejected),
    Claims(serde_json::Error),
    Signing(ring::error::Unspecified),
    Token(reqwest::Error),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::Pem(err) => write!(f, "unreadable private key: {}", err),
            AuthError::Key(err) => write!(f, "rejected private key: {}", err),
            AuthError::Claims(err) => write!(f, "unable to encode claims: {}", err),
            AuthError::Signing(err) => write!(f, "unable to sign assertion: {}", err),
            AuthError::Token(err) => write!(f, "token exchange failed: {}", err),
        }
    }
}

impl std::error::Error for AuthError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AuthError::Pem(err) => Some(err),
            AuthError::Claims(err) => Some(err),
            AuthError::Token(err) => Some(err),
            AuthError::Key(_) | AuthError::Signing(_) => None,
        }
    }
}

#[derive(Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

#[derive(Clone, Debug)]
struct CachedToken {
    value: String,
    expires_at: DateTime<Utc>,
}

/// Hands out access tokens for one scope, reusing a token until it nears expiry.
#[derive(Clone)]
pub struct TokenProvider {
    client: Client,
    client_email: String,
    token_uri: String,
    scope: String,
    key_pair: Arc<RsaKeyPair>,
    rng: SystemRandom,
    cached: Arc<Mutex<Option<CachedToken>>>,
}

impl fmt::Debug for TokenProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenProvider")
            .field("client_email", &self.client_email)
            .field("token_uri", &self.token_uri)
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

impl TokenProvider {
    pub fn new(client: Client, key: &ServiceAccountKey, scope: &str) -> Result<Self, AuthError> {
        let der = pem_to_der(&key.private_key).map_err(AuthError::Pem)?;
        let key_pair = RsaKeyPair::from_pkcs8(&der).map_err(AuthError::Key)?;

        Ok(TokenProvider {
            client,
            client_email: key.client_email.clone(),
            token_uri: key.token_uri.clone(),
            scope: scope.to_string(),
            key_pair: Arc::new(key_pair),
            rng: SystemRandom::new(),
            cached: Arc::new(Mutex::new(None)),
        })
    }

    pub async fn token(&self) -> Result<String, AuthError> {
        if let Some(token) = self.cached_token(Utc::now()) {
            return Ok(token);
        }

        log::debug!("Requesting access token for {}", self.client_email);

        let assertion = self.assertion(Utc::now())?;

        let response = self
            .client
            .post(&self.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(AuthError::Token)?
            .json::<TokenResponse>()
            .await
            .map_err(AuthError::Token)?;

        let token = CachedToken {
            value: response.access_token,
            expires_at: Utc::now() + Duration::seconds(response.expires_in),
        };

        *self.cached.lock().unwrap_or_else(PoisonError::into_inner) = Some(token.clone());

        Ok(token.value)
    }

    fn cached_token(&self, now: DateTime<Utc>) -> Option<String> {
        self.cached
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .filter(|token| token.expires_at - Duration::seconds(REFRESH_MARGIN_SECONDS) > now)
            .map(|token| token.value.clone())
    }

    fn assertion(&self, now: DateTime<Utc>) -> Result<String, AuthError> {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"RS256","typ":"JWT"}"#);

        let claims = Claims {
            iss: &self.client_email,
            scope: &self.scope,
            aud: &self.token_uri,
            iat: now.timestamp(),
            exp: now.timestamp() + ASSERTION_LIFETIME_SECONDS,
        };
        let claims = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims).map_err(AuthError::Claims)?);

        let signing_input = format!("{}.{}", header, claims);
        let mut signature = vec![0; self.key_pair.public().modulus_len()];

        self.key_pair
            .sign(
                &RSA_PKCS1_SHA256,
                &self.rng,
                signing_input.as_bytes(),
                &mut signature,
            )
            .map_err(AuthError::Signing)?;

        Ok(format!("{}.{}", signing_input, URL_SAFE_NO_PAD.encode(signature)))
    }
}

fn pem_to_der(pem: &str) -> Result<Vec<u8>, base64::DecodeError> {
    let body: String = pem
        .lines()
        .map(str::trim)
        .filter(|line| !line.starts_with("-----"))
        .collect();

    STANDARD.decode(body)
}
