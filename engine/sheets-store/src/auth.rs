//! Google service-account authentication
//!
//! Signs a short-lived RS256 JWT assertion with the service account's private
//! key and exchanges it for a bearer token. Tokens are cached until shortly
//! before they expire.

use crate::config::SCOPES;
use crate::{Result, StoreError};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::sync::Mutex;
use tracing::{debug, info};

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
const EXPIRY_MARGIN_SECS: i64 = 60;

/// The fields of a service-account key file we use
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

/// JWT claims for the token exchange
#[derive(Debug, Serialize, Deserialize)]
pub struct AssertionClaims {
    pub iss: String,
    pub scope: String,
    pub aud: String,
    pub exp: i64,
    pub iat: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

#[derive(Debug, Clone)]
struct CachedToken {
    token: String,
    expires_at: DateTime<Utc>,
}

pub struct ServiceAccountAuth {
    key: ServiceAccountKey,
    encoding_key: EncodingKey,
    client: reqwest::Client,
    cached: Mutex<Option<CachedToken>>,
}

impl ServiceAccountAuth {
    /// Load the key file and prepare the signing key
    pub fn from_file(path: &Path, client: reqwest::Client) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            StoreError::credentials(format!(
                "failed to read service account file {}: {}",
                path.display(),
                e
            ))
        })?;
        let key: ServiceAccountKey = serde_json::from_str(&raw).map_err(|e| {
            StoreError::credentials(format!("invalid service account file {}: {}", path.display(), e))
        })?;
        Self::from_key(key, client)
    }

    pub fn from_key(key: ServiceAccountKey, client: reqwest::Client) -> Result<Self> {
        let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
            .map_err(|e| StoreError::credentials(format!("invalid private key: {}", e)))?;

        info!(client_email = %key.client_email, "Loaded service account credentials");
        Ok(Self { key, encoding_key, client, cached: Mutex::new(None) })
    }

    pub fn client_email(&self) -> &str {
        &self.key.client_email
    }

    /// Bearer token, refreshed when missing or about to expire
    pub async fn access_token(&self) -> Result<String> {
        let mut cached = self.cached.lock().await;
        let now = Utc::now();

        if let Some(token) = cached.as_ref() {
            if token.expires_at > now {
                return Ok(token.token.clone());
            }
        }

        let fresh = self.exchange(now).await?;
        let token = fresh.token.clone();
        *cached = Some(fresh);
        Ok(token)
    }

    fn assertion(&self, now: DateTime<Utc>) -> Result<String> {
        let claims = assertion_claims(&self.key, now);
        Ok(encode(&Header::new(Algorithm::RS256), &claims, &self.encoding_key)?)
    }

    async fn exchange(&self, now: DateTime<Utc>) -> Result<CachedToken> {
        debug!(token_uri = %self.key.token_uri, "Exchanging service account assertion");

        let assertion = self.assertion(now)?;
        let response = self
            .client
            .post(&self.key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(StoreError::Api { operation: "token exchange", status: status.as_u16(), message });
        }

        let body: TokenResponse = response.json().await?;
        let lifetime = (body.expires_in - EXPIRY_MARGIN_SECS).max(0);
        Ok(CachedToken { token: body.access_token, expires_at: now + Duration::seconds(lifetime) })
    }
}

pub fn assertion_claims(key: &ServiceAccountKey, now: DateTime<Utc>) -> AssertionClaims {
    let iat = now.timestamp();
    AssertionClaims {
        iss: key.client_email.clone(),
        scope: SCOPES.join(" "),
        aud: key.token_uri.clone(),
        exp: iat + ASSERTION_LIFETIME_SECS,
        iat,
    }
}
