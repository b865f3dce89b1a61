use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use anyhow::{bail, Result};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::error::ApiError;

/// Header carrying the caller's API key
pub const API_KEY_HEADER: &str = "x-api-key";

/// Static set of authorized API keys, each mapped to a human-readable owner
///
/// Built once at startup and never mutated afterwards. Cloning is cheap and
/// shares the underlying table.
#[derive(Clone, Default)]
pub struct ApiKeyRegistry {
    keys: Arc<HashMap<String, String>>,
}

impl ApiKeyRegistry {
    /// Build a registry from `(key, owner)` pairs, rejecting empty or duplicate keys
    pub fn new<I, K, O>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, O)>,
        K: Into<String>,
        O: Into<String>,
    {
        let mut keys = HashMap::new();
        for (key, owner) in entries {
            let key = key.into();
            if key.is_empty() {
                bail!("API key must not be empty");
            }
            let owner = owner.into();
            if keys.insert(key, owner.clone()).is_some() {
                bail!("duplicate API key for owner '{}'", owner);
            }
        }
        Ok(Self {
            keys: Arc::new(keys),
        })
    }

    /// Parse a `key:owner,key:owner` list
    ///
    /// Surrounding whitespace of each pair is ignored, but keys are otherwise
    /// taken verbatim. The owner is everything after the first `:`.
    pub fn parse(raw: &str) -> Result<Self> {
        let mut entries = Vec::new();
        for pair in raw.split(',').map(str::trim).filter(|pair| !pair.is_empty()) {
            let Some((key, owner)) = pair.split_once(':') else {
                bail!("expected 'key:owner', got an entry without ':'");
            };
            if owner.is_empty() {
                bail!("owner label must not be empty");
            }
            entries.push((key, owner));
        }
        let registry = Self::new(entries)?;
        if registry.is_empty() {
            bail!("at least one API key is required");
        }
        Ok(registry)
    }

    /// Owner of `key`, using an exact case-sensitive match
    pub fn owner(&self, key: &str) -> Option<&str> {
        self.keys.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

// Keys are secrets, only owners are printed.
impl fmt::Debug for ApiKeyRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut owners: Vec<&str> = self.keys.values().map(String::as_str).collect();
        owners.sort_unstable();
        f.debug_struct("ApiKeyRegistry").field("owners", &owners).finish()
    }
}

/// Middleware gate that rejects requests without a registered API key
///
/// Runs before route dispatch; on failure the inner handler is never called
/// and the caller receives `401 {"detail": "Invalid API Key"}`.
pub async fn require_api_key(
    State(registry): State<ApiKeyRegistry>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let presented = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok());

    match presented.and_then(|key| registry.owner(key)) {
        Some(owner) => {
            tracing::debug!(owner, path = %request.uri().path(), "API key accepted");
            Ok(next.run(request).await)
        }
        None => {
            tracing::warn!(
                path = %request.uri().path(),
                header_present = presented.is_some(),
                "Rejected request with missing or unknown API key"
            );
            Err(ApiError::Unauthorized)
        }
    }
}
