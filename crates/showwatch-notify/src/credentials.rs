//! Bearer-token lookup for authenticated channels.
//!
//! Token files are read on every send so that an external refresher can
//! rotate them without restarting the process.

use std::path::Path;

use serde::Deserialize;

use crate::error::DeliveryError;

#[derive(Deserialize)]
struct TokenFile {
    #[serde(alias = "access_token")]
    token: Option<String>,
}

/// Read an access token from `path`.
///
/// Accepts either an OAuth token JSON document (`{"token": ...}` or
/// `{"access_token": ...}`) or a file containing only the token.
///
/// # Errors
///
/// Returns [`DeliveryError::Credentials`] if the file cannot be read or
/// holds no token.
pub fn read_bearer_token(path: &Path) -> Result<String, DeliveryError> {
    let fail = |reason: String| DeliveryError::Credentials {
        path: path.display().to_string(),
        reason,
    };

    let content = std::fs::read_to_string(path).map_err(|e| fail(e.to_string()))?;
    let trimmed = content.trim();

    let token = if trimmed.starts_with('{') {
        serde_json::from_str::<TokenFile>(trimmed)
            .map_err(|e| fail(format!("invalid token JSON: {e}")))?
            .token
            .unwrap_or_default()
    } else {
        trimmed.to_string()
    };

    if token.trim().is_empty() {
        return Err(fail("no access token present".to_string()));
    }
    Ok(token)
}
