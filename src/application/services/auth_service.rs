//! API key authentication for administrative endpoints.

use serde_json::json;
use sha2::{Digest, Sha256};

use crate::error::AppError;

/// Service that checks API keys presented in the `X-API-Key` header.
///
/// Configured keys are kept only as SHA-256 digests, so the raw secrets are
/// dropped after startup and never appear in memory dumps or debug output.
pub struct AuthService {
    key_digests: Vec<[u8; 32]>,
}

impl AuthService {
    /// Creates a service accepting any of `api_keys`. Empty keys are ignored.
    pub fn new<I, S>(api_keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let key_digests = api_keys
            .into_iter()
            .filter(|key| !key.as_ref().is_empty())
            .map(|key| digest(key.as_ref()))
            .collect();

        Self { key_digests }
    }

    /// Number of accepted keys.
    pub fn key_count(&self) -> usize {
        self.key_digests.len()
    }

    /// Authenticates a raw API key.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if the key is empty or unknown.
    pub fn authenticate(&self, api_key: &str) -> Result<(), AppError> {
        if !api_key.is_empty() {
            let presented = digest(api_key);
            if self.key_digests.iter().any(|known| *known == presented) {
                return Ok(());
            }
        }

        Err(AppError::unauthorized(
            "Unauthorized",
            json!({ "reason": "Invalid or missing API key" }),
        ))
    }
}

fn digest(key: &str) -> [u8; 32] {
    Sha256::digest(key.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authenticate_known_key() {
        let service = AuthService::new(["alpha", "beta"]);
        assert!(service.authenticate("alpha").is_ok());
        assert!(service.authenticate("beta").is_ok());
    }

    #[test]
    fn test_authenticate_unknown_key() {
        let service = AuthService::new(["alpha"]);
        let result = service.authenticate("gamma");
        assert!(matches!(result, Err(AppError::Unauthorized { .. })));
    }

    #[test]
    fn test_empty_keys_never_authenticate() {
        let service = AuthService::new(["", "alpha"]);
        assert_eq!(service.key_count(), 1);
        assert!(service.authenticate("").is_err());
    }

    #[test]
    fn test_no_keys_rejects_everything() {
        let service = AuthService::new(Vec::<String>::new());
        assert!(service.authenticate("anything").is_err());
    }
}
