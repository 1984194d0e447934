use std::fmt;

/// API key for the text-generation provider. `Debug` and `Display` never
/// print the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiCredential(String);

impl ApiCredential {
    /// Returns `None` for blank input.
    pub fn new(secret: impl Into<String>) -> Option<Self> {
        let secret = secret.into();
        let trimmed = secret.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiCredential(***)")
    }
}

impl fmt::Display for ApiCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}

/// Session-scoped holder for at most one credential. Lives in memory only
/// and forgets its contents when dropped.
#[derive(Debug, Default)]
pub struct CredentialStore {
    current: Option<ApiCredential>,
}

impl CredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces any credential already held.
    pub fn set(&mut self, credential: ApiCredential) {
        self.current = Some(credential);
    }

    pub fn get(&self) -> Option<&ApiCredential> {
        self.current.as_ref()
    }

    pub fn is_set(&self) -> bool {
        self.current.is_some()
    }

    pub fn clear(&mut self) {
        self.current = None;
    }
}

impl Drop for CredentialStore {
    fn drop(&mut self) {
        self.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_secret_rejected() {
        assert!(ApiCredential::new("").is_none());
        assert!(ApiCredential::new("   ").is_none());
        assert_eq!(ApiCredential::new(" abc ").unwrap().expose(), "abc");
    }

    #[test]
    fn test_secret_redacted_in_formatting() {
        let credential = ApiCredential::new("super-secret-key").unwrap();
        assert!(!format!("{:?}", credential).contains("super-secret-key"));
        assert!(!format!("{}", credential).contains("super-secret-key"));

        let mut store = CredentialStore::new();
        store.set(credential);
        assert!(!format!("{:?}", store).contains("super-secret-key"));
    }

    #[test]
    fn test_store_lifecycle() {
        let mut store = CredentialStore::new();
        assert!(store.get().is_none());

        store.set(ApiCredential::new("first").unwrap());
        store.set(ApiCredential::new("second").unwrap());
        assert_eq!(store.get().map(|c| c.expose()), Some("second"));

        store.clear();
        assert!(!store.is_set());
    }
}
