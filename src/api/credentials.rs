//! API key rotation.
//!
//! The rotator owns the ordered key list and the current position. It is
//! owned by a single [`NewsClient`](super::NewsClient) for the lifetime of the
//! process, so there is no ambient rotation state.

use super::error::ConfigurationError;
use secrecy::{ExposeSecret, SecretString};

/// Ordered, non-empty set of API keys with a wrapping cursor.
pub struct CredentialRotator {
    keys: Vec<SecretString>,
    index: usize,
}

impl CredentialRotator {
    /// Build a rotator from the configured keys.
    ///
    /// Blank keys are skipped. Returns [`ConfigurationError::NoCredentials`]
    /// when nothing usable remains, so `current()` can never fail afterwards.
    pub fn new<I>(keys: I) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = SecretString>,
    {
        let keys: Vec<SecretString> = keys
            .into_iter()
            .filter(|k| !k.expose_secret().trim().is_empty())
            .collect();

        if keys.is_empty() {
            return Err(ConfigurationError::NoCredentials);
        }

        tracing::debug!(keys = keys.len(), "Credential rotator initialized");
        Ok(Self { keys, index: 0 })
    }

    /// The credential at the current position.
    pub fn current(&self) -> &SecretString {
        &self.keys[self.index]
    }

    /// Advance to the next credential, wrapping at the end, and return it.
    pub fn rotate(&mut self) -> &SecretString {
        self.index = (self.index + 1) % self.keys.len();
        tracing::info!(
            key_position = self.index + 1,
            keys = self.keys.len(),
            "Switched API key"
        );
        &self.keys[self.index]
    }

    /// Zero-based position of the current credential.
    pub fn position(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Always false; kept for the `len`/`is_empty` pair.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Whether a failed request can be retried with a different key.
    pub fn can_rotate(&self) -> bool {
        self.keys.len() > 1
    }
}

impl std::fmt::Debug for CredentialRotator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialRotator")
            .field("keys", &format_args!("[REDACTED; {}]", self.keys.len()))
            .field("index", &self.index)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn rotator(keys: &[&str]) -> CredentialRotator {
        CredentialRotator::new(keys.iter().map(|k| SecretString::from(k.to_string()))).unwrap()
    }

    #[test]
    fn empty_set_is_a_configuration_error() {
        let result = CredentialRotator::new(Vec::<SecretString>::new());
        assert!(matches!(result, Err(ConfigurationError::NoCredentials)));
    }

    #[test]
    fn blank_keys_are_skipped() {
        let result = CredentialRotator::new(vec![
            SecretString::from("   ".to_string()),
            SecretString::from(String::new()),
        ]);
        assert!(matches!(result, Err(ConfigurationError::NoCredentials)));

        let r = CredentialRotator::new(vec![
            SecretString::from(String::new()),
            SecretString::from("real".to_string()),
        ])
        .unwrap();
        assert_eq!(r.len(), 1);
        assert_eq!(r.current().expose_secret(), "real");
    }

    #[test]
    fn rotate_advances_and_wraps() {
        let mut r = rotator(&["a", "b", "c"]);
        assert_eq!(r.current().expose_secret(), "a");
        assert_eq!(r.rotate().expose_secret(), "b");
        assert_eq!(r.rotate().expose_secret(), "c");
        assert_eq!(r.rotate().expose_secret(), "a");
        assert_eq!(r.position(), 0);
    }

    #[test]
    fn single_key_cannot_rotate() {
        let mut r = rotator(&["only"]);
        assert!(!r.can_rotate());
        assert_eq!(r.rotate().expose_secret(), "only");
        assert_eq!(r.position(), 0);
    }

    #[test]
    fn debug_redacts_keys() {
        let r = rotator(&["super-secret-key"]);
        let out = format!("{:?}", r);
        assert!(!out.contains("super-secret-key"));
        assert!(out.contains("REDACTED"));
    }

    proptest! {
        #[test]
        fn n_rotations_return_to_start(n in 1usize..16, start in 0usize..16) {
            let keys: Vec<String> = (0..n).map(|i| format!("key-{}", i)).collect();
            let mut r = CredentialRotator::new(keys.iter().cloned().map(SecretString::from)).unwrap();
            for _ in 0..(start % n) {
                r.rotate();
            }
            let before = r.current().expose_secret().to_string();
            for _ in 0..n {
                r.rotate();
                prop_assert!(r.position() < r.len());
            }
            prop_assert_eq!(r.current().expose_secret(), before.as_str());
        }
    }
}
