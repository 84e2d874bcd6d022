//! Feature flag capability
//!
//! The authenticated client asks a [`FeatureFlags`] implementation whether
//! [`ENABLE_AUTHENTICATION_FEATURE`](crate::types::ENABLE_AUTHENTICATION_FEATURE)
//! is on before every call, so flags can be flipped at runtime.

use crate::types::constants::env_vars;
use crate::{PaymentClientError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Trait for checking runtime feature flags
#[async_trait]
pub trait FeatureFlags: Send + Sync {
    /// Check whether a flag is enabled
    async fn is_enabled(&self, flag: &str) -> Result<bool>;
}

/// In-memory flag store
///
/// Flags that were never set are disabled. Clones share the same store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryFeatureFlags {
    flags: Arc<RwLock<HashMap<String, bool>>>,
}

impl InMemoryFeatureFlags {
    /// Create an empty flag store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with the given flags already set
    pub fn with_flags<I, S>(flags: I) -> Self
    where
        I: IntoIterator<Item = (S, bool)>,
        S: Into<String>,
    {
        let map = flags.into_iter().map(|(k, v)| (k.into(), v)).collect();
        Self {
            flags: Arc::new(RwLock::new(map)),
        }
    }

    /// Set a flag
    pub async fn set(&self, flag: impl Into<String>, enabled: bool) {
        let mut flags = self.flags.write().await;
        flags.insert(flag.into(), enabled);
    }
}

#[async_trait]
impl FeatureFlags for InMemoryFeatureFlags {
    async fn is_enabled(&self, flag: &str) -> Result<bool> {
        let flags = self.flags.read().await;
        Ok(flags.get(flag).copied().unwrap_or(false))
    }
}

type VarLookup = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Flags read from `FEATURE_<UPPER_SNAKE_NAME>` environment variables
///
/// `EnableAuthenticationFeature` is read from
/// `FEATURE_ENABLE_AUTHENTICATION_FEATURE`. Accepted values are `true`,
/// `false`, `1` and `0`; an unset variable means disabled.
#[derive(Clone)]
pub struct EnvFeatureFlags {
    lookup: VarLookup,
}

impl std::fmt::Debug for EnvFeatureFlags {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvFeatureFlags")
            .field("lookup", &"<function>")
            .finish()
    }
}

impl EnvFeatureFlags {
    /// Read flags from the process environment
    pub fn new() -> Self {
        Self::with_lookup(|key| std::env::var(key).ok())
    }

    /// Read flags through an arbitrary variable lookup
    pub fn with_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            lookup: Arc::new(lookup),
        }
    }

    /// Environment variable consulted for a flag
    pub fn variable_name(flag: &str) -> String {
        let mut name = String::from(env_vars::FEATURE_PREFIX);
        let mut previous: Option<char> = None;
        for c in flag.chars() {
            if c.is_ascii_uppercase()
                && previous.is_some_and(|p| p.is_ascii_lowercase() || p.is_ascii_digit())
            {
                name.push('_');
            }
            if c.is_ascii_alphanumeric() {
                name.push(c.to_ascii_uppercase());
            } else {
                name.push('_');
            }
            previous = Some(c);
        }
        name
    }
}

impl Default for EnvFeatureFlags {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FeatureFlags for EnvFeatureFlags {
    async fn is_enabled(&self, flag: &str) -> Result<bool> {
        let variable = Self::variable_name(flag);
        match (self.lookup)(&variable) {
            None => Ok(false),
            Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
                "true" | "1" => Ok(true),
                "false" | "0" | "" => Ok(false),
                other => Err(PaymentClientError::feature_flag(
                    flag,
                    format!("{} has unrecognised value '{}'", variable, other),
                )),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ENABLE_AUTHENTICATION_FEATURE;

    #[tokio::test]
    async fn test_in_memory_flags_default_disabled() {
        let flags = InMemoryFeatureFlags::new();
        assert!(!flags.is_enabled("anything").await.unwrap());
    }

    #[tokio::test]
    async fn test_in_memory_flags_toggle() {
        let flags = InMemoryFeatureFlags::with_flags([(ENABLE_AUTHENTICATION_FEATURE, true)]);
        assert!(flags.is_enabled(ENABLE_AUTHENTICATION_FEATURE).await.unwrap());

        let shared = flags.clone();
        shared.set(ENABLE_AUTHENTICATION_FEATURE, false).await;
        assert!(!flags.is_enabled(ENABLE_AUTHENTICATION_FEATURE).await.unwrap());
    }

    #[test]
    fn test_variable_name() {
        assert_eq!(
            EnvFeatureFlags::variable_name(ENABLE_AUTHENTICATION_FEATURE),
            "FEATURE_ENABLE_AUTHENTICATION_FEATURE"
        );
        assert_eq!(
            EnvFeatureFlags::variable_name("show-banner"),
            "FEATURE_SHOW_BANNER"
        );
    }

    #[tokio::test]
    async fn test_env_flags_values() {
        let flags = EnvFeatureFlags::with_lookup(|key| match key {
            "FEATURE_ON" => Some("TRUE".to_string()),
            "FEATURE_ONE" => Some("1".to_string()),
            "FEATURE_OFF" => Some("false".to_string()),
            "FEATURE_BROKEN" => Some("maybe".to_string()),
            _ => None,
        });

        assert!(flags.is_enabled("On").await.unwrap());
        assert!(flags.is_enabled("One").await.unwrap());
        assert!(!flags.is_enabled("Off").await.unwrap());
        assert!(!flags.is_enabled("Unset").await.unwrap());

        let err = flags.is_enabled("Broken").await.unwrap_err();
        assert!(matches!(err, PaymentClientError::FeatureFlag { .. }));
    }
}
