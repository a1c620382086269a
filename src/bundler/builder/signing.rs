//! Notarization credential setup.
//!
//! Credentials come from the package config (a stored `notarytool` keychain
//! profile) or from environment variables for CI/CD:
//! - APPLE_API_KEY, APPLE_API_ISSUER, APPLE_API_KEY_PATH: App Store Connect API key
//! - APPLE_ID, APPLE_PASSWORD, APPLE_TEAM_ID: Apple ID with app-specific password

use crate::bundler::{NotarizeAuthError, Result, ToolCommand};
use std::path::PathBuf;

/// How `notarytool` authenticates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NotarizationAuth {
    /// Profile saved with `notarytool store-credentials`.
    KeychainProfile(String),

    /// App Store Connect API key.
    ApiKey {
        /// Key ID
        key_id: String,
        /// Issuer ID
        issuer_id: String,
        /// Path to the AuthKey_*.p8 file
        key_path: PathBuf,
    },

    /// Apple ID with an app-specific password.
    AppleId {
        /// Apple ID email
        apple_id: String,
        /// App-specific password
        password: String,
        /// Developer team ID
        team_id: String,
    },
}

impl NotarizationAuth {
    /// Resolves credentials from the process environment.
    ///
    /// A configured `profile` takes precedence over environment variables.
    pub fn from_env(profile: Option<&str>) -> Result<Self> {
        Self::from_lookup(profile, |key| std::env::var(key).ok())
    }

    /// Resolves credentials using `lookup` in place of the environment.
    pub fn from_lookup<F>(profile: Option<&str>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(profile) = profile {
            return Ok(Self::KeychainProfile(profile.to_string()));
        }

        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let (Some(key_id), Some(issuer_id)) = (var("APPLE_API_KEY"), var("APPLE_API_ISSUER")) {
            let key_path = var("APPLE_API_KEY_PATH")
                .ok_or_else(|| NotarizeAuthError::ApiKey {
                    key_id: key_id.clone(),
                })?;
            return Ok(Self::ApiKey {
                key_id,
                issuer_id,
                key_path: PathBuf::from(key_path),
            });
        }

        if let (Some(apple_id), Some(password)) = (var("APPLE_ID"), var("APPLE_PASSWORD")) {
            let team_id = var("APPLE_TEAM_ID").ok_or(NotarizeAuthError::TeamId)?;
            return Ok(Self::AppleId {
                apple_id,
                password,
                team_id,
            });
        }

        Err(NotarizeAuthError::Credentials.into())
    }

    /// Appends the matching `notarytool` authentication flags.
    pub fn append_args(&self, cmd: &mut ToolCommand) {
        match self {
            Self::KeychainProfile(profile) => {
                cmd.arg("--keychain-profile").arg(profile);
            }
            Self::ApiKey {
                key_id,
                issuer_id,
                key_path,
            } => {
                cmd.arg("--key")
                    .arg(key_path)
                    .arg("--key-id")
                    .arg(key_id)
                    .arg("--issuer")
                    .arg(issuer_id);
            }
            Self::AppleId {
                apple_id,
                password,
                team_id,
            } => {
                cmd.arg("--apple-id")
                    .arg(apple_id)
                    .arg("--password")
                    .secret_arg(password)
                    .arg("--team-id")
                    .arg(team_id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundler::Error;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_profile_wins_over_env() {
        let auth = NotarizationAuth::from_lookup(
            Some("ci-profile"),
            lookup(&[("APPLE_ID", "dev@example.com"), ("APPLE_PASSWORD", "pw")]),
        )
        .unwrap();
        assert_eq!(auth, NotarizationAuth::KeychainProfile("ci-profile".into()));
    }

    #[test]
    fn test_api_key_requires_key_path() {
        let err = NotarizationAuth::from_lookup(
            None,
            lookup(&[("APPLE_API_KEY", "ABCD123456"), ("APPLE_API_ISSUER", "issuer")]),
        )
        .unwrap_err();
        assert!(matches!(err, Error::NotarizeAuth(NotarizeAuthError::ApiKey { .. })));

        let auth = NotarizationAuth::from_lookup(
            None,
            lookup(&[
                ("APPLE_API_KEY", "ABCD123456"),
                ("APPLE_API_ISSUER", "issuer"),
                ("APPLE_API_KEY_PATH", "/keys/AuthKey_ABCD123456.p8"),
            ]),
        )
        .unwrap();
        assert!(matches!(auth, NotarizationAuth::ApiKey { .. }));
    }

    #[test]
    fn test_apple_id_requires_team() {
        let err = NotarizationAuth::from_lookup(
            None,
            lookup(&[("APPLE_ID", "dev@example.com"), ("APPLE_PASSWORD", "pw")]),
        )
        .unwrap_err();
        assert!(matches!(err, Error::NotarizeAuth(NotarizeAuthError::TeamId)));
    }

    #[test]
    fn test_no_credentials() {
        let err = NotarizationAuth::from_lookup(None, lookup(&[])).unwrap_err();
        assert!(matches!(err, Error::NotarizeAuth(NotarizeAuthError::Credentials)));
    }

    #[test]
    fn test_password_is_redacted() {
        let auth = NotarizationAuth::AppleId {
            apple_id: "dev@example.com".into(),
            password: "hunter2".into(),
            team_id: "TEAMID".into(),
        };
        let mut cmd = ToolCommand::new("xcrun");
        auth.append_args(&mut cmd);
        assert!(!cmd.to_string().contains("hunter2"));
        assert_eq!(cmd.value_of("--password").unwrap(), "hunter2");
    }
}
