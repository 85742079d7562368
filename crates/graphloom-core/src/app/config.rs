//! AppConfig - 環境変数からの設定
//!
//! | 変数 | 既定値 |
//! |------|--------|
//! | `TOPIC_SERVICE_URL` | `http://localhost:8083/api` |
//! | `NOTE_SERVICE_URL` | `http://localhost:8082/api` |
//! | `GRAPHLOOM_HTTP_TIMEOUT_MS` | `3000` |
//! | `GRAPHLOOM_SIMILAR_TOP_N` | `5` |
//! | `AUTH_WEBHOOK_URL` | なし（未設定ならワークスペース作成時に webhook を付けない） |

use std::time::Duration;

pub const TOPIC_SERVICE_URL: &str = "TOPIC_SERVICE_URL";
pub const NOTE_SERVICE_URL: &str = "NOTE_SERVICE_URL";
pub const HTTP_TIMEOUT_MS: &str = "GRAPHLOOM_HTTP_TIMEOUT_MS";
pub const SIMILAR_TOP_N: &str = "GRAPHLOOM_SIMILAR_TOP_N";
pub const AUTH_WEBHOOK_URL: &str = "AUTH_WEBHOOK_URL";

const DEFAULT_TOPIC_URL: &str = "http://localhost:8083/api";
const DEFAULT_NOTE_URL: &str = "http://localhost:8082/api";
const DEFAULT_TIMEOUT_MS: u64 = 3_000;
const DEFAULT_TOP_N: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be a positive integer, got {value:?}")]
    NotPositive { var: &'static str, value: String },

    #[error("{var} must not be blank")]
    Blank { var: &'static str },
}

/// Endpoints and timeout of the similarity / document-listing services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollaboratorConfig {
    pub topic_url: String,
    pub note_url: String,
    pub timeout: Duration,
}

impl Default for CollaboratorConfig {
    fn default() -> Self {
        Self {
            topic_url: DEFAULT_TOPIC_URL.to_owned(),
            note_url: DEFAULT_NOTE_URL.to_owned(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub collaborators: CollaboratorConfig,
    /// 1 ドキュメントあたりに問い合わせる候補数
    pub similar_top_n: usize,
    pub auth_webhook_url: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            collaborators: CollaboratorConfig::default(),
            similar_top_n: DEFAULT_TOP_N,
            auth_webhook_url: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// `lookup` が None を返した変数は既定値になる
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let url = |var: &'static str, default: String| -> Result<String, ConfigError> {
            match lookup(var) {
                None => Ok(default),
                Some(raw) if raw.trim().is_empty() => Err(ConfigError::Blank { var }),
                Some(raw) => Ok(raw.trim().to_owned()),
            }
        };
        let topic_url = url(TOPIC_SERVICE_URL, defaults.collaborators.topic_url)?;
        let note_url = url(NOTE_SERVICE_URL, defaults.collaborators.note_url)?;

        let timeout_ms = positive(HTTP_TIMEOUT_MS, lookup(HTTP_TIMEOUT_MS), DEFAULT_TIMEOUT_MS)?;
        let similar_top_n = positive(SIMILAR_TOP_N, lookup(SIMILAR_TOP_N), DEFAULT_TOP_N as u64)?;

        let auth_webhook_url = lookup(AUTH_WEBHOOK_URL)
            .map(|raw| raw.trim().to_owned())
            .filter(|raw| !raw.is_empty());

        Ok(Self {
            collaborators: CollaboratorConfig {
                topic_url,
                note_url,
                timeout: Duration::from_millis(timeout_ms),
            },
            similar_top_n: similar_top_n as usize,
            auth_webhook_url,
        })
    }
}

fn positive(var: &'static str, raw: Option<String>, default: u64) -> Result<u64, ConfigError> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    match raw.trim().parse::<u64>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(ConfigError::NotPositive { var, value: raw }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = AppConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.collaborators.timeout, Duration::from_secs(3));
        assert_eq!(config.similar_top_n, 5);
    }

    #[test]
    fn overrides_are_read() {
        let config = AppConfig::from_lookup(lookup_from(&[
            (TOPIC_SERVICE_URL, "http://topic:9000/api"),
            (NOTE_SERVICE_URL, " http://note:9001/api "),
            (HTTP_TIMEOUT_MS, "1500"),
            (SIMILAR_TOP_N, "8"),
            (AUTH_WEBHOOK_URL, "http://auth/webhook"),
        ]))
        .unwrap();
        assert_eq!(config.collaborators.topic_url, "http://topic:9000/api");
        assert_eq!(config.collaborators.note_url, "http://note:9001/api");
        assert_eq!(config.collaborators.timeout, Duration::from_millis(1500));
        assert_eq!(config.similar_top_n, 8);
        assert_eq!(config.auth_webhook_url.as_deref(), Some("http://auth/webhook"));
    }

    #[test]
    fn blank_webhook_is_treated_as_unset() {
        let config = AppConfig::from_lookup(lookup_from(&[(AUTH_WEBHOOK_URL, "  ")])).unwrap();
        assert_eq!(config.auth_webhook_url, None);
    }

    #[rstest]
    #[case::zero_timeout(HTTP_TIMEOUT_MS, "0")]
    #[case::negative_top_n(SIMILAR_TOP_N, "-1")]
    #[case::not_a_number(HTTP_TIMEOUT_MS, "3s")]
    fn rejects_non_positive_numbers(#[case] var: &'static str, #[case] value: &str) {
        let err = AppConfig::from_lookup(lookup_from(&[(var, value)])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::NotPositive {
                var,
                value: value.to_owned()
            }
        );
    }

    #[test]
    fn rejects_blank_urls() {
        let err = AppConfig::from_lookup(lookup_from(&[(TOPIC_SERVICE_URL, "")])).unwrap_err();
        assert_eq!(err, ConfigError::Blank { var: TOPIC_SERVICE_URL });
    }
}
