use crate::api::endpoints::Region;
use crate::error::AppError;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "claude-sonnet-4-5-20250929";

/// Pacing applied by the match fetcher around each detail request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchPolicy {
    /// Sleep after every match resolution attempt.
    pub cooldown: Duration,
    /// Sleep after the upstream answered 429.
    pub rate_limit_pause: Duration,
    /// Budget for the whole fetch phase, if any.
    pub deadline: Option<Duration>,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        FetchPolicy {
            cooldown: Duration::from_millis(500),
            rate_limit_pause: Duration::from_millis(2000),
            deadline: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub region: Region,
    pub anthropic_api_key: Option<String>,
    pub model: String,
    pub http_timeout: Duration,
    pub fetch: FetchPolicy,
    pub report_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let api_key = env::var("RIOT_API_KEY").map_err(|_| {
            AppError::ConfigError("RIOT_API_KEY not found in .env file".to_string())
        })?;

        let region = match env::var("RIOT_REGION") {
            Ok(value) => value.parse()?,
            Err(_) => Region::Na,
        };

        let anthropic_api_key = env::var("ANTHROPIC_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());
        let model = env::var("ANTHROPIC_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let defaults = FetchPolicy::default();
        let fetch = FetchPolicy {
            cooldown: env_millis("FETCH_COOLDOWN_MS", defaults.cooldown)?,
            rate_limit_pause: env_millis("RATE_LIMIT_PAUSE_MS", defaults.rate_limit_pause)?,
            deadline: None,
        };
        let http_timeout = Duration::from_secs(env_parse("HTTP_TIMEOUT_SECS", 30u64)?);

        let report_dir = env::var("REPORT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_report_dir());

        Ok(Config {
            api_key,
            region,
            anthropic_api_key,
            model,
            http_timeout,
            fetch,
            report_dir,
        })
    }
}

pub fn default_report_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".league_report")
}

fn env_millis(key: &str, default: Duration) -> Result<Duration, AppError> {
    let default_ms = u64::try_from(default.as_millis()).unwrap_or(u64::MAX);
    env_parse(key, default_ms).map(Duration::from_millis)
}

fn env_parse<T: FromStr>(key: &str, default: T) -> Result<T, AppError> {
    match env::var(key) {
        Ok(raw) => parse_value(key, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_value<T: FromStr>(key: &str, raw: &str) -> Result<T, AppError> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::ConfigError(format!("{} must be a number, got {:?}", key, raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_policy_defaults() {
        let policy = FetchPolicy::default();
        assert_eq!(policy.cooldown, Duration::from_millis(500));
        assert_eq!(policy.rate_limit_pause, Duration::from_secs(2));
        assert_eq!(policy.deadline, None);
    }

    #[test]
    fn parse_value_accepts_padded_numbers() {
        let parsed: u64 = parse_value("FETCH_COOLDOWN_MS", " 250 ").unwrap();
        assert_eq!(parsed, 250);
    }

    #[test]
    fn parse_value_rejects_garbage() {
        let err = parse_value::<u64>("HTTP_TIMEOUT_SECS", "soon").unwrap_err();
        assert!(matches!(err, AppError::ConfigError(msg) if msg.contains("HTTP_TIMEOUT_SECS")));
    }
}
