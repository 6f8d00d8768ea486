// Configuration: environment variables with defaults, loaded once at startup.
//
// Numbers that fail to parse or fall outside their range stop startup with a
// message naming the variable.

use std::env;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::confession::AdminSettings;
use crate::gemini::client::{DEFAULT_API_URL, DEFAULT_MODEL};
use crate::gemini::rate_limiter::MAX_INTERVAL;
use crate::moderation::DEFAULT_MODERATION_TIMEOUT;
use crate::retention::DEFAULT_SWEEP_INTERVAL;
use crate::service::DEFAULT_MAX_CONTENT_CHARS;
use crate::tone::DEFAULT_REWRITE_TIMEOUT;

/// Central configuration loaded from environment variables.
///
/// All secrets come from env vars (never hardcoded). The .env file
/// is loaded automatically at startup via dotenvy.
#[derive(Debug, Clone)]
pub struct Config {
    /// Gemini API key. Empty means no AI backend: moderation routes every
    /// submission to manual review and tone rewrites return the placeholder.
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub gemini_api_url: String,
    /// Shared request rate for moderation + rewriting (0 disables pacing).
    pub gemini_max_qps: f64,
    /// Initial retention window; admins can change it at runtime.
    pub retention_days: u32,
    pub sweep_interval: Duration,
    pub moderation_timeout: Duration,
    pub rewrite_timeout: Duration,
    pub max_content_chars: usize,
}

impl Config {
    /// Load configuration from environment variables, applying defaults for
    /// anything unset. Malformed numbers are an error rather than a silent
    /// fallback.
    pub fn load() -> Result<Self> {
        let retention_days: u32 = parse_var(
            "WHISPERVAULT_RETENTION_DAYS",
            AdminSettings::default().retention_days,
        )?;
        if retention_days == 0 {
            anyhow::bail!("WHISPERVAULT_RETENTION_DAYS must be at least 1");
        }

        let sweep_secs: u64 = parse_var(
            "WHISPERVAULT_SWEEP_INTERVAL_SECS",
            DEFAULT_SWEEP_INTERVAL.as_secs(),
        )?;
        if sweep_secs == 0 {
            anyhow::bail!("WHISPERVAULT_SWEEP_INTERVAL_SECS must be at least 1");
        }

        Ok(Self {
            gemini_api_key: env::var("GEMINI_API_KEY").unwrap_or_default(),
            gemini_model: env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            gemini_api_url: env::var("GEMINI_API_URL")
                .unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            gemini_max_qps: check_max_qps(parse_var("GEMINI_MAX_QPS", 2.0)?)?,
            retention_days,
            sweep_interval: Duration::from_secs(sweep_secs),
            moderation_timeout: Duration::from_secs(parse_var(
                "WHISPERVAULT_MODERATION_TIMEOUT_SECS",
                DEFAULT_MODERATION_TIMEOUT.as_secs(),
            )?),
            rewrite_timeout: Duration::from_secs(parse_var(
                "WHISPERVAULT_REWRITE_TIMEOUT_SECS",
                DEFAULT_REWRITE_TIMEOUT.as_secs(),
            )?),
            max_content_chars: parse_var(
                "WHISPERVAULT_MAX_CONTENT_CHARS",
                DEFAULT_MAX_CONTENT_CHARS,
            )?,
        })
    }

    pub fn has_gemini(&self) -> bool {
        !self.gemini_api_key.is_empty()
    }

    /// Check that the Gemini API key is configured.
    /// Call this before any one-shot command that talks to the model.
    pub fn require_gemini(&self) -> Result<()> {
        if !self.has_gemini() {
            anyhow::bail!(
                "GEMINI_API_KEY not set. Add it to your .env file.\n\
                 See .env.example for the required variables."
            );
        }
        Ok(())
    }
}

/// 0 disables pacing. Anything else must be finite and at least one
/// request per `MAX_INTERVAL`.
fn check_max_qps(qps: f64) -> Result<f64> {
    let slowest = 1.0 / MAX_INTERVAL.as_secs_f64();
    if !qps.is_finite() || qps < 0.0 || (qps > 0.0 && qps < slowest) {
        anyhow::bail!(
            "GEMINI_MAX_QPS must be 0 (no pacing) or a finite rate of at least {slowest:e}, got {qps}"
        );
    }
    Ok(qps)
}

fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .with_context(|| format!("{name} is not a valid value: {raw:?}")),
        _ => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Each test uses its own variable name so parallel tests don't race.

    #[test]
    fn test_parse_var_default_when_unset() {
        let v: u32 = parse_var("WHISPERVAULT_TEST_UNSET_VAR", 7).unwrap();
        assert_eq!(v, 7);
    }

    #[test]
    fn test_parse_var_reads_value() {
        env::set_var("WHISPERVAULT_TEST_SET_VAR", " 42 ");
        let v: u32 = parse_var("WHISPERVAULT_TEST_SET_VAR", 7).unwrap();
        assert_eq!(v, 42);
    }

    #[test]
    fn test_max_qps_bounds() {
        assert_eq!(check_max_qps(2.0).unwrap(), 2.0);
        assert_eq!(check_max_qps(0.0).unwrap(), 0.0);
        for bad in [1e-20, -1.0, f64::INFINITY, f64::NAN] {
            assert!(check_max_qps(bad).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn test_parse_var_rejects_garbage() {
        env::set_var("WHISPERVAULT_TEST_BAD_VAR", "forty");
        let r: Result<u32> = parse_var("WHISPERVAULT_TEST_BAD_VAR", 7);
        assert!(r.is_err());
    }
}
