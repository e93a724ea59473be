//! # Coordinator configuration.
//!
//! Provides [`Config`], centralized settings for a [`Coordinator`](crate::Coordinator).
//!
//! Config can be built in code (`Config::default()` plus field overrides) or loaded
//! from JSON with [`Config::from_json`]:
//!
//! ```json
//! { "errorWindowCountThreshold": 5, "errorWindowMillis": 10000, "idPrefix": "worker-" }
//! ```
//!
//! Missing keys fall back to the defaults.

use std::time::Duration;

use serde::{Deserialize, Deserializer};

use crate::policies::BreakerPolicy;

/// Configuration for the lifecycle coordinator.
///
/// ## Field semantics
/// - `error_window_count_threshold`: errors tolerated per window; one more trips the breaker
/// - `error_window`: window length; errors older than this are discarded
/// - `id_prefix`: prefix of every issued [`ChildId`](crate::ChildId)
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Maximum errors tolerated inside one window.
    ///
    /// The comparison is strict: the `threshold + 1`-th error within a window stops the child.
    pub error_window_count_threshold: u32,

    /// Error window length.
    ///
    /// An error arriving more than `error_window` after the window opened starts a new
    /// window with a count of 1.
    #[serde(rename = "errorWindowMillis", deserialize_with = "millis")]
    pub error_window: Duration,

    /// Prefix of issued child ids (`<prefix><counter>`).
    pub id_prefix: String,
}

impl Config {
    /// Returns the circuit-breaker policy derived from this config.
    #[inline]
    pub fn breaker(&self) -> BreakerPolicy {
        BreakerPolicy {
            threshold: self.error_window_count_threshold,
            window: self.error_window,
        }
    }

    /// Parses a config from JSON; absent keys keep their defaults.
    ///
    /// # Example
    /// ```
    /// use std::time::Duration;
    /// use hostvisor::Config;
    ///
    /// let cfg = Config::from_json(r#"{"errorWindowMillis": 1000}"#).unwrap();
    /// assert_eq!(cfg.error_window, Duration::from_secs(1));
    /// assert_eq!(cfg.error_window_count_threshold, 10);
    /// ```
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `error_window_count_threshold = 10`
    /// - `error_window = 30s`
    /// - `id_prefix = "hostvisorChild-"`
    fn default() -> Self {
        let breaker = BreakerPolicy::default();
        Self {
            error_window_count_threshold: breaker.threshold,
            error_window: breaker.window,
            id_prefix: "hostvisorChild-".to_string(),
        }
    }
}

fn millis<'de, D>(d: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    u64::deserialize(d).map(Duration::from_millis)
}
