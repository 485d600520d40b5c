//! Advisory plausibility checks over a verified log.

use hav_log::{Event, Log};
use serde::{Deserialize, Serialize};

use crate::result::Warning;

/// One year in milliseconds.
pub const ONE_YEAR_MS: u64 = 365 * 24 * 60 * 60 * 1000;

/// Thresholds for [`check_security_features`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeuristicConfig {
    /// Fewer events than this is suspicious.
    pub min_events: usize,
    /// A mean key-event interval below this (ms) is suspicious.
    pub min_mean_key_interval_ms: u64,
    /// Maximum distance between the signing timestamp and now (ms).
    pub max_timestamp_skew_ms: u64,
}

impl Default for HeuristicConfig {
    fn default() -> Self {
        Self {
            min_events: 3,
            min_mean_key_interval_ms: 50,
            max_timestamp_skew_ms: ONE_YEAR_MS,
        }
    }
}

/// Runs every heuristic and returns the findings in a fixed order.
///
/// Pure: `now_ms` is supplied by the caller.
pub fn check_security_features(
    log: &Log,
    timestamp: u64,
    now_ms: u64,
    config: &HeuristicConfig,
) -> Vec<Warning> {
    let mut warnings = Vec::new();

    if log.len() < config.min_events {
        warnings.push(Warning::TooFewEvents {
            count: log.len(),
            min: config.min_events,
        });
    }

    if let Some(mean) = mean_key_interval_ms(log) {
        let min = i64::try_from(config.min_mean_key_interval_ms).unwrap_or(i64::MAX);
        if mean < min {
            warnings.push(Warning::FastTyping {
                mean_interval_ms: mean,
                min_interval_ms: config.min_mean_key_interval_ms,
            });
        }
    }

    let skew_ms = now_ms.abs_diff(timestamp);
    if skew_ms > config.max_timestamp_skew_ms {
        warnings.push(Warning::TimestampSkew { skew_ms });
    }

    if let Some(index) = first_time_regression(log) {
        warnings.push(Warning::NonMonotonicTime { index });
    }

    let has_input = log.iter().any(|e| matches!(e, Event::Input { .. }));
    if has_input && log.iter().any(Event::is_legacy_edit) {
        warnings.push(Warning::MixedEventKinds);
    }

    warnings
}

/// Mean signed gap between consecutive key events; `None` without key events.
///
/// A lone key event has a mean of zero. Out-of-order key events contribute
/// negative gaps, which pull the mean down.
fn mean_key_interval_ms(log: &Log) -> Option<i64> {
    let times: Vec<i128> = log
        .iter()
        .filter(|e| e.is_key_event())
        .map(|e| i128::from(e.time()))
        .collect();
    let (first, last) = match (times.first(), times.last()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => return None,
    };
    if times.len() < 2 {
        return Some(0);
    }
    // The gaps telescope to `last - first`.
    let mean = (last - first) / (times.len() as i128 - 1);
    Some(i64::try_from(mean).unwrap_or(if mean < 0 { i64::MIN } else { i64::MAX }))
}

fn first_time_regression(log: &Log) -> Option<usize> {
    log.events()
        .windows(2)
        .position(|w| w[1].time() < w[0].time())
        .map(|i| i + 1)
}
