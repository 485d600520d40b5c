//! Verification outcomes.
//!
//! Failures of a well-formed input are reported here as data so a caller can
//! always render why a check failed from a single call.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Reason a verification level failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    /// A signature did not verify against the public key.
    SignatureInvalid,
    /// Normalized displayed text differs from the log replay.
    TextMismatch,
    /// Digest of the displayed text differs from the digest of the replay.
    HashMismatch,
    /// No log was available for Level 2.
    LogFetchFailure,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ErrorKind::SignatureInvalid => "Invalid signature",
            ErrorKind::TextMismatch => "Displayed text does not match log reconstruction",
            ErrorKind::HashMismatch => "Text hash does not match",
            ErrorKind::LogFetchFailure => "Event log is unavailable",
        })
    }
}

/// Advisory finding. Never affects validity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Warning {
    /// The log has fewer events than a plausible human session.
    TooFewEvents {
        /// Events in the log.
        count: usize,
        /// Configured minimum.
        min: usize,
    },
    /// Mean interval between key events is implausibly short.
    FastTyping {
        /// Observed mean interval in milliseconds; negative when key times run backwards.
        mean_interval_ms: i64,
        /// Configured minimum.
        min_interval_ms: u64,
    },
    /// The signing timestamp is too far from the verifier's clock.
    TimestampSkew {
        /// Absolute distance in milliseconds.
        skew_ms: u64,
    },
    /// Event times decrease at `index`.
    NonMonotonicTime {
        /// Index of the first event earlier than its predecessor.
        index: usize,
    },
    /// The log mixes `Input` snapshots with per-keystroke edits.
    MixedEventKinds,
    /// The artifact's fingerprint does not match the supplied log.
    FingerprintMismatch,
    /// The supplied log has no canonical JSON form, so the fingerprint cannot be checked.
    FingerprintUnverifiable {
        /// Why canonicalization failed.
        reason: String,
    },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::TooFewEvents { count, min } => {
                write!(f, "Suspiciously few events ({count} < {min})")
            }
            Warning::FastTyping { mean_interval_ms, min_interval_ms } => write!(
                f,
                "Suspiciously fast typing (mean {mean_interval_ms} ms < {min_interval_ms} ms)"
            ),
            Warning::TimestampSkew { skew_ms } => {
                write!(f, "Timestamp is {skew_ms} ms away from the current time")
            }
            Warning::NonMonotonicTime { index } => {
                write!(f, "Event {index} is earlier than the event before it")
            }
            Warning::MixedEventKinds => {
                f.write_str("Log mixes input snapshots with keystroke edits")
            }
            Warning::FingerprintMismatch => f.write_str("Log fingerprint does not match"),
            Warning::FingerprintUnverifiable { reason } => {
                write!(f, "Log fingerprint cannot be checked: {reason}")
            }
        }
    }
}

/// Outcome of the content signature check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Level1Result {
    /// Whether the content signature verified.
    pub valid: bool,
    /// Failure reasons; empty when valid.
    pub errors: Vec<ErrorKind>,
}

/// Outcome of the log signature check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Level2Result {
    /// Whether replay, digest and log signature all checked out.
    pub valid: bool,
    /// Text replayed from the log.
    pub reconstructed_text: String,
    /// First failing step, if any.
    pub errors: Vec<ErrorKind>,
    /// Advisory findings.
    pub warnings: Vec<Warning>,
}

/// Merged two-tier outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    /// Level 1 outcome.
    pub level1_valid: bool,
    /// Level 2 outcome; `false` when Level 2 did not run.
    pub level2_valid: bool,
    /// `level1_valid && level2_valid`.
    pub is_valid: bool,
    /// Text replayed from the log; empty when Level 2 did not run.
    pub reconstructed_text: String,
    /// Failure reasons from both levels.
    pub errors: Vec<ErrorKind>,
    /// Advisory findings.
    pub warnings: Vec<Warning>,
}

impl VerificationResult {
    pub(crate) fn level1_only(level1: Level1Result) -> Self {
        Self {
            level1_valid: level1.valid,
            level2_valid: false,
            is_valid: false,
            reconstructed_text: String::new(),
            errors: level1.errors,
            warnings: Vec::new(),
        }
    }

    pub(crate) fn merge(level1: Level1Result, level2: Level2Result) -> Self {
        let mut errors = level1.errors;
        errors.extend(level2.errors);
        Self {
            level1_valid: level1.valid,
            level2_valid: level2.valid,
            is_valid: level1.valid && level2.valid,
            reconstructed_text: level2.reconstructed_text,
            errors,
            warnings: level2.warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn result_json_shape() {
        let result = VerificationResult {
            level1_valid: true,
            level2_valid: false,
            is_valid: false,
            reconstructed_text: "Hi".into(),
            errors: vec![ErrorKind::TextMismatch],
            warnings: vec![Warning::NonMonotonicTime { index: 2 }],
        };
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({
                "level1Valid": true,
                "level2Valid": false,
                "isValid": false,
                "reconstructedText": "Hi",
                "errors": ["textMismatch"],
                "warnings": [{"code": "nonMonotonicTime", "index": 2}]
            })
        );
    }

    #[test]
    fn merge_requires_both_levels() {
        let l1 = Level1Result { valid: true, errors: vec![] };
        let l2 = Level2Result {
            valid: false,
            reconstructed_text: String::new(),
            errors: vec![ErrorKind::SignatureInvalid],
            warnings: vec![],
        };
        let merged = VerificationResult::merge(l1, l2);
        assert!(merged.level1_valid && !merged.is_valid);
        assert_eq!(merged.errors, vec![ErrorKind::SignatureInvalid]);
    }

    #[test]
    fn messages_are_human_readable() {
        assert_eq!(ErrorKind::SignatureInvalid.to_string(), "Invalid signature");
        assert!(Warning::TooFewEvents { count: 1, min: 3 }
            .to_string()
            .contains("1 < 3"));
    }
}
