//! Collector configuration.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Environment variable overriding [`GcConfig::objects_threshold`].
pub const OBJECTS_THRESHOLD_VAR: &str = "TARN_GC_OBJECTS_THRESHOLD";
/// Environment variable overriding [`GcConfig::bytes_threshold`].
pub const BYTES_THRESHOLD_VAR: &str = "TARN_GC_BYTES_THRESHOLD";
/// Environment variable overriding [`GcConfig::max_bytes`].
pub const MAX_BYTES_VAR: &str = "TARN_GC_MAX_BYTES";
/// Environment variable overriding [`GcConfig::policy`].
pub const POLICY_VAR: &str = "TARN_GC_POLICY";

/// How collection thresholds evolve after a cycle.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum ThresholdPolicy {
    /// Thresholds stay at their configured values.
    Static,
    /// A threshold doubles whenever the heap is still more than half of it
    /// after a sweep.
    #[default]
    Adaptive,
}

impl ThresholdPolicy {
    pub const fn name(self) -> &'static str {
        match self {
            ThresholdPolicy::Static => "static",
            ThresholdPolicy::Adaptive => "adaptive",
        }
    }
}

impl fmt::Display for ThresholdPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unrecognized threshold policy name.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("unknown threshold policy `{0}` (expected `static` or `adaptive`)")]
pub struct UnknownPolicy(pub String);

impl FromStr for ThresholdPolicy {
    type Err = UnknownPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "static" | "fixed" => Ok(ThresholdPolicy::Static),
            "adaptive" | "grow" => Ok(ThresholdPolicy::Adaptive),
            _ => Err(UnknownPolicy(s.to_owned())),
        }
    }
}

/// Heap tuning knobs.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct GcConfig {
    /// Collect once this many objects are live.
    pub objects_threshold: u64,
    /// Collect once this many bytes are allocated.
    pub bytes_threshold: u64,
    /// Hard cap on allocated bytes (0 = unlimited).
    pub max_bytes: u64,
    pub policy: ThresholdPolicy,
}

impl Default for GcConfig {
    fn default() -> Self {
        GcConfig {
            objects_threshold: 10_000,
            bytes_threshold: 1024 * 1024,
            max_bytes: 0,
            policy: ThresholdPolicy::Adaptive,
        }
    }
}

impl GcConfig {
    #[must_use]
    pub fn with_objects_threshold(mut self, objects: u64) -> Self {
        self.objects_threshold = objects.max(1);
        self
    }

    #[must_use]
    pub fn with_bytes_threshold(mut self, bytes: u64) -> Self {
        self.bytes_threshold = bytes.max(1);
        self
    }

    #[must_use]
    pub fn with_max_bytes(mut self, bytes: u64) -> Self {
        self.max_bytes = bytes;
        self
    }

    #[must_use]
    pub fn with_policy(mut self, policy: ThresholdPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Load configuration from the `TARN_GC_*` environment variables,
    /// starting from the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`GcConfig::from_env`], reading variables through `lookup`.
    ///
    /// Values that fail to parse are logged and ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(objects) = parse_var::<u64>(&lookup, OBJECTS_THRESHOLD_VAR) {
            config = config.with_objects_threshold(objects);
        }
        if let Some(bytes) = parse_var::<u64>(&lookup, BYTES_THRESHOLD_VAR) {
            config = config.with_bytes_threshold(bytes);
        }
        if let Some(limit) = parse_var::<u64>(&lookup, MAX_BYTES_VAR) {
            config = config.with_max_bytes(limit);
        }
        if let Some(policy) = parse_var::<ThresholdPolicy>(&lookup, POLICY_VAR) {
            config = config.with_policy(policy);
        }

        config
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, var: &str) -> Option<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    let raw = lookup(var)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!(var, value = %raw, %err, "ignoring unparseable GC setting");
            None
        }
    }
}

#[cfg(test)]
mod tests;
