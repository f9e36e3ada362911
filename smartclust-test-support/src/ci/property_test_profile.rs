//! Property-test run profile read from the environment.
//!
//! CI raises case counts, widens generated linkages and enables forking
//! through environment variables; local runs fall back to each suite's
//! defaults. Unparseable overrides are logged and ignored.

use std::env;

/// Environment variable controlling proptest case counts.
pub const PROGTEST_CASES_ENV_KEY: &str = "PROGTEST_CASES";
/// Environment variable controlling proptest process forking.
pub const SMARTCLUST_PBT_FORK_ENV_KEY: &str = "SMARTCLUST_PBT_FORK";
/// Environment variable bounding the number of points in generated linkages.
pub const SMARTCLUST_PBT_MAX_POINTS_ENV_KEY: &str = "SMARTCLUST_PBT_MAX_POINTS";

/// Runtime profile for property-test execution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProptestRunProfile {
    cases: u32,
    fork: bool,
    max_points: usize,
}

impl ProptestRunProfile {
    /// Loads a profile, using the given defaults where no valid override is
    /// set.
    ///
    /// # Examples
    ///
    /// ```
    /// use smartclust_test_support::ci::property_test_profile::ProptestRunProfile;
    ///
    /// let profile = ProptestRunProfile::load(64, false, 48);
    /// assert!(profile.cases() > 0);
    /// assert!(profile.max_points() > 0);
    /// ```
    #[must_use]
    pub fn load(default_cases: u32, default_fork: bool, default_max_points: usize) -> Self {
        Self {
            cases: env_override(PROGTEST_CASES_ENV_KEY, parse_positive::<u32>)
                .unwrap_or(default_cases),
            fork: env_override(SMARTCLUST_PBT_FORK_ENV_KEY, parse_switch).unwrap_or(default_fork),
            max_points: env_override(SMARTCLUST_PBT_MAX_POINTS_ENV_KEY, parse_positive::<usize>)
                .unwrap_or(default_max_points),
        }
    }

    /// Number of cases to run per property.
    #[must_use]
    pub fn cases(&self) -> u32 {
        self.cases
    }

    /// Whether to run proptest cases in forked subprocesses.
    #[must_use]
    pub fn fork(&self) -> bool {
        self.fork
    }

    /// Upper bound on points per generated linkage.
    #[must_use]
    pub fn max_points(&self) -> usize {
        self.max_points
    }
}

fn env_override<T>(key: &'static str, parse: fn(&str) -> Result<T, String>) -> Option<T> {
    let raw = env::var(key).ok()?;
    parse(&raw)
        .inspect_err(|reason| {
            tracing::warn!(
                env = key,
                raw = %raw,
                reason = %reason,
                "invalid property-test profile override; using default",
            );
        })
        .ok()
}

fn parse_positive<T>(raw: &str) -> Result<T, String>
where
    T: std::str::FromStr + Default + PartialEq,
    T::Err: std::fmt::Display,
{
    let value = raw
        .trim()
        .parse::<T>()
        .map_err(|error| format!("parse error: {error}"))?;
    if value == T::default() {
        return Err("value must be > 0".to_owned());
    }
    Ok(value)
}

fn parse_switch(raw: &str) -> Result<bool, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err("expected one of: true/false/1/0/yes/no/on/off".to_owned()),
    }
}
