//! Builder utilities for configuring [`Smartclust`] instances.
//!
//! Settings are collected unchecked and validated once in
//! [`SmartclustBuilder::build`], before any tree is scored.

use crate::{
    Result,
    scoring::{DEFAULT_STIFFNESS, NodeScorer, RootBaseline},
    smartclust::Smartclust,
};

/// Configures and constructs [`Smartclust`] instances.
///
/// # Examples
/// ```
/// use smartclust_core::{RootBaseline, SmartclustBuilder};
///
/// let smartclust = SmartclustBuilder::new()
///     .with_stiffness(2.0)
///     .with_root_baseline(RootBaseline::Zero)
///     .build()
///     .expect("builder configuration is valid");
/// assert_eq!(smartclust.stiffness(), 2.0);
/// assert_eq!(smartclust.root_baseline(), RootBaseline::Zero);
/// ```
#[derive(Debug, Clone)]
pub struct SmartclustBuilder {
    stiffness: f64,
    root_baseline: RootBaseline,
}

impl Default for SmartclustBuilder {
    fn default() -> Self {
        Self {
            stiffness: DEFAULT_STIFFNESS,
            root_baseline: RootBaseline::default(),
        }
    }
}

impl SmartclustBuilder {
    /// Creates a builder populated with default parameters.
    ///
    /// # Examples
    /// ```
    /// use smartclust_core::{RootBaseline, SmartclustBuilder};
    ///
    /// let builder = SmartclustBuilder::new();
    /// assert_eq!(builder.stiffness(), 1.0);
    /// assert_eq!(builder.root_baseline(), RootBaseline::MaxDistance);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the stiffness exponent.
    ///
    /// Zero makes scores depend only on distance gaps; values above one
    /// increasingly favour clusters holding about half of the points.
    #[must_use]
    pub fn with_stiffness(mut self, stiffness: f64) -> Self {
        self.stiffness = stiffness;
        self
    }

    /// Returns the configured stiffness.
    #[must_use]
    pub fn stiffness(&self) -> f64 {
        self.stiffness
    }

    /// Chooses the distance standing in for the root's parent merge.
    #[must_use]
    pub fn with_root_baseline(mut self, baseline: RootBaseline) -> Self {
        self.root_baseline = baseline;
        self
    }

    /// Returns the configured root baseline.
    #[must_use]
    pub fn root_baseline(&self) -> RootBaseline {
        self.root_baseline
    }

    /// Validates the configuration and constructs a [`Smartclust`] instance.
    ///
    /// # Errors
    /// Returns [`crate::SmartclustError::InvalidConfiguration`] when the
    /// stiffness is negative or non-finite, or a fixed root baseline is
    /// non-finite.
    ///
    /// # Examples
    /// ```
    /// use smartclust_core::{SmartclustBuilder, SmartclustError};
    ///
    /// let err = SmartclustBuilder::new().with_stiffness(-1.0).build().unwrap_err();
    /// assert!(matches!(err, SmartclustError::InvalidConfiguration(_)));
    /// ```
    pub fn build(self) -> Result<Smartclust> {
        let scorer = NodeScorer::new(self.stiffness, self.root_baseline)?;
        Ok(Smartclust::new(scorer))
    }
}
