//! Error types for the smartclust core library.
//!
//! Tree construction and configuration failures are reported through separate
//! enums so callers can tell malformed input apart from invalid settings.
//! Both roll up into [`SmartclustError`].

use std::fmt;

use thiserror::Error;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? $( ( $($tuple:tt)* ) )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? $( ( $($tuple)* ) )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// A linkage sequence that cannot be turned into a [`crate::ClusterTree`].
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum MalformedTreeError {
    /// A merge referenced an id beyond the last node of the tree.
    #[error("link {link} references node {child} but the tree only has {node_count} nodes")]
    ChildOutOfRange {
        /// Index of the offending linkage record.
        link: usize,
        /// Child id named by the record.
        child: usize,
        /// Total number of nodes implied by the linkage length.
        node_count: usize,
    },
    /// A merge referenced a cluster that is created by a later merge.
    #[error("link {link} (node {node}) references node {child} before it is created")]
    ChildNotYetCreated {
        /// Index of the offending linkage record.
        link: usize,
        /// Node id produced by the offending record.
        node: usize,
        /// Child id named by the record.
        child: usize,
    },
    /// Two merges, or both sides of one merge, claimed the same child.
    #[error("node {child} is claimed by node {first_parent} and again by node {second_parent}")]
    DuplicateChild {
        /// Child id claimed twice.
        child: usize,
        /// Node that claimed the child first.
        first_parent: usize,
        /// Node that claimed the child again.
        second_parent: usize,
    },
    /// A merge distance was negative, infinite or NaN.
    #[error("link {link} has invalid merge distance {distance}")]
    InvalidDistance {
        /// Index of the offending linkage record.
        link: usize,
        /// Distance stored in the record.
        distance: f64,
    },
    /// A merge count disagreed with the sizes of its children.
    #[error("link {link} records {found} points but its children hold {expected}")]
    CountMismatch {
        /// Index of the offending linkage record.
        link: usize,
        /// Sum of the children's point counts.
        expected: usize,
        /// Count stored in the record.
        found: usize,
    },
}

define_error_codes! {
    /// Stable codes describing [`MalformedTreeError`] variants.
    enum MalformedTreeErrorCode for MalformedTreeError {
        /// A merge referenced an id beyond the last node of the tree.
        ChildOutOfRange => ChildOutOfRange { .. } => "TREE_CHILD_OUT_OF_RANGE",
        /// A merge referenced a cluster that is created by a later merge.
        ChildNotYetCreated => ChildNotYetCreated { .. } => "TREE_CHILD_NOT_YET_CREATED",
        /// Two merges claimed the same child.
        DuplicateChild => DuplicateChild { .. } => "TREE_DUPLICATE_CHILD",
        /// A merge distance was negative or non-finite.
        InvalidDistance => InvalidDistance { .. } => "TREE_INVALID_DISTANCE",
        /// A merge count disagreed with the sizes of its children.
        CountMismatch => CountMismatch { .. } => "TREE_COUNT_MISMATCH",
    }
}

/// Rejected flattening configuration.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum InvalidConfigurationError {
    /// Stiffness must be a finite, non-negative exponent.
    #[error("stiffness must be finite and non-negative (got {got})")]
    Stiffness {
        /// The rejected stiffness.
        got: f64,
    },
    /// A fixed root distance must be finite.
    #[error("fixed root distance must be finite (got {got})")]
    RootDistance {
        /// The rejected distance.
        got: f64,
    },
}

define_error_codes! {
    /// Stable codes describing [`InvalidConfigurationError`] variants.
    enum InvalidConfigurationErrorCode for InvalidConfigurationError {
        /// Stiffness must be a finite, non-negative exponent.
        Stiffness => Stiffness { .. } => "CONFIG_INVALID_STIFFNESS",
        /// A fixed root distance must be finite.
        RootDistance => RootDistance { .. } => "CONFIG_INVALID_ROOT_DISTANCE",
    }
}

/// Error type produced when configuring or running [`crate::Smartclust`].
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum SmartclustError {
    /// The linkage input could not be assembled into a tree.
    #[error("malformed linkage tree: {0}")]
    MalformedTree(#[from] MalformedTreeError),
    /// The flattening configuration was rejected.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(#[from] InvalidConfigurationError),
}

define_error_codes! {
    /// Stable codes describing [`SmartclustError`] variants.
    enum SmartclustErrorCode for SmartclustError {
        /// The linkage input could not be assembled into a tree.
        MalformedTree => MalformedTree(..) => "SMARTCLUST_MALFORMED_TREE",
        /// The flattening configuration was rejected.
        InvalidConfiguration => InvalidConfiguration(..) => "SMARTCLUST_INVALID_CONFIGURATION",
    }
}

impl SmartclustError {
    /// Retrieve the inner [`MalformedTreeErrorCode`] when the linkage was rejected.
    #[must_use]
    pub const fn tree_code(&self) -> Option<MalformedTreeErrorCode> {
        match self {
            Self::MalformedTree(error) => Some(error.code()),
            Self::InvalidConfiguration(_) => None,
        }
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, SmartclustError>;
