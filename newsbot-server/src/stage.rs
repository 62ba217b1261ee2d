//! Pipeline stages and their failure policy.
//!
//! Each stage either degrades (log, continue with an empty value) or aborts
//! (log, fail the request). The table lives in [`Stage::policy`].

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Keywords,
    Fetch,
    Embed,
    Store,
    Similarity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Log and continue with an empty/neutral value.
    Degrade,
    /// Log and fail the whole request.
    Abort,
}

impl Stage {
    pub const ALL: [Stage; 5] = [
        Stage::Keywords,
        Stage::Fetch,
        Stage::Embed,
        Stage::Store,
        Stage::Similarity,
    ];

    pub const fn policy(self) -> FailurePolicy {
        match self {
            Stage::Keywords | Stage::Fetch | Stage::Similarity => FailurePolicy::Degrade,
            Stage::Embed | Stage::Store => FailurePolicy::Abort,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Stage::Keywords => "keywords",
            Stage::Fetch => "fetch",
            Stage::Embed => "embed",
            Stage::Store => "store",
            Stage::Similarity => "similarity",
        }
    }

    /// Log a stage failure at the level its policy implies.
    pub fn report(self, error: &dyn fmt::Display) {
        match self.policy() {
            FailurePolicy::Degrade => tracing::warn!(
                stage = self.name(),
                error = %error,
                "Stage failed, continuing with empty result"
            ),
            FailurePolicy::Abort => tracing::error!(
                stage = self.name(),
                error = %error,
                "Stage failed, aborting request"
            ),
        }
    }

    /// Resolve a degrade-stage result: errors are reported and replaced by `T::default()`.
    pub fn degrade<T: Default, E: fmt::Display>(self, result: Result<T, E>) -> T {
        debug_assert_eq!(self.policy(), FailurePolicy::Degrade);
        result.unwrap_or_else(|e| {
            self.report(&e);
            T::default()
        })
    }

    /// Resolve an abort-stage result: errors are reported and passed through.
    pub fn abort<T, E: fmt::Display>(self, result: Result<T, E>) -> Result<T, E> {
        debug_assert_eq!(self.policy(), FailurePolicy::Abort);
        result.map_err(|e| {
            self.report(&e);
            e
        })
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
