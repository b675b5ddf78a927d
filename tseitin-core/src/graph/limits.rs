//! Retry budgets for the randomized construction modes.

use crate::error::GraphError;

const DEFAULT_CONFIGURATION_ATTEMPTS: usize = 1000;
const DEFAULT_SWAPS_PER_EDGE: usize = 10;
const DEFAULT_ATTEMPTS_PER_SWAP: usize = 200;
const DEFAULT_MIN_REWIRE_ATTEMPTS: usize = 1000;

/// Attempt caps applied by [`RegularGraphGenerator`](super::RegularGraphGenerator).
///
/// The defaults reproduce the classic experiment settings: 1000
/// configuration-model attempts, ten swaps per edge at `p = 1`, and
/// `max(1000, 200 * target_swaps)` rewiring attempts.
///
/// # Examples
/// ```
/// use tseitin_core::GenerationLimits;
///
/// let limits = GenerationLimits::default().with_configuration_attempts(10);
/// assert_eq!(limits.configuration_attempts(), 10);
/// assert_eq!(limits.rewire_attempts(5), 1000);
/// assert_eq!(limits.rewire_attempts(50), 10_000);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerationLimits {
    configuration_attempts: usize,
    swaps_per_edge: usize,
    attempts_per_swap: usize,
    min_rewire_attempts: usize,
}

impl Default for GenerationLimits {
    fn default() -> Self {
        Self {
            configuration_attempts: DEFAULT_CONFIGURATION_ATTEMPTS,
            swaps_per_edge: DEFAULT_SWAPS_PER_EDGE,
            attempts_per_swap: DEFAULT_ATTEMPTS_PER_SWAP,
            min_rewire_attempts: DEFAULT_MIN_REWIRE_ATTEMPTS,
        }
    }
}

impl GenerationLimits {
    /// Overrides how many full stub pairings the configuration model tries.
    #[must_use]
    pub const fn with_configuration_attempts(mut self, attempts: usize) -> Self {
        self.configuration_attempts = attempts;
        self
    }

    /// Overrides the swap target per edge at `p = 1`.
    #[must_use]
    pub const fn with_swaps_per_edge(mut self, swaps: usize) -> Self {
        self.swaps_per_edge = swaps;
        self
    }

    /// Overrides the rewiring attempt budget per target swap.
    #[must_use]
    pub const fn with_attempts_per_swap(mut self, attempts: usize) -> Self {
        self.attempts_per_swap = attempts;
        self
    }

    /// Overrides the floor on the rewiring attempt budget.
    #[must_use]
    pub const fn with_min_rewire_attempts(mut self, attempts: usize) -> Self {
        self.min_rewire_attempts = attempts;
        self
    }

    /// Returns the configuration-model attempt cap.
    #[must_use]
    pub const fn configuration_attempts(&self) -> usize {
        self.configuration_attempts
    }

    /// Returns the swap target per edge at `p = 1`.
    #[must_use]
    pub const fn swaps_per_edge(&self) -> usize {
        self.swaps_per_edge
    }

    /// Returns the rewiring attempt budget for `target_swaps` swaps.
    #[must_use]
    pub fn rewire_attempts(&self, target_swaps: usize) -> usize {
        self.min_rewire_attempts
            .max(target_swaps.saturating_mul(self.attempts_per_swap))
    }

    pub(super) fn check(&self) -> Result<(), GraphError> {
        if self.configuration_attempts == 0 {
            return Err(GraphError::InvalidLimits {
                reason: "configuration_attempts must be greater than zero",
            });
        }
        if self.swaps_per_edge == 0 {
            return Err(GraphError::InvalidLimits {
                reason: "swaps_per_edge must be greater than zero",
            });
        }
        if self.attempts_per_swap == 0 && self.min_rewire_attempts == 0 {
            return Err(GraphError::InvalidLimits {
                reason: "rewiring needs a non-zero attempt budget",
            });
        }
        Ok(())
    }
}
