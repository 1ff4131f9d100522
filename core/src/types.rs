//! Shared primitive types used across the entire simulation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A seed for one deterministic stream.
pub type Seed = u64;

/// The canonical sweep run identifier.
pub type RunId = String;

/// Position of a combination in sweep order.
///
/// Stable for a given set of parameter lists, so it doubles as the key
/// that ties a combination to its outcome series and store rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CombinationId(pub usize);

impl fmt::Display for CombinationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
