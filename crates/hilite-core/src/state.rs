//! Depth-based visual state of a marker.

use serde::{Deserialize, Serialize};

/// Where the current slice lies relative to an object's depth range.
///
/// Always derived from a [`DepthRange`](crate::extent::DepthRange) and a
/// slice position, never set directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DepthState {
    /// The slice intersects the object.
    Active,
    /// The slice lies past the object's far end.
    AboveRange,
    /// The slice lies before the object begins.
    BelowRange,
}

impl DepthState {
    /// Returns true for [`DepthState::Active`].
    #[must_use]
    pub fn is_active(self) -> bool {
        matches!(self, DepthState::Active)
    }
}
