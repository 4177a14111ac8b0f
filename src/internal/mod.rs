//! Internal implementation details.

pub(crate) mod construction;

pub use construction::MAX_RESOLUTION_DEPTH;
pub(crate) use construction::{ConstructionGuard, DepthGuard};
