pub mod broad_phase;
pub mod error;
pub mod tree;

pub use common::geometry;

pub use broad_phase::{BroadPhase, PairCallback, NULL_PROXY};
pub use error::{AabbTreeError, AabbTreeResult};
pub use tree::{Config, DynamicTree, QueryCallback, RayCastCallback, NULL_NODE};
