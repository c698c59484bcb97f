pub mod block_allocator;
pub mod stack_allocator;


pub use block_allocator::BlockAllocator;
pub use stack_allocator::StackAllocator;

pub use aabbtree::{
    AabbTreeError, AabbTreeResult, BroadPhase, Config, DynamicTree, PairCallback, QueryCallback,
    RayCastCallback, NULL_NODE, NULL_PROXY,
};
pub use common::geometry::{Aabb, RayCastInput, RayCastOutput, Vec2};
