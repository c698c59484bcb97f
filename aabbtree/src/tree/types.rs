use crate::error::{AabbTreeError, AabbTreeResult};
use common::geometry::{Aabb, Vec2};
use smallvec::SmallVec;

/// Sentinel index for "no node". Also doubles as the null proxy id.
pub const NULL_NODE: u32 = u32::MAX;

pub(crate) type TraversalStack = SmallVec<[u32; 256]>;

/// One arena slot. Free slots are marked by `height == -1` and reuse
/// `parent` as the next-free link.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TreeNode<T> {
    pub aabb: Aabb,
    pub user_data: T,
    /// Parent index while live, next free slot while freed.
    pub parent: u32,
    pub child1: u32,
    pub child2: u32,
    /// 0 for leaves, -1 for free slots, 1 + max child height otherwise.
    pub height: i32,
    /// Set when the leaf moved or was created and still awaits pair
    /// generation.
    pub moved: bool,
}

impl<T: Default> TreeNode<T> {
    pub(crate) fn free_slot(next: u32) -> Self {
        Self {
            aabb: Aabb::default(),
            user_data: T::default(),
            parent: next,
            child1: NULL_NODE,
            child2: NULL_NODE,
            height: -1,
            moved: false,
        }
    }
}

impl<T> TreeNode<T> {
    #[inline(always)]
    pub(crate) fn is_leaf(&self) -> bool {
        self.child1 == NULL_NODE
    }
}

pub(crate) fn validate_aabb(aabb: &Aabb) -> AabbTreeResult<()> {
    if !aabb.is_valid() {
        return Err(AabbTreeError::InvalidAabb {
            min_x: aabb.lower.x,
            min_y: aabb.lower.y,
            max_x: aabb.upper.x,
            max_y: aabb.upper.y,
        });
    }
    Ok(())
}

pub(crate) fn validate_displacement(displacement: Vec2) -> AabbTreeResult<()> {
    if !displacement.is_finite() {
        return Err(AabbTreeError::InvalidDisplacement {
            x: displacement.x,
            y: displacement.y,
        });
    }
    Ok(())
}
