pub mod config;

mod balance;
mod insert;
mod query;
mod ray_cast;
mod types;
mod validation;

pub use config::Config;
pub use query::QueryCallback;
pub use ray_cast::RayCastCallback;
pub use types::NULL_NODE;

use crate::error::AabbTreeResult;
use common::geometry::{Aabb, Vec2};
use types::{validate_aabb, validate_displacement, TreeNode};

/// A dynamic AABB tree: a balanced binary tree of fattened bounding
/// boxes, stored in an index-addressed arena so proxy ids stay stable
/// while the tree restructures itself.
///
/// Leaves are proxies created by the client; internal nodes hold the
/// union of their children's boxes. Stored leaf boxes are inflated by
/// `Config::aabb_extension` so small motions do not touch the tree.
pub struct DynamicTree<T> {
    pub(crate) nodes: Vec<TreeNode<T>>,
    pub(crate) root: u32,
    pub(crate) node_count: u32,
    pub(crate) free_list: u32,
    pub(crate) config: Config,
}

impl<T: Copy + Default> DynamicTree<T> {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        let capacity = config.initial_capacity.max(2);
        let mut nodes = Vec::with_capacity(capacity);
        for i in 0..capacity {
            let next = if i + 1 < capacity {
                (i + 1) as u32
            } else {
                NULL_NODE
            };
            nodes.push(TreeNode::free_slot(next));
        }

        Self {
            nodes,
            root: NULL_NODE,
            node_count: 0,
            free_list: 0,
            config,
        }
    }

    /// Pops a slot off the free list, doubling the arena when it runs
    /// dry. Indices handed out earlier stay valid across growth.
    pub(crate) fn allocate_node(&mut self) -> u32 {
        if self.free_list == NULL_NODE {
            debug_assert!(self.node_count as usize == self.nodes.len());

            let old_capacity = self.nodes.len();
            let new_capacity = old_capacity * 2;
            for i in old_capacity..new_capacity {
                let next = if i + 1 < new_capacity {
                    i as u32 + 1
                } else {
                    NULL_NODE
                };
                self.nodes.push(TreeNode::free_slot(next));
            }
            self.free_list = old_capacity as u32;
        }

        let node_id = self.free_list;
        let node = &mut self.nodes[node_id as usize];
        self.free_list = node.parent;
        node.parent = NULL_NODE;
        node.child1 = NULL_NODE;
        node.child2 = NULL_NODE;
        node.height = 0;
        node.user_data = T::default();
        node.moved = false;
        self.node_count += 1;
        node_id
    }

    pub(crate) fn free_node(&mut self, node_id: u32) {
        debug_assert!((node_id as usize) < self.nodes.len());
        debug_assert!(self.node_count > 0);
        self.nodes[node_id as usize].parent = self.free_list;
        self.nodes[node_id as usize].height = -1;
        self.free_list = node_id;
        self.node_count -= 1;
    }

    /// Creates a leaf proxy. The stored AABB is the given one fattened
    /// by the configured extension. Returns the proxy id.
    pub fn create_proxy(&mut self, aabb: Aabb, user_data: T) -> AabbTreeResult<u32> {
        validate_aabb(&aabb)?;

        let proxy_id = self.allocate_node();
        let node = &mut self.nodes[proxy_id as usize];
        node.aabb = aabb.inflate(self.config.aabb_extension);
        node.user_data = user_data;
        node.height = 0;
        node.moved = true;

        self.insert_leaf(proxy_id);
        Ok(proxy_id)
    }

    pub fn destroy_proxy(&mut self, proxy_id: u32) {
        debug_assert!((proxy_id as usize) < self.nodes.len());
        debug_assert!(self.nodes[proxy_id as usize].is_leaf());

        self.remove_leaf(proxy_id);
        self.free_node(proxy_id);
    }

    /// Moves a proxy to a new AABB. Returns `false` when the stored fat
    /// AABB still covers the new box and is not oversized, in which
    /// case the tree is untouched; otherwise the leaf is reinserted
    /// with a freshly predicted fat AABB and `true` is returned.
    pub fn move_proxy(
        &mut self,
        proxy_id: u32,
        aabb: Aabb,
        displacement: Vec2,
    ) -> AabbTreeResult<bool> {
        validate_aabb(&aabb)?;
        validate_displacement(displacement)?;
        debug_assert!((proxy_id as usize) < self.nodes.len());
        debug_assert!(self.nodes[proxy_id as usize].is_leaf());

        let extension = self.config.aabb_extension;
        let mut fat_aabb = aabb.inflate(extension);

        // Stretch the box toward where the proxy is headed.
        let d = self.config.aabb_multiplier * displacement;
        if d.x < 0.0 {
            fat_aabb.lower.x += d.x;
        } else {
            fat_aabb.upper.x += d.x;
        }
        if d.y < 0.0 {
            fat_aabb.lower.y += d.y;
        } else {
            fat_aabb.upper.y += d.y;
        }

        let tree_aabb = self.nodes[proxy_id as usize].aabb;
        if tree_aabb.contains(&aabb) {
            // The stored box still covers the object, but it may be
            // stale and huge (a fast mover that has since slowed down).
            // Only keep it if it is no bigger than the new fat box
            // inflated once more.
            let huge_aabb = fat_aabb.inflate(4.0 * extension);
            if huge_aabb.contains(&tree_aabb) {
                return Ok(false);
            }
        }

        self.remove_leaf(proxy_id);
        self.nodes[proxy_id as usize].aabb = fat_aabb;
        self.insert_leaf(proxy_id);
        self.nodes[proxy_id as usize].moved = true;

        Ok(true)
    }

    pub fn user_data(&self, proxy_id: u32) -> T {
        debug_assert!((proxy_id as usize) < self.nodes.len());
        self.nodes[proxy_id as usize].user_data
    }

    /// The stored (fattened) AABB for a proxy.
    pub fn fat_aabb(&self, proxy_id: u32) -> Aabb {
        debug_assert!((proxy_id as usize) < self.nodes.len());
        self.nodes[proxy_id as usize].aabb
    }

    pub fn was_moved(&self, proxy_id: u32) -> bool {
        debug_assert!((proxy_id as usize) < self.nodes.len());
        self.nodes[proxy_id as usize].moved
    }

    pub fn clear_moved(&mut self, proxy_id: u32) {
        debug_assert!((proxy_id as usize) < self.nodes.len());
        self.nodes[proxy_id as usize].moved = false;
    }

    /// Height of the root, 0 for an empty tree.
    pub fn height(&self) -> i32 {
        if self.root == NULL_NODE {
            return 0;
        }
        self.nodes[self.root as usize].height
    }

    /// Number of live nodes (leaves plus internal nodes).
    pub fn node_count(&self) -> usize {
        self.node_count as usize
    }

    /// Total arena slots, free ones included.
    pub fn node_capacity(&self) -> usize {
        self.nodes.len()
    }

    /// Shifts the world origin: every stored bound moves by
    /// `-new_origin`. Free slots are shifted too, harmlessly; they are
    /// fully reinitialized on allocation.
    pub fn shift_origin(&mut self, new_origin: Vec2) {
        for node in &mut self.nodes {
            node.aabb.lower -= new_origin;
            node.aabb.upper -= new_origin;
        }
    }
}

impl<T: Copy + Default> Default for DynamicTree<T> {
    fn default() -> Self {
        Self::new()
    }
}
