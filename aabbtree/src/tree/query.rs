use super::types::{TraversalStack, NULL_NODE};
use super::DynamicTree;
use common::geometry::Aabb;

/// Receiver for AABB queries. Invoked once per leaf whose fat AABB
/// overlaps the query region.
pub trait QueryCallback {
    /// Returning `false` terminates the traversal.
    fn query_callback(&mut self, proxy_id: u32) -> bool;
}

impl<T: Copy + Default> DynamicTree<T> {
    /// Reports every leaf whose fat AABB overlaps `aabb` through the
    /// callback, in pre-order.
    pub fn query<C: QueryCallback>(&self, callback: &mut C, aabb: Aabb) {
        if self.root == NULL_NODE {
            return;
        }

        let mut stack = TraversalStack::new();
        stack.push(self.root);

        while let Some(node_id) = stack.pop() {
            let node = &self.nodes[node_id as usize];
            if !node.aabb.overlaps(&aabb) {
                continue;
            }

            if node.is_leaf() {
                if !callback.query_callback(node_id) {
                    return;
                }
            } else {
                stack.push(node.child1);
                stack.push(node.child2);
            }
        }
    }

    /// Closure-friendly wrapper around [`DynamicTree::query`].
    pub fn query_with<F>(&self, f: F, aabb: Aabb)
    where
        F: FnMut(u32) -> bool,
    {
        struct Adapter<F>(F);

        impl<F: FnMut(u32) -> bool> QueryCallback for Adapter<F> {
            fn query_callback(&mut self, proxy_id: u32) -> bool {
                (self.0)(proxy_id)
            }
        }

        let mut adapter = Adapter(f);
        self.query(&mut adapter, aabb);
    }
}
