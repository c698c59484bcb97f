use super::types::NULL_NODE;
use super::DynamicTree;
use common::geometry::Aabb;

impl<T: Copy + Default> DynamicTree<T> {
    /// Inserts a leaf by descending from the root along the cheapest
    /// path, using perimeter as the surface-area cost. The chosen
    /// sibling and the leaf are joined under a fresh parent, then
    /// heights and bounds are repaired walking back up, rebalancing at
    /// every ancestor.
    pub(crate) fn insert_leaf(&mut self, leaf: u32) {
        if self.root == NULL_NODE {
            self.root = leaf;
            self.nodes[leaf as usize].parent = NULL_NODE;
            return;
        }

        // Find the best sibling for this leaf.
        let leaf_aabb = self.nodes[leaf as usize].aabb;
        let mut index = self.root;
        while !self.nodes[index as usize].is_leaf() {
            let child1 = self.nodes[index as usize].child1;
            let child2 = self.nodes[index as usize].child2;

            let area = self.nodes[index as usize].aabb.perimeter();
            let combined_area = self.nodes[index as usize]
                .aabb
                .union(&leaf_aabb)
                .perimeter();

            // Cost of creating a new parent for this node and the leaf.
            let cost = 2.0 * combined_area;

            // Minimum cost of pushing the leaf further down the tree.
            let inheritance_cost = 2.0 * (combined_area - area);

            let cost1 = self.descend_cost(child1, &leaf_aabb, inheritance_cost);
            let cost2 = self.descend_cost(child2, &leaf_aabb, inheritance_cost);

            if cost < cost1 && cost < cost2 {
                break;
            }

            index = if cost1 < cost2 { child1 } else { child2 };
        }

        let sibling = index;

        // Splice a new parent in between the sibling and its old parent.
        let old_parent = self.nodes[sibling as usize].parent;
        let new_parent = self.allocate_node();
        {
            let sibling_aabb = self.nodes[sibling as usize].aabb;
            let sibling_height = self.nodes[sibling as usize].height;
            let node = &mut self.nodes[new_parent as usize];
            node.parent = old_parent;
            node.user_data = T::default();
            node.aabb = leaf_aabb.union(&sibling_aabb);
            node.height = sibling_height + 1;
        }

        if old_parent != NULL_NODE {
            if self.nodes[old_parent as usize].child1 == sibling {
                self.nodes[old_parent as usize].child1 = new_parent;
            } else {
                self.nodes[old_parent as usize].child2 = new_parent;
            }
        } else {
            // The sibling was the root.
            self.root = new_parent;
        }
        self.nodes[new_parent as usize].child1 = sibling;
        self.nodes[new_parent as usize].child2 = leaf;
        self.nodes[sibling as usize].parent = new_parent;
        self.nodes[leaf as usize].parent = new_parent;

        // Walk back up the tree fixing heights and AABBs.
        let mut index = self.nodes[leaf as usize].parent;
        while index != NULL_NODE {
            index = self.balance(index);

            let child1 = self.nodes[index as usize].child1;
            let child2 = self.nodes[index as usize].child2;

            debug_assert!(child1 != NULL_NODE);
            debug_assert!(child2 != NULL_NODE);

            self.refresh_node(index, child1, child2);
            index = self.nodes[index as usize].parent;
        }
    }

    /// Cost of descending the leaf into the given child.
    fn descend_cost(&self, child: u32, leaf_aabb: &Aabb, inheritance_cost: f32) -> f32 {
        let child_node = &self.nodes[child as usize];
        let new_area = child_node.aabb.union(leaf_aabb).perimeter();
        if child_node.is_leaf() {
            new_area + inheritance_cost
        } else {
            let old_area = child_node.aabb.perimeter();
            (new_area - old_area) + inheritance_cost
        }
    }

    /// Removes a leaf by replacing its parent with its sibling, then
    /// repairs bounds and heights on the way back to the root.
    pub(crate) fn remove_leaf(&mut self, leaf: u32) {
        if leaf == self.root {
            self.root = NULL_NODE;
            return;
        }

        let parent = self.nodes[leaf as usize].parent;
        let grand_parent = self.nodes[parent as usize].parent;
        let sibling = if self.nodes[parent as usize].child1 == leaf {
            self.nodes[parent as usize].child2
        } else {
            self.nodes[parent as usize].child1
        };

        if grand_parent != NULL_NODE {
            // Destroy the parent and connect the sibling to the
            // grandparent in its place.
            if self.nodes[grand_parent as usize].child1 == parent {
                self.nodes[grand_parent as usize].child1 = sibling;
            } else {
                self.nodes[grand_parent as usize].child2 = sibling;
            }
            self.nodes[sibling as usize].parent = grand_parent;
            self.free_node(parent);

            // Adjust ancestor bounds.
            let mut index = grand_parent;
            while index != NULL_NODE {
                index = self.balance(index);

                let child1 = self.nodes[index as usize].child1;
                let child2 = self.nodes[index as usize].child2;

                self.refresh_node(index, child1, child2);
                index = self.nodes[index as usize].parent;
            }
        } else {
            self.root = sibling;
            self.nodes[sibling as usize].parent = NULL_NODE;
            self.free_node(parent);
        }
    }

    /// Recomputes a node's AABB and height from its children.
    pub(crate) fn refresh_node(&mut self, index: u32, child1: u32, child2: u32) {
        let aabb = self.nodes[child1 as usize]
            .aabb
            .union(&self.nodes[child2 as usize].aabb);
        let height = 1 + self.nodes[child1 as usize]
            .height
            .max(self.nodes[child2 as usize].height);
        let node = &mut self.nodes[index as usize];
        node.aabb = aabb;
        node.height = height;
    }
}
