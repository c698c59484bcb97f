use super::types::NULL_NODE;
use super::DynamicTree;
use fxhash::FxHashSet;

impl<T: Copy + Default> DynamicTree<T> {
    /// Height recomputed by traversal; must agree with the cached root
    /// height on a consistent tree.
    pub fn compute_height(&self) -> i32 {
        if self.root == NULL_NODE {
            return 0;
        }
        self.compute_subtree_height(self.root)
    }

    fn compute_subtree_height(&self, node_id: u32) -> i32 {
        debug_assert!((node_id as usize) < self.nodes.len());
        let node = &self.nodes[node_id as usize];

        if node.is_leaf() {
            return 0;
        }

        let height1 = self.compute_subtree_height(node.child1);
        let height2 = self.compute_subtree_height(node.child2);
        1 + height1.max(height2)
    }

    /// The largest height difference between the two children of any
    /// internal node. Small values mean a well-proportioned tree.
    pub fn max_balance(&self) -> i32 {
        let mut max_balance = 0;
        for node in &self.nodes {
            if node.height <= 1 {
                continue;
            }

            debug_assert!(!node.is_leaf());

            let height1 = self.nodes[node.child1 as usize].height;
            let height2 = self.nodes[node.child2 as usize].height;
            max_balance = max_balance.max((height2 - height1).abs());
        }

        max_balance
    }

    /// Sum of all live node perimeters over the root perimeter. A
    /// quality metric: lower means tighter bounds throughout the tree.
    pub fn area_ratio(&self) -> f32 {
        if self.root == NULL_NODE {
            return 0.0;
        }

        let root_area = self.nodes[self.root as usize].aabb.perimeter();

        let mut total_area = 0.0;
        for node in &self.nodes {
            if node.height < 0 {
                // Free slot.
                continue;
            }
            total_area += node.aabb.perimeter();
        }

        total_area / root_area
    }

    /// Rebuilds the tree bottom-up by greedily pairing the two nodes
    /// whose union has the smallest perimeter. O(n^2); a maintenance
    /// operation, not a per-step one.
    pub fn rebuild_bottom_up(&mut self) {
        let mut nodes: Vec<u32> = Vec::with_capacity(self.node_count as usize);

        // Collect the leaves, free the internal nodes.
        for i in 0..self.nodes.len() as u32 {
            if self.nodes[i as usize].height < 0 {
                continue;
            }

            if self.nodes[i as usize].is_leaf() {
                self.nodes[i as usize].parent = NULL_NODE;
                nodes.push(i);
            } else {
                self.free_node(i);
            }
        }

        let mut count = nodes.len();
        while count > 1 {
            let mut min_cost = f32::MAX;
            let mut i_min = 0;
            let mut j_min = 1;
            for i in 0..count {
                let aabb_i = self.nodes[nodes[i] as usize].aabb;
                for j in i + 1..count {
                    let aabb_j = self.nodes[nodes[j] as usize].aabb;
                    let cost = aabb_i.union(&aabb_j).perimeter();
                    if cost < min_cost {
                        i_min = i;
                        j_min = j;
                        min_cost = cost;
                    }
                }
            }

            let index1 = nodes[i_min];
            let index2 = nodes[j_min];

            let parent_index = self.allocate_node();
            {
                let aabb1 = self.nodes[index1 as usize].aabb;
                let aabb2 = self.nodes[index2 as usize].aabb;
                let height1 = self.nodes[index1 as usize].height;
                let height2 = self.nodes[index2 as usize].height;
                let parent = &mut self.nodes[parent_index as usize];
                parent.child1 = index1;
                parent.child2 = index2;
                parent.height = 1 + height1.max(height2);
                parent.aabb = aabb1.union(&aabb2);
                parent.parent = NULL_NODE;
            }
            self.nodes[index1 as usize].parent = parent_index;
            self.nodes[index2 as usize].parent = parent_index;

            nodes[j_min] = nodes[count - 1];
            nodes[i_min] = parent_index;
            count -= 1;
        }

        self.root = if count == 1 { nodes[0] } else { NULL_NODE };

        if cfg!(debug_assertions) {
            self.validate();
        }
    }

    /// Checks every structural invariant of the tree and panics on the
    /// first violation. Meant for tests and debug builds.
    pub fn validate(&self) {
        self.validate_structure();
        self.validate_metrics();

        let mut free_count = 0;
        let mut free_index = self.free_list;
        while free_index != NULL_NODE {
            assert!((free_index as usize) < self.nodes.len());
            assert!(self.nodes[free_index as usize].height == -1);
            free_index = self.nodes[free_index as usize].parent;
            free_count += 1;
        }

        assert_eq!(self.height(), self.compute_height());
        assert_eq!(
            self.node_count as usize + free_count,
            self.nodes.len(),
            "free-list length plus live-node count must equal arena capacity"
        );
    }

    /// Parent/child pointers form a tree reaching exactly the live
    /// nodes.
    fn validate_structure(&self) {
        if self.root == NULL_NODE {
            assert_eq!(self.node_count, 0);
            return;
        }

        assert!(self.nodes[self.root as usize].parent == NULL_NODE);

        let mut reachable = FxHashSet::default();
        let mut stack = vec![self.root];
        while let Some(index) = stack.pop() {
            assert!((index as usize) < self.nodes.len());
            assert!(
                reachable.insert(index),
                "node {} reached twice; the tree has a cycle or shared child",
                index
            );

            let node = &self.nodes[index as usize];
            assert!(node.height >= 0, "free slot {} reachable from root", index);

            if node.is_leaf() {
                assert!(node.child1 == NULL_NODE);
                assert!(node.child2 == NULL_NODE);
                assert_eq!(node.height, 0);
                continue;
            }

            assert!((node.child1 as usize) < self.nodes.len());
            assert!((node.child2 as usize) < self.nodes.len());
            assert_eq!(self.nodes[node.child1 as usize].parent, index);
            assert_eq!(self.nodes[node.child2 as usize].parent, index);

            stack.push(node.child1);
            stack.push(node.child2);
        }

        assert_eq!(
            reachable.len(),
            self.node_count as usize,
            "nodes reachable from the root must be exactly the live nodes"
        );
    }

    /// Cached heights and AABBs agree with the children they were
    /// computed from.
    fn validate_metrics(&self) {
        if self.root == NULL_NODE {
            return;
        }

        let mut stack = vec![self.root];
        while let Some(index) = stack.pop() {
            let node = &self.nodes[index as usize];
            if node.is_leaf() {
                continue;
            }

            let child1 = &self.nodes[node.child1 as usize];
            let child2 = &self.nodes[node.child2 as usize];

            assert_eq!(node.height, 1 + child1.height.max(child2.height));
            assert_eq!(node.aabb, child1.aabb.union(&child2.aabb));

            stack.push(node.child1);
            stack.push(node.child2);
        }
    }
}
