use super::types::NULL_NODE;
use super::DynamicTree;

impl<T: Copy + Default> DynamicTree<T> {
    /// Performs a single left or right rotation if the subtree rooted
    /// at `a` is imbalanced by more than one level. Returns the index
    /// of the subtree's new root.
    pub(crate) fn balance(&mut self, a: u32) -> u32 {
        debug_assert!(a != NULL_NODE);

        if self.nodes[a as usize].is_leaf() || self.nodes[a as usize].height < 2 {
            return a;
        }

        let b = self.nodes[a as usize].child1;
        let c = self.nodes[a as usize].child2;
        debug_assert!((b as usize) < self.nodes.len());
        debug_assert!((c as usize) < self.nodes.len());

        let balance = self.nodes[c as usize].height - self.nodes[b as usize].height;

        // Rotate C up.
        if balance > 1 {
            let f = self.nodes[c as usize].child1;
            let g = self.nodes[c as usize].child2;

            // Swap A and C.
            self.nodes[c as usize].child1 = a;
            self.nodes[c as usize].parent = self.nodes[a as usize].parent;
            self.nodes[a as usize].parent = c;

            // A's old parent should point to C.
            let c_parent = self.nodes[c as usize].parent;
            if c_parent != NULL_NODE {
                if self.nodes[c_parent as usize].child1 == a {
                    self.nodes[c_parent as usize].child1 = c;
                } else {
                    debug_assert!(self.nodes[c_parent as usize].child2 == a);
                    self.nodes[c_parent as usize].child2 = c;
                }
            } else {
                self.root = c;
            }

            // The taller grandchild stays under C; the other becomes
            // A's new second child.
            if self.nodes[f as usize].height > self.nodes[g as usize].height {
                self.nodes[c as usize].child2 = f;
                self.nodes[a as usize].child2 = g;
                self.nodes[g as usize].parent = a;
            } else {
                self.nodes[c as usize].child2 = g;
                self.nodes[a as usize].child2 = f;
                self.nodes[f as usize].parent = a;
            }

            let a_child1 = self.nodes[a as usize].child1;
            let a_child2 = self.nodes[a as usize].child2;
            self.refresh_node(a, a_child1, a_child2);
            let c_child1 = self.nodes[c as usize].child1;
            let c_child2 = self.nodes[c as usize].child2;
            self.refresh_node(c, c_child1, c_child2);

            return c;
        }

        // Rotate B up.
        if balance < -1 {
            let d = self.nodes[b as usize].child1;
            let e = self.nodes[b as usize].child2;

            // Swap A and B.
            self.nodes[b as usize].child1 = a;
            self.nodes[b as usize].parent = self.nodes[a as usize].parent;
            self.nodes[a as usize].parent = b;

            // A's old parent should point to B.
            let b_parent = self.nodes[b as usize].parent;
            if b_parent != NULL_NODE {
                if self.nodes[b_parent as usize].child1 == a {
                    self.nodes[b_parent as usize].child1 = b;
                } else {
                    debug_assert!(self.nodes[b_parent as usize].child2 == a);
                    self.nodes[b_parent as usize].child2 = b;
                }
            } else {
                self.root = b;
            }

            if self.nodes[d as usize].height > self.nodes[e as usize].height {
                self.nodes[b as usize].child2 = d;
                self.nodes[a as usize].child1 = e;
                self.nodes[e as usize].parent = a;
            } else {
                self.nodes[b as usize].child2 = e;
                self.nodes[a as usize].child1 = d;
                self.nodes[d as usize].parent = a;
            }

            let a_child1 = self.nodes[a as usize].child1;
            let a_child2 = self.nodes[a as usize].child2;
            self.refresh_node(a, a_child1, a_child2);
            let b_child1 = self.nodes[b as usize].child1;
            let b_child2 = self.nodes[b as usize].child2;
            self.refresh_node(b, b_child1, b_child2);

            return b;
        }

        a
    }
}
