use super::types::{TraversalStack, NULL_NODE};
use super::DynamicTree;
use common::geometry::{Aabb, RayCastInput};

/// Receiver for ray casts. Invoked once per candidate leaf along the
/// ray, with the segment clipped to the best fraction found so far.
pub trait RayCastCallback {
    /// The return value updates the cast: `0.0` terminates it, a
    /// negative value ignores this proxy and leaves the ray unclipped,
    /// a positive value becomes the new maximum fraction.
    fn ray_cast_callback(&mut self, input: &RayCastInput, proxy_id: u32) -> f32;
}

impl<T: Copy + Default> DynamicTree<T> {
    /// Casts the segment `p1 -> p1 + max_fraction * (p2 - p1)` through
    /// the tree. Internal nodes are culled with a segment-AABB overlap
    /// test plus a separating-axis test against the ray normal; the
    /// callback decides what happens at each leaf. Runs in roughly
    /// k log n for k hits over n proxies.
    pub fn ray_cast<C: RayCastCallback>(&self, callback: &mut C, input: &RayCastInput) {
        if self.root == NULL_NODE {
            return;
        }

        let p1 = input.p1;
        let p2 = input.p2;
        let r = p2 - p1;
        debug_assert!(r.length_squared() > 0.0);
        let r = r.normalize();

        // v is perpendicular to the segment; its absolute value feeds
        // the separating-axis test below.
        let v = r.perp();
        let abs_v = v.abs();

        let mut max_fraction = input.max_fraction;

        // Bounding box of the clipped segment.
        let t = p1 + max_fraction * (p2 - p1);
        let mut segment_aabb = Aabb::new(p1.min(t), p1.max(t));

        let mut stack = TraversalStack::new();
        stack.push(self.root);

        while let Some(node_id) = stack.pop() {
            let node = &self.nodes[node_id as usize];
            if !node.aabb.overlaps(&segment_aabb) {
                continue;
            }

            // Separating axis for the segment: no hit when
            // |dot(v, p1 - c)| > dot(|v|, h).
            let c = node.aabb.center();
            let h = node.aabb.extents();
            let separation = v.dot(p1 - c).abs() - abs_v.dot(h);
            if separation > 0.0 {
                continue;
            }

            if node.is_leaf() {
                let sub_input = RayCastInput {
                    p1,
                    p2,
                    max_fraction,
                };
                let value = callback.ray_cast_callback(&sub_input, node_id);

                if value == 0.0 {
                    // The client terminated the cast.
                    return;
                }

                if value > 0.0 {
                    // Shorten the segment to the new best fraction.
                    max_fraction = value;
                    let t = p1 + max_fraction * (p2 - p1);
                    segment_aabb = Aabb::new(p1.min(t), p1.max(t));
                }
            } else {
                // Pop child1 first so an early hit can clip the ray
                // before the sibling subtree is tested.
                stack.push(node.child2);
                stack.push(node.child1);
            }
        }
    }

    /// Closure-friendly wrapper around [`DynamicTree::ray_cast`].
    pub fn ray_cast_with<F>(&self, f: F, input: &RayCastInput)
    where
        F: FnMut(&RayCastInput, u32) -> f32,
    {
        struct Adapter<F>(F);

        impl<F: FnMut(&RayCastInput, u32) -> f32> RayCastCallback for Adapter<F> {
            fn ray_cast_callback(&mut self, input: &RayCastInput, proxy_id: u32) -> f32 {
                (self.0)(input, proxy_id)
            }
        }

        let mut adapter = Adapter(f);
        self.ray_cast(&mut adapter, input);
    }
}
