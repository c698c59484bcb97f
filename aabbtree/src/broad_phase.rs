use crate::error::AabbTreeResult;
use crate::tree::{Config, DynamicTree, QueryCallback, RayCastCallback, NULL_NODE};
use common::geometry::{Aabb, RayCastInput, Vec2};

/// Sentinel proxy id, used to tombstone move-buffer entries.
pub const NULL_PROXY: u32 = NULL_NODE;

/// Receiver for candidate pairs found by [`BroadPhase::update_pairs`].
pub trait PairCallback<T> {
    fn add_pair(&mut self, user_data_a: &T, user_data_b: &T);
}

/// The broad phase tracks proxies in a dynamic AABB tree and reports
/// pairs whose fat AABBs may have started overlapping since the last
/// step. It does not persist pairs: clients consume the new candidates
/// and track overlap themselves.
pub struct BroadPhase<T> {
    tree: DynamicTree<T>,
    proxy_count: usize,
    /// Proxies whose pair set must be re-evaluated. `NULL_PROXY`
    /// entries are tombstones left by destroyed proxies.
    move_buffer: Vec<u32>,
    pair_buffer: Vec<(u32, u32)>,
}

impl<T: Copy + Default> BroadPhase<T> {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        Self {
            tree: DynamicTree::with_config(config),
            proxy_count: 0,
            move_buffer: Vec::with_capacity(16),
            pair_buffer: Vec::with_capacity(16),
        }
    }

    /// Creates a proxy. Pairs are not reported until
    /// [`BroadPhase::update_pairs`] runs.
    pub fn create_proxy(&mut self, aabb: Aabb, user_data: T) -> AabbTreeResult<u32> {
        let proxy_id = self.tree.create_proxy(aabb, user_data)?;
        self.proxy_count += 1;
        self.buffer_move(proxy_id);
        Ok(proxy_id)
    }

    /// Destroys a proxy. Dropping any pairs it was part of is up to the
    /// client.
    pub fn destroy_proxy(&mut self, proxy_id: u32) {
        self.unbuffer_move(proxy_id);
        self.proxy_count -= 1;
        self.tree.destroy_proxy(proxy_id);
    }

    /// Moves a proxy. Call as often as needed, then call
    /// [`BroadPhase::update_pairs`] once per step to settle the pairs.
    pub fn move_proxy(
        &mut self,
        proxy_id: u32,
        aabb: Aabb,
        displacement: Vec2,
    ) -> AabbTreeResult<()> {
        let buffer = self.tree.move_proxy(proxy_id, aabb, displacement)?;
        if buffer {
            self.buffer_move(proxy_id);
        }
        Ok(())
    }

    /// Forces the proxy's pairs to be re-evaluated on the next
    /// [`BroadPhase::update_pairs`].
    pub fn touch_proxy(&mut self, proxy_id: u32) {
        self.buffer_move(proxy_id);
    }

    fn buffer_move(&mut self, proxy_id: u32) {
        self.move_buffer.push(proxy_id);
    }

    fn unbuffer_move(&mut self, proxy_id: u32) {
        for entry in &mut self.move_buffer {
            if *entry == proxy_id {
                *entry = NULL_PROXY;
            }
        }
    }

    /// Computes candidate pairs for every buffered proxy and reports
    /// them through the callback, then clears the move buffer. Pairs
    /// are id-ordered; when both proxies of a pair moved this step the
    /// pair is reported exactly once. The buffer is not otherwise
    /// deduplicated, so clients sensitive to duplicates must sort and
    /// unique.
    pub fn update_pairs<C: PairCallback<T>>(&mut self, callback: &mut C) {
        self.pair_buffer.clear();

        // Perform tree queries for all moving proxies, gathering pairs.
        for i in 0..self.move_buffer.len() {
            let query_proxy_id = self.move_buffer[i];
            if query_proxy_id == NULL_PROXY {
                continue;
            }

            // Query with the fat AABB so pairs that may touch soon are
            // not missed.
            let fat_aabb = self.tree.fat_aabb(query_proxy_id);

            let mut collector = PairCollector {
                tree: &self.tree,
                query_proxy_id,
                pair_buffer: &mut self.pair_buffer,
            };
            self.tree.query(&mut collector, fat_aabb);
        }

        // Send the pairs to the caller.
        for &(proxy_id_a, proxy_id_b) in &self.pair_buffer {
            let user_data_a = self.tree.user_data(proxy_id_a);
            let user_data_b = self.tree.user_data(proxy_id_b);
            callback.add_pair(&user_data_a, &user_data_b);
        }

        // Clear the move flags and reset the buffer.
        for i in 0..self.move_buffer.len() {
            let proxy_id = self.move_buffer[i];
            if proxy_id == NULL_PROXY {
                continue;
            }
            self.tree.clear_moved(proxy_id);
        }
        self.move_buffer.clear();
    }

    /// Closure-friendly wrapper around [`BroadPhase::update_pairs`].
    pub fn update_pairs_with<F>(&mut self, f: F)
    where
        F: FnMut(&T, &T),
    {
        struct Adapter<F>(F);

        impl<T, F: FnMut(&T, &T)> PairCallback<T> for Adapter<F> {
            fn add_pair(&mut self, user_data_a: &T, user_data_b: &T) {
                (self.0)(user_data_a, user_data_b)
            }
        }

        let mut adapter = Adapter(f);
        self.update_pairs(&mut adapter);
    }

    /// Fat-AABB overlap test between two proxies.
    pub fn test_overlap(&self, proxy_id_a: u32, proxy_id_b: u32) -> bool {
        let aabb_a = self.tree.fat_aabb(proxy_id_a);
        let aabb_b = self.tree.fat_aabb(proxy_id_b);
        aabb_a.overlaps(&aabb_b)
    }

    pub fn fat_aabb(&self, proxy_id: u32) -> Aabb {
        self.tree.fat_aabb(proxy_id)
    }

    pub fn user_data(&self, proxy_id: u32) -> T {
        self.tree.user_data(proxy_id)
    }

    pub fn proxy_count(&self) -> usize {
        self.proxy_count
    }

    pub fn tree_height(&self) -> i32 {
        self.tree.height()
    }

    pub fn tree_balance(&self) -> i32 {
        self.tree.max_balance()
    }

    pub fn tree_quality(&self) -> f32 {
        self.tree.area_ratio()
    }

    /// Queries the tree directly for proxies overlapping `aabb`.
    pub fn query<C: QueryCallback>(&self, callback: &mut C, aabb: Aabb) {
        self.tree.query(callback, aabb);
    }

    /// Ray-casts against the proxies in the tree.
    pub fn ray_cast<C: RayCastCallback>(&self, callback: &mut C, input: &RayCastInput) {
        self.tree.ray_cast(callback, input);
    }

    /// Shifts the world origin: `position -= new_origin`.
    pub fn shift_origin(&mut self, new_origin: Vec2) {
        self.tree.shift_origin(new_origin);
    }

    /// The underlying tree, for diagnostics and validation.
    pub fn tree(&self) -> &DynamicTree<T> {
        &self.tree
    }
}

impl<T: Copy + Default> Default for BroadPhase<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Query callback used while gathering pairs. Borrowing the tree, the
/// driving proxy id, and the pair buffer as disjoint fields lets the
/// broad phase query its own tree without aliasing itself.
struct PairCollector<'a, T> {
    tree: &'a DynamicTree<T>,
    query_proxy_id: u32,
    pair_buffer: &'a mut Vec<(u32, u32)>,
}

impl<T: Copy + Default> QueryCallback for PairCollector<'_, T> {
    fn query_callback(&mut self, proxy_id: u32) -> bool {
        // A proxy cannot form a pair with itself.
        if proxy_id == self.query_proxy_id {
            return true;
        }

        let moved = self.tree.was_moved(proxy_id);
        if moved && proxy_id > self.query_proxy_id {
            // Both proxies are moving: the one with the larger id will
            // discover this pair from its own query.
            return true;
        }

        let proxy_id_a = proxy_id.min(self.query_proxy_id);
        let proxy_id_b = proxy_id.max(self.query_proxy_id);
        self.pair_buffer.push((proxy_id_a, proxy_id_b));

        true
    }
}
