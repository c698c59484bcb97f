#[derive(Debug, Clone)]
pub struct Config {
    /// Margin added on every side of a stored AABB so small motions do
    /// not disturb the tree.
    pub aabb_extension: f32,
    /// Multiplier applied to the displacement when predicting where a
    /// moving proxy is headed.
    pub aabb_multiplier: f32,
    /// Pre-allocate the node arena with about this many slots.
    pub initial_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            aabb_extension: 0.1,
            aabb_multiplier: 4.0,
            initial_capacity: 16,
        }
    }
}
