//! Engine configuration: capacity hints for the entity tables.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Initial capacity of the object / property-owner tables.
    pub object_capacity: usize,
    /// Initial capacity of the animation tables.
    pub animation_capacity: usize,
    /// Initial capacity of the per-frame message queue.
    pub message_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            object_capacity: 64,
            animation_capacity: 16,
            message_capacity: 128,
        }
    }
}
