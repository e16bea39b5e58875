//! Per-tick output contract: discrete events produced by one update
//! traversal. The embedding host drains these each frame; values themselves
//! are pulled through the render-side read interface.

use serde::{Deserialize, Serialize};

use arbor_api_core::PropertyIndex;

use crate::ids::{AnimationId, ObjectId};

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum CoreEvent {
    /// A property write took effect on the event side.
    PropertySet {
        object: ObjectId,
        index: PropertyIndex,
    },
    /// A play cycle completed; fired exactly once per cycle.
    Finished { animation: AnimationId },
    /// The progress marker was crossed; once per play cycle.
    ProgressReached { animation: AnimationId },
}

#[derive(Clone, Debug, Default)]
pub struct Outputs {
    pub events: Vec<CoreEvent>,
}

impl Outputs {
    #[inline]
    pub fn clear(&mut self) {
        self.events.clear();
    }

    #[inline]
    pub fn push_event(&mut self, event: CoreEvent) {
        self.events.push(event);
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
