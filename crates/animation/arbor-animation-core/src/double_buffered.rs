//! Two-slot storage selected by frame parity.
//!
//! The update role writes one slot per frame while the render role reads the
//! other; the slots swap identity once per traversal and are never the same
//! slot within one frame. The pair is a fixed two-element array, never a
//! growable collection.

use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

/// Selects one of the two buffered slots.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum BufferIndex {
    A,
    B,
}

impl BufferIndex {
    /// The opposite slot.
    #[inline]
    pub fn other(self) -> BufferIndex {
        match self {
            BufferIndex::A => BufferIndex::B,
            BufferIndex::B => BufferIndex::A,
        }
    }

    #[inline]
    fn slot(self) -> usize {
        match self {
            BufferIndex::A => 0,
            BufferIndex::B => 1,
        }
    }
}

/// A value stored once per buffered slot.
#[derive(Clone, Debug)]
pub struct DoubleBuffered<T>([T; 2]);

impl<T: Copy> DoubleBuffered<T> {
    pub fn new(initial: T) -> Self {
        Self([initial, initial])
    }
}

impl<T> Index<BufferIndex> for DoubleBuffered<T> {
    type Output = T;

    #[inline]
    fn index(&self, index: BufferIndex) -> &T {
        &self.0[index.slot()]
    }
}

impl<T> IndexMut<BufferIndex> for DoubleBuffered<T> {
    #[inline]
    fn index_mut(&mut self, index: BufferIndex) -> &mut T {
        &mut self.0[index.slot()]
    }
}

/// The frame cursor: which slot the update role writes this traversal.
///
/// The render role only ever reads `render_index()`, fixed for its entire
/// pass. The event role reads `event_index()`, which lags the render slot by
/// one swap.
#[derive(Copy, Clone, Debug)]
pub struct SceneBuffers {
    update: BufferIndex,
}

impl Default for SceneBuffers {
    fn default() -> Self {
        Self {
            update: BufferIndex::A,
        }
    }
}

impl SceneBuffers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slot the update role writes during the current traversal.
    #[inline]
    pub fn update_index(self) -> BufferIndex {
        self.update
    }

    /// Slot the render role reads: the one most recently published.
    #[inline]
    pub fn render_index(self) -> BufferIndex {
        self.update.other()
    }

    /// Slot the event role reads between traversals.
    #[inline]
    pub fn event_index(self) -> BufferIndex {
        self.update
    }

    /// Publish the traversal's writes: exactly one flip per frame.
    #[inline]
    pub fn swap(&mut self) {
        self.update = self.update.other();
    }
}
