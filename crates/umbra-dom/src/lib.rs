//! umbra DOM - Shadow-tree composition engine
//!
//! Maintains a logical (light) tree alongside a derived visual (composed)
//! tree. Light children of a shadow host are distributed into `<content>` and
//! `<shadow>` insertion points, and a coalescing renderer keeps the visual
//! tree in sync through dirty-flag batching.

mod compose;
mod distribution;
mod document;
mod node;
mod operations;
mod render;
mod shadow;
mod tree;

pub use document::{Document, NativeHandle};
pub use node::{ElementData, Node, NodeData, ShadowRootData, TextData};
pub use operations::{DomError, DomResult};
pub use render::{RenderScheduler, VisualTree};

/// Node identifier (index into the arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Sentinel for "no node"
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Check if this id refers to a node
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}
