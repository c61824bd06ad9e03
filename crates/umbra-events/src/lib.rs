//! Event retargeting and dispatch over shadow trees.
//!
//! Dispatch walks the composed tree, so listeners outside a shadow boundary
//! see the host (or a distributed light node) as the target while listeners
//! inside see the real one. Paths are built by [`retarget`], related targets
//! adjusted per listener by [`adjust_related_target`], and [`Dispatcher`]
//! runs the three phases.

mod dispatch;
mod event;
mod listener;
mod retarget;

pub use dispatch::Dispatcher;
pub use event::{Event, EventPhase};
pub use listener::{ListenerId, ListenerOptions, ListenerRegistry};
pub use retarget::{adjust_related_target, in_same_tree, retarget, EventPathEntry};
