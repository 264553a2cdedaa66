//! Position-addressed tree view store with incremental redraw for retained
//! render surfaces.
//!
//! A [`TreeStore`] owns a logical tree of items addressed by
//! [`TreePosition`] index paths and keeps it in sync with a rendered
//! nested-list representation behind the [`RenderSurface`] trait. Insertion
//! is append-only (or the first-child slot of a childless item), updates
//! replace nodes wholesale, and draw/redraw rebuild exactly the affected
//! fragments. Interaction wiring goes through a [`ListenerHub`]
//! collaborator and closes over stable [`NodeId`] handles, so bindings
//! survive sibling-index shifts.
//!
//! Feature flags:
//! - `serde`: serde support for [`TreePosition`].
//! - `tracing`: warnings when a stale click binding is dispatched.

mod action;
mod content;
mod error;
mod listeners;
mod model;
mod position;
pub mod prelude;
mod render;
mod store;
mod surface;
#[cfg(test)]
pub(crate) mod testkit;

pub use action::{ClickBehavior, EventKind, InteractionBinding, StoreEvent};
pub use content::{ContentPatch, CustomContent, ItemContent, ItemSpec, SubtreeIntent};
pub use error::{Error, Result};
pub use listeners::{CUSTOM_CONTENT_LISTENER, ListenerHub, ListenerName};
pub use model::{Node, NodeId, Subtree, Tree, TreeId};
pub use position::TreePosition;
pub use store::{SetOutcome, TreeStore};
pub use surface::{RenderSurface, Role, StateFlag};
