use crate::action::{EventKind, InteractionBinding};
use crate::model::NodeId;

/// Name under which a tracked listener is registered, unique per node.
pub type ListenerName = &'static str;

/// Tracked name for the custom-content click isolator.
pub const CUSTOM_CONTENT_LISTENER: ListenerName = "custom-content-wrapper";

/// Listener bookkeeping collaborator.
///
/// The store hands every binding to the hub; the hub owns delivery and
/// release. Plain bindings go on freshly built fragments, which never
/// carry earlier bindings. Tracked bindings are deduplicated by
/// `(node, name)`: re-rendering the same custom content must not stack a
/// second listener, so the store checks [`ListenerHub::is_tracked`] before
/// registering.
pub trait ListenerHub<F> {
    /// Attaches a binding to a freshly built fragment region.
    fn bind(&mut self, owner: F, event: EventKind, binding: InteractionBinding);

    /// Attaches a binding under a tracked name.
    fn bind_tracked(
        &mut self,
        owner: F,
        event: EventKind,
        name: ListenerName,
        binding: InteractionBinding,
    );

    /// Whether a tracked binding with this name is live for the node.
    fn is_tracked(&self, node: NodeId, name: ListenerName) -> bool;
}
