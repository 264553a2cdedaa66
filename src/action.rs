use crate::model::NodeId;

/// Kind of surface event a binding listens for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum EventKind {
    /// A pointer click on the bound fragment.
    Click,
}

/// What a click on a bound fragment region does to the tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickBehavior {
    /// Toggle the item's sub-tree between expanded and retracted.
    ToggleSubtree,
    /// Toggle the item's selection checkbox.
    ToggleSelection,
    /// Absorb the click without touching the tree.
    Swallow,
}

/// A click binding wired onto a fragment region.
///
/// Bindings close over the item's [`NodeId`], never its position, so they
/// stay valid across sibling-index shifts caused by later inserts or
/// removals elsewhere. A binding whose node has since been freed is
/// tolerated at dispatch time and reported as [`StoreEvent::Ignored`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InteractionBinding {
    /// The item the binding acts on.
    pub node: NodeId,
    /// What the click does.
    pub behavior: ClickBehavior,
    /// Whether the click must not bubble to enclosing regions.
    pub stop_propagation: bool,
}

/// Result of dispatching a click binding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreEvent {
    /// The item's sub-tree was toggled.
    SubtreeToggled {
        /// The toggled item.
        node: NodeId,
        /// Its new expansion state.
        expanded: bool,
    },
    /// The item's selection state was toggled.
    SelectionChanged {
        /// The item whose selection changed.
        node: NodeId,
        /// Its new selection state.
        selected: bool,
    },
    /// The click was absorbed without touching the tree.
    Swallowed,
    /// The binding referenced an item that no longer exists.
    Ignored,
}
