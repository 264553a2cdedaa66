pub use crate::{
    CUSTOM_CONTENT_LISTENER, ClickBehavior, ContentPatch, CustomContent, Error, EventKind,
    InteractionBinding, ItemContent, ItemSpec, ListenerHub, ListenerName, Node, NodeId,
    RenderSurface, Role, SetOutcome, StateFlag, StoreEvent, Subtree, SubtreeIntent, Tree, TreeId,
    TreePosition, TreeStore,
};
