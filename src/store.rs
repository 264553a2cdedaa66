use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::action::{ClickBehavior, InteractionBinding, StoreEvent};
use crate::content::{ItemSpec, SubtreeIntent};
use crate::error::{Error, Result};
use crate::model::{Arena, Node, NodeId, Subtree, Tree, TreeId};
use crate::position::TreePosition;
use crate::surface::{RenderSurface, Role, StateFlag};

/// Outcome of a [`TreeStore::set_item`] dispatch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SetOutcome {
    /// The position was insert-eligible; a new item was appended.
    Inserted(NodeId),
    /// The position was update-eligible; the item was replaced in place.
    Updated(NodeId),
}

impl SetOutcome {
    /// The handle of the inserted or replacing node.
    pub const fn node(self) -> NodeId {
        match self {
            Self::Inserted(node) | Self::Updated(node) => node,
        }
    }
}

/// Owner of the logical tree and of its synchronization with the rendered
/// tree.
///
/// The store is the only component that creates, replaces, or frees nodes
/// and collections. It resolves [`TreePosition`]s, decides insert-vs-update
/// legality, and keeps a fragment lookup table (`NodeId`/`TreeId` to
/// fragment handle) alongside the logical tree so rendered regions are
/// found without walking the surface.
///
/// Single-threaded and reentrant-unsafe: callers serialize their own calls
/// and re-resolve positions after any structural change.
pub struct TreeStore<F> {
    pub(crate) nodes: Arena<Node<F>>,
    pub(crate) trees: Arena<Tree>,
    pub(crate) root: TreeId,
    pub(crate) item_fragments: FxHashMap<NodeId, F>,
    pub(crate) list_fragments: FxHashMap<TreeId, F>,
    root_fragment: F,
}

impl<F: Copy + Eq + Hash> TreeStore<F> {
    /// Creates an empty store drawing into the surface's pre-existing root
    /// list container.
    pub fn new(root_list: F) -> Self {
        let mut trees = Arena::new();
        let (index, generation) = trees.insert(Tree {
            items: Vec::new(),
            owner: None,
        });
        let root = TreeId::new(index, generation);
        let mut list_fragments = FxHashMap::default();
        list_fragments.insert(root, root_list);
        Self {
            nodes: Arena::new(),
            trees,
            root,
            item_fragments: FxHashMap::default(),
            list_fragments,
            root_fragment: root_list,
        }
    }

    /// The root collection. Alive for the store's lifetime, replaced
    /// wholesale by a root [`TreeStore::remove_subtree`].
    pub const fn root(&self) -> TreeId {
        self.root
    }

    /// Reads a node by handle; `None` if the handle went stale.
    pub fn node(&self, id: NodeId) -> Option<&Node<F>> {
        let (index, generation) = id.parts();
        self.nodes.get(index, generation)
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Option<&mut Node<F>> {
        let (index, generation) = id.parts();
        self.nodes.get_mut(index, generation)
    }

    /// Reads a collection by handle; `None` if the handle went stale.
    pub fn tree(&self, id: TreeId) -> Option<&Tree> {
        let (index, generation) = id.parts();
        self.trees.get(index, generation)
    }

    pub(crate) fn tree_mut(&mut self, id: TreeId) -> Option<&mut Tree> {
        let (index, generation) = id.parts();
        self.trees.get_mut(index, generation)
    }

    fn alloc_node(&mut self, node: Node<F>) -> NodeId {
        let (index, generation) = self.nodes.insert(node);
        NodeId::new(index, generation)
    }

    fn alloc_tree(&mut self, tree: Tree) -> TreeId {
        let (index, generation) = self.trees.insert(tree);
        TreeId::new(index, generation)
    }

    fn free_node_slot(&mut self, id: NodeId) {
        let (index, generation) = id.parts();
        self.nodes.remove(index, generation);
        self.item_fragments.remove(&id);
    }

    fn free_node_recursive(&mut self, id: NodeId) {
        if let Some(Subtree::Present(subtree)) = self.node(id).map(|node| node.subtree) {
            self.free_tree_recursive(subtree);
        }
        self.free_node_slot(id);
    }

    fn free_tree_recursive(&mut self, id: TreeId) {
        let items = self
            .tree(id)
            .map(|tree| tree.items.clone())
            .unwrap_or_default();
        for item in items {
            self.free_node_recursive(item);
        }
        let (index, generation) = id.parts();
        self.trees.remove(index, generation);
        self.list_fragments.remove(&id);
    }

    /// Resolves a position to the node occupying it.
    ///
    /// Walks the root collection consuming one index per depth; every
    /// intermediate node must have a present sub-tree. Bounds are strict:
    /// an index equal to the collection length never resolves. The empty
    /// position addresses no node.
    pub fn node_at(&self, position: &TreePosition) -> Option<NodeId> {
        let (parent, last) = position.split_last()?;
        let tree = self.tree_at(&parent)?;
        self.tree(tree)?.items.get(last).copied()
    }

    /// Resolves a position to the collection reached after consuming it:
    /// the sub-tree of the node at the last index, or the root collection
    /// for the empty position.
    pub fn tree_at(&self, position: &TreePosition) -> Option<TreeId> {
        let mut current = self.root;
        for &index in position.indices() {
            let node_id = self.tree(current)?.items.get(index).copied()?;
            current = self.node(node_id)?.subtree.tree()?;
        }
        Some(current)
    }

    /// Inverse of [`TreeStore::node_at`]: reconstructs a node's position by
    /// walking the owner back-references up to the root.
    pub fn position_of(&self, node: NodeId) -> Option<TreePosition> {
        let mut indices = Vec::new();
        let mut current = node;
        loop {
            let owner = self.node(current)?.owner;
            let tree = self.tree(owner)?;
            let index = tree.items.iter().position(|&item| item == current)?;
            indices.push(index);
            match tree.owner {
                Some(owner_node) => current = owner_node,
                None => break,
            }
        }
        indices.reverse();
        Some(TreePosition::from(indices))
    }

    /// Whether a node occupies the position.
    pub fn item_exists_at(&self, position: &TreePosition) -> bool {
        self.node_at(position).is_some()
    }

    /// Whether the position can be updated: a node already occupies it.
    pub fn update_eligible(&self, position: &TreePosition) -> bool {
        self.node_at(position).is_some()
    }

    /// Whether the position can be inserted at.
    ///
    /// Insertion is append-only: the last index must equal the target
    /// collection's current length. The one exception is the first-child
    /// slot (last index 0) of a node whose sub-tree is absent, which is
    /// the only way to materialize a new collection.
    pub fn insert_eligible(&self, position: &TreePosition) -> bool {
        let Some((parent, last)) = position.split_last() else {
            return false;
        };
        match self.tree_at(&parent) {
            Some(tree) => self.tree(tree).is_some_and(|tree| last == tree.len()),
            None => {
                let Some(node) = self.node_at(&parent).and_then(|id| self.node(id)) else {
                    return false;
                };
                !node.subtree.is_present() && last == 0
            }
        }
    }

    /// Inserts or updates at the position, whichever it is eligible for.
    ///
    /// The two are mutually exclusive for any position; a position
    /// eligible for neither is a caller error.
    pub fn set_item(&mut self, spec: ItemSpec<F>, position: &TreePosition) -> Result<SetOutcome> {
        if self.insert_eligible(position) {
            self.insert_item(spec, position).map(SetOutcome::Inserted)
        } else if self.update_eligible(position) {
            self.update_item(spec, position).map(SetOutcome::Updated)
        } else {
            Err(Error::NotEligible(position.clone()))
        }
    }

    /// Appends a new item at an insert-eligible position.
    ///
    /// A fresh item always starts childless; descendants are built by
    /// subsequent inserts at deeper positions, so
    /// [`SubtreeIntent::Keep`] is rejected here.
    pub fn insert_item(&mut self, spec: ItemSpec<F>, position: &TreePosition) -> Result<NodeId> {
        if !self.insert_eligible(position) {
            return Err(Error::NotEligible(position.clone()));
        }
        if spec.subtree == SubtreeIntent::Keep {
            return Err(Error::SubtreeNotAccepted("insert"));
        }
        let Some((parent, _)) = position.split_last() else {
            return Err(Error::NotEligible(position.clone()));
        };
        let target = match self.tree_at(&parent) {
            Some(tree) => tree,
            None => {
                // First child of a childless node: materialize its
                // collection with both back-references established.
                let Some(owner) = self.node_at(&parent) else {
                    return Err(Error::NotEligible(position.clone()));
                };
                let tree = self.alloc_tree(Tree {
                    items: Vec::new(),
                    owner: Some(owner),
                });
                if let Some(node) = self.node_mut(owner) {
                    node.subtree = Subtree::Present(tree);
                }
                tree
            }
        };
        let node = self.alloc_node(Node {
            content: spec.content,
            subtree: Subtree::Absent,
            is_expanded: spec.is_expanded,
            is_selected: spec.is_selected,
            owner: target,
        });
        if let Some(tree) = self.tree_mut(target) {
            tree.items.push(node);
        }
        Ok(node)
    }

    /// Replaces the item at an update-eligible position with a new node.
    ///
    /// The replacement is a distinct node with a distinct handle; the old
    /// handle goes stale, which keeps any outstanding captures of it from
    /// observing the new item. [`SubtreeIntent::Keep`] carries the old
    /// sub-tree over and re-points its owner back-reference;
    /// [`SubtreeIntent::Drop`] leaves the slot absent.
    pub fn update_item(&mut self, spec: ItemSpec<F>, position: &TreePosition) -> Result<NodeId> {
        let Some((parent, index)) = position.split_last() else {
            return Err(Error::NotEligible(position.clone()));
        };
        let Some(owner) = self.tree_at(&parent) else {
            return Err(Error::NotEligible(position.clone()));
        };
        let Some(old_id) = self.tree(owner).and_then(|tree| tree.items.get(index).copied())
        else {
            return Err(Error::NotEligible(position.clone()));
        };
        let Some(old_subtree) = self.node(old_id).map(|node| node.subtree) else {
            return Err(Error::NotEligible(position.clone()));
        };

        let kept = match spec.subtree {
            SubtreeIntent::Keep => old_subtree,
            SubtreeIntent::Drop => Subtree::Absent,
        };
        let new_id = self.alloc_node(Node {
            content: spec.content,
            subtree: kept,
            is_expanded: spec.is_expanded,
            is_selected: spec.is_selected,
            owner,
        });
        if let Subtree::Present(tree) = kept
            && let Some(tree) = self.tree_mut(tree)
        {
            // Re-point the back-reference so position discovery through
            // the kept sub-tree reaches the new node.
            tree.owner = Some(new_id);
        }
        if let Some(tree) = self.tree_mut(owner) {
            tree.items[index] = new_id;
        }
        // The rendered fragment, if any, now belongs to the new handle.
        if let Some(fragment) = self.item_fragments.remove(&old_id) {
            self.item_fragments.insert(new_id, fragment);
        }
        if spec.subtree == SubtreeIntent::Drop
            && let Subtree::Present(dropped) = old_subtree
        {
            self.free_tree_recursive(dropped);
        }
        self.free_node_slot(old_id);
        Ok(new_id)
    }

    /// Splices the item out of its collection.
    ///
    /// Following siblings shift down one index; positions are not stable
    /// identities across removal. The item's storage and fragment-table
    /// entries are reclaimed; its rendered fragments stay on the surface
    /// until the caller redraws the parent level.
    pub fn remove_item(&mut self, position: &TreePosition) -> Result<()> {
        let Some(node_id) = self.node_at(position) else {
            return Err(Error::PositionInvalid(position.clone()));
        };
        let Some((parent, index)) = position.split_last() else {
            return Err(Error::PositionInvalid(position.clone()));
        };
        if let Some(owner) = self.tree_at(&parent)
            && let Some(tree) = self.tree_mut(owner)
        {
            tree.items.remove(index);
        }
        self.free_node_recursive(node_id);
        Ok(())
    }

    /// Removes the collection reached by the position.
    ///
    /// The root position resets the whole store: a fresh empty root
    /// collection replaces the old one. A non-root position downgrades the
    /// owning node's sub-tree slot to absent and reclaims the detached
    /// collection. Either way the rendered fragments are left for the
    /// caller's next draw or redraw to tear down.
    pub fn remove_subtree(&mut self, position: &TreePosition) -> Result<()> {
        let Some(tree_id) = self.tree_at(position) else {
            return Err(Error::PositionInvalid(position.clone()));
        };
        if position.is_root() {
            self.free_tree_recursive(tree_id);
            self.root = self.alloc_tree(Tree {
                items: Vec::new(),
                owner: None,
            });
            self.list_fragments.insert(self.root, self.root_fragment);
            return Ok(());
        }
        let Some(node_id) = self.node_at(position) else {
            return Err(Error::PositionInvalid(position.clone()));
        };
        if let Some(node) = self.node_mut(node_id) {
            node.subtree = Subtree::Absent;
        }
        self.free_tree_recursive(tree_id);
        Ok(())
    }

    /// Flips (or forces, with `desired`) the item's expansion state and
    /// mirrors it to the rendered fragment's flags.
    pub fn toggle_subtree<S>(
        &mut self,
        node: NodeId,
        desired: Option<bool>,
        surface: &mut S,
    ) -> Result<bool>
    where
        S: RenderSurface<Fragment = F>,
    {
        let Some(current) = self.node(node).map(Node::is_expanded) else {
            return Err(Error::Desync("toggled an item that no longer exists"));
        };
        let expand = desired.unwrap_or(!current);
        let Some(&fragment) = self.item_fragments.get(&node) else {
            return Err(Error::Desync("no rendered fragment for toggled item"));
        };
        surface.set_flag(fragment, StateFlag::Expanded, expand);
        surface.set_flag(fragment, StateFlag::Retracted, !expand);
        if let Some(node) = self.node_mut(node) {
            node.is_expanded = expand;
        }
        Ok(expand)
    }

    /// Flips the item's selection state and mirrors it to the rendered
    /// checkbox when one exists.
    pub fn toggle_selection<S>(&mut self, node: NodeId, surface: &mut S) -> Result<bool>
    where
        S: RenderSurface<Fragment = F>,
    {
        let Some(selected) = self.node(node).map(|node| !node.is_selected) else {
            return Err(Error::Desync(
                "selection toggled on an item that no longer exists",
            ));
        };
        if let Some(node) = self.node_mut(node) {
            node.is_selected = selected;
        }
        if let Some(&fragment) = self.item_fragments.get(&node)
            && let Some(content) = surface.child_with_role(fragment, Role::Content)
            && let Some(wrapper) = surface.child_with_role(content, Role::CheckboxWrapper)
            && let Some(checkbox) = surface.child_with_role(wrapper, Role::Checkbox)
        {
            surface.set_flag(checkbox, StateFlag::Checked, selected);
        }
        Ok(selected)
    }

    /// Routes a click binding delivered by the listener collaborator.
    ///
    /// A binding whose node went stale is not an error: the fragment it
    /// was wired to may legitimately outlive the item between a mutation
    /// and the caller's redraw.
    pub fn dispatch<S>(&mut self, binding: InteractionBinding, surface: &mut S) -> Result<StoreEvent>
    where
        S: RenderSurface<Fragment = F>,
    {
        if self.node(binding.node).is_none() {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                node = ?binding.node,
                "click binding refers to an item that no longer exists",
            );
            return Ok(StoreEvent::Ignored);
        }
        match binding.behavior {
            ClickBehavior::ToggleSubtree => {
                let expanded = self.toggle_subtree(binding.node, None, surface)?;
                Ok(StoreEvent::SubtreeToggled {
                    node: binding.node,
                    expanded,
                })
            }
            ClickBehavior::ToggleSelection => {
                let selected = self.toggle_selection(binding.node, surface)?;
                Ok(StoreEvent::SelectionChanged {
                    node: binding.node,
                    selected,
                })
            }
            ClickBehavior::Swallow => Ok(StoreEvent::Swallowed),
        }
    }
}
