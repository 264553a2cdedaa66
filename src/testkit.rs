//! Test doubles: a Vec-backed render surface, a recording listener hub,
//! and a click simulator honoring propagation stops.

use rustc_hash::FxHashSet;

use crate::action::{EventKind, InteractionBinding, StoreEvent};
use crate::listeners::{ListenerHub, ListenerName};
use crate::model::NodeId;
use crate::store::TreeStore;
use crate::surface::{RenderSurface, Role, StateFlag};

struct Element {
    role: Role,
    parent: Option<u32>,
    children: Vec<u32>,
    flags: FxHashSet<StateFlag>,
    text: String,
    markup: String,
    alive: bool,
}

impl Element {
    fn new(role: Role) -> Self {
        Self {
            role,
            parent: None,
            children: Vec::new(),
            flags: FxHashSet::default(),
            text: String::new(),
            markup: String::new(),
            alive: true,
        }
    }
}

/// In-memory element tree standing in for a real render surface.
pub(crate) struct MockSurface {
    elements: Vec<Element>,
    root: u32,
}

impl MockSurface {
    pub(crate) fn new() -> Self {
        Self {
            elements: vec![Element::new(Role::List)],
            root: 0,
        }
    }

    fn element(&self, id: u32) -> &Element {
        &self.elements[id as usize]
    }

    fn element_mut(&mut self, id: u32) -> &mut Element {
        &mut self.elements[id as usize]
    }

    fn kill_subtree(&mut self, id: u32) {
        self.element_mut(id).alive = false;
        let children = self.element(id).children.clone();
        for child in children {
            self.kill_subtree(child);
        }
    }

    fn unlink(&mut self, id: u32) {
        if let Some(parent) = self.element(id).parent {
            self.element_mut(parent).children.retain(|&child| child != id);
        }
        self.element_mut(id).parent = None;
    }

    pub(crate) fn parent(&self, id: u32) -> Option<u32> {
        self.element(id).parent
    }

    pub(crate) fn has_flag(&self, id: u32, flag: StateFlag) -> bool {
        self.element(id).flags.contains(&flag)
    }

    pub(crate) fn markup(&self, id: u32) -> &str {
        &self.element(id).markup
    }

    pub(crate) fn live_count(&self) -> usize {
        self.elements.iter().filter(|element| element.alive).count()
    }

    /// The n-th live item of a list.
    pub(crate) fn item_at(&self, list: u32, index: usize) -> u32 {
        self.element(list)
            .children
            .iter()
            .copied()
            .filter(|&child| self.element(child).alive && self.element(child).role == Role::Item)
            .nth(index)
            .expect("no item at index")
    }

    /// Title texts of a list's items, in render order.
    pub(crate) fn item_titles(&self, list: u32) -> Vec<String> {
        let mut titles = Vec::new();
        for &child in &self.element(list).children {
            if !self.element(child).alive || self.element(child).role != Role::Item {
                continue;
            }
            let content = self
                .child_with_role(child, Role::Content)
                .expect("item without content region");
            let title = self
                .child_with_role(content, Role::Title)
                .expect("content without title region");
            titles.push(self.element(title).text.clone());
        }
        titles
    }
}

impl RenderSurface for MockSurface {
    type Fragment = u32;

    fn root_list(&self) -> u32 {
        self.root
    }

    fn create(&mut self, role: Role) -> u32 {
        self.elements.push(Element::new(role));
        u32::try_from(self.elements.len() - 1).expect("fragment id overflow")
    }

    fn append(&mut self, parent: u32, child: u32) {
        self.element_mut(child).parent = Some(parent);
        self.element_mut(parent).children.push(child);
    }

    fn replace(&mut self, old: u32, new: u32) {
        let parent = self.element(old).parent.expect("replacing a detached fragment");
        let slot = self
            .element(parent)
            .children
            .iter()
            .position(|&child| child == old)
            .expect("old fragment not under its parent");
        self.element_mut(parent).children[slot] = new;
        self.element_mut(new).parent = Some(parent);
        self.element_mut(old).parent = None;
        self.kill_subtree(old);
    }

    fn detach(&mut self, fragment: u32) {
        self.unlink(fragment);
    }

    fn remove(&mut self, fragment: u32) {
        self.unlink(fragment);
        self.kill_subtree(fragment);
    }

    fn clear_children(&mut self, fragment: u32) {
        let children = std::mem::take(&mut self.element_mut(fragment).children);
        for child in children {
            self.element_mut(child).parent = None;
            self.kill_subtree(child);
        }
    }

    fn child_with_role(&self, parent: u32, role: Role) -> Option<u32> {
        self.element(parent)
            .children
            .iter()
            .copied()
            .find(|&child| self.element(child).alive && self.element(child).role == role)
    }

    fn set_flag(&mut self, fragment: u32, flag: StateFlag, on: bool) {
        if on {
            self.element_mut(fragment).flags.insert(flag);
        } else {
            self.element_mut(fragment).flags.remove(&flag);
        }
    }

    fn set_text(&mut self, fragment: u32, text: &str) {
        text.clone_into(&mut self.element_mut(fragment).text);
    }

    fn set_markup(&mut self, fragment: u32, markup: &str) {
        markup.clone_into(&mut self.element_mut(fragment).markup);
    }

    fn adopt(&mut self, parent: u32, external: u32) {
        self.append(parent, external);
    }
}

/// Recording listener hub.
#[derive(Default)]
pub(crate) struct MockHub {
    bindings: Vec<(u32, EventKind, InteractionBinding)>,
    tracked: Vec<(NodeId, ListenerName, u32, InteractionBinding)>,
}

impl MockHub {
    pub(crate) fn binding_count(&self) -> usize {
        self.bindings.len()
    }

    pub(crate) fn tracked_count(&self, node: NodeId, name: ListenerName) -> usize {
        self.tracked
            .iter()
            .filter(|(tracked_node, tracked_name, _, _)| {
                *tracked_node == node && *tracked_name == name
            })
            .count()
    }

    fn bindings_for(&self, fragment: u32) -> Vec<InteractionBinding> {
        let plain = self
            .bindings
            .iter()
            .filter(|(owner, event, _)| *owner == fragment && *event == EventKind::Click)
            .map(|(_, _, binding)| *binding);
        let tracked = self
            .tracked
            .iter()
            .filter(|(_, _, owner, _)| *owner == fragment)
            .map(|(_, _, _, binding)| *binding);
        plain.chain(tracked).collect()
    }
}

impl ListenerHub<u32> for MockHub {
    fn bind(&mut self, owner: u32, event: EventKind, binding: InteractionBinding) {
        self.bindings.push((owner, event, binding));
    }

    fn bind_tracked(
        &mut self,
        owner: u32,
        _event: EventKind,
        name: ListenerName,
        binding: InteractionBinding,
    ) {
        self.tracked.push((binding.node, name, owner, binding));
    }

    fn is_tracked(&self, node: NodeId, name: ListenerName) -> bool {
        self.tracked_count(node, name) > 0
    }
}

/// Simulates a click on a fragment: fires the bindings at each level from
/// the target upward, stopping where a binding stops propagation.
pub(crate) fn click(
    store: &mut TreeStore<u32>,
    surface: &mut MockSurface,
    hub: &MockHub,
    target: u32,
) -> Vec<StoreEvent> {
    let mut events = Vec::new();
    let mut current = Some(target);
    while let Some(fragment) = current {
        let mut stop = false;
        for binding in hub.bindings_for(fragment) {
            events.push(store.dispatch(binding, surface).expect("dispatch failed"));
            if binding.stop_propagation {
                stop = true;
            }
        }
        if stop {
            break;
        }
        current = surface.parent(fragment);
    }
    events
}
