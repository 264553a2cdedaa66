use std::hash::Hash;

use crate::action::{ClickBehavior, EventKind, InteractionBinding};
use crate::content::{ContentPatch, CustomContent};
use crate::error::{Error, Result};
use crate::listeners::{CUSTOM_CONTENT_LISTENER, ListenerHub};
use crate::model::{NodeId, Subtree, Tree, TreeId};
use crate::position::TreePosition;
use crate::store::TreeStore;
use crate::surface::{RenderSurface, Role, StateFlag};

impl<F: Copy + Eq + Hash> TreeStore<F> {
    /// Draws the collection at the position and everything below it.
    ///
    /// If the collection has no rendered list yet, one is created and
    /// attached under the owning item's sub-tree wrapper. Every rendered
    /// child at this level is then destroyed and rebuilt in logical order;
    /// deeper levels are rebuilt through the recursive call. Each new item
    /// fragment is assembled fully detached, attached atomically, recorded
    /// in the fragment table, and wired for interaction.
    pub fn draw_subtree<S, H>(
        &mut self,
        position: &TreePosition,
        surface: &mut S,
        hub: &mut H,
    ) -> Result<()>
    where
        S: RenderSurface<Fragment = F>,
        H: ListenerHub<F>,
    {
        let Some(tree_id) = self.tree_at(position) else {
            return Err(Error::PositionInvalid(position.clone()));
        };
        let list = match self.list_fragments.get(&tree_id).copied() {
            Some(list) => list,
            None => {
                // A collection materialized after its owner was rendered:
                // hang a fresh list under the owner's sub-tree wrapper.
                let Some(owner) = self.tree(tree_id).and_then(Tree::owner) else {
                    return Err(Error::Desync(
                        "collection without a rendered list has no owning item",
                    ));
                };
                let Some(&owner_fragment) = self.item_fragments.get(&owner) else {
                    return Err(Error::Desync("owning item of the collection is not rendered"));
                };
                let Some(wrapper) = surface.child_with_role(owner_fragment, Role::SubtreeWrapper)
                else {
                    return Err(Error::Desync("rendered item is missing its sub-tree wrapper"));
                };
                let list = surface.create(Role::List);
                surface.append(wrapper, list);
                surface.set_flag(owner_fragment, StateFlag::Nested, true);
                self.list_fragments.insert(tree_id, list);
                list
            }
        };

        self.purge_rendered_below(tree_id);
        surface.clear_children(list);

        let items = self
            .tree(tree_id)
            .map(|tree| tree.items.clone())
            .unwrap_or_default();
        for (index, node_id) in items.into_iter().enumerate() {
            let fragment = self.build_item_fragment(node_id, surface)?;
            surface.append(list, fragment);
            self.item_fragments.insert(node_id, fragment);
            self.wire_item(node_id, fragment, surface, hub)?;
            if self
                .node(node_id)
                .is_some_and(|node| node.subtree().is_present())
            {
                self.draw_subtree(&position.child(index), surface, hub)?;
            }
        }
        Ok(())
    }

    /// Redraws the single item at the position, non-recursively.
    ///
    /// The item must already be rendered. A present sub-tree's rendered
    /// list is detached and re-attached into the fresh fragment untouched,
    /// so deep rendered state (expansion, listeners, fragment identity)
    /// survives while this one node's presentation refreshes.
    pub fn redraw_item<S, H>(
        &mut self,
        position: &TreePosition,
        surface: &mut S,
        hub: &mut H,
    ) -> Result<()>
    where
        S: RenderSurface<Fragment = F>,
        H: ListenerHub<F>,
    {
        let Some(node_id) = self.node_at(position) else {
            return Err(Error::PositionInvalid(position.clone()));
        };
        let Some(&old_fragment) = self.item_fragments.get(&node_id) else {
            return Err(Error::NotRendered(position.clone()));
        };
        let new_fragment = self.build_item_fragment(node_id, surface)?;
        let subtree = self
            .node(node_id)
            .map_or(Subtree::Absent, |node| node.subtree());
        match subtree {
            Subtree::Absent => {
                surface.replace(old_fragment, new_fragment);
            }
            Subtree::Present(tree_id) => {
                let Some(&nested) = self.list_fragments.get(&tree_id) else {
                    return Err(Error::Desync("nested list fragment to keep was not found"));
                };
                surface.detach(nested);
                surface.replace(old_fragment, new_fragment);
                let Some(wrapper) = surface.child_with_role(new_fragment, Role::SubtreeWrapper)
                else {
                    return Err(Error::Desync(
                        "fresh item fragment is missing its sub-tree wrapper",
                    ));
                };
                surface.append(wrapper, nested);
            }
        }
        self.item_fragments.insert(node_id, new_fragment);
        self.wire_item(node_id, new_fragment, surface, hub)?;
        Ok(())
    }

    /// Applies a partial content patch to the item and its rendered
    /// fragment in lockstep.
    ///
    /// Each `Some` field applies independently and is a no-op when the
    /// requested state already holds. Newly created affordances are wired;
    /// the custom-content isolator is registered through the tracked hub
    /// API at most once per node.
    pub fn update_content<S, H>(
        &mut self,
        position: &TreePosition,
        patch: &ContentPatch<F>,
        surface: &mut S,
        hub: &mut H,
    ) -> Result<()>
    where
        S: RenderSurface<Fragment = F>,
        H: ListenerHub<F>,
    {
        let Some(node_id) = self.node_at(position) else {
            return Err(Error::PositionInvalid(position.clone()));
        };
        let Some(&fragment) = self.item_fragments.get(&node_id) else {
            return Err(Error::NotRendered(position.clone()));
        };
        let Some(content_region) = surface.child_with_role(fragment, Role::Content) else {
            return Err(Error::Desync("rendered item has no content region"));
        };

        if let Some(show) = patch.toggle_button {
            let current = self
                .node(node_id)
                .is_some_and(|node| node.content().toggle_button);
            if show != current {
                let Some(wrapper) = surface.child_with_role(content_region, Role::ToggleWrapper)
                else {
                    return Err(Error::Desync("rendered item has no toggle wrapper"));
                };
                if show {
                    let toggle = surface.create(Role::Toggle);
                    surface.append(wrapper, toggle);
                    surface.set_flag(wrapper, StateFlag::Hidden, false);
                    hub.bind(
                        toggle,
                        EventKind::Click,
                        InteractionBinding {
                            node: node_id,
                            behavior: ClickBehavior::ToggleSubtree,
                            stop_propagation: true,
                        },
                    );
                } else {
                    if let Some(toggle) = surface.child_with_role(wrapper, Role::Toggle) {
                        surface.remove(toggle);
                    }
                    surface.set_flag(wrapper, StateFlag::Hidden, true);
                }
                if let Some(node) = self.node_mut(node_id) {
                    node.content.toggle_button = show;
                }
            }
        }

        if let Some(show) = patch.select_checkbox {
            let current = self
                .node(node_id)
                .is_some_and(|node| node.content().select_checkbox);
            if show != current {
                let Some(wrapper) = surface.child_with_role(content_region, Role::CheckboxWrapper)
                else {
                    return Err(Error::Desync("rendered item has no checkbox wrapper"));
                };
                if show {
                    let checkbox = surface.create(Role::Checkbox);
                    let selected = self.node(node_id).is_some_and(|node| node.is_selected());
                    surface.set_flag(checkbox, StateFlag::Checked, selected);
                    surface.append(wrapper, checkbox);
                    surface.set_flag(wrapper, StateFlag::Hidden, false);
                    let binding = InteractionBinding {
                        node: node_id,
                        behavior: ClickBehavior::ToggleSelection,
                        stop_propagation: true,
                    };
                    hub.bind(checkbox, EventKind::Click, binding);
                    hub.bind(wrapper, EventKind::Click, binding);
                } else {
                    if let Some(checkbox) = surface.child_with_role(wrapper, Role::Checkbox) {
                        surface.remove(checkbox);
                    }
                    surface.set_flag(wrapper, StateFlag::Hidden, true);
                }
                if let Some(node) = self.node_mut(node_id) {
                    node.content.select_checkbox = show;
                }
            }
        }

        if let Some(new_title) = &patch.title {
            let current = self
                .node(node_id)
                .and_then(|node| node.content().title.clone());
            if *new_title != current {
                let Some(title) = surface.child_with_role(content_region, Role::Title) else {
                    return Err(Error::Desync("rendered item has no title region"));
                };
                match new_title {
                    Some(text) => {
                        surface.set_text(title, text);
                        surface.set_flag(title, StateFlag::Hidden, false);
                    }
                    None => {
                        surface.set_text(title, "");
                        surface.set_flag(title, StateFlag::Hidden, true);
                    }
                }
                if let Some(node) = self.node_mut(node_id) {
                    node.content.title = new_title.clone();
                }
            }
        }

        if let Some(new_custom) = &patch.custom {
            let current = self
                .node(node_id)
                .and_then(|node| node.content().custom.clone());
            if *new_custom != current {
                let Some(wrapper) = surface.child_with_role(content_region, Role::CustomWrapper)
                else {
                    return Err(Error::Desync("rendered item has no custom content wrapper"));
                };
                surface.clear_children(wrapper);
                match new_custom {
                    Some(CustomContent::Markup(markup)) => {
                        surface.set_markup(wrapper, markup);
                        surface.set_flag(wrapper, StateFlag::Hidden, false);
                    }
                    Some(CustomContent::External(external)) => {
                        surface.adopt(wrapper, *external);
                        surface.set_flag(wrapper, StateFlag::Hidden, false);
                    }
                    None => {
                        surface.set_flag(wrapper, StateFlag::Hidden, true);
                    }
                }
                if new_custom.is_some() && !hub.is_tracked(node_id, CUSTOM_CONTENT_LISTENER) {
                    hub.bind_tracked(
                        wrapper,
                        EventKind::Click,
                        CUSTOM_CONTENT_LISTENER,
                        InteractionBinding {
                            node: node_id,
                            behavior: ClickBehavior::Swallow,
                            stop_propagation: true,
                        },
                    );
                }
                if let Some(node) = self.node_mut(node_id) {
                    node.content.custom = new_custom.clone();
                }
            }
        }
        Ok(())
    }

    /// Assembles a fresh, fully detached fragment for the item.
    ///
    /// Every affordance wrapper is created whether or not its affordance
    /// is on, hidden when off, so later content patches always find their
    /// slot. Attachment is the caller's single atomic step.
    fn build_item_fragment<S>(&self, node_id: NodeId, surface: &mut S) -> Result<F>
    where
        S: RenderSurface<Fragment = F>,
    {
        let Some(node) = self.node(node_id) else {
            return Err(Error::Desync(
                "building a fragment for an item that no longer exists",
            ));
        };

        let item = surface.create(Role::Item);
        surface.set_flag(
            item,
            if node.is_expanded() {
                StateFlag::Expanded
            } else {
                StateFlag::Retracted
            },
            true,
        );

        let content = surface.create(Role::Content);

        let toggle_wrapper = surface.create(Role::ToggleWrapper);
        surface.append(content, toggle_wrapper);
        if node.content().toggle_button {
            let toggle = surface.create(Role::Toggle);
            surface.append(toggle_wrapper, toggle);
        } else {
            surface.set_flag(toggle_wrapper, StateFlag::Hidden, true);
        }

        let checkbox_wrapper = surface.create(Role::CheckboxWrapper);
        surface.append(content, checkbox_wrapper);
        if node.content().select_checkbox {
            let checkbox = surface.create(Role::Checkbox);
            surface.set_flag(checkbox, StateFlag::Checked, node.is_selected());
            surface.append(checkbox_wrapper, checkbox);
        } else {
            surface.set_flag(checkbox_wrapper, StateFlag::Hidden, true);
        }

        let title = surface.create(Role::Title);
        surface.append(content, title);
        match &node.content().title {
            Some(text) => surface.set_text(title, text),
            None => surface.set_flag(title, StateFlag::Hidden, true),
        }

        let custom_wrapper = surface.create(Role::CustomWrapper);
        surface.append(content, custom_wrapper);
        match &node.content().custom {
            Some(CustomContent::Markup(markup)) => surface.set_markup(custom_wrapper, markup),
            Some(CustomContent::External(external)) => surface.adopt(custom_wrapper, *external),
            None => surface.set_flag(custom_wrapper, StateFlag::Hidden, true),
        }

        surface.append(item, content);

        let subtree_wrapper = surface.create(Role::SubtreeWrapper);
        surface.append(item, subtree_wrapper);
        if node.subtree().is_present() {
            surface.set_flag(item, StateFlag::Nested, true);
        }
        Ok(item)
    }

    /// Wires click bindings onto a freshly built item fragment.
    fn wire_item<S, H>(
        &self,
        node_id: NodeId,
        fragment: F,
        surface: &mut S,
        hub: &mut H,
    ) -> Result<()>
    where
        S: RenderSurface<Fragment = F>,
        H: ListenerHub<F>,
    {
        let Some(node) = self.node(node_id) else {
            return Err(Error::Desync("wiring an item that no longer exists"));
        };
        let Some(content) = surface.child_with_role(fragment, Role::Content) else {
            return Err(Error::Desync("rendered item has no content region"));
        };

        if node.content().toggle_button {
            let Some(wrapper) = surface.child_with_role(content, Role::ToggleWrapper) else {
                return Err(Error::Desync("rendered item has no toggle wrapper"));
            };
            let Some(toggle) = surface.child_with_role(wrapper, Role::Toggle) else {
                return Err(Error::Desync("toggle affordance enabled but not rendered"));
            };
            hub.bind(
                toggle,
                EventKind::Click,
                InteractionBinding {
                    node: node_id,
                    behavior: ClickBehavior::ToggleSubtree,
                    stop_propagation: true,
                },
            );
        }

        if node.content().select_checkbox {
            let Some(wrapper) = surface.child_with_role(content, Role::CheckboxWrapper) else {
                return Err(Error::Desync("rendered item has no checkbox wrapper"));
            };
            let Some(checkbox) = surface.child_with_role(wrapper, Role::Checkbox) else {
                return Err(Error::Desync("checkbox affordance enabled but not rendered"));
            };
            let binding = InteractionBinding {
                node: node_id,
                behavior: ClickBehavior::ToggleSelection,
                stop_propagation: true,
            };
            hub.bind(checkbox, EventKind::Click, binding);
            hub.bind(wrapper, EventKind::Click, binding);
        }

        if node.content().custom.is_some() {
            let Some(wrapper) = surface.child_with_role(content, Role::CustomWrapper) else {
                return Err(Error::Desync("rendered item has no custom content wrapper"));
            };
            if !hub.is_tracked(node_id, CUSTOM_CONTENT_LISTENER) {
                hub.bind_tracked(
                    wrapper,
                    EventKind::Click,
                    CUSTOM_CONTENT_LISTENER,
                    InteractionBinding {
                        node: node_id,
                        behavior: ClickBehavior::Swallow,
                        stop_propagation: true,
                    },
                );
            }
        }

        // Clicking anywhere else on the row toggles too, and bubbles.
        hub.bind(
            content,
            EventKind::Click,
            InteractionBinding {
                node: node_id,
                behavior: ClickBehavior::ToggleSubtree,
                stop_propagation: false,
            },
        );
        Ok(())
    }

    /// Drops fragment-table entries for everything rendered below the
    /// collection; the rebuild repopulates them.
    fn purge_rendered_below(&mut self, tree_id: TreeId) {
        let items = self
            .tree(tree_id)
            .map(|tree| tree.items.clone())
            .unwrap_or_default();
        for node_id in items {
            self.item_fragments.remove(&node_id);
            if let Some(Subtree::Present(subtree)) = self.node(node_id).map(|node| node.subtree())
            {
                self.list_fragments.remove(&subtree);
                self.purge_rendered_below(subtree);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::StoreEvent;
    use crate::content::{ItemContent, ItemSpec};
    use crate::testkit::{MockHub, MockSurface, click};

    fn spec(title: &str) -> ItemSpec<u32> {
        ItemSpec::new(ItemContent::titled(title))
    }

    fn full_spec(title: &str) -> ItemSpec<u32> {
        ItemSpec::new(
            ItemContent::titled(title)
                .with_toggle_button()
                .with_checkbox(),
        )
    }

    struct Fixture {
        store: TreeStore<u32>,
        surface: MockSurface,
        hub: MockHub,
    }

    // Root with two items, the first carrying one child.
    fn drawn_fixture() -> Fixture {
        let mut surface = MockSurface::new();
        let mut hub = MockHub::default();
        let mut store = TreeStore::new(surface.root_list());
        store.insert_item(full_spec("A"), &TreePosition::from([0])).unwrap();
        store.insert_item(spec("A0"), &TreePosition::from([0, 0])).unwrap();
        store.insert_item(spec("B"), &TreePosition::from([1])).unwrap();
        store
            .draw_subtree(&TreePosition::root(), &mut surface, &mut hub)
            .unwrap();
        Fixture { store, surface, hub }
    }

    #[test]
    fn draw_renders_items_in_sibling_order() {
        let fixture = drawn_fixture();
        let root = fixture.surface.root_list();
        assert_eq!(fixture.surface.item_titles(root), ["A", "B"]);
    }

    #[test]
    fn draw_renders_nested_levels_under_subtree_wrapper() {
        let fixture = drawn_fixture();
        let item = fixture.surface.item_at(fixture.surface.root_list(), 0);
        let wrapper = fixture
            .surface
            .child_with_role(item, Role::SubtreeWrapper)
            .unwrap();
        let nested = fixture.surface.child_with_role(wrapper, Role::List).unwrap();
        assert_eq!(fixture.surface.item_titles(nested), ["A0"]);
        assert!(fixture.surface.has_flag(item, StateFlag::Nested));
    }

    #[test]
    fn draw_hides_wrappers_of_disabled_affordances() {
        let fixture = drawn_fixture();
        let item = fixture.surface.item_at(fixture.surface.root_list(), 1);
        let content = fixture.surface.child_with_role(item, Role::Content).unwrap();
        let toggle_wrapper = fixture
            .surface
            .child_with_role(content, Role::ToggleWrapper)
            .unwrap();
        let custom_wrapper = fixture
            .surface
            .child_with_role(content, Role::CustomWrapper)
            .unwrap();
        assert!(fixture.surface.has_flag(toggle_wrapper, StateFlag::Hidden));
        assert!(fixture.surface.has_flag(custom_wrapper, StateFlag::Hidden));
        assert!(fixture.surface.has_flag(item, StateFlag::Retracted));
    }

    #[test]
    fn draw_requires_resolvable_collection() {
        let mut fixture = drawn_fixture();
        let result = fixture.store.draw_subtree(
            &TreePosition::from([1]),
            &mut fixture.surface,
            &mut fixture.hub,
        );
        assert!(matches!(result, Err(Error::PositionInvalid(_))));
    }

    #[test]
    fn draw_attaches_list_for_collection_materialized_after_first_draw() {
        let mut fixture = drawn_fixture();
        fixture
            .store
            .insert_item(spec("B0"), &TreePosition::from([1, 0]))
            .unwrap();

        fixture
            .store
            .draw_subtree(&TreePosition::from([1]), &mut fixture.surface, &mut fixture.hub)
            .unwrap();

        let item = fixture.surface.item_at(fixture.surface.root_list(), 1);
        let wrapper = fixture
            .surface
            .child_with_role(item, Role::SubtreeWrapper)
            .unwrap();
        let nested = fixture.surface.child_with_role(wrapper, Role::List).unwrap();
        assert_eq!(fixture.surface.item_titles(nested), ["B0"]);
        assert!(fixture.surface.has_flag(item, StateFlag::Nested));
    }

    #[test]
    fn redraw_requires_prior_draw() {
        let mut surface = MockSurface::new();
        let mut hub = MockHub::default();
        let mut store = TreeStore::new(surface.root_list());
        store.insert_item(spec("A"), &TreePosition::from([0])).unwrap();

        let result = store.redraw_item(&TreePosition::from([0]), &mut surface, &mut hub);
        assert!(matches!(result, Err(Error::NotRendered(_))));
    }

    #[test]
    fn redraw_preserves_nested_list_identity() {
        let mut fixture = drawn_fixture();
        let position = TreePosition::from([0]);
        let old_item = fixture.surface.item_at(fixture.surface.root_list(), 0);
        let old_wrapper = fixture
            .surface
            .child_with_role(old_item, Role::SubtreeWrapper)
            .unwrap();
        let nested_before = fixture
            .surface
            .child_with_role(old_wrapper, Role::List)
            .unwrap();

        // Title-only change at the shallower position.
        fixture
            .store
            .update_item(full_spec("A renamed").keep_subtree(), &position)
            .unwrap();
        fixture
            .store
            .redraw_item(&position, &mut fixture.surface, &mut fixture.hub)
            .unwrap();

        let new_item = fixture.surface.item_at(fixture.surface.root_list(), 0);
        assert_ne!(new_item, old_item);
        assert_eq!(fixture.surface.item_titles(fixture.surface.root_list()), [
            "A renamed",
            "B"
        ]);
        let new_wrapper = fixture
            .surface
            .child_with_role(new_item, Role::SubtreeWrapper)
            .unwrap();
        let nested_after = fixture
            .surface
            .child_with_role(new_wrapper, Role::List)
            .unwrap();
        assert_eq!(nested_after, nested_before);
        assert_eq!(fixture.surface.item_titles(nested_after), ["A0"]);
    }

    #[test]
    fn redraw_without_subtree_replaces_in_place() {
        let mut fixture = drawn_fixture();
        let position = TreePosition::from([1]);
        fixture.store.update_item(spec("B renamed"), &position).unwrap();
        fixture
            .store
            .redraw_item(&position, &mut fixture.surface, &mut fixture.hub)
            .unwrap();
        assert_eq!(fixture.surface.item_titles(fixture.surface.root_list()), [
            "A",
            "B renamed"
        ]);
    }

    #[test]
    fn toggle_button_click_flips_expansion_without_bubbling() {
        let mut fixture = drawn_fixture();
        let node = fixture.store.node_at(&TreePosition::from([0])).unwrap();
        let item = fixture.surface.item_at(fixture.surface.root_list(), 0);
        let content = fixture.surface.child_with_role(item, Role::Content).unwrap();
        let wrapper = fixture
            .surface
            .child_with_role(content, Role::ToggleWrapper)
            .unwrap();
        let toggle = fixture.surface.child_with_role(wrapper, Role::Toggle).unwrap();

        let events = click(
            &mut fixture.store,
            &mut fixture.surface,
            &fixture.hub,
            toggle,
        );

        // One toggle from the button; the content binding never fired.
        assert_eq!(events, [StoreEvent::SubtreeToggled { node, expanded: true }]);
        assert!(fixture.store.node(node).unwrap().is_expanded());
        assert!(fixture.surface.has_flag(item, StateFlag::Expanded));
        assert!(!fixture.surface.has_flag(item, StateFlag::Retracted));
    }

    #[test]
    fn checkbox_click_selects_without_toggling_expansion() {
        let mut fixture = drawn_fixture();
        let node = fixture.store.node_at(&TreePosition::from([0])).unwrap();
        let item = fixture.surface.item_at(fixture.surface.root_list(), 0);
        let content = fixture.surface.child_with_role(item, Role::Content).unwrap();
        let wrapper = fixture
            .surface
            .child_with_role(content, Role::CheckboxWrapper)
            .unwrap();
        let checkbox = fixture
            .surface
            .child_with_role(wrapper, Role::Checkbox)
            .unwrap();

        let events = click(
            &mut fixture.store,
            &mut fixture.surface,
            &fixture.hub,
            checkbox,
        );

        assert_eq!(events, [StoreEvent::SelectionChanged { node, selected: true }]);
        assert!(fixture.store.node(node).unwrap().is_selected());
        assert!(!fixture.store.node(node).unwrap().is_expanded());
        assert!(fixture.surface.has_flag(checkbox, StateFlag::Checked));
    }

    #[test]
    fn content_click_toggles_expansion() {
        let mut fixture = drawn_fixture();
        let node = fixture.store.node_at(&TreePosition::from([1])).unwrap();
        let item = fixture.surface.item_at(fixture.surface.root_list(), 1);
        let content = fixture.surface.child_with_role(item, Role::Content).unwrap();

        let events = click(
            &mut fixture.store,
            &mut fixture.surface,
            &fixture.hub,
            content,
        );

        assert_eq!(events, [StoreEvent::SubtreeToggled { node, expanded: true }]);
    }

    #[test]
    fn stale_binding_is_ignored_not_fatal() {
        let mut fixture = drawn_fixture();
        let node = fixture.store.node_at(&TreePosition::from([1])).unwrap();
        fixture.store.remove_item(&TreePosition::from([1])).unwrap();

        let binding = InteractionBinding {
            node,
            behavior: ClickBehavior::ToggleSubtree,
            stop_propagation: false,
        };
        let event = fixture
            .store
            .dispatch(binding, &mut fixture.surface)
            .unwrap();
        assert_eq!(event, StoreEvent::Ignored);
    }

    #[test]
    fn custom_content_listener_registers_once_across_redraws() {
        let mut surface = MockSurface::new();
        let mut hub = MockHub::default();
        let mut store = TreeStore::new(surface.root_list());
        let content =
            ItemContent::titled("A").with_custom(CustomContent::Markup("<b>hi</b>".into()));
        store
            .insert_item(ItemSpec::new(content), &TreePosition::from([0]))
            .unwrap();

        store
            .draw_subtree(&TreePosition::root(), &mut surface, &mut hub)
            .unwrap();
        store
            .redraw_item(&TreePosition::from([0]), &mut surface, &mut hub)
            .unwrap();

        let node = store.node_at(&TreePosition::from([0])).unwrap();
        assert_eq!(hub.tracked_count(node, CUSTOM_CONTENT_LISTENER), 1);
    }

    #[test]
    fn update_content_adds_and_wires_toggle_button() {
        let mut fixture = drawn_fixture();
        let position = TreePosition::from([1]);
        let bindings_before = fixture.hub.binding_count();

        fixture
            .store
            .update_content(
                &position,
                &ContentPatch::new().toggle_button(true),
                &mut fixture.surface,
                &mut fixture.hub,
            )
            .unwrap();

        let node = fixture.store.node_at(&position).unwrap();
        assert!(fixture.store.node(node).unwrap().content().toggle_button);
        let item = fixture.surface.item_at(fixture.surface.root_list(), 1);
        let content = fixture.surface.child_with_role(item, Role::Content).unwrap();
        let wrapper = fixture
            .surface
            .child_with_role(content, Role::ToggleWrapper)
            .unwrap();
        assert!(!fixture.surface.has_flag(wrapper, StateFlag::Hidden));
        let toggle = fixture.surface.child_with_role(wrapper, Role::Toggle).unwrap();
        let events = click(
            &mut fixture.store,
            &mut fixture.surface,
            &fixture.hub,
            toggle,
        );
        assert_eq!(events, [StoreEvent::SubtreeToggled { node, expanded: true }]);
        assert_eq!(fixture.hub.binding_count(), bindings_before + 1);
    }

    #[test]
    fn update_content_removes_checkbox() {
        let mut fixture = drawn_fixture();
        let position = TreePosition::from([0]);

        fixture
            .store
            .update_content(
                &position,
                &ContentPatch::new().select_checkbox(false),
                &mut fixture.surface,
                &mut fixture.hub,
            )
            .unwrap();

        let item = fixture.surface.item_at(fixture.surface.root_list(), 0);
        let content = fixture.surface.child_with_role(item, Role::Content).unwrap();
        let wrapper = fixture
            .surface
            .child_with_role(content, Role::CheckboxWrapper)
            .unwrap();
        assert!(fixture.surface.has_flag(wrapper, StateFlag::Hidden));
        assert_eq!(fixture.surface.child_with_role(wrapper, Role::Checkbox), None);
    }

    #[test]
    fn update_content_is_a_noop_when_state_already_holds() {
        let mut fixture = drawn_fixture();
        let position = TreePosition::from([0]);
        let bindings_before = fixture.hub.binding_count();
        let elements_before = fixture.surface.live_count();

        fixture
            .store
            .update_content(
                &position,
                &ContentPatch::new().toggle_button(true).title("A"),
                &mut fixture.surface,
                &mut fixture.hub,
            )
            .unwrap();

        assert_eq!(fixture.hub.binding_count(), bindings_before);
        assert_eq!(fixture.surface.live_count(), elements_before);
    }

    #[test]
    fn update_content_sets_and_clears_title() {
        let mut fixture = drawn_fixture();
        let position = TreePosition::from([1]);

        fixture
            .store
            .update_content(
                &position,
                &ContentPatch::new().title("B renamed"),
                &mut fixture.surface,
                &mut fixture.hub,
            )
            .unwrap();
        assert_eq!(fixture.surface.item_titles(fixture.surface.root_list()), [
            "A",
            "B renamed"
        ]);

        fixture
            .store
            .update_content(
                &position,
                &ContentPatch::new().clear_title(),
                &mut fixture.surface,
                &mut fixture.hub,
            )
            .unwrap();
        let node = fixture.store.node_at(&position).unwrap();
        assert_eq!(fixture.store.node(node).unwrap().content().title, None);
        let item = fixture.surface.item_at(fixture.surface.root_list(), 1);
        let content = fixture.surface.child_with_role(item, Role::Content).unwrap();
        let title = fixture.surface.child_with_role(content, Role::Title).unwrap();
        assert!(fixture.surface.has_flag(title, StateFlag::Hidden));
    }

    #[test]
    fn update_content_sets_custom_markup_with_tracked_listener() {
        let mut fixture = drawn_fixture();
        let position = TreePosition::from([1]);
        let patch = ContentPatch::new().custom(CustomContent::Markup("<i>x</i>".into()));

        fixture
            .store
            .update_content(&position, &patch, &mut fixture.surface, &mut fixture.hub)
            .unwrap();
        // Re-applying the same patch is a no-op and must not re-register.
        fixture
            .store
            .update_content(&position, &patch, &mut fixture.surface, &mut fixture.hub)
            .unwrap();

        let node = fixture.store.node_at(&position).unwrap();
        assert_eq!(fixture.hub.tracked_count(node, CUSTOM_CONTENT_LISTENER), 1);
        let item = fixture.surface.item_at(fixture.surface.root_list(), 1);
        let content = fixture.surface.child_with_role(item, Role::Content).unwrap();
        let wrapper = fixture
            .surface
            .child_with_role(content, Role::CustomWrapper)
            .unwrap();
        assert_eq!(fixture.surface.markup(wrapper), "<i>x</i>");
        assert!(!fixture.surface.has_flag(wrapper, StateFlag::Hidden));
    }
}
