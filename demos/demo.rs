// Walkthrough: build a small file-browser-like tree, draw it, route a few
// clicks through the store, patch content, and redraw a single item.

use rustc_hash::FxHashMap;
use treeview_store::prelude::*;

// Element-tree surface with enough bookkeeping to route clicks upward.
struct Surface {
    roles: Vec<Role>,
    parents: Vec<Option<usize>>,
    children: Vec<Vec<usize>>,
    texts: Vec<String>,
    flags: Vec<Vec<StateFlag>>,
}

impl Surface {
    fn new() -> Self {
        let mut surface = Self {
            roles: Vec::new(),
            parents: Vec::new(),
            children: Vec::new(),
            texts: Vec::new(),
            flags: Vec::new(),
        };
        surface.alloc(Role::List);
        surface
    }

    fn alloc(&mut self, role: Role) -> usize {
        self.roles.push(role);
        self.parents.push(None);
        self.children.push(Vec::new());
        self.texts.push(String::new());
        self.flags.push(Vec::new());
        self.roles.len() - 1
    }

    fn dump(&self, id: usize, depth: usize) {
        if self.roles[id] == Role::Item {
            let pad = "  ".repeat(depth);
            let expanded = if self.flags[id].contains(&StateFlag::Expanded) {
                "[-]"
            } else {
                "[+]"
            };
            println!("{pad}{expanded} {}", self.title_of(id));
        }
        for &child in &self.children[id] {
            let next = if self.roles[id] == Role::Item {
                depth + 1
            } else {
                depth
            };
            self.dump(child, next);
        }
    }

    fn title_of(&self, item: usize) -> String {
        self.child_with_role(item, Role::Content)
            .and_then(|content| self.child_with_role(content, Role::Title))
            .map(|title| self.texts[title].clone())
            .unwrap_or_default()
    }
}

impl RenderSurface for Surface {
    type Fragment = usize;

    fn root_list(&self) -> usize {
        0
    }

    fn create(&mut self, role: Role) -> usize {
        self.alloc(role)
    }

    fn append(&mut self, parent: usize, child: usize) {
        self.parents[child] = Some(parent);
        self.children[parent].push(child);
    }

    fn replace(&mut self, old: usize, new: usize) {
        if let Some(parent) = self.parents[old] {
            for slot in &mut self.children[parent] {
                if *slot == old {
                    *slot = new;
                }
            }
            self.parents[new] = Some(parent);
            self.parents[old] = None;
        }
    }

    fn detach(&mut self, fragment: usize) {
        if let Some(parent) = self.parents[fragment] {
            self.children[parent].retain(|&child| child != fragment);
            self.parents[fragment] = None;
        }
    }

    fn remove(&mut self, fragment: usize) {
        self.detach(fragment);
    }

    fn clear_children(&mut self, fragment: usize) {
        for child in std::mem::take(&mut self.children[fragment]) {
            self.parents[child] = None;
        }
    }

    fn child_with_role(&self, parent: usize, role: Role) -> Option<usize> {
        self.children[parent]
            .iter()
            .copied()
            .find(|&child| self.roles[child] == role)
    }

    fn set_flag(&mut self, fragment: usize, flag: StateFlag, on: bool) {
        if on {
            if !self.flags[fragment].contains(&flag) {
                self.flags[fragment].push(flag);
            }
        } else {
            self.flags[fragment].retain(|&existing| existing != flag);
        }
    }

    fn set_text(&mut self, fragment: usize, text: &str) {
        self.texts[fragment] = text.to_string();
    }

    fn set_markup(&mut self, fragment: usize, markup: &str) {
        self.texts[fragment] = markup.to_string();
    }

    fn adopt(&mut self, parent: usize, external: usize) {
        self.append(parent, external);
    }
}

// Hub that stores bindings so the demo can route clicks like a host would.
#[derive(Default)]
struct Hub {
    bindings: FxHashMap<usize, InteractionBinding>,
    tracked: FxHashMap<(NodeId, ListenerName), usize>,
}

impl ListenerHub<usize> for Hub {
    fn bind(&mut self, owner: usize, _event: EventKind, binding: InteractionBinding) {
        self.bindings.insert(owner, binding);
    }

    fn bind_tracked(
        &mut self,
        owner: usize,
        _event: EventKind,
        name: ListenerName,
        binding: InteractionBinding,
    ) {
        self.tracked.insert((binding.node, name), owner);
        self.bindings.insert(owner, binding);
    }

    fn is_tracked(&self, node: NodeId, name: ListenerName) -> bool {
        self.tracked.contains_key(&(node, name))
    }
}

// Deliver a click to a fragment, bubbling until a binding stops it.
fn click(
    store: &mut TreeStore<usize>,
    surface: &mut Surface,
    hub: &Hub,
    target: usize,
) -> treeview_store::Result<Vec<StoreEvent>> {
    let mut events = Vec::new();
    let mut current = Some(target);
    while let Some(fragment) = current {
        if let Some(&binding) = hub.bindings.get(&fragment) {
            events.push(store.dispatch(binding, surface)?);
            if binding.stop_propagation {
                break;
            }
        }
        current = surface.parents[fragment];
    }
    Ok(events)
}

fn main() -> treeview_store::Result<()> {
    let mut surface = Surface::new();
    let mut hub = Hub::default();
    let mut store = TreeStore::new(surface.root_list());

    let folder = |title: &str| {
        ItemSpec::new(
            ItemContent::titled(title)
                .with_toggle_button()
                .with_checkbox(),
        )
    };
    let file = |title: &str| ItemSpec::new(ItemContent::titled(title).with_checkbox());

    store.insert_item(folder("src"), &TreePosition::from([0]))?;
    store.insert_item(file("lib.rs"), &TreePosition::from([0, 0]))?;
    store.insert_item(file("main.rs"), &TreePosition::from([0, 1]))?;
    store.insert_item(file("Readme.md"), &TreePosition::from([1]))?;

    store.draw_subtree(&TreePosition::root(), &mut surface, &mut hub)?;
    println!("initial:");
    surface.dump(surface.root_list(), 0);

    // Expand "src" the way a pointer click on its toggle button would.
    let src = store
        .node_at(&TreePosition::from([0]))
        .expect("src was just inserted");
    let src_fragment = surface
        .child_with_role(surface.root_list(), Role::Item)
        .expect("src is rendered");
    let content = surface
        .child_with_role(src_fragment, Role::Content)
        .expect("item has content");
    let toggle = surface
        .child_with_role(content, Role::ToggleWrapper)
        .and_then(|wrapper| surface.child_with_role(wrapper, Role::Toggle))
        .expect("src has a toggle button");
    let events = click(&mut store, &mut surface, &hub, toggle)?;
    println!("\nafter toggling src ({events:?}):");
    surface.dump(surface.root_list(), 0);
    assert!(store.node(src).is_some_and(Node::is_expanded));

    // Rename one file via set_item + single-item redraw.
    store.set_item(file("main_v2.rs"), &TreePosition::from([0, 1]))?;
    store.redraw_item(&TreePosition::from([0, 1]), &mut surface, &mut hub)?;

    // And hide the checkbox of the readme without redrawing it.
    store.update_content(
        &TreePosition::from([1]),
        &ContentPatch::new().select_checkbox(false),
        &mut surface,
        &mut hub,
    )?;

    println!("\nafter rename + patch:");
    surface.dump(surface.root_list(), 0);
    Ok(())
}
