// Minimal example: build a two-item tree, draw it, and print the rendered
// structure of a toy surface.

use treeview_store::prelude::*;

// Toy render surface: a flat arena of elements with parent/child links.
#[derive(Default)]
struct Surface {
    roles: Vec<Role>,
    children: Vec<Vec<usize>>,
    texts: Vec<String>,
    flags: Vec<Vec<StateFlag>>,
}

impl Surface {
    fn new() -> Self {
        let mut surface = Self::default();
        surface.alloc(Role::List);
        surface
    }

    fn alloc(&mut self, role: Role) -> usize {
        self.roles.push(role);
        self.children.push(Vec::new());
        self.texts.push(String::new());
        self.flags.push(Vec::new());
        self.roles.len() - 1
    }

    fn dump(&self, id: usize, depth: usize) {
        let pad = "  ".repeat(depth);
        let text = if self.texts[id].is_empty() {
            String::new()
        } else {
            format!(" {:?}", self.texts[id])
        };
        println!("{pad}{:?}{text} {:?}", self.roles[id], self.flags[id]);
        for &child in &self.children[id] {
            self.dump(child, depth + 1);
        }
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
        self.children[parent].push(child);
    }

    fn replace(&mut self, old: usize, new: usize) {
        for children in &mut self.children {
            for slot in children.iter_mut() {
                if *slot == old {
                    *slot = new;
                }
            }
        }
    }

    fn detach(&mut self, fragment: usize) {
        for children in &mut self.children {
            children.retain(|&child| child != fragment);
        }
    }

    fn remove(&mut self, fragment: usize) {
        self.detach(fragment);
    }

    fn clear_children(&mut self, fragment: usize) {
        self.children[fragment].clear();
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
        self.children[parent].push(external);
    }
}

// Hub that just prints what gets wired.
struct Hub;

impl ListenerHub<usize> for Hub {
    fn bind(&mut self, owner: usize, _event: EventKind, binding: InteractionBinding) {
        println!("bind    #{owner} -> {:?}", binding.behavior);
    }

    fn bind_tracked(
        &mut self,
        owner: usize,
        _event: EventKind,
        name: ListenerName,
        binding: InteractionBinding,
    ) {
        println!("tracked #{owner} ({name}) -> {:?}", binding.behavior);
    }

    fn is_tracked(&self, _node: NodeId, _name: ListenerName) -> bool {
        false
    }
}

fn main() -> treeview_store::Result<()> {
    let mut surface = Surface::new();
    let mut hub = Hub;
    let mut store = TreeStore::new(surface.root_list());

    store.insert_item(
        ItemSpec::new(ItemContent::titled("alpha").with_toggle_button()),
        &TreePosition::from([0]),
    )?;
    store.insert_item(
        ItemSpec::new(ItemContent::titled("beta")),
        &TreePosition::from([1]),
    )?;
    store.insert_item(
        ItemSpec::new(ItemContent::titled("alpha child")),
        &TreePosition::from([0, 0]),
    )?;

    store.draw_subtree(&TreePosition::root(), &mut surface, &mut hub)?;

    println!("\nrendered structure:");
    surface.dump(surface.root_list(), 0);
    Ok(())
}
