use std::fmt::Debug;
use std::hash::Hash;

/// Structural role of a fragment on the render surface.
///
/// Roles are the recognizable markers the store tags fragments with so it
/// can re-locate a region later via [`RenderSurface::child_with_role`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    /// A sibling collection container.
    List,
    /// One rendered item of a collection.
    Item,
    /// The item's own presentation row.
    Content,
    /// Slot for the expand/collapse button.
    ToggleWrapper,
    /// The expand/collapse button itself.
    Toggle,
    /// Slot for the selection checkbox.
    CheckboxWrapper,
    /// The selection checkbox itself.
    Checkbox,
    /// The title text region.
    Title,
    /// Slot for caller-supplied custom content.
    CustomWrapper,
    /// Slot under an item that hosts its nested list.
    SubtreeWrapper,
}

/// Presentation flags toggled on fragments.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StateFlag {
    /// The item's sub-tree is shown.
    Expanded,
    /// The item's sub-tree is hidden.
    Retracted,
    /// The item owns a nested list.
    Nested,
    /// The region is present but not displayed.
    Hidden,
    /// The checkbox is checked.
    Checked,
}

/// Retained rendering sink the store draws into.
///
/// Fragments are opaque handles with identity. Structural queries are
/// confined to direct children so unrelated deeper fragments never match.
/// Fragments start detached; the store assembles an item fully off-surface
/// and attaches the finished fragment in one `append`/`replace` call.
pub trait RenderSurface {
    /// Opaque fragment handle.
    type Fragment: Copy + Eq + Hash + Debug;

    /// The pre-existing root list container.
    fn root_list(&self) -> Self::Fragment;

    /// Creates a new detached fragment with the given role.
    fn create(&mut self, role: Role) -> Self::Fragment;

    /// Appends `child` as the last direct child of `parent`.
    fn append(&mut self, parent: Self::Fragment, child: Self::Fragment);

    /// Swaps `new` into the place of `old`; `old` and everything still
    /// under it are dropped from the surface.
    fn replace(&mut self, old: Self::Fragment, new: Self::Fragment);

    /// Detaches the fragment from its parent, keeping it and its children
    /// alive for later re-attachment.
    fn detach(&mut self, fragment: Self::Fragment);

    /// Drops the fragment and everything under it.
    fn remove(&mut self, fragment: Self::Fragment);

    /// Drops all direct children and their descendants.
    fn clear_children(&mut self, fragment: Self::Fragment);

    /// First direct child carrying the role, if any. Never matches deeper.
    fn child_with_role(&self, parent: Self::Fragment, role: Role) -> Option<Self::Fragment>;

    /// Turns a presentation flag on or off.
    fn set_flag(&mut self, fragment: Self::Fragment, flag: StateFlag, on: bool);

    /// Sets the text of a title region.
    fn set_text(&mut self, fragment: Self::Fragment, text: &str);

    /// Replaces the fragment's children with parsed raw markup.
    fn set_markup(&mut self, fragment: Self::Fragment, markup: &str);

    /// Mounts an externally-owned fragment under `parent`.
    fn adopt(&mut self, parent: Self::Fragment, external: Self::Fragment);
}
