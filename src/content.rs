/// Display descriptor for one tree item.
///
/// Generic over the surface's fragment handle `F` because custom content
/// may be an externally-owned fragment adopted into the item.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ItemContent<F> {
    /// Title text, or `None` to hide the title region.
    pub title: Option<String>,
    /// Whether the item shows an expand/collapse button.
    pub toggle_button: bool,
    /// Whether the item shows a selection checkbox.
    pub select_checkbox: bool,
    /// Caller-supplied content rendered next to the title.
    pub custom: Option<CustomContent<F>>,
}

impl<F> Default for ItemContent<F> {
    fn default() -> Self {
        Self {
            title: None,
            toggle_button: false,
            select_checkbox: false,
            custom: None,
        }
    }
}

impl<F> ItemContent<F> {
    /// Content consisting of a title only.
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    /// Enables the expand/collapse button.
    #[must_use]
    pub fn with_toggle_button(mut self) -> Self {
        self.toggle_button = true;
        self
    }

    /// Enables the selection checkbox.
    #[must_use]
    pub fn with_checkbox(mut self) -> Self {
        self.select_checkbox = true;
        self
    }

    /// Sets custom content.
    #[must_use]
    pub fn with_custom(mut self, custom: CustomContent<F>) -> Self {
        self.custom = Some(custom);
        self
    }
}

/// Custom per-item content, orthogonal to the title.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CustomContent<F> {
    /// Raw markup rendered into the custom wrapper.
    Markup(String),
    /// Externally-owned fragment adopted into the custom wrapper.
    External(F),
}

/// Caller intent for the nested sub-tree slot when replacing a node.
///
/// Intent is distinct from the stored sub-tree state: `Keep` means "carry
/// over whatever the replaced node had", it is not itself a sub-tree value.
/// Supplying a fully-formed sub-tree is not expressible, by design.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SubtreeIntent {
    /// Carry over the replaced node's sub-tree, if any.
    Keep,
    /// Leave the sub-tree slot absent.
    #[default]
    Drop,
}

/// Payload for insert and update: content plus initial flags.
#[derive(Clone, Debug)]
pub struct ItemSpec<F> {
    /// Display descriptor of the new item.
    pub content: ItemContent<F>,
    /// Sub-tree disposition; only meaningful on update.
    pub subtree: SubtreeIntent,
    /// Initial expansion state.
    pub is_expanded: bool,
    /// Initial selection state.
    pub is_selected: bool,
}

impl<F> ItemSpec<F> {
    /// A spec with the given content, dropped sub-tree, and cleared flags.
    pub fn new(content: ItemContent<F>) -> Self {
        Self {
            content,
            subtree: SubtreeIntent::Drop,
            is_expanded: false,
            is_selected: false,
        }
    }

    /// Carries the replaced node's sub-tree over on update.
    #[must_use]
    pub const fn keep_subtree(mut self) -> Self {
        self.subtree = SubtreeIntent::Keep;
        self
    }

    /// Starts the item expanded.
    #[must_use]
    pub const fn expanded(mut self) -> Self {
        self.is_expanded = true;
        self
    }

    /// Starts the item selected.
    #[must_use]
    pub const fn selected(mut self) -> Self {
        self.is_selected = true;
        self
    }
}

impl<F> From<ItemContent<F>> for ItemSpec<F> {
    fn from(content: ItemContent<F>) -> Self {
        Self::new(content)
    }
}

/// Partial content patch; `None` fields leave the current value untouched.
///
/// Applied by [`TreeStore::update_content`](crate::TreeStore::update_content)
/// to both the logical item and its rendered fragment, each field
/// independently and as a no-op when the requested state already holds.
#[derive(Clone, Debug)]
pub struct ContentPatch<F> {
    /// Show or hide the expand/collapse button.
    pub toggle_button: Option<bool>,
    /// Show or hide the selection checkbox.
    pub select_checkbox: Option<bool>,
    /// Set (`Some(Some(_))`) or clear (`Some(None)`) the title.
    pub title: Option<Option<String>>,
    /// Set or clear the custom content.
    pub custom: Option<Option<CustomContent<F>>>,
}

impl<F> Default for ContentPatch<F> {
    fn default() -> Self {
        Self {
            toggle_button: None,
            select_checkbox: None,
            title: None,
            custom: None,
        }
    }
}

impl<F> ContentPatch<F> {
    /// An empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Shows or hides the expand/collapse button.
    #[must_use]
    pub const fn toggle_button(mut self, show: bool) -> Self {
        self.toggle_button = Some(show);
        self
    }

    /// Shows or hides the selection checkbox.
    #[must_use]
    pub const fn select_checkbox(mut self, show: bool) -> Self {
        self.select_checkbox = Some(show);
        self
    }

    /// Sets the title text.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(Some(title.into()));
        self
    }

    /// Clears the title.
    #[must_use]
    pub fn clear_title(mut self) -> Self {
        self.title = Some(None);
        self
    }

    /// Sets the custom content.
    #[must_use]
    pub fn custom(mut self, custom: CustomContent<F>) -> Self {
        self.custom = Some(Some(custom));
        self
    }

    /// Clears the custom content.
    #[must_use]
    pub fn clear_custom(mut self) -> Self {
        self.custom = Some(None);
        self
    }
}
