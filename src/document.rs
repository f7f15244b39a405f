use std::collections::BTreeMap;

use log::debug;

/// Handle to an element stored in a [`Document`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(usize);

/// What the host does when an element is activated (click, Enter or Space)
#[derive(Debug, Clone, PartialEq, Eq, strum_macros::Display)]
pub enum Action {
    ActivateItem { poll: usize, item: usize },
    ToggleVotes { poll: usize },
    SignIn,
    SignInAs { name: String },
    EditName,
}

/// Class names accepted by [`Document::create_element`]: a single name or a list
pub struct ClassList(Vec<String>);

impl From<&str> for ClassList {
    fn from(class: &str) -> Self {
        if class.is_empty() {
            Self(Vec::new())
        } else {
            Self(vec![class.to_string()])
        }
    }
}

impl<const N: usize> From<[&str; N]> for ClassList {
    fn from(classes: [&str; N]) -> Self {
        Self(classes.iter().map(|c| c.to_string()).collect())
    }
}

impl From<Vec<String>> for ClassList {
    fn from(classes: Vec<String>) -> Self {
        Self(classes)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Element {
    pub tag: String,
    pub id: String,
    pub classes: Vec<String>,
    pub text: String,
    pub title: String,
    pub tab_index: i32,
    pub properties: BTreeMap<String, String>,
    pub action: Option<Action>,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
}

impl Element {
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn parent(&self) -> Option<ElementId> {
        self.parent
    }

    pub fn children(&self) -> &[ElementId] {
        &self.children
    }

    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(String::as_str)
    }
}

/// Retained element tree. Elements live in an arena and are addressed by
/// [`ElementId`]. Removing an element frees its whole subtree; freed slots are
/// handed out again by later [`Document::create_element`] calls, so ids of
/// removed elements must not be kept.
#[derive(Debug, Clone)]
pub struct Document {
    elements: Vec<Element>,
    free: Vec<ElementId>,
    root: ElementId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        let body = Element {
            tag: "body".to_string(),
            tab_index: -1,
            ..Element::default()
        };
        Self {
            elements: vec![body],
            free: Vec::new(),
            root: ElementId(0),
        }
    }

    pub fn root(&self) -> ElementId {
        self.root
    }

    /// Creates a new element of `tag`, appends it to `parent` and applies the
    /// class list and id.
    pub fn create_element(
        &mut self,
        tag: &str,
        parent: ElementId,
        classes: impl Into<ClassList>,
        id: &str,
    ) -> ElementId {
        let focusable = matches!(tag, "button" | "input");
        let element = Element {
            tag: tag.to_string(),
            id: id.to_string(),
            classes: classes.into().0,
            tab_index: if focusable { 0 } else { -1 },
            parent: Some(parent),
            ..Element::default()
        };
        let element_id = match self.free.pop() {
            Some(slot) => {
                self.elements[slot.0] = element;
                slot
            }
            None => {
                self.elements.push(element);
                ElementId(self.elements.len() - 1)
            }
        };
        self.elements[parent.0].children.push(element_id);
        debug!("created <{}> {:?} under {:?}", tag, element_id, parent);
        element_id
    }

    pub fn get(&self, id: ElementId) -> &Element {
        &self.elements[id.0]
    }

    pub fn get_mut(&mut self, id: ElementId) -> &mut Element {
        &mut self.elements[id.0]
    }

    /// Detaches `id` from the tree and frees it together with its subtree.
    pub fn remove(&mut self, id: ElementId) {
        if id == self.root {
            return;
        }
        if let Some(parent) = self.elements[id.0].parent.take() {
            self.elements[parent.0].children.retain(|child| *child != id);
        }
        let mut freed = self.descendants(id);
        freed.push(id);
        for slot in freed {
            self.elements[slot.0] = Element {
                tab_index: -1,
                ..Element::default()
            };
            self.free.push(slot);
        }
    }

    /// Number of arena slots in use or waiting to be reused.
    pub fn slots(&self) -> usize {
        self.elements.len()
    }

    pub fn is_attached(&self, id: ElementId) -> bool {
        let mut current = id;
        loop {
            if current == self.root {
                return true;
            }
            match self.elements[current.0].parent {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    /// Toggles `class` on the element and returns whether it is now present.
    pub fn toggle_class(&mut self, id: ElementId, class: &str) -> bool {
        let element = self.get_mut(id);
        if element.has_class(class) {
            element.classes.retain(|c| c != class);
            false
        } else {
            element.classes.push(class.to_string());
            true
        }
    }

    pub fn set_class(&mut self, id: ElementId, class: &str, present: bool) {
        if self.get(id).has_class(class) != present {
            self.toggle_class(id, class);
        }
    }

    pub fn set_property(&mut self, id: ElementId, name: &str, value: impl ToString) {
        self.get_mut(id)
            .properties
            .insert(name.to_string(), value.to_string());
    }

    /// All attached elements of the subtree rooted at `from`, in document order.
    pub fn descendants(&self, from: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut stack: Vec<ElementId> = self.get(from).children.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.get(id).children.iter().rev());
        }
        out
    }

    /// First descendant of `from` carrying `class`.
    pub fn query_class(&self, from: ElementId, class: &str) -> Option<ElementId> {
        self.descendants(from)
            .into_iter()
            .find(|id| self.get(*id).has_class(class))
    }

    pub fn query_class_all(&self, from: ElementId, class: &str) -> Vec<ElementId> {
        self.descendants(from)
            .into_iter()
            .filter(|id| self.get(*id).has_class(class))
            .collect()
    }

    pub fn find_by_id(&self, id: &str) -> Option<ElementId> {
        self.descendants(self.root)
            .into_iter()
            .find(|element| self.get(*element).id == id)
    }

    /// Attached elements reachable with the keyboard, in document order.
    pub fn focusable(&self) -> Vec<ElementId> {
        self.descendants(self.root)
            .into_iter()
            .filter(|id| self.get(*id).tab_index >= 0)
            .collect()
    }

    /// Nearest element (itself or an ancestor) that has an action and can be
    /// reached by the keyboard.
    pub fn activation_target(&self, id: ElementId) -> Option<ElementId> {
        let mut current = Some(id);
        while let Some(element_id) = current {
            let element = self.get(element_id);
            if element.action.is_some() && element.tab_index >= 0 {
                return Some(element_id);
            }
            current = element.parent;
        }
        None
    }
}
