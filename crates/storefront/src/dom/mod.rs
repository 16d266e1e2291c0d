//! In-memory display tree.
//!
//! Views render into a tree of [`Node`]s that models the parts of a browser
//! document the storefront relies on: elements with classes, attributes, text,
//! form values, a disabled flag and a hidden flag. User interaction is
//! simulated with [`Node::click`], [`Node::input`] and [`Node::submit`]; the
//! resulting [`InteractionEvent`] bubbles from the target up through its
//! ancestors, so delegated listeners behave like their DOM counterparts.
//!
//! `Node` is a shared handle: clones refer to the same element. Use
//! [`Node::deep_clone`] to copy a subtree (the equivalent of cloning a
//! `<template>`).

mod html;
mod selector;

pub use selector::Selector;

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

use thiserror::Error;

/// A view could not find the nodes it needs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindingError {
    /// A required element is missing from the view's root node.
    #[error("required element `{selector}` not found")]
    MissingElement {
        /// The selector that matched nothing.
        selector: String,
    },
    /// No template is registered under this id.
    #[error("template `{id}` not found")]
    MissingTemplate {
        /// The unknown template id.
        id: String,
    },
}

/// Kind of user interaction a listener reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Interaction {
    Click,
    Input,
    Submit,
}

/// An interaction travelling up the tree.
#[derive(Debug, Clone)]
pub struct InteractionEvent {
    /// What happened.
    pub kind: Interaction,
    /// The node the interaction started on.
    pub target: Node,
    /// The node whose listener is running.
    pub current_target: Node,
}

type Listener = Rc<dyn Fn(&InteractionEvent)>;

struct NodeData {
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    attrs: BTreeMap<String, String>,
    text: String,
    value: String,
    disabled: bool,
    hidden: bool,
    children: Vec<Node>,
    parent: Weak<RefCell<NodeData>>,
    listeners: Vec<(Interaction, Listener)>,
}

/// Handle to an element of the display tree.
#[derive(Clone)]
pub struct Node(Rc<RefCell<NodeData>>);

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Node {}

impl std::fmt::Debug for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let data = self.0.borrow();
        f.debug_struct("Node")
            .field("tag", &data.tag)
            .field("id", &data.id)
            .field("classes", &data.classes)
            .field("children", &data.children.len())
            .finish_non_exhaustive()
    }
}

impl Node {
    /// Create a detached element.
    #[must_use]
    pub fn element(tag: &str) -> Self {
        Self(Rc::new(RefCell::new(NodeData {
            tag: tag.to_string(),
            id: None,
            classes: Vec::new(),
            attrs: BTreeMap::new(),
            text: String::new(),
            value: String::new(),
            disabled: false,
            hidden: false,
            children: Vec::new(),
            parent: Weak::new(),
            listeners: Vec::new(),
        })))
    }

    // -------------------------------------------------------------------------
    // Builder helpers
    // -------------------------------------------------------------------------

    /// Builder: add a class.
    #[must_use]
    pub fn with_class(self, class: &str) -> Self {
        self.add_class(class);
        self
    }

    /// Builder: set the element id.
    #[must_use]
    pub fn with_id(self, id: &str) -> Self {
        self.0.borrow_mut().id = Some(id.to_string());
        self
    }

    /// Builder: set an attribute.
    #[must_use]
    pub fn with_attr(self, name: &str, value: &str) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Builder: set the text content.
    #[must_use]
    pub fn with_text(self, text: &str) -> Self {
        self.set_text(text);
        self
    }

    /// Builder: append a child.
    #[must_use]
    pub fn with_child(self, child: Self) -> Self {
        self.append_child(&child);
        self
    }

    // -------------------------------------------------------------------------
    // Element state
    // -------------------------------------------------------------------------

    /// Tag name.
    #[must_use]
    pub fn tag(&self) -> String {
        self.0.borrow().tag.clone()
    }

    /// Element id, if any.
    #[must_use]
    pub fn id(&self) -> Option<String> {
        self.0.borrow().id.clone()
    }

    /// Text content of this node and its descendants.
    #[must_use]
    pub fn text(&self) -> String {
        let data = self.0.borrow();
        let mut text = data.text.clone();
        for child in &data.children {
            text.push_str(&child.text());
        }
        text
    }

    /// Replace the content of the node with `text`.
    pub fn set_text(&self, text: &str) {
        let children = {
            let mut data = self.0.borrow_mut();
            data.text = text.to_string();
            std::mem::take(&mut data.children)
        };
        for child in children {
            child.0.borrow_mut().parent = Weak::new();
        }
    }

    /// Current form value.
    #[must_use]
    pub fn value(&self) -> String {
        self.0.borrow().value.clone()
    }

    /// Set the form value without firing an interaction.
    pub fn set_value(&self, value: &str) {
        self.0.borrow_mut().value = value.to_string();
    }

    /// Attribute value.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<String> {
        self.0.borrow().attrs.get(name).cloned()
    }

    /// Set an attribute.
    pub fn set_attr(&self, name: &str, value: &str) {
        self.0
            .borrow_mut()
            .attrs
            .insert(name.to_string(), value.to_string());
    }

    /// Remove an attribute.
    pub fn remove_attr(&self, name: &str) {
        self.0.borrow_mut().attrs.remove(name);
    }

    /// Classes in insertion order.
    #[must_use]
    pub fn classes(&self) -> Vec<String> {
        self.0.borrow().classes.clone()
    }

    /// Whether the element carries `class`.
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.0.borrow().classes.iter().any(|c| c == class)
    }

    /// Add a class if absent.
    pub fn add_class(&self, class: &str) {
        if !self.has_class(class) {
            self.0.borrow_mut().classes.push(class.to_string());
        }
    }

    /// Remove a class if present.
    pub fn remove_class(&self, class: &str) {
        self.0.borrow_mut().classes.retain(|c| c != class);
    }

    /// Add or remove `class` depending on `on`.
    pub fn toggle_class(&self, class: &str, on: bool) {
        if on {
            self.add_class(class);
        } else {
            self.remove_class(class);
        }
    }

    /// Drop every class.
    pub fn clear_classes(&self) {
        self.0.borrow_mut().classes.clear();
    }

    /// Whether the element is disabled.
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.0.borrow().disabled
    }

    /// Enable or disable the element.
    pub fn set_disabled(&self, disabled: bool) {
        self.0.borrow_mut().disabled = disabled;
    }

    /// Whether the element is hidden.
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.0.borrow().hidden
    }

    /// Hide or show the element.
    pub fn set_hidden(&self, hidden: bool) {
        self.0.borrow_mut().hidden = hidden;
    }

    // -------------------------------------------------------------------------
    // Tree structure
    // -------------------------------------------------------------------------

    /// Parent element, if attached.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        self.0.borrow().parent.upgrade().map(Self)
    }

    /// Direct children.
    #[must_use]
    pub fn children(&self) -> Vec<Self> {
        self.0.borrow().children.clone()
    }

    /// Append `child`, detaching it from any previous parent.
    pub fn append_child(&self, child: &Self) {
        child.detach();
        child.0.borrow_mut().parent = Rc::downgrade(&self.0);
        self.0.borrow_mut().children.push(child.clone());
    }

    /// Replace all children (and text) with `children`.
    pub fn replace_children(&self, children: &[Self]) {
        self.set_text("");
        for child in children {
            self.append_child(child);
        }
    }

    /// Remove this node from its parent.
    pub fn detach(&self) {
        let parent = self.0.borrow().parent.upgrade();
        if let Some(parent) = parent {
            parent.borrow_mut().children.retain(|c| c != self);
        }
        self.0.borrow_mut().parent = Weak::new();
    }

    /// Copy this subtree. Listeners are not copied.
    #[must_use]
    pub fn deep_clone(&self) -> Self {
        let data = self.0.borrow();
        let copy = Self(Rc::new(RefCell::new(NodeData {
            tag: data.tag.clone(),
            id: data.id.clone(),
            classes: data.classes.clone(),
            attrs: data.attrs.clone(),
            text: data.text.clone(),
            value: data.value.clone(),
            disabled: data.disabled,
            hidden: data.hidden,
            children: Vec::new(),
            parent: Weak::new(),
            listeners: Vec::new(),
        })));
        for child in &data.children {
            copy.append_child(&child.deep_clone());
        }
        copy
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// First descendant matching `selector`, in document order.
    ///
    /// Whitespace-separated parts are descendant combinators.
    #[must_use]
    pub fn query(&self, selector: &str) -> Option<Self> {
        self.query_all(selector).into_iter().next()
    }

    /// Every descendant matching `selector`, in document order.
    #[must_use]
    pub fn query_all(&self, selector: &str) -> Vec<Self> {
        let mut scopes = vec![self.clone()];
        let mut parts = selector.split_whitespace().peekable();
        if parts.peek().is_none() {
            return Vec::new();
        }
        for part in parts {
            let selector = Selector::parse(part);
            let mut found = Vec::new();
            for scope in &scopes {
                scope.collect(&selector, &mut found);
            }
            scopes = Vec::with_capacity(found.len());
            for node in found {
                if !scopes.contains(&node) {
                    scopes.push(node);
                }
            }
        }
        scopes
    }

    /// First descendant matching `selector`, or a binding error naming it.
    ///
    /// # Errors
    ///
    /// Returns [`BindingError::MissingElement`] if nothing matches.
    pub fn ensure(&self, selector: &str) -> Result<Self, BindingError> {
        self.query(selector)
            .ok_or_else(|| BindingError::MissingElement {
                selector: selector.to_string(),
            })
    }

    /// Whether this node matches `selector`.
    #[must_use]
    pub fn matches(&self, selector: &Selector) -> bool {
        let data = self.0.borrow();
        selector.matches(&data.tag, data.id.as_deref(), &data.classes, &data.attrs)
    }

    fn collect(&self, selector: &Selector, found: &mut Vec<Self>) {
        for child in self.children() {
            if child.matches(selector) {
                found.push(child.clone());
            }
            child.collect(selector, found);
        }
    }

    // -------------------------------------------------------------------------
    // Interaction
    // -------------------------------------------------------------------------

    /// Register a listener for `kind` on this node.
    pub fn on<F>(&self, kind: Interaction, listener: F)
    where
        F: Fn(&InteractionEvent) + 'static,
    {
        self.0.borrow_mut().listeners.push((kind, Rc::new(listener)));
    }

    /// Dispatch an interaction on this node and bubble it to the root.
    ///
    /// Disabled elements swallow clicks and submits, as browsers do.
    pub fn dispatch(&self, kind: Interaction) {
        if self.is_disabled() && kind != Interaction::Input {
            return;
        }
        let mut current = Some(self.clone());
        while let Some(node) = current {
            let listeners: Vec<Listener> = node
                .0
                .borrow()
                .listeners
                .iter()
                .filter(|(k, _)| *k == kind)
                .map(|(_, l)| Rc::clone(l))
                .collect();
            let event = InteractionEvent {
                kind,
                target: self.clone(),
                current_target: node.clone(),
            };
            for listener in listeners {
                listener(&event);
            }
            current = node.parent();
        }
    }

    /// Simulate a click.
    pub fn click(&self) {
        self.dispatch(Interaction::Click);
    }

    /// Simulate typing: set the value and fire an input interaction.
    pub fn input(&self, value: &str) {
        self.set_value(value);
        self.dispatch(Interaction::Input);
    }

    /// Simulate a form submission.
    pub fn submit(&self) {
        self.dispatch(Interaction::Submit);
    }

    /// Serialize the subtree as HTML.
    #[must_use]
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        html::write_node(self, &mut out);
        out
    }
}
