//! In-memory host document.
//!
//! A small element tree standing in for the page a form lives in: containers
//! and input fields, optional string identifiers, and `input` events that
//! bubble from the edited field up through every ancestor.

use std::cell::RefCell;
use std::rc::Rc;

use slotmap::{SlotMap, new_key_type};
use smallvec::SmallVec;
use taskcalc_core::FormError;

use crate::field::{FieldHandle, InputField, TextFieldState};

new_key_type! {
    pub struct ElementKey;
}

pub type ListenerId = u64;

type InputListener = Rc<dyn Fn(&InputEvent)>;

/// Delivered to every listener on the path from the edited field to the root.
#[derive(Clone, Debug, PartialEq)]
pub struct InputEvent {
    /// The field that was edited.
    pub target: ElementKey,
    /// The element whose listener is running.
    pub current_target: ElementKey,
    /// Text of the target after the edit.
    pub value: String,
}

enum ElementKind {
    Container,
    Input(InputField),
}

struct Element {
    id: Option<String>,
    parent: Option<ElementKey>,
    children: Vec<ElementKey>,
    kind: ElementKind,
    listeners: SmallVec<[(ListenerId, InputListener); 2]>,
}

struct DocumentInner {
    elements: SlotMap<ElementKey, Element>,
    root: ElementKey,
    next_listener: ListenerId,
}

/// Cloneable handle; clones share one tree.
#[derive(Clone)]
pub struct Document(Rc<RefCell<DocumentInner>>);

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        let mut elements = SlotMap::with_key();
        let root = elements.insert(Element {
            id: None,
            parent: None,
            children: Vec::new(),
            kind: ElementKind::Container,
            listeners: SmallVec::new(),
        });
        Self(Rc::new(RefCell::new(DocumentInner {
            elements,
            root,
            next_listener: 1,
        })))
    }

    /// The body element every other element descends from.
    pub fn root(&self) -> ElementKey {
        self.0.borrow().root
    }

    pub fn contains(&self, key: ElementKey) -> bool {
        self.0.borrow().elements.contains_key(key)
    }

    pub fn append_container(
        &self,
        parent: ElementKey,
        id: Option<&str>,
    ) -> Result<ElementKey, FormError> {
        self.append(parent, id, ElementKind::Container)
    }

    pub fn append_input(
        &self,
        parent: ElementKey,
        id: Option<&str>,
        text: &str,
    ) -> Result<ElementKey, FormError> {
        self.append(parent, id, ElementKind::Input(InputField::new(text)))
    }

    fn append(
        &self,
        parent: ElementKey,
        id: Option<&str>,
        kind: ElementKind,
    ) -> Result<ElementKey, FormError> {
        let mut inner = self.0.borrow_mut();
        if !inner.elements.contains_key(parent) {
            return Err(FormError::DetachedElement);
        }
        let key = inner.elements.insert(Element {
            id: id.map(str::to_string),
            parent: Some(parent),
            children: Vec::new(),
            kind,
            listeners: SmallVec::new(),
        });
        if let Some(p) = inner.elements.get_mut(parent) {
            p.children.push(key);
        }
        Ok(key)
    }

    /// Removes `key` and its whole subtree, listeners included. The root
    /// cannot be removed.
    pub fn remove(&self, key: ElementKey) -> Result<(), FormError> {
        let mut inner = self.0.borrow_mut();
        if key == inner.root {
            log::warn!("refusing to remove the document root");
            return Ok(());
        }
        let parent = inner
            .elements
            .get(key)
            .ok_or(FormError::DetachedElement)?
            .parent;
        if let Some(p) = parent.and_then(|p| inner.elements.get_mut(p)) {
            p.children.retain(|c| *c != key);
        }

        // Dropping listeners here can drop handles that point back at this
        // document, so they are released after the borrow ends.
        let mut removed = Vec::new();
        let mut stack = vec![key];
        while let Some(k) = stack.pop() {
            if let Some(el) = inner.elements.remove(k) {
                stack.extend(el.children.iter().copied());
                removed.push(el);
            }
        }
        drop(inner);
        drop(removed);
        Ok(())
    }

    /// First element in tree order carrying `id`.
    pub fn element_by_id(&self, id: &str) -> Option<ElementKey> {
        let inner = self.0.borrow();
        let mut stack = vec![inner.root];
        while let Some(k) = stack.pop() {
            let el = inner.elements.get(k)?;
            if el.id.as_deref() == Some(id) {
                return Some(k);
            }
            stack.extend(el.children.iter().rev().copied());
        }
        None
    }

    pub fn input_by_id(&self, id: &str) -> Result<InputField, FormError> {
        let key = self
            .element_by_id(id)
            .ok_or_else(|| FormError::MissingElement { id: id.to_string() })?;
        self.input(key)
    }

    pub fn input(&self, key: ElementKey) -> Result<InputField, FormError> {
        let inner = self.0.borrow();
        let el = inner.elements.get(key).ok_or(FormError::DetachedElement)?;
        match &el.kind {
            ElementKind::Input(field) => Ok(field.clone()),
            ElementKind::Container => Err(FormError::NotAnInput {
                id: el.id.clone().unwrap_or_default(),
            }),
        }
    }

    /// Types `text` at the caret of the field and fires `input`.
    pub fn type_text(&self, key: ElementKey, text: &str) -> Result<(), FormError> {
        self.edit_input(key, |s| s.insert_text(text))
    }

    /// Replaces the field's text, as a paste over a full selection would,
    /// and fires `input`.
    pub fn set_input_value(&self, key: ElementKey, text: &str) -> Result<(), FormError> {
        self.edit_input(key, |s| s.set_text(text))
    }

    pub fn delete_backward(&self, key: ElementKey) -> Result<(), FormError> {
        self.edit_input(key, TextFieldState::delete_backward)
    }

    fn edit_input(
        &self,
        key: ElementKey,
        f: impl FnOnce(&mut TextFieldState),
    ) -> Result<(), FormError> {
        let field = self.input(key)?;
        field.edit(f);
        self.dispatch_input(key, field.value());
        Ok(())
    }

    fn dispatch_input(&self, target: ElementKey, value: String) {
        // Collect first: listeners are free to use the document.
        let path: Vec<(ElementKey, Vec<InputListener>)> = {
            let inner = self.0.borrow();
            let mut path = Vec::new();
            let mut cur = Some(target);
            while let Some(k) = cur {
                let Some(el) = inner.elements.get(k) else {
                    break;
                };
                if !el.listeners.is_empty() {
                    path.push((k, el.listeners.iter().map(|(_, l)| l.clone()).collect()));
                }
                cur = el.parent;
            }
            path
        };

        for (current_target, listeners) in path {
            let event = InputEvent {
                target,
                current_target,
                value: value.clone(),
            };
            for l in listeners {
                l(&event);
            }
        }
    }

    pub fn add_input_listener(
        &self,
        key: ElementKey,
        f: impl Fn(&InputEvent) + 'static,
    ) -> Result<ListenerId, FormError> {
        let mut inner = self.0.borrow_mut();
        let id = inner.next_listener;
        let el = inner
            .elements
            .get_mut(key)
            .ok_or(FormError::DetachedElement)?;
        el.listeners.push((id, Rc::new(f)));
        inner.next_listener += 1;
        Ok(id)
    }

    /// Returns false when nothing was removed.
    pub fn remove_listener(&self, key: ElementKey, id: ListenerId) -> bool {
        let removed = {
            let mut inner = self.0.borrow_mut();
            let Some(el) = inner.elements.get_mut(key) else {
                return false;
            };
            el.listeners
                .iter()
                .position(|(lid, _)| *lid == id)
                .map(|i| el.listeners.remove(i))
        };
        removed.is_some()
    }

    pub fn listener_count(&self, key: ElementKey) -> usize {
        self.0
            .borrow()
            .elements
            .get(key)
            .map_or(0, |el| el.listeners.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_form() -> (Document, ElementKey, ElementKey, ElementKey) {
        let doc = Document::new();
        let form = doc.append_container(doc.root(), Some("form")).unwrap();
        let fieldset = doc.append_container(form, None).unwrap();
        let input = doc.append_input(fieldset, Some("qty"), "1").unwrap();
        (doc, form, fieldset, input)
    }

    #[test]
    fn test_lookup_by_id() {
        let (doc, form, _, input) = sample_form();
        assert_eq!(doc.element_by_id("form"), Some(form));
        assert_eq!(doc.element_by_id("qty"), Some(input));
        assert_eq!(doc.element_by_id("nope"), None);
        assert_eq!(doc.input_by_id("qty").unwrap().value(), "1");
    }

    #[test]
    fn test_lookup_errors() {
        let (doc, _, _, _) = sample_form();
        assert_eq!(
            doc.input_by_id("form").err(),
            Some(FormError::NotAnInput { id: "form".into() })
        );
        assert_eq!(
            doc.input_by_id("missing").err(),
            Some(FormError::MissingElement {
                id: "missing".into()
            })
        );
    }

    #[test]
    fn test_duplicate_ids_resolve_in_tree_order() {
        let doc = Document::new();
        let a = doc.append_container(doc.root(), None).unwrap();
        let first = doc.append_input(a, Some("dup"), "first").unwrap();
        doc.append_input(doc.root(), Some("dup"), "second").unwrap();

        assert_eq!(doc.element_by_id("dup"), Some(first));
    }

    #[test]
    fn test_input_bubbles_to_ancestors() {
        let (doc, form, fieldset, input) = sample_form();
        let seen = Rc::new(RefCell::new(Vec::new()));
        for key in [input, fieldset, form, doc.root()] {
            let seen = seen.clone();
            doc.add_input_listener(key, move |e| {
                seen.borrow_mut().push((e.current_target, e.value.clone()))
            })
            .unwrap();
        }

        doc.type_text(input, "5").unwrap();

        assert_eq!(
            *seen.borrow(),
            vec![
                (input, "15".to_string()),
                (fieldset, "15".to_string()),
                (form, "15".to_string()),
                (doc.root(), "15".to_string()),
            ]
        );
    }

    #[test]
    fn test_sibling_does_not_receive_input() {
        let (doc, form, _, input) = sample_form();
        let other = doc.append_container(doc.root(), None).unwrap();
        let hits = Rc::new(RefCell::new(0));
        {
            let hits = hits.clone();
            doc.add_input_listener(other, move |_| *hits.borrow_mut() += 1)
                .unwrap();
        }

        doc.set_input_value(input, "9").unwrap();
        doc.delete_backward(input).unwrap();

        assert_eq!(*hits.borrow(), 0);
        assert_eq!(doc.input(input).unwrap().value(), "");
        assert!(doc.contains(form));
    }

    #[test]
    fn test_listener_may_use_document() {
        let (doc, form, _, input) = sample_form();
        let mirror = doc.append_input(doc.root(), Some("mirror"), "").unwrap();
        {
            let doc2 = doc.clone();
            doc.add_input_listener(form, move |e| {
                doc2.input(mirror).unwrap().set_value(&e.value);
            })
            .unwrap();
        }

        doc.type_text(input, "0").unwrap();
        assert_eq!(doc.input_by_id("mirror").unwrap().value(), "10");
    }

    #[test]
    fn test_remove_listener() {
        let (doc, form, _, _) = sample_form();
        let id = doc.add_input_listener(form, |_| {}).unwrap();
        assert_eq!(doc.listener_count(form), 1);
        assert!(doc.remove_listener(form, id));
        assert!(!doc.remove_listener(form, id));
        assert_eq!(doc.listener_count(form), 0);
    }

    #[test]
    fn test_backspace_over_backwards_selection() {
        let (doc, _, _, input) = sample_form();
        doc.set_input_value(input, "45").unwrap();
        doc.input(input).unwrap().edit(|s| s.move_cursor(-1, true));

        doc.delete_backward(input).unwrap();
        assert_eq!(doc.input(input).unwrap().value(), "4");

        doc.input(input).unwrap().edit(|s| s.move_cursor(-1, true));
        doc.type_text(input, "9").unwrap();
        assert_eq!(doc.input(input).unwrap().value(), "9");
    }

    #[test]
    fn test_remove_subtree() {
        let (doc, form, fieldset, input) = sample_form();
        doc.remove(fieldset).unwrap();

        assert!(doc.contains(form));
        assert!(!doc.contains(input));
        assert_eq!(doc.element_by_id("qty"), None);
        assert_eq!(doc.type_text(input, "1"), Err(FormError::DetachedElement));
        assert_eq!(
            doc.append_container(fieldset, None),
            Err(FormError::DetachedElement)
        );
    }
}
