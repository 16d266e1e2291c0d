//! Page shell: basket counter, gallery and scroll lock.

use crate::component::{Component, View};
use crate::dom::{BindingError, Interaction, Node};
use crate::events::{Event, EventBroker, Payload};

/// Partial page state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PagePatch {
    pub counter: Option<usize>,
    pub gallery: Option<Vec<Node>>,
    pub locked: Option<bool>,
}

/// The page body.
#[derive(Debug)]
pub struct Page {
    component: Component,
    counter: Node,
    gallery: Node,
    wrapper: Node,
}

impl Page {
    /// Bind to the document body. The basket button emits [`Event::OpenBasket`].
    ///
    /// # Errors
    ///
    /// Returns [`BindingError::MissingElement`] if a page node is missing.
    pub fn new(container: Node, events: EventBroker) -> Result<Self, BindingError> {
        let counter = container.ensure(".header__basket-counter")?;
        let gallery = container.ensure(".gallery")?;
        let wrapper = container.ensure(".page__wrapper")?;
        let basket = container.ensure(".header__basket")?;

        let broker = events.clone();
        basket.on(Interaction::Click, move |_| {
            broker.emit(Event::OpenBasket, Payload::empty());
        });

        Ok(Self {
            component: Component::new(container, events),
            counter,
            gallery,
            wrapper,
        })
    }
}

impl View for Page {
    type Patch = PagePatch;

    fn component(&self) -> &Component {
        &self.component
    }

    fn apply(&mut self, patch: PagePatch) {
        if let Some(counter) = patch.counter {
            self.component.set_text(Some(&self.counter), counter);
        }
        if let Some(gallery) = patch.gallery {
            self.gallery.replace_children(&gallery);
        }
        if let Some(locked) = patch.locked {
            self.component
                .toggle_class(&self.wrapper, "page__wrapper_locked", locked);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::templates::Document;

    #[test]
    fn test_page_renders_counter_gallery_and_lock() {
        let doc = Document::storefront();
        let mut page = Page::new(doc.root(), EventBroker::new()).unwrap();

        page.apply(PagePatch {
            counter: Some(3),
            gallery: Some(vec![Node::element("button"), Node::element("button")]),
            locked: Some(true),
        });

        let root = doc.root();
        assert_eq!(root.query(".header__basket-counter").unwrap().text(), "3");
        assert_eq!(root.query(".gallery").unwrap().children().len(), 2);
        assert!(root.query(".page__wrapper").unwrap().has_class("page__wrapper_locked"));

        page.apply(PagePatch {
            locked: Some(false),
            ..PagePatch::default()
        });
        assert!(!root.query(".page__wrapper").unwrap().has_class("page__wrapper_locked"));
        assert_eq!(root.query(".header__basket-counter").unwrap().text(), "3");
    }

    #[test]
    fn test_basket_button_emits_open_basket() {
        let doc = Document::storefront();
        let broker = EventBroker::new();
        let opened = Rc::new(Cell::new(0));
        let o = Rc::clone(&opened);
        broker.subscribe(Event::OpenBasket, move |_| {
            o.set(o.get() + 1);
            Ok(())
        });

        let _page = Page::new(doc.root(), broker).unwrap();
        doc.root().query(".header__basket").unwrap().click();
        assert_eq!(opened.get(), 1);
    }
}
