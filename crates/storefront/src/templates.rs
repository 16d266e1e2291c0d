//! The storefront document: page skeleton and `<template>` fragments.
//!
//! Views never build markup themselves. They bind to the page skeleton or to
//! a deep copy of a registered fragment obtained with
//! [`Document::clone_template`].

use std::collections::HashMap;

use crate::dom::{BindingError, Node};

/// Page root plus named fragments.
#[derive(Debug, Clone)]
pub struct Document {
    root: Node,
    templates: HashMap<String, Node>,
}

impl Document {
    /// A document with an empty `<body>` and no templates.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            root: Node::element("body"),
            templates: HashMap::new(),
        }
    }

    /// The storefront page with every fragment the views use.
    #[must_use]
    pub fn storefront() -> Self {
        let root = Node::element("body")
            .with_class("page")
            .with_child(page_wrapper())
            .with_child(modal_container());

        let mut doc = Self {
            root,
            templates: HashMap::new(),
        };
        doc.register_template("card-catalog", card_catalog());
        doc.register_template("card-preview", card_preview());
        doc.register_template("card-basket", card_basket());
        doc.register_template("basket", basket());
        doc.register_template("order", order_form());
        doc.register_template("contacts", contacts_form());
        doc.register_template("success", success());
        doc
    }

    /// The `<body>` node.
    #[must_use]
    pub fn root(&self) -> Node {
        self.root.clone()
    }

    /// First page node matching `selector`.
    ///
    /// # Errors
    ///
    /// Returns [`BindingError::MissingElement`] if nothing matches.
    pub fn ensure(&self, selector: &str) -> Result<Node, BindingError> {
        self.root.ensure(selector)
    }

    /// Register (or replace) a fragment.
    pub fn register_template(&mut self, id: &str, fragment: Node) {
        self.templates.insert(id.to_string(), fragment);
    }

    /// Deep copy of the fragment registered under `id`.
    ///
    /// # Errors
    ///
    /// Returns [`BindingError::MissingTemplate`] for unknown ids.
    pub fn clone_template(&self, id: &str) -> Result<Node, BindingError> {
        self.templates
            .get(id)
            .map(Node::deep_clone)
            .ok_or_else(|| BindingError::MissingTemplate { id: id.to_string() })
    }

    /// Serialize the page.
    #[must_use]
    pub fn to_html(&self) -> String {
        self.root.to_html()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::storefront()
    }
}

// =============================================================================
// Page skeleton
// =============================================================================

fn page_wrapper() -> Node {
    let header = Node::element("header").with_class("header").with_child(
        Node::element("div")
            .with_class("header__container")
            .with_child(
                Node::element("a")
                    .with_class("header__logo")
                    .with_attr("href", "#"),
            )
            .with_child(
                Node::element("button")
                    .with_class("header__basket")
                    .with_child(
                        Node::element("span")
                            .with_class("header__basket-counter")
                            .with_text("0"),
                    ),
            ),
    );

    Node::element("div")
        .with_class("page__wrapper")
        .with_child(header)
        .with_child(Node::element("main").with_class("gallery"))
}

fn modal_container() -> Node {
    Node::element("div")
        .with_id("modal-container")
        .with_class("modal")
        .with_child(
            Node::element("div")
                .with_class("modal__container")
                .with_child(
                    Node::element("button")
                        .with_class("modal__close")
                        .with_attr("aria-label", "закрыть"),
                )
                .with_child(Node::element("div").with_class("modal__content")),
        )
}

// =============================================================================
// Fragments
// =============================================================================

fn category_tag() -> Node {
    Node::element("span")
        .with_class("card__category")
        .with_class("card__category_soft")
}

fn card_catalog() -> Node {
    Node::element("button")
        .with_class("gallery__item")
        .with_class("card")
        .with_child(category_tag())
        .with_child(Node::element("h2").with_class("card__title"))
        .with_child(Node::element("img").with_class("card__image"))
        .with_child(Node::element("span").with_class("card__price"))
}

fn card_preview() -> Node {
    Node::element("div")
        .with_class("card")
        .with_class("card_full")
        .with_child(Node::element("img").with_class("card__image"))
        .with_child(
            Node::element("div")
                .with_class("card__column")
                .with_child(category_tag())
                .with_child(Node::element("h2").with_class("card__title"))
                .with_child(Node::element("p").with_class("card__text"))
                .with_child(
                    Node::element("div")
                        .with_class("card__row")
                        .with_child(
                            Node::element("button")
                                .with_class("button")
                                .with_class("card__button")
                                .with_text("В корзину"),
                        )
                        .with_child(Node::element("span").with_class("card__price")),
                ),
        )
}

fn card_basket() -> Node {
    Node::element("li")
        .with_class("basket__item")
        .with_class("card")
        .with_class("card_compact")
        .with_child(Node::element("span").with_class("basket__item-index"))
        .with_child(Node::element("span").with_class("card__title"))
        .with_child(Node::element("span").with_class("card__price"))
        .with_child(
            Node::element("button")
                .with_class("basket__item-delete")
                .with_class("card__button")
                .with_attr("aria-label", "удалить"),
        )
}

fn basket() -> Node {
    Node::element("div")
        .with_class("basket")
        .with_child(
            Node::element("h2")
                .with_class("modal__title")
                .with_text("Корзина"),
        )
        .with_child(Node::element("ul").with_class("basket__list"))
        .with_child(
            Node::element("div")
                .with_class("modal__actions")
                .with_child(
                    Node::element("button")
                        .with_class("button")
                        .with_class("basket__button")
                        .with_text("Оформить"),
                )
                .with_child(Node::element("span").with_class("basket__price")),
        )
}

fn text_field(label: &str, name: &str, input_type: &str) -> Node {
    Node::element("label")
        .with_class("order__field")
        .with_child(
            Node::element("span")
                .with_class("form__label")
                .with_text(label),
        )
        .with_child(
            Node::element("input")
                .with_class("form__input")
                .with_attr("name", name)
                .with_attr("type", input_type),
        )
}

fn form_actions(caption: &str) -> Node {
    let submit = Node::element("button")
        .with_class("button")
        .with_attr("type", "submit")
        .with_text(caption);
    submit.set_disabled(true);
    Node::element("div")
        .with_class("modal__actions")
        .with_child(submit)
        .with_child(Node::element("span").with_class("form__errors"))
}

fn payment_button(name: &str, caption: &str) -> Node {
    Node::element("button")
        .with_class("button")
        .with_class("button_alt")
        .with_attr("name", name)
        .with_attr("type", "button")
        .with_text(caption)
}

fn order_form() -> Node {
    Node::element("form")
        .with_class("form")
        .with_attr("name", "order")
        .with_child(
            Node::element("div")
                .with_class("order")
                .with_child(
                    Node::element("div")
                        .with_class("order__field")
                        .with_child(
                            Node::element("h2")
                                .with_class("modal__title")
                                .with_text("Способ оплаты"),
                        )
                        .with_child(
                            Node::element("div")
                                .with_class("order__buttons")
                                .with_child(payment_button("card", "Онлайн"))
                                .with_child(payment_button("cash", "При получении")),
                        ),
                )
                .with_child(text_field("Адрес доставки", "address", "text")),
        )
        .with_child(form_actions("Далее"))
}

fn contacts_form() -> Node {
    Node::element("form")
        .with_class("form")
        .with_attr("name", "contacts")
        .with_child(
            Node::element("div")
                .with_class("order")
                .with_child(text_field("Email", "email", "text"))
                .with_child(text_field("Телефон", "phone", "text")),
        )
        .with_child(form_actions("Оплатить"))
}

fn success() -> Node {
    Node::element("div")
        .with_class("order-success")
        .with_child(
            Node::element("h2")
                .with_class("order-success__title")
                .with_text("Заказ оформлен"),
        )
        .with_child(Node::element("p").with_class("order-success__description"))
        .with_child(
            Node::element("button")
                .with_class("button")
                .with_class("order-success__close")
                .with_text("За новыми покупками!"),
        )
}
