//! Presenter: interprets broker events, mutates the session state and
//! re-renders views.
//!
//! # Flow
//!
//! ```text
//! user interaction -> view emits intent -> presenter mutates AppState
//!                  -> entity posts change -> presenter re-renders views
//! ```
//!
//! Handlers hold a weak reference to the presenter so the broker never keeps
//! it alive. State is borrowed only for the duration of a mutation; entity
//! notifications are queued and delivered once the borrow is released.
//!
//! Network work is not performed here. Submitting the contacts step queues a
//! [`Command::SubmitOrder`]; the async driver executes it and reports back
//! with [`Presenter::order_placed`] or [`Presenter::order_failed`].

use std::cell::{Ref, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use serde::Deserialize;
use tracing::{debug, error, info, warn};
use web_larek_core::{ItemId, LotItem, OrderRequest, OrderResult};

use crate::component::View;
use crate::dom::Node;
use crate::error::{AppError, Result};
use crate::events::{Event, EventBroker, Payload};
use crate::larek::{LarekClient, LarekError};
use crate::models::{
    AppState, BasketChange, CatalogChange, FormErrors, OrderField, ShopItem, ShopItemSnapshot,
};
use crate::templates::Document;
use crate::views::{
    Action, Basket, BasketItem, BasketItemPatch, BasketPatch, Card, CardPatch, ContactsForm,
    ContactsPatch, DeliveryForm, DeliveryPatch, FieldChange, FormPatch, Modal, ModalPatch, Page,
    PagePatch, PaymentChoice, Success, SuccessPatch,
};

const BUY_CAPTION: &str = "В корзину";
const REMOVE_CAPTION: &str = "Убрать из корзины";
const UNAVAILABLE_CAPTION: &str = "Недоступно";

/// Work the presenter cannot do synchronously.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `POST /order` with this body.
    SubmitOrder(OrderRequest),
}

/// Payload of [`Event::OpenItem`].
#[derive(Debug, Deserialize)]
struct ItemRef {
    id: ItemId,
}

/// The storefront presenter.
///
/// Cheaply cloneable; clones share the same state and views.
#[derive(Clone)]
pub struct Presenter {
    inner: Rc<PresenterInner>,
}

struct PresenterInner {
    events: EventBroker,
    document: Document,
    state: RefCell<AppState>,
    page: RefCell<Page>,
    modal: RefCell<Modal>,
    basket: RefCell<Basket>,
    delivery: RefCell<DeliveryForm>,
    contacts: RefCell<ContactsForm>,
    success: RefCell<Success>,
    preview: RefCell<Option<(ItemId, Card)>>,
    commands: RefCell<VecDeque<Command>>,
    placed: RefCell<Option<OrderResult>>,
}

impl std::fmt::Debug for Presenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Presenter")
            .field("events", &self.inner.events)
            .field("commands", &self.inner.commands.borrow().len())
            .finish_non_exhaustive()
    }
}

impl Presenter {
    /// Bind every view to `document` and subscribe to the broker.
    ///
    /// # Errors
    ///
    /// Returns a binding error if the document lacks a node or template a
    /// view needs.
    pub fn new(document: Document, events: EventBroker) -> Result<Self> {
        let page = Page::new(document.root(), events.clone())?;
        let modal = Modal::new(document.ensure("#modal-container")?, events.clone())?;
        let basket = Basket::new(document.clone_template("basket")?, events.clone())?;
        let delivery = DeliveryForm::new(document.clone_template("order")?, events.clone())?;
        let contacts = ContactsForm::new(document.clone_template("contacts")?, events.clone())?;
        let closer = modal.clone();
        let success = Success::new(
            document.clone_template("success")?,
            events.clone(),
            Box::new(move || closer.dismiss()),
        )?;

        let inner = Rc::new(PresenterInner {
            state: RefCell::new(AppState::new(events.clone())),
            events,
            document,
            page: RefCell::new(page),
            modal: RefCell::new(modal),
            basket: RefCell::new(basket),
            delivery: RefCell::new(delivery),
            contacts: RefCell::new(contacts),
            success: RefCell::new(success),
            preview: RefCell::new(None),
            commands: RefCell::new(VecDeque::new()),
            placed: RefCell::new(None),
        });
        wire(&inner);
        Ok(Self { inner })
    }

    /// The broker the presenter listens on.
    #[must_use]
    pub fn events(&self) -> &EventBroker {
        &self.inner.events
    }

    /// The document the views render into.
    #[must_use]
    pub fn document(&self) -> &Document {
        &self.inner.document
    }

    /// Read access to the session state.
    #[must_use]
    pub fn state(&self) -> Ref<'_, AppState> {
        self.inner.state.borrow()
    }

    /// Replace the catalog with a freshly fetched one.
    ///
    /// A checkout in progress is abandoned: its queued submission is dropped
    /// and the modal closed.
    pub fn load_catalog(&self, items: Vec<LotItem>) {
        let abandoned = {
            let mut state = self.inner.state.borrow_mut();
            let abandoned = state.checkout_in_progress();
            state.set_catalog(items);
            abandoned
        };
        self.inner.events.flush();
        if abandoned {
            let dropped = self.inner.commands.borrow_mut().drain(..).count();
            warn!(dropped, "checkout abandoned by catalog reload");
            self.inner.modal.borrow().dismiss();
        }
    }

    /// Drain the queued commands.
    pub fn take_commands(&self) -> Vec<Command> {
        self.inner.commands.borrow_mut().drain(..).collect()
    }

    /// Run every queued command against the service and report the outcome
    /// back into the session. Returns the number of commands executed.
    ///
    /// # Errors
    ///
    /// Returns an error only if a confirmation cannot be applied; rejected
    /// orders are shown on the contacts form instead.
    #[allow(clippy::future_not_send)]
    pub async fn execute(&self, client: &LarekClient) -> Result<usize> {
        let commands = self.take_commands();
        for command in &commands {
            match command {
                Command::SubmitOrder(request) => match client.post_order(request).await {
                    Ok(result) => self.order_placed(result)?,
                    Err(LarekError::Api { message, .. }) => self.order_failed(&message),
                    Err(err) => self.order_failed(&err.to_string()),
                },
            }
        }
        Ok(commands.len())
    }

    /// Report a successful order placement.
    ///
    /// Finishes the order, empties the basket and shows the confirmation.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NoActiveOrder`] if no checkout is in progress.
    pub fn order_placed(&self, result: OrderResult) -> Result<()> {
        info!(order_id = %result.id, total = %result.total, "order confirmed");
        *self.inner.placed.borrow_mut() = Some(result);
        {
            let mut state = self.inner.state.borrow_mut();
            state.order_mut()?.post_order();
            state.clear_basket();
        }
        self.inner.events.flush();
        Ok(())
    }

    /// Report a failed order placement. The order and basket are kept so the
    /// user can retry.
    pub fn order_failed(&self, message: &str) {
        warn!(error = %message, "order rejected");
        self.inner.contacts.borrow_mut().apply(ContactsPatch {
            form: FormPatch {
                valid: Some(true),
                errors: Some(message.to_string()),
            },
            ..ContactsPatch::default()
        });
        self.inner.events.flush();
    }
}

// =============================================================================
// Wiring
// =============================================================================

fn bind<F>(this: &Rc<PresenterInner>, event: Event, handler: F)
where
    F: Fn(&Rc<PresenterInner>, &Payload) -> Result<()> + 'static,
{
    let weak = Rc::downgrade(this);
    this.events.subscribe(event, move |payload| match weak.upgrade() {
        Some(inner) => handler(&inner, payload),
        None => Ok(()),
    });
}

fn bind_matching<M, F>(this: &Rc<PresenterInner>, matcher: M, handler: F)
where
    M: Fn(&str) -> bool + 'static,
    F: Fn(&Rc<PresenterInner>, &Payload) -> Result<()> + 'static,
{
    let weak = Rc::downgrade(this);
    this.events
        .subscribe_matching(matcher, move |payload| match weak.upgrade() {
            Some(inner) => handler(&inner, payload),
            None => Ok(()),
        });
}

/// Whether `name` is an input event of a checkout form.
fn is_form_input(name: &str) -> bool {
    name.ends_with(":change") && (name.starts_with("order.") || name.starts_with("contacts."))
}

fn wire(this: &Rc<PresenterInner>) {
    bind(this, Event::CatalogChanged, |p, payload| {
        p.render_catalog(&payload.parse()?)
    });
    bind(this, Event::OpenItem, |p, payload| {
        let item: ItemRef = payload.parse()?;
        p.state.borrow_mut().set_preview(&item.id)
    });
    bind(this, Event::PreviewChanged, |p, payload| {
        p.show_preview(payload.parse()?)
    });
    bind(this, Event::BasketItemChanged, |p, payload| {
        p.basket_changed(&payload.parse()?)
    });
    bind(this, Event::OpenBasket, |p, _| p.open_basket());
    bind(this, Event::OpenDeliveryStep, |p, _| p.open_delivery());
    bind(this, Event::PaymentSelected, |p, payload| {
        let choice: PaymentChoice = payload.parse()?;
        p.state
            .borrow_mut()
            .order_mut()?
            .set_field(OrderField::Payment, &choice.target)?;
        Ok(())
    });
    bind_matching(this, is_form_input, |p, payload| {
        let change: FieldChange = payload.parse()?;
        let field: OrderField = change.field.parse()?;
        p.state
            .borrow_mut()
            .order_mut()?
            .set_field(field, &change.value)?;
        Ok(())
    });
    bind(this, Event::FormErrorsChanged, |p, payload| {
        p.show_errors(&payload.parse()?);
        Ok(())
    });
    bind(this, Event::SubmitDeliveryStep, |p, _| {
        p.events.emit(Event::OpenContactsStep, Payload::empty());
        Ok(())
    });
    bind(this, Event::OpenContactsStep, |p, _| p.open_contacts());
    bind(this, Event::SubmitContactsStep, |p, _| p.submit_order());
    bind(this, Event::OrderPlaced, |p, _| {
        p.show_success();
        Ok(())
    });
    bind(this, Event::ModalOpened, |p, _| {
        p.page.borrow_mut().apply(PagePatch {
            locked: Some(true),
            ..PagePatch::default()
        });
        Ok(())
    });
    bind(this, Event::ModalClosed, |p, _| {
        p.page.borrow_mut().apply(PagePatch {
            locked: Some(false),
            ..PagePatch::default()
        });
        p.preview.borrow_mut().take();
        p.state.borrow_mut().clear_preview();
        Ok(())
    });
}

// =============================================================================
// Handlers
// =============================================================================

impl PresenterInner {
    fn render_catalog(&self, change: &CatalogChange) -> Result<()> {
        let cards = change
            .catalog
            .iter()
            .map(|item| self.catalog_card(item))
            .collect::<Result<Vec<_>>>()?;
        let counter = change.catalog.iter().filter(|i| i.is_ordered).count();
        debug!(cards = cards.len(), "rendering gallery");
        self.page.borrow_mut().apply(PagePatch {
            counter: Some(counter),
            gallery: Some(cards),
            locked: None,
        });
        Ok(())
    }

    fn catalog_card(&self, item: &ShopItemSnapshot) -> Result<Node> {
        let open = self.events.trigger(
            Event::OpenItem.as_str(),
            Payload::from(serde_json::json!({ "id": item.id })),
        );
        let mut card = Card::new(
            "card",
            self.document.clone_template("card-catalog")?,
            self.events.clone(),
            Some(Box::new(move || open(Payload::empty()))),
        )?;
        Ok(card.render(CardPatch {
            id: Some(item.id.clone()),
            category: Some(item.category),
            title: Some(item.title.clone()),
            image: Some(item.image.clone()),
            description: None,
            price: Some(item.price),
            button: None,
        }))
    }

    fn show_preview(self: &Rc<Self>, item: ShopItemSnapshot) -> Result<()> {
        let weak = Rc::downgrade(self);
        let id = item.id.clone();
        let toggle: Action = Box::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.toggle_basket(&id);
            }
        });
        let mut card = Card::new(
            "card",
            self.document.clone_template("card-preview")?,
            self.events.clone(),
            Some(toggle),
        )?;
        let node = card.render(CardPatch {
            id: Some(item.id.clone()),
            category: Some(item.category),
            title: Some(item.title.clone()),
            image: Some(item.image.clone()),
            description: Some(item.description.clone()),
            price: Some(item.price),
            button: Some(button_caption(item.price.is_some(), item.is_ordered).to_string()),
        });
        *self.preview.borrow_mut() = Some((item.id, card));
        self.modal.borrow_mut().render(ModalPatch {
            content: Some(node),
        });
        Ok(())
    }

    /// Preview button: put the item in the basket or take it out.
    fn toggle_basket(&self, id: &ItemId) {
        let result = {
            let mut state = self.state.borrow_mut();
            if state.is_in_basket(id) {
                state.remove_from_basket(id)
            } else {
                state.place_in_basket(id)
            }
        };
        if let Err(err) = result {
            error!(error = %err, "failed to toggle basket membership");
        }
        self.events.flush();
    }

    fn basket_changed(self: &Rc<Self>, change: &BasketChange) -> Result<()> {
        let count = self.state.borrow().basket_len();
        self.page.borrow_mut().apply(PagePatch {
            counter: Some(count),
            ..PagePatch::default()
        });
        self.render_basket()?;

        if let Some((id, card)) = self.preview.borrow_mut().as_mut()
            && *id == change.id
        {
            let for_sale = self.state.borrow().item(id).is_some_and(ShopItem::is_for_sale);
            card.apply(CardPatch {
                button: Some(button_caption(for_sale, change.is_ordered).to_string()),
                ..CardPatch::default()
            });
        }
        Ok(())
    }

    fn render_basket(self: &Rc<Self>) -> Result<Node> {
        let (rows, total) = {
            let state = self.state.borrow();
            let rows = state
                .basket()
                .enumerate()
                .map(|(index, item)| self.basket_row(index, item))
                .collect::<Result<Vec<_>>>()?;
            (rows, state.total_amount())
        };
        Ok(self.basket.borrow_mut().render(BasketPatch {
            items: Some(rows),
            total: Some(total),
        }))
    }

    fn basket_row(self: &Rc<Self>, index: usize, item: &ShopItem) -> Result<Node> {
        let weak = Rc::downgrade(self);
        let id = item.id().clone();
        let mut row = BasketItem::new(
            self.document.clone_template("card-basket")?,
            self.events.clone(),
            Box::new(move || {
                let Some(inner) = weak.upgrade() else { return };
                let removed = inner.state.borrow_mut().remove_from_basket(&id);
                if let Err(err) = removed {
                    error!(error = %err, "failed to remove basket item");
                }
                inner.events.flush();
            }),
        )?;
        Ok(row.render(BasketItemPatch {
            index: Some(index),
            title: Some(item.title().to_string()),
            price: Some(item.price()),
        }))
    }

    fn open_basket(self: &Rc<Self>) -> Result<()> {
        let node = self.render_basket()?;
        self.modal.borrow_mut().render(ModalPatch {
            content: Some(node),
        });
        Ok(())
    }

    fn open_delivery(&self) -> Result<()> {
        let payment = self.state.borrow_mut().init_order().payment();
        info!("checkout started");
        let node = self.delivery.borrow_mut().render(DeliveryPatch {
            payment,
            address: Some(String::new()),
            form: FormPatch {
                valid: Some(false),
                errors: Some(String::new()),
            },
        });
        self.modal.borrow_mut().render(ModalPatch {
            content: Some(node),
        });
        Ok(())
    }

    fn show_errors(&self, errors: &FormErrors) {
        self.delivery.borrow_mut().apply(DeliveryPatch {
            form: FormPatch {
                valid: Some(errors.is_valid(&OrderField::DELIVERY)),
                errors: Some(errors.summary(&OrderField::DELIVERY)),
            },
            ..DeliveryPatch::default()
        });
        self.contacts.borrow_mut().apply(ContactsPatch {
            form: FormPatch {
                valid: Some(errors.is_valid(&OrderField::CONTACTS)),
                errors: Some(errors.summary(&OrderField::CONTACTS)),
            },
            ..ContactsPatch::default()
        });
    }

    fn open_contacts(&self) -> Result<()> {
        let (email, phone) = {
            let state = self.state.borrow();
            let order = state.order().ok_or(AppError::NoActiveOrder)?;
            (order.email().to_string(), order.phone().to_string())
        };
        let valid = !email.is_empty() && !phone.is_empty();
        let node = self.contacts.borrow_mut().render(ContactsPatch {
            email: Some(email),
            phone: Some(phone),
            form: FormPatch {
                valid: Some(valid),
                errors: Some(String::new()),
            },
        });
        self.modal.borrow_mut().render(ModalPatch {
            content: Some(node),
        });
        Ok(())
    }

    fn submit_order(&self) -> Result<()> {
        if self
            .commands
            .borrow()
            .iter()
            .any(|command| matches!(command, Command::SubmitOrder(_)))
        {
            return Err(AppError::SubmissionPending);
        }
        let request = self.state.borrow().order_request()?;
        info!(items = request.items.len(), total = %request.total, "order ready for submission");
        self.commands
            .borrow_mut()
            .push_back(Command::SubmitOrder(request));
        // Re-enabled by `order_failed`.
        self.contacts.borrow_mut().apply(ContactsPatch {
            form: FormPatch {
                valid: Some(false),
                errors: None,
            },
            ..ContactsPatch::default()
        });
        Ok(())
    }

    fn show_success(&self) {
        let total = self.placed.borrow().as_ref().map(|r| r.total);
        let node = self.success.borrow_mut().render(SuccessPatch { total });
        self.modal.borrow_mut().render(ModalPatch {
            content: Some(node),
        });
    }
}

const fn button_caption(for_sale: bool, in_basket: bool) -> &'static str {
    match (for_sale, in_basket) {
        (false, _) => UNAVAILABLE_CAPTION,
        (true, true) => REMOVE_CAPTION,
        (true, false) => BUY_CAPTION,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use web_larek_core::{Category, OrderId, PaymentMethod, Price};

    use super::*;

    fn lot(id: &str, price: Option<u64>) -> LotItem {
        LotItem {
            id: ItemId::new(id),
            title: format!("Item {id}"),
            description: format!("About {id}"),
            image: format!("https://cdn.test/{id}.svg"),
            category: Category::SoftSkill,
            price: price.map(Price::from_units),
        }
    }

    fn presenter() -> Presenter {
        let presenter = Presenter::new(Document::storefront(), EventBroker::new()).unwrap();
        presenter.load_catalog(vec![lot("a", Some(750)), lot("b", Some(1450)), lot("c", None)]);
        presenter
    }

    fn find(p: &Presenter, selector: &str) -> Node {
        p.document().ensure(selector).unwrap()
    }

    #[test]
    fn test_catalog_renders_gallery() {
        let p = presenter();
        let gallery = find(&p, ".gallery");
        assert_eq!(gallery.children().len(), 3);
        assert_eq!(find(&p, ".header__basket-counter").text(), "0");
    }

    #[test]
    fn test_card_click_opens_preview_and_locks_page() {
        let p = presenter();
        find(&p, "[data-id=b]").click();

        assert_eq!(p.state().preview().unwrap().id().as_str(), "b");
        assert_eq!(find(&p, ".modal__content .card__title").text(), "Item b");
        assert!(find(&p, "#modal-container").has_class("modal_active"));
        assert!(find(&p, ".page__wrapper").has_class("page__wrapper_locked"));
    }

    #[test]
    fn test_preview_button_toggles_basket() {
        let p = presenter();
        find(&p, "[data-id=a]").click();
        let button = find(&p, ".card_full .card__button");
        assert_eq!(button.text(), BUY_CAPTION);

        button.click();
        assert!(p.state().is_in_basket(&ItemId::new("a")));
        assert_eq!(find(&p, ".header__basket-counter").text(), "1");
        assert_eq!(button.text(), REMOVE_CAPTION);

        button.click();
        assert!(!p.state().is_in_basket(&ItemId::new("a")));
        assert_eq!(button.text(), BUY_CAPTION);
    }

    #[test]
    fn test_priceless_preview_cannot_be_bought() {
        let p = presenter();
        find(&p, "[data-id=c]").click();
        let button = find(&p, ".card_full .card__button");
        assert!(button.is_disabled());
        assert_eq!(button.text(), UNAVAILABLE_CAPTION);
        button.click();
        assert_eq!(p.state().basket_len(), 0);
    }

    #[test]
    fn test_closing_modal_unlocks_and_clears_preview() {
        let p = presenter();
        find(&p, "[data-id=a]").click();
        find(&p, ".modal__close").click();

        assert!(p.state().preview().is_none());
        assert!(!find(&p, ".page__wrapper").has_class("page__wrapper_locked"));
        assert!(find(&p, ".modal__content").children().is_empty());
    }

    #[test]
    fn test_basket_row_delete() {
        let p = presenter();
        {
            let mut state = p.inner.state.borrow_mut();
            state.place_in_basket(&ItemId::new("a")).unwrap();
            state.place_in_basket(&ItemId::new("b")).unwrap();
        }
        p.events().flush();

        find(&p, ".header__basket").click();
        assert_eq!(find(&p, ".basket__price").text(), "2200 synapses");
        let rows = find(&p, ".basket__list").children();
        assert_eq!(rows.len(), 2);

        rows[0].query(".card__button").unwrap().click();
        assert_eq!(p.state().basket_ids(), [ItemId::new("b")]);
        assert_eq!(find(&p, ".basket__list").children().len(), 1);
        assert_eq!(find(&p, ".basket__price").text(), "1450 synapses");
        assert_eq!(find(&p, ".header__basket-counter").text(), "1");
    }

    /// Put `a` in the basket and fill both checkout steps, leaving the
    /// contacts form ready to submit.
    fn fill_checkout(p: &Presenter) {
        find(p, "[data-id=a]").click();
        find(p, ".card_full .card__button").click();
        find(p, ".header__basket").click();
        find(p, ".basket__button").click();
        find(p, ".modal__content input[name=address]").input("Moscow");
        find(p, ".modal__content button[type=submit]").click();
        find(p, ".modal__content input[name=email]").input("user@example.com");
        find(p, ".modal__content input[name=phone]").input("+7 900 000-00-00");
    }

    #[test]
    fn test_second_submit_is_refused_while_pending() {
        let p = presenter();
        fill_checkout(&p);
        let submit = find(&p, ".modal__content button[type=submit]");
        submit.click();
        assert!(submit.is_disabled());
        submit.click();

        let summary = p.events().emit(Event::SubmitContactsStep, Payload::empty());
        assert_eq!(summary.failures, 1);
        assert_eq!(p.take_commands().len(), 1);
    }

    #[test]
    fn test_catalog_reload_abandons_checkout() {
        let p = presenter();
        fill_checkout(&p);
        p.load_catalog(vec![lot("a", Some(750)), lot("b", Some(1450))]);

        assert!(!find(&p, "#modal-container").has_class("modal_active"));
        assert!(p.state().order().is_none());
        assert_eq!(find(&p, ".header__basket-counter").text(), "0");

        let summary = p.events().emit(Event::SubmitContactsStep, Payload::empty());
        assert_eq!(summary.failures, 1);
        assert!(p.take_commands().is_empty());
    }

    #[test]
    fn test_catalog_reload_drops_queued_submission() {
        let p = presenter();
        fill_checkout(&p);
        find(&p, ".modal__content button[type=submit]").click();
        p.load_catalog(vec![lot("a", Some(750))]);
        assert!(p.take_commands().is_empty());
    }

    fn offline_client() -> LarekClient {
        let config = crate::StorefrontConfig::for_origin("http://127.0.0.1:9").unwrap();
        LarekClient::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_execute_without_commands_does_nothing() {
        let p = presenter();
        assert_eq!(p.execute(&offline_client()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_execute_reports_unreachable_service_on_form() {
        let p = presenter();
        fill_checkout(&p);
        let submit = find(&p, ".modal__content button[type=submit]");
        submit.click();

        assert_eq!(p.execute(&offline_client()).await.unwrap(), 1);
        assert_eq!(p.state().basket_len(), 1);
        assert!(!find(&p, ".modal__content .form__errors").text().is_empty());
        assert!(!submit.is_disabled());
        assert!(p.take_commands().is_empty());
    }

    #[test]
    fn test_full_checkout_queues_submission() {
        let p = presenter();
        find(&p, "[data-id=a]").click();
        find(&p, ".card_full .card__button").click();
        find(&p, ".header__basket").click();
        find(&p, ".basket__button").click();

        let next = find(&p, ".modal__content button[type=submit]");
        assert!(next.is_disabled());
        find(&p, ".modal__content button[name=cash]").click();
        find(&p, ".modal__content input[name=address]").input("Moscow");
        assert!(!next.is_disabled());
        next.click();

        find(&p, ".modal__content input[name=email]").input("USER@EXAMPLE.COM");
        assert_eq!(
            find(&p, ".modal__content .form__errors").text(),
            "Необходимо ввести телефон"
        );
        find(&p, ".modal__content input[name=phone]").input("+7 900 000-00-00");
        find(&p, ".modal__content button[type=submit]").click();

        let commands = p.take_commands();
        let [Command::SubmitOrder(request)] = commands.as_slice() else {
            panic!("expected one submission, got {commands:?}");
        };
        assert_eq!(request.payment, PaymentMethod::Cash);
        assert_eq!(request.email, "user@example.com");
        assert_eq!(request.items, [ItemId::new("a")]);
        assert_eq!(request.total, Price::from_units(750));

        p.order_placed(OrderResult {
            id: OrderId::new("order-1"),
            total: Price::from_units(750),
        })
        .unwrap();
        assert_eq!(p.state().basket_len(), 0);
        assert_eq!(find(&p, ".header__basket-counter").text(), "0");
        assert_eq!(
            find(&p, ".order-success__description").text(),
            "Списано 750 synapses"
        );

        find(&p, ".order-success__close").click();
        assert!(!find(&p, "#modal-container").has_class("modal_active"));
    }

    #[test]
    fn test_failed_order_keeps_basket() {
        let p = presenter();
        p.inner
            .state
            .borrow_mut()
            .place_in_basket(&ItemId::new("a"))
            .unwrap();
        p.events().emit(Event::OpenDeliveryStep, Payload::empty());
        p.events().emit(Event::OpenContactsStep, Payload::empty());

        p.order_failed("Неверная сумма заказа");
        assert_eq!(p.state().basket_len(), 1);
        assert_eq!(
            find(&p, ".modal__content .form__errors").text(),
            "Неверная сумма заказа"
        );
    }

    #[test]
    fn test_order_placed_without_checkout_is_an_error() {
        let p = presenter();
        let result = p.order_placed(OrderResult {
            id: OrderId::new("x"),
            total: Price::ZERO,
        });
        assert!(matches!(result, Err(AppError::NoActiveOrder)));
    }

    #[test]
    fn test_submitting_incomplete_order_is_logged_not_queued() {
        let p = presenter();
        p.events().emit(Event::OpenDeliveryStep, Payload::empty());
        let summary = p.events().emit(Event::SubmitContactsStep, Payload::empty());
        assert_eq!(summary.failures, 1);
        assert!(p.take_commands().is_empty());
    }

    #[test]
    fn test_form_input_matcher() {
        assert!(is_form_input("order.address:change"));
        assert!(is_form_input("contacts.phone:change"));
        assert!(!is_form_input("payment:changed"));
        assert!(!is_form_input("lot:changed"));
    }
}
