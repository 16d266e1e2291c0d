//! Scripted user driving a rendered storefront.
//!
//! A [`Shopper`] only touches the document: it clicks and types on nodes the
//! way a person would, and reads back what is displayed. The CLI and the
//! integration tests use it to run whole sessions headlessly.

use web_larek_core::{ItemId, PaymentMethod};

use crate::dom::{BindingError, Node};
use crate::error::Result;
use crate::templates::Document;

/// Headless user of a [`Document`].
#[derive(Debug, Clone)]
pub struct Shopper {
    document: Document,
}

impl Shopper {
    #[must_use]
    pub const fn new(document: Document) -> Self {
        Self { document }
    }

    fn find(&self, selector: &str) -> Result<Node> {
        Ok(self.document.ensure(selector)?)
    }

    fn in_modal(&self, selector: &str) -> Result<Node> {
        self.find(&format!(".modal__content {selector}"))
    }

    // -------------------------------------------------------------------------
    // Catalog
    // -------------------------------------------------------------------------

    /// Ids of the gallery cards, in display order.
    #[must_use]
    pub fn gallery_ids(&self) -> Vec<ItemId> {
        self.document
            .root()
            .query_all(".gallery .card")
            .iter()
            .filter_map(|card| card.attr("data-id"))
            .map(ItemId::new)
            .collect()
    }

    /// Click a gallery card.
    ///
    /// # Errors
    ///
    /// Returns a binding error if no card shows `id`.
    pub fn open_item(&self, id: &ItemId) -> Result<()> {
        self.find(&format!(".gallery [data-id={id}]"))?.click();
        Ok(())
    }

    /// Click the buy / remove button of the open preview.
    ///
    /// # Errors
    ///
    /// Returns a binding error if no preview is open.
    pub fn toggle_preview_item(&self) -> Result<()> {
        self.in_modal(".card__button")?.click();
        Ok(())
    }

    /// Open an item and put it in the basket, then close the preview.
    ///
    /// # Errors
    ///
    /// Returns a binding error if the item is not displayed.
    pub fn buy(&self, id: &ItemId) -> Result<()> {
        self.open_item(id)?;
        self.toggle_preview_item()?;
        self.close_modal()
    }

    /// Caption of the preview button.
    ///
    /// # Errors
    ///
    /// Returns a binding error if no preview is open.
    pub fn preview_button_text(&self) -> Result<String> {
        Ok(self.in_modal(".card__button")?.text())
    }

    // -------------------------------------------------------------------------
    // Basket
    // -------------------------------------------------------------------------

    /// Click the header basket button.
    ///
    /// # Errors
    ///
    /// Returns a binding error if the page lacks the button.
    pub fn open_basket(&self) -> Result<()> {
        self.find(".header__basket")?.click();
        Ok(())
    }

    /// Basket counter shown in the header.
    ///
    /// # Errors
    ///
    /// Returns a binding error if the page lacks the counter.
    pub fn basket_counter(&self) -> Result<String> {
        Ok(self.find(".header__basket-counter")?.text())
    }

    /// Titles listed in the open basket.
    #[must_use]
    pub fn basket_titles(&self) -> Vec<String> {
        self.document
            .root()
            .query_all(".basket__list .card__title")
            .iter()
            .map(Node::text)
            .collect()
    }

    /// Total shown in the open basket.
    ///
    /// # Errors
    ///
    /// Returns a binding error if the basket is not open.
    pub fn basket_total(&self) -> Result<String> {
        Ok(self.in_modal(".basket__price")?.text())
    }

    /// Delete the basket row at `index` (zero-based).
    ///
    /// # Errors
    ///
    /// Returns a binding error if there is no such row.
    pub fn remove_row(&self, index: usize) -> Result<()> {
        let row = self
            .document
            .root()
            .query_all(".basket__list .basket__item")
            .into_iter()
            .nth(index)
            .ok_or_else(|| BindingError::MissingElement {
                selector: format!(".basket__item:nth({index})"),
            })?;
        row.ensure(".card__button")?.click();
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Checkout
    // -------------------------------------------------------------------------

    /// Click the basket checkout button.
    ///
    /// # Errors
    ///
    /// Returns a binding error if the basket is not open.
    pub fn checkout(&self) -> Result<()> {
        self.in_modal(".basket__button")?.click();
        Ok(())
    }

    /// Pick a payment method on the delivery step.
    ///
    /// # Errors
    ///
    /// Returns a binding error if the delivery step is not shown.
    pub fn choose_payment(&self, payment: PaymentMethod) -> Result<()> {
        self.in_modal(&format!("button[name={}]", payment.as_str()))?
            .click();
        Ok(())
    }

    /// Type into the input named `field` of the shown form.
    ///
    /// # Errors
    ///
    /// Returns a binding error if the input is not shown.
    pub fn fill(&self, field: &str, value: &str) -> Result<()> {
        self.in_modal(&format!("input[name={field}]"))?.input(value);
        Ok(())
    }

    /// Whether the submit button of the shown form is enabled.
    ///
    /// # Errors
    ///
    /// Returns a binding error if no form is shown.
    pub fn can_submit(&self) -> Result<bool> {
        Ok(!self.in_modal("button[type=submit]")?.is_disabled())
    }

    /// Click the submit button of the shown form.
    ///
    /// # Errors
    ///
    /// Returns a binding error if no form is shown.
    pub fn submit(&self) -> Result<()> {
        self.in_modal("button[type=submit]")?.click();
        Ok(())
    }

    /// Error line of the shown form.
    ///
    /// # Errors
    ///
    /// Returns a binding error if no form is shown.
    pub fn form_errors(&self) -> Result<String> {
        Ok(self.in_modal(".form__errors")?.text())
    }

    /// Confirmation text after a successful order.
    ///
    /// # Errors
    ///
    /// Returns a binding error if the confirmation is not shown.
    pub fn confirmation(&self) -> Result<String> {
        Ok(self.in_modal(".order-success__description")?.text())
    }

    // -------------------------------------------------------------------------
    // Modal
    // -------------------------------------------------------------------------

    /// Whether the modal is shown.
    ///
    /// # Errors
    ///
    /// Returns a binding error if the page lacks the modal.
    pub fn modal_open(&self) -> Result<bool> {
        Ok(self.find("#modal-container")?.has_class("modal_active"))
    }

    /// Click the modal close button.
    ///
    /// # Errors
    ///
    /// Returns a binding error if the page lacks the modal.
    pub fn close_modal(&self) -> Result<()> {
        self.find(".modal__close")?.click();
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use web_larek_core::{Category, LotItem, Price};

    use super::*;
    use crate::events::EventBroker;
    use crate::presenter::Presenter;

    fn session() -> (Presenter, Shopper) {
        let presenter = Presenter::new(Document::storefront(), EventBroker::new()).unwrap();
        presenter.load_catalog(vec![
            LotItem {
                id: ItemId::new("a"),
                title: "+1 час в сутках".to_string(),
                description: String::new(),
                image: "https://cdn.test/a.svg".to_string(),
                category: Category::SoftSkill,
                price: Some(Price::from_units(750)),
            },
            LotItem {
                id: ItemId::new("b"),
                title: "HEX-леденец".to_string(),
                description: String::new(),
                image: "https://cdn.test/b.svg".to_string(),
                category: Category::Other,
                price: Some(Price::from_units(1450)),
            },
        ]);
        let shopper = Shopper::new(presenter.document().clone());
        (presenter, shopper)
    }

    #[test]
    fn test_buy_and_review_basket() {
        let (_presenter, shopper) = session();
        assert_eq!(shopper.gallery_ids(), [ItemId::new("a"), ItemId::new("b")]);

        shopper.buy(&ItemId::new("b")).unwrap();
        shopper.buy(&ItemId::new("a")).unwrap();
        assert!(!shopper.modal_open().unwrap());
        assert_eq!(shopper.basket_counter().unwrap(), "2");

        shopper.open_basket().unwrap();
        assert_eq!(shopper.basket_titles(), ["+1 час в сутках", "HEX-леденец"]);
        assert_eq!(shopper.basket_total().unwrap(), "2200 synapses");

        shopper.remove_row(0).unwrap();
        assert_eq!(shopper.basket_titles(), ["HEX-леденец"]);
        assert!(shopper.remove_row(5).is_err());
    }

    #[test]
    fn test_delivery_step_validation() {
        let (_presenter, shopper) = session();
        shopper.buy(&ItemId::new("a")).unwrap();
        shopper.open_basket().unwrap();
        shopper.checkout().unwrap();

        assert!(!shopper.can_submit().unwrap());
        // Payment starts out as card.
        shopper.fill("address", "").unwrap();
        assert_eq!(shopper.form_errors().unwrap(), "Необходимо ввести адрес доставки");
        shopper.choose_payment(PaymentMethod::Cash).unwrap();
        assert_eq!(shopper.form_errors().unwrap(), "Необходимо ввести адрес доставки");
        shopper.fill("address", "Moscow").unwrap();
        assert!(shopper.can_submit().unwrap());
        assert_eq!(shopper.form_errors().unwrap(), "");
    }

    #[test]
    fn test_unknown_item_is_a_binding_error() {
        let (_presenter, shopper) = session();
        assert!(shopper.open_item(&ItemId::new("zzz")).is_err());
    }
}
