//! First checkout step: payment method and delivery address.

use serde::{Deserialize, Serialize};
use web_larek_core::PaymentMethod;

use super::form::{Form, FormPatch};
use crate::component::{Component, View};
use crate::dom::{BindingError, Interaction, Node};
use crate::events::{Event, EventBroker, Payload};

const ACTIVE_CLASS: &str = "button_alt-active";

/// Payload of [`Event::PaymentSelected`]: the `name` of the clicked button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentChoice {
    pub target: String,
}

/// Partial delivery form state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryPatch {
    pub payment: Option<PaymentMethod>,
    pub address: Option<String>,
    pub form: FormPatch,
}

/// The delivery step form.
#[derive(Debug)]
pub struct DeliveryForm {
    form: Form,
    buttons: Vec<Node>,
}

impl DeliveryForm {
    /// Bind to an `order` form fragment.
    ///
    /// Clicking a payment button highlights it and emits
    /// [`Event::PaymentSelected`].
    ///
    /// # Errors
    ///
    /// Returns [`BindingError::MissingElement`] if the payment buttons or a
    /// base form node are missing.
    pub fn new(container: Node, events: EventBroker) -> Result<Self, BindingError> {
        let form = Form::new(container, events.clone())?;
        let group = form.component().container().ensure(".order__buttons")?;
        let buttons = group.query_all(".button_alt");

        let peers = buttons.clone();
        group.on(Interaction::Click, move |event| {
            let Some(name) = event.target.attr("name") else {
                return;
            };
            highlight(&peers, &name);
            match Payload::from_serialize(&PaymentChoice { target: name }) {
                Ok(payload) => {
                    events.emit(Event::PaymentSelected, payload);
                }
                Err(err) => tracing::error!(error = %err, "failed to serialize payment choice"),
            }
        });

        Ok(Self { form, buttons })
    }

    /// Name of the highlighted payment button.
    #[must_use]
    pub fn selected_payment(&self) -> Option<String> {
        self.buttons
            .iter()
            .find(|b| b.has_class(ACTIVE_CLASS))
            .and_then(|b| b.attr("name"))
    }
}

fn highlight(buttons: &[Node], name: &str) {
    for button in buttons {
        button.toggle_class(ACTIVE_CLASS, button.attr("name").as_deref() == Some(name));
    }
}

impl View for DeliveryForm {
    type Patch = DeliveryPatch;

    fn component(&self) -> &Component {
        self.form.component()
    }

    fn apply(&mut self, patch: DeliveryPatch) {
        if let Some(payment) = patch.payment {
            highlight(&self.buttons, payment.as_str());
        }
        if let Some(address) = patch.address {
            self.form.set_input("address", &address);
        }
        self.form.apply(patch.form);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::templates::Document;

    #[test]
    fn test_payment_click_highlights_and_emits() {
        let doc = Document::storefront();
        let broker = EventBroker::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = Rc::clone(&seen);
        broker.subscribe(Event::PaymentSelected, move |payload| {
            s.borrow_mut().push(payload.parse::<PaymentChoice>()?.target);
            Ok(())
        });

        let mut form = DeliveryForm::new(doc.clone_template("order").unwrap(), broker).unwrap();
        form.apply(DeliveryPatch {
            payment: Some(PaymentMethod::Card),
            ..DeliveryPatch::default()
        });
        assert_eq!(form.selected_payment().as_deref(), Some("card"));

        form.container().query("button[name=cash]").unwrap().click();
        assert_eq!(form.selected_payment().as_deref(), Some("cash"));
        assert_eq!(*seen.borrow(), ["cash"]);
    }

    #[test]
    fn test_address_and_validity() {
        let doc = Document::storefront();
        let mut form =
            DeliveryForm::new(doc.clone_template("order").unwrap(), EventBroker::new()).unwrap();

        let node = form.render(DeliveryPatch {
            address: Some("Moscow".to_string()),
            form: FormPatch {
                valid: Some(true),
                errors: Some(String::new()),
            },
            ..DeliveryPatch::default()
        });
        assert_eq!(node.query("input[name=address]").unwrap().value(), "Moscow");
        assert!(!node.query("button[type=submit]").unwrap().is_disabled());
    }
}
