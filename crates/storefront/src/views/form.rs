//! Base form shared by both checkout steps.
//!
//! Inputs report through the broker as `<form>.<field>:change` with
//! `{ field, value }`; submitting emits `<form>:submit`. The form name is the
//! container's `name` attribute.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::component::Component;
use crate::dom::{BindingError, Interaction, Node};
use crate::events::{EventBroker, Payload};

/// Payload of a form input event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldChange {
    pub field: String,
    pub value: String,
}

/// Partial state common to every form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormPatch {
    /// Enables the submit button.
    pub valid: Option<bool>,
    /// Error text shown under the form.
    pub errors: Option<String>,
}

/// Form container with a submit button and an error line.
#[derive(Debug)]
pub struct Form {
    component: Component,
    name: String,
    submit: Node,
    errors: Node,
}

impl Form {
    /// Bind to a `<form>` container and wire its input and submit events.
    ///
    /// # Errors
    ///
    /// Returns [`BindingError::MissingElement`] if the submit button or the
    /// error line is missing.
    pub fn new(container: Node, events: EventBroker) -> Result<Self, BindingError> {
        let submit = container.ensure("button[type=submit]")?;
        let errors = container.ensure(".form__errors")?;
        let name = container.attr("name").unwrap_or_default();

        let broker = events.clone();
        let form = name.clone();
        container.on(Interaction::Input, move |event| {
            let Some(field) = event.target.attr("name") else {
                return;
            };
            let change = FieldChange {
                field,
                value: event.target.value(),
            };
            debug!(form = %form, field = %change.field, "form input");
            match Payload::from_serialize(&change) {
                Ok(payload) => {
                    broker.emit(format!("{form}.{}:change", change.field), payload);
                }
                Err(err) => tracing::error!(error = %err, "failed to serialize form input"),
            }
        });

        let broker = events.clone();
        let form = name.clone();
        container.on(Interaction::Submit, move |_| {
            broker.emit(format!("{form}:submit"), Payload::empty());
        });

        // A submit button submits its form.
        let target = container.clone();
        submit.on(Interaction::Click, move |_| target.submit());

        Ok(Self {
            component: Component::new(container, events),
            name,
            submit,
            errors,
        })
    }

    /// The form name used as event prefix.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn component(&self) -> &Component {
        &self.component
    }

    /// Set the value of the input named `field` without firing an event.
    pub fn set_input(&self, field: &str, value: &str) {
        if let Some(input) = self
            .component
            .container()
            .query(&format!("input[name={field}]"))
        {
            input.set_value(value);
        }
    }

    /// Apply the common part of a form patch.
    pub fn apply(&self, patch: FormPatch) {
        if let Some(valid) = patch.valid {
            self.component.set_disabled(Some(&self.submit), !valid);
        }
        if let Some(errors) = patch.errors {
            self.component.set_text(Some(&self.errors), &errors);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::templates::Document;

    fn record(broker: &EventBroker) -> Rc<RefCell<Vec<(String, serde_json::Value)>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = Rc::clone(&seen);
        broker.subscribe_all(move |name, payload| {
            s.borrow_mut()
                .push((name.to_string(), payload.as_value().clone()));
            Ok(())
        });
        seen
    }

    #[test]
    fn test_input_emits_named_change() {
        let doc = Document::storefront();
        let broker = EventBroker::new();
        let seen = record(&broker);
        let form = Form::new(doc.clone_template("contacts").unwrap(), broker).unwrap();
        assert_eq!(form.name(), "contacts");

        form.component()
            .container()
            .query("input[name=email]")
            .unwrap()
            .input("a@b.c");

        assert_eq!(
            *seen.borrow(),
            [(
                "contacts.email:change".to_string(),
                serde_json::json!({ "field": "email", "value": "a@b.c" })
            )]
        );
    }

    #[test]
    fn test_submit_button_respects_validity() {
        let doc = Document::storefront();
        let broker = EventBroker::new();
        let seen = record(&broker);
        let form = Form::new(doc.clone_template("order").unwrap(), broker).unwrap();
        let button = form
            .component()
            .container()
            .query("button[type=submit]")
            .unwrap();

        form.apply(FormPatch {
            valid: Some(false),
            errors: Some("Необходимо ввести адрес доставки".to_string()),
        });
        button.click();
        assert!(seen.borrow().is_empty());
        assert_eq!(
            form.component().container().query(".form__errors").unwrap().text(),
            "Необходимо ввести адрес доставки"
        );

        form.apply(FormPatch {
            valid: Some(true),
            ..FormPatch::default()
        });
        button.click();
        assert_eq!(seen.borrow()[0].0, "order:submit");
    }

    #[test]
    fn test_set_input_is_silent() {
        let doc = Document::storefront();
        let broker = EventBroker::new();
        let seen = record(&broker);
        let form = Form::new(doc.clone_template("order").unwrap(), broker).unwrap();

        form.set_input("address", "Moscow");
        let input = form.component().container().query("input[name=address]").unwrap();
        assert_eq!(input.value(), "Moscow");
        assert!(seen.borrow().is_empty());
    }
}
