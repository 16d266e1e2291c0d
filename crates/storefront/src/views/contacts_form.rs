//! Second checkout step: email and phone.

use super::form::{Form, FormPatch};
use crate::component::{Component, View};
use crate::dom::{BindingError, Node};
use crate::events::EventBroker;

/// Partial contacts form state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactsPatch {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub form: FormPatch,
}

/// The contacts step form.
#[derive(Debug)]
pub struct ContactsForm {
    form: Form,
}

impl ContactsForm {
    /// Bind to a `contacts` form fragment.
    ///
    /// # Errors
    ///
    /// Returns [`BindingError::MissingElement`] if a base form node is missing.
    pub fn new(container: Node, events: EventBroker) -> Result<Self, BindingError> {
        Ok(Self {
            form: Form::new(container, events)?,
        })
    }
}

impl View for ContactsForm {
    type Patch = ContactsPatch;

    fn component(&self) -> &Component {
        self.form.component()
    }

    fn apply(&mut self, patch: ContactsPatch) {
        if let Some(email) = patch.email {
            self.form.set_input("email", &email);
        }
        if let Some(phone) = patch.phone {
            self.form.set_input("phone", &phone);
        }
        self.form.apply(patch.form);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::templates::Document;

    #[test]
    fn test_renders_fields_and_errors() {
        let doc = Document::storefront();
        let mut form =
            ContactsForm::new(doc.clone_template("contacts").unwrap(), EventBroker::new()).unwrap();

        let node = form.render(ContactsPatch {
            email: Some("user@example.com".to_string()),
            phone: Some(String::new()),
            form: FormPatch {
                valid: Some(false),
                errors: Some("Необходимо ввести телефон".to_string()),
            },
        });
        assert_eq!(node.query("input[name=email]").unwrap().value(), "user@example.com");
        assert!(node.query("button[type=submit]").unwrap().is_disabled());
        assert_eq!(node.query(".form__errors").unwrap().text(), "Необходимо ввести телефон");
    }
}
