//! View components.
//!
//! Each view binds the nodes it needs when constructed, failing with a
//! [`BindingError`](crate::dom::BindingError) naming the missing selector,
//! and wires user interaction to broker events or to an [`Action`].

mod basket;
mod basket_item;
mod card;
mod contacts_form;
mod delivery_form;
mod form;
mod modal;
mod page;
mod success;

pub use basket::{Basket, BasketPatch};
pub use basket_item::{BasketItem, BasketItemPatch};
pub use card::{Card, CardPatch};
pub use contacts_form::{ContactsForm, ContactsPatch};
pub use delivery_form::{DeliveryForm, DeliveryPatch, PaymentChoice};
pub use form::{FieldChange, Form, FormPatch};
pub use modal::{Modal, ModalPatch};
pub use page::{Page, PagePatch};
pub use success::{Success, SuccessPatch};

/// Callback attached to a view control.
pub type Action = Box<dyn Fn()>;
