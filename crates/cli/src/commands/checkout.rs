//! Full purchase through the storefront views.
//!
//! The session is driven exactly as a user would drive it: cards are opened
//! and bought from the gallery, the basket is reviewed, and both checkout
//! forms are filled before submitting.

use tracing::{info, warn};
use web_larek_core::{ItemId, PaymentMethod};
use web_larek_storefront::{
    Document, EventBroker, LarekClient, Presenter, Shopper, StorefrontConfig,
};

use super::catalog::print_line;

/// What to buy and where to send it.
#[derive(Debug, Clone)]
pub struct Purchase {
    pub items: Vec<ItemId>,
    pub payment: PaymentMethod,
    pub address: String,
    pub email: String,
    pub phone: String,
}

/// Run a purchase session and print the confirmation.
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded, an item cannot be
/// bought, a form stays invalid, or the service rejects the order.
#[allow(clippy::future_not_send)]
pub async fn run(
    config: &StorefrontConfig,
    purchase: &Purchase,
    html: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let client = LarekClient::new(config)?;
    let presenter = Presenter::new(Document::storefront(), EventBroker::new())?;
    let shopper = Shopper::new(presenter.document().clone());

    let catalog = client.get_item_list().await?;
    presenter.load_catalog(catalog.items);

    for id in &purchase.items {
        shopper.buy(id)?;
        if !presenter.state().is_in_basket(id) {
            warn!(item_id = %id, "Item is not for sale, skipped");
        }
    }
    if presenter.state().basket_len() == 0 {
        return Err("basket is empty".into());
    }

    shopper.open_basket()?;
    info!(total = %shopper.basket_total()?, "Basket reviewed");
    shopper.checkout()?;

    shopper.choose_payment(purchase.payment)?;
    shopper.fill("address", &purchase.address)?;
    submit_step(&shopper)?;

    shopper.fill("email", &purchase.email)?;
    shopper.fill("phone", &purchase.phone)?;
    submit_step(&shopper)?;

    presenter.execute(&client).await?;

    if html {
        print_line(&presenter.document().to_html());
    }
    match shopper.confirmation() {
        Ok(text) => {
            print_line(&text);
            Ok(())
        }
        Err(_) => Err(shopper.form_errors()?.into()),
    }
}

fn submit_step(shopper: &Shopper) -> Result<(), Box<dyn std::error::Error>> {
    if !shopper.can_submit()? {
        return Err(shopper.form_errors()?.into());
    }
    shopper.submit()?;
    Ok(())
}
