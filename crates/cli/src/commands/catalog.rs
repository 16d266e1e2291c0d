//! Read-only catalog commands.

use tracing::info;
use web_larek_core::{ItemId, LotItem, Price};
use web_larek_storefront::{LarekClient, StorefrontConfig};

/// Print every catalog item, one per line.
///
/// # Errors
///
/// Returns an error if the catalog cannot be fetched.
pub async fn list(config: &StorefrontConfig) -> Result<(), Box<dyn std::error::Error>> {
    let client = LarekClient::new(config)?;
    let list = client.get_item_list().await?;
    info!(total = list.total, "Catalog fetched");

    for item in &list.items {
        print_line(&summary(item));
    }
    Ok(())
}

/// Print a single item with its description.
///
/// # Errors
///
/// Returns an error if the item does not exist or cannot be fetched.
pub async fn show(config: &StorefrontConfig, id: &ItemId) -> Result<(), Box<dyn std::error::Error>> {
    let client = LarekClient::new(config)?;
    let item = client.get_item(id).await?;

    print_line(&summary(&item));
    if !item.description.is_empty() {
        print_line(&item.description);
    }
    print_line(&item.image);
    Ok(())
}

fn summary(item: &LotItem) -> String {
    format!(
        "{}\t[{}]\t{}\t{}",
        item.id,
        item.category,
        item.title,
        Price::display_optional(item.price)
    )
}

#[allow(clippy::print_stdout)]
pub fn print_line(line: &str) {
    println!("{line}");
}
