//! Wishlist handlers.

use tabled::Tabled;

use storefront_core::{Deleted, ResourceId, Storefront, WishlistItem};

use crate::cli::{GlobalOpts, WishlistArgs, WishlistCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct WishlistRow {
    #[tabled(rename = "Product")]
    product_id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Stock")]
    stock: &'static str,
}

fn wishlist_row(item: &WishlistItem) -> WishlistRow {
    WishlistRow {
        product_id: item.product_id.to_string(),
        name: item.name.clone(),
        price: output::money(item.price),
        stock: if item.in_stock { "in stock" } else { "sold out" },
    }
}

pub async fn handle(shop: &Storefront, args: WishlistArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let page = shop.wishlist();
    let pb = util::spinner(global, "Loading wishlist...");
    let loaded = page.mount().await;
    pb.finish_and_clear();
    loaded?;

    match args.command {
        WishlistCommand::List => {
            let items = page.items();
            let out = output::render_list(global.output, &items, wishlist_row, |i| {
                i.product_id.to_string()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        WishlistCommand::Add { product_id } => {
            if page.add(&product_id).await?.is_none() && !global.quiet {
                eprintln!("Product {product_id} is already in your wishlist");
            }
            Ok(())
        }

        WishlistCommand::Remove { product_id } => {
            let id = ResourceId::from(product_id);
            if !page.contains(&id) {
                return Err(CliError::NotFound {
                    resource_type: "Wishlist item".into(),
                    identifier: id.to_string(),
                    list_command: "wishlist list".into(),
                });
            }
            let confirm = util::confirmer(global, "wishlist remove")?;
            if page.remove(&id, &confirm).await? == Deleted::Declined && !global.quiet {
                eprintln!("Cancelled");
            }
            Ok(())
        }
    }
}
