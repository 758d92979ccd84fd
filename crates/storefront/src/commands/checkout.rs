//! Checkout handler.

use storefront_core::{PaymentMethod, ResourceId, Storefront};

use crate::cli::{CheckoutArgs, GlobalOpts, Payment};
use crate::error::CliError;
use crate::output;

use super::{orders, util};

impl From<Payment> for PaymentMethod {
    fn from(p: Payment) -> Self {
        match p {
            Payment::Card => Self::Card,
            Payment::Paypal => Self::PayPal,
            Payment::Cod => Self::CashOnDelivery,
        }
    }
}

/// Parse `PRODUCT[:QTY]`.
fn parse_item(raw: &str) -> Result<(ResourceId, u32), CliError> {
    let invalid = |reason: &str| CliError::Validation {
        field: "item".into(),
        reason: format!("'{raw}': {reason}"),
    };
    let (product, qty) = match raw.rsplit_once(':') {
        Some((product, qty)) => {
            let qty = qty
                .trim()
                .parse::<u32>()
                .map_err(|_| invalid("quantity must be a whole number"))?;
            (product, qty)
        }
        None => (raw, 1),
    };
    let product = product.trim();
    if product.is_empty() {
        return Err(invalid("missing product ID"));
    }
    if qty == 0 {
        return Err(invalid("quantity must be at least 1"));
    }
    Ok((ResourceId::from(product), qty))
}

pub async fn handle(shop: &Storefront, args: CheckoutArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let lines = args
        .items
        .iter()
        .map(|raw| parse_item(raw))
        .collect::<Result<Vec<_>, _>>()?;

    let page = shop.checkout();
    let pb = util::spinner(global, "Loading addresses...");
    let loaded = page.mount().await;
    pb.finish_and_clear();
    loaded?;

    for (product, qty) in lines {
        page.add_line(product, qty);
    }
    if let Some(address) = args.address {
        page.select_address(&ResourceId::from(address))?;
    }
    page.select_payment(args.payment.into());

    let pb = util::spinner(global, "Placing order...");
    let result = page.place_order().await;
    pb.finish_and_clear();

    let order = result?;
    let out = output::render_single(global.output, &order, orders::order_detail, |o| {
        o.id.to_string()
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn item_defaults_to_one() {
        let (id, qty) = parse_item("sku-9").unwrap();
        assert_eq!(id, ResourceId::from("sku-9"));
        assert_eq!(qty, 1);
    }

    #[test]
    fn item_with_quantity() {
        let (id, qty) = parse_item("42:3").unwrap();
        assert_eq!(id, ResourceId::from("42"));
        assert_eq!(qty, 3);
    }

    #[test]
    fn rejects_bad_items() {
        assert!(parse_item(":2").is_err());
        assert!(parse_item("p:0").is_err());
        assert!(parse_item("p:lots").is_err());
    }
}
