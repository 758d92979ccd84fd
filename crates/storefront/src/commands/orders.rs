//! Order history handlers.

use tabled::Tabled;

use storefront_core::{Order, ResourceId, Storefront};

use crate::cli::{GlobalOpts, OrdersArgs, OrdersCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct OrderRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Placed")]
    placed: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Items")]
    items: u32,
    #[tabled(rename = "Total")]
    total: String,
}

fn order_row(o: &Order) -> OrderRow {
    OrderRow {
        id: o.id.to_string(),
        placed: placed_at(o),
        status: o.status.to_string(),
        items: o.items.iter().map(|i| i.quantity).sum(),
        total: output::money(o.total),
    }
}

fn placed_at(order: &Order) -> String {
    order
        .created_at
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default()
}

pub fn order_detail(order: &Order) -> String {
    let mut lines = vec![
        format!("Order:   {}", order.id),
        format!("Status:  {}", order.status),
    ];
    if order.created_at.is_some() {
        lines.push(format!("Placed:  {}", placed_at(order)));
    }
    if let Some(addr) = &order.shipping_address {
        lines.push(format!(
            "Ship to: {}, {} {}, {}",
            addr.address_line, addr.postal_code, addr.city, addr.country
        ));
    }
    lines.push(String::new());
    for item in &order.items {
        let name = if item.name.is_empty() {
            item.product_id.to_string()
        } else {
            item.name.clone()
        };
        lines.push(format!(
            "  {:>3} x {name}  @ {}",
            item.quantity,
            output::money(item.unit_price)
        ));
    }
    lines.push(format!("Total:   {}", output::money(order.total)));
    lines.join("\n")
}

pub async fn handle(shop: &Storefront, args: OrdersArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let page = shop.orders();

    match args.command {
        OrdersCommand::List => {
            let pb = util::spinner(global, "Loading orders...");
            let loaded = page.mount().await;
            pb.finish_and_clear();
            loaded?;

            let orders = page.orders();
            let out = output::render_list(global.output, &orders, order_row, |o| {
                o.id.to_string()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        OrdersCommand::Show { id } => {
            let order = page.detail(&ResourceId::from(id)).await?;
            let out = output::render_single(global.output, &order, order_detail, |o| {
                o.id.to_string()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
