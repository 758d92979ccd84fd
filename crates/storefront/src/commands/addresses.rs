//! Address book handlers.

use tabled::Tabled;

use storefront_core::{Address, AddressBook, AddressInput, Deleted, ResourceId, Storefront};

use crate::cli::{AddressFields, AddressesArgs, AddressesCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct AddressRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Default")]
    default: &'static str,
    #[tabled(rename = "Address")]
    line: String,
    #[tabled(rename = "City")]
    city: String,
    #[tabled(rename = "Postal code")]
    postal_code: String,
    #[tabled(rename = "Country")]
    country: String,
    #[tabled(rename = "Phone")]
    phone: String,
}

fn address_row(a: &Address) -> AddressRow {
    AddressRow {
        id: a.id.to_string(),
        default: if a.is_default { "★" } else { "" },
        line: a.address_line.clone(),
        city: if a.state.is_empty() {
            a.city.clone()
        } else {
            format!("{}, {}", a.city, a.state)
        },
        postal_code: a.postal_code.clone(),
        country: a.country.clone(),
        phone: a.phone.clone(),
    }
}

pub fn address_detail(a: &Address) -> String {
    let mut lines = vec![
        format!("ID:       {}", a.id),
        format!("Address:  {}", a.address_line),
        format!("City:     {}", a.city),
    ];
    if !a.state.is_empty() {
        lines.push(format!("State:    {}", a.state));
    }
    lines.push(format!("Postcode: {}", a.postal_code));
    lines.push(format!("Country:  {}", a.country));
    lines.push(format!("Phone:    {}", a.phone));
    if a.is_default {
        lines.push("Default:  yes".into());
    }
    lines.join("\n")
}

fn apply_fields(draft: &mut AddressInput, fields: AddressFields) {
    let AddressFields {
        line,
        city,
        state,
        postal_code,
        country,
        phone,
    } = fields;
    for (slot, value) in [
        (&mut draft.address_line, line),
        (&mut draft.city, city),
        (&mut draft.state, state),
        (&mut draft.postal_code, postal_code),
        (&mut draft.country, country),
        (&mut draft.phone, phone),
    ] {
        if let Some(value) = value {
            *slot = value;
        }
    }
}

fn print_address(address: &Address, global: &GlobalOpts) -> Result<(), CliError> {
    let out = output::render_single(global.output, address, address_detail, |a| {
        a.id.to_string()
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}

fn ensure_known(book: &AddressBook, id: &ResourceId) -> Result<(), CliError> {
    if book.controller().find(id).is_some() {
        return Ok(());
    }
    Err(CliError::NotFound {
        resource_type: "Address".into(),
        identifier: id.to_string(),
        list_command: "addresses list".into(),
    })
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    shop: &Storefront,
    args: AddressesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let book = shop.address_book();
    let pb = util::spinner(global, "Loading addresses...");
    let loaded = book.mount().await;
    pb.finish_and_clear();
    loaded?;

    match args.command {
        AddressesCommand::List => {
            let addresses = book.addresses();
            let out = output::render_list(
                global.output,
                &addresses,
                address_row,
                |a| a.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        AddressesCommand::Add { fields, default } => {
            book.open_new();
            book.update_draft(|draft| {
                apply_fields(draft, fields);
                if default {
                    draft.is_default = true;
                }
            });
            let saved = book.submit().await?;
            print_address(&saved, global)
        }

        AddressesCommand::Update { id, fields } => {
            let id = ResourceId::from(id);
            ensure_known(&book, &id)?;
            book.open_edit(&id)?;
            book.update_draft(|draft| apply_fields(draft, fields));
            let saved = book.submit().await?;
            print_address(&saved, global)
        }

        AddressesCommand::Delete { id } => {
            let id = ResourceId::from(id);
            ensure_known(&book, &id)?;
            let confirm = util::confirmer(global, "addresses delete")?;
            if book.delete(&id, &confirm).await? == Deleted::Declined && !global.quiet {
                eprintln!("Cancelled");
            }
            Ok(())
        }

        AddressesCommand::SetDefault { id } => {
            let id = ResourceId::from(id);
            ensure_known(&book, &id)?;
            book.set_default(&id).await?;
            Ok(())
        }
    }
}
