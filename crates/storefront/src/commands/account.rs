//! Profile, password and avatar handlers.

use std::path::Path;

use storefront_core::{AccountPage, AvatarFile, Storefront, User};

use crate::cli::{AccountArgs, AccountCommand, AvatarCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

pub fn profile_detail(user: &User) -> String {
    let mut lines = vec![
        format!("ID:       {}", user.id),
        format!("Name:     {}", user.name),
        format!("Email:    {}", user.email),
    ];
    if !user.phone.is_empty() {
        lines.push(format!("Phone:    {}", user.phone));
    }
    lines.push(format!(
        "Verified: {}",
        if user.email_verified { "yes" } else { "no" }
    ));
    if let Some(avatar) = user.avatar.as_deref().filter(|a| !a.is_empty()) {
        lines.push(format!("Photo:    {avatar}"));
    }
    lines.join("\n")
}

fn print_user(user: &User, global: &GlobalOpts) -> Result<(), CliError> {
    let out = output::render_single(global.output, user, profile_detail, |u| u.id.to_string())?;
    output::print_output(&out, global.quiet);
    Ok(())
}

async fn mounted(shop: &Storefront, global: &GlobalOpts) -> Result<AccountPage, CliError> {
    let page = shop.account();
    let pb = util::spinner(global, "Loading profile...");
    let result = page.mount().await;
    pb.finish_and_clear();
    result?;
    Ok(page)
}

pub async fn show(shop: &Storefront, global: &GlobalOpts) -> Result<(), CliError> {
    let page = mounted(shop, global).await?;
    let user = page
        .user()
        .ok_or_else(|| CliError::Config("profile did not load".into()))?;
    print_user(&user, global)
}

pub async fn handle(shop: &Storefront, args: AccountArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        AccountCommand::Show => show(shop, global).await,

        AccountCommand::Update {
            first_name,
            last_name,
            phone,
        } => {
            if first_name.is_none() && last_name.is_none() && phone.is_none() {
                return Err(CliError::InvalidInput {
                    summary: "Nothing to update".into(),
                    details: "Pass --first-name, --last-name or --phone".into(),
                });
            }
            let page = mounted(shop, global).await?;
            page.begin_edit()?;
            page.update_draft(|draft| {
                if let Some(v) = first_name {
                    draft.first_name = v;
                }
                if let Some(v) = last_name {
                    draft.last_name = v;
                }
                if let Some(v) = phone {
                    draft.phone = v;
                }
            });
            let user = page.save().await?;
            print_user(&user, global)
        }

        AccountCommand::Password => {
            let current = util::prompt_secret("Current password: ")?;
            let new = util::prompt_secret("New password: ")?;
            let confirm = util::prompt_secret("Confirm new password: ")?;

            let page = shop.account();
            page.edit_password_form(|form| {
                form.current = current;
                form.new = new;
                form.confirm = confirm;
            });
            let pb = util::spinner(global, "Changing password...");
            let result = page.change_password().await;
            pb.finish_and_clear();
            Ok(result?)
        }

        AccountCommand::Avatar(avatar) => match avatar.command {
            AvatarCommand::Upload { path } => {
                let file = read_avatar(&path)?;
                let page = mounted(shop, global).await?;
                let pb = util::spinner(global, "Uploading photo...");
                let result = page.upload_avatar(&file).await;
                pb.finish_and_clear();
                result?;
                if let Some(user) = page.user() {
                    print_user(&user, global)?;
                }
                Ok(())
            }
            AvatarCommand::Remove => {
                let page = mounted(shop, global).await?;
                page.remove_avatar().await?;
                Ok(())
            }
        },
    }
}

fn read_avatar(path: &Path) -> Result<AvatarFile, CliError> {
    let bytes = std::fs::read(path)?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("avatar")
        .to_owned();
    Ok(AvatarFile {
        file_name,
        content_type: util::guess_content_type(path).to_owned(),
        bytes: bytes::Bytes::from(bytes),
    })
}
