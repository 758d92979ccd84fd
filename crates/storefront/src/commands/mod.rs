//! Command dispatch: bridges CLI args -> page actions -> output formatting.

pub mod account;
pub mod addresses;
pub mod auth;
pub mod checkout;
pub mod config_cmd;
pub mod orders;
pub mod util;
pub mod wishlist;

use storefront_core::Storefront;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// The storefront route a command stands in for. Auth pages are exempt
/// from the expired-session redirect.
pub fn page_path(cmd: &Command) -> &'static str {
    match cmd {
        Command::Login(_) => "/login",
        Command::Register(_) => "/register",
        Command::ForgotPassword(_) => "/forgot-password",
        Command::ResetPassword(_) => "/reset-password",
        Command::VerifyEmail(_) => "/verify-email",
        Command::Addresses(_) => "/addresses",
        Command::Wishlist(_) => "/wishlist",
        Command::Orders(_) => "/orders",
        Command::Checkout(_) => "/checkout",
        Command::Logout
        | Command::Whoami
        | Command::Account(_)
        | Command::Config(_)
        | Command::Completions(_) => "/account",
    }
}

/// Dispatch a backend-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, shop: &Storefront, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Login(args) => auth::login(shop, args, global).await,
        Command::Logout => auth::logout(shop, global).await,
        Command::Register(args) => auth::register(shop, args, global).await,
        Command::ForgotPassword(args) => auth::forgot_password(shop, args, global).await,
        Command::ResetPassword(args) => auth::reset_password(shop, args, global).await,
        Command::VerifyEmail(args) => auth::verify_email(shop, &args.token, global).await,

        Command::Whoami => {
            util::require_session(shop)?;
            account::show(shop, global).await
        }
        Command::Account(args) => {
            util::require_session(shop)?;
            account::handle(shop, args, global).await
        }
        Command::Addresses(args) => {
            util::require_session(shop)?;
            addresses::handle(shop, args, global).await
        }
        Command::Wishlist(args) => {
            util::require_session(shop)?;
            wishlist::handle(shop, args, global).await
        }
        Command::Orders(args) => {
            util::require_session(shop)?;
            orders::handle(shop, args, global).await
        }
        Command::Checkout(args) => {
            util::require_session(shop)?;
            checkout::handle(shop, args, global).await
        }

        Command::Config(_) | Command::Completions(_) => Err(CliError::Config(
            "config and completions run without a backend".into(),
        )),
    }
}
