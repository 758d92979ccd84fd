//! Sign-in, sign-out, registration and account recovery.

use dialoguer::Input;

use storefront_core::{
    ForgotPasswordForm, LoginForm, RegisterForm, ResetPasswordForm, Storefront,
};

use crate::cli::{ForgotPasswordArgs, GlobalOpts, LoginArgs, RegisterArgs, ResetPasswordArgs};
use crate::error::CliError;
use crate::output;

use super::{account, util};

pub async fn login(shop: &Storefront, args: LoginArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let email = match args.email {
        Some(email) => email,
        None => Input::new()
            .with_prompt("Email")
            .interact_text()
            .map_err(util::prompt_err)?,
    };
    let password = if args.password_stdin {
        util::read_secret_stdin()?
    } else {
        util::prompt_secret("Password: ")?
    };

    let form = LoginForm { email, password };
    let pb = util::spinner(global, "Signing in...");
    let result = shop.login().login(&form).await;
    pb.finish_and_clear();

    let user = result?;
    let out = output::render_single(global.output, &user, account::profile_detail, |u| {
        u.id.to_string()
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn logout(shop: &Storefront, global: &GlobalOpts) -> Result<(), CliError> {
    if !shop.is_signed_in() {
        if !global.quiet {
            eprintln!("Not signed in");
        }
        return Ok(());
    }
    shop.login().logout().await?;
    Ok(())
}

pub async fn register(
    shop: &Storefront,
    args: RegisterArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let password = util::prompt_secret("Password: ")?;
    let confirm_password = util::prompt_secret("Confirm password: ")?;

    let form = RegisterForm {
        name: args.name,
        email: args.email,
        password,
        confirm_password,
        phone: args.phone.unwrap_or_default(),
    };
    let pb = util::spinner(global, "Creating account...");
    let result = shop.register().register(&form).await;
    pb.finish_and_clear();

    let registered = result?;
    let out = output::render_single(
        global.output,
        &registered.user,
        account::profile_detail,
        |u| u.id.to_string(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn forgot_password(
    shop: &Storefront,
    args: ForgotPasswordArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let form = ForgotPasswordForm { email: args.email };
    let pb = util::spinner(global, "Requesting reset link...");
    let result = shop.recovery().forgot_password(&form).await;
    pb.finish_and_clear();
    result?;
    Ok(())
}

pub async fn reset_password(
    shop: &Storefront,
    args: ResetPasswordArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let password = util::prompt_secret("New password: ")?;
    let confirm_password = util::prompt_secret("Confirm new password: ")?;
    let form = ResetPasswordForm {
        token: args.token,
        password,
        confirm_password,
    };
    let pb = util::spinner(global, "Resetting password...");
    let result = shop.recovery().reset_password(&form).await;
    pb.finish_and_clear();
    result?;
    Ok(())
}

pub async fn verify_email(shop: &Storefront, token: &str, global: &GlobalOpts) -> Result<(), CliError> {
    let pb = util::spinner(global, "Verifying email...");
    let result = shop.recovery().verify_email(token).await;
    pb.finish_and_clear();
    result?;
    Ok(())
}

