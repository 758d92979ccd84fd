//! Clap derive structures for the `storefront` CLI.
//!
//! Defines the command tree, global flags, and shared value enums. Kept
//! free of crate-internal imports so `build.rs` can compile it standalone.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// storefront -- manage your shop account from the terminal
#[derive(Debug, Parser)]
#[command(
    name = "storefront",
    version,
    about = "Manage a storefront account from the command line",
    long_about = "Sign in, keep your address book and profile up to date, track orders,\n\
        curate a wishlist and check out against a storefront backend.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Backend profile to use
    #[arg(long, short = 'p', env = "STOREFRONT_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Backend URL (overrides profile)
    #[arg(long, env = "STOREFRONT_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "STOREFRONT_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "STOREFRONT_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Payment {
    /// Credit or debit card
    Card,
    /// PayPal
    Paypal,
    /// Cash on delivery
    Cod,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in and store the session token
    Login(LoginArgs),

    /// Sign out and forget the session token
    Logout,

    /// Create a new account
    Register(RegisterArgs),

    /// Show the signed-in user
    #[command(alias = "me")]
    Whoami,

    /// View and edit your profile, password and photo
    #[command(alias = "acct")]
    Account(AccountArgs),

    /// Manage shipping addresses
    #[command(alias = "addr", alias = "a")]
    Addresses(AddressesArgs),

    /// Manage saved products
    #[command(alias = "wl")]
    Wishlist(WishlistArgs),

    /// View order history
    Orders(OrdersArgs),

    /// Place an order
    Checkout(CheckoutArgs),

    /// Request a password reset link
    ForgotPassword(ForgotPasswordArgs),

    /// Set a new password using a reset token
    ResetPassword(ResetPasswordArgs),

    /// Confirm an email address using a verification token
    VerifyEmail(VerifyEmailArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Session ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Account email (prompted when omitted)
    #[arg(long, short = 'e')]
    pub email: Option<String>,

    /// Read the password from stdin instead of prompting
    #[arg(long)]
    pub password_stdin: bool,
}

#[derive(Debug, Args)]
pub struct RegisterArgs {
    /// Full name
    #[arg(long)]
    pub name: String,

    /// Account email
    #[arg(long, short = 'e')]
    pub email: String,

    /// Phone number (optional)
    #[arg(long)]
    pub phone: Option<String>,
}

#[derive(Debug, Args)]
pub struct ForgotPasswordArgs {
    /// Account email
    #[arg(long, short = 'e')]
    pub email: String,
}

#[derive(Debug, Args)]
pub struct ResetPasswordArgs {
    /// Token from the reset email
    #[arg(long)]
    pub token: String,
}

#[derive(Debug, Args)]
pub struct VerifyEmailArgs {
    /// Token from the verification email
    pub token: String,
}

// ── Account ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct AccountArgs {
    #[command(subcommand)]
    pub command: AccountCommand,
}

#[derive(Debug, Subcommand)]
pub enum AccountCommand {
    /// Show profile details
    Show,

    /// Update name or phone (email cannot be changed)
    Update {
        /// First name
        #[arg(long)]
        first_name: Option<String>,

        /// Last name
        #[arg(long)]
        last_name: Option<String>,

        /// Phone number
        #[arg(long)]
        phone: Option<String>,
    },

    /// Change your password (prompts for current and new)
    Password,

    /// Manage the profile photo
    Avatar(AvatarArgs),
}

#[derive(Debug, Args)]
pub struct AvatarArgs {
    #[command(subcommand)]
    pub command: AvatarCommand,
}

#[derive(Debug, Subcommand)]
pub enum AvatarCommand {
    /// Upload an image (max 5 MiB)
    Upload {
        /// Image file
        path: PathBuf,
    },

    /// Remove the current photo
    Remove,
}

// ── Addresses ────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct AddressesArgs {
    #[command(subcommand)]
    pub command: AddressesCommand,
}

/// Address fields shared by `add` and `update`.
#[derive(Debug, Args)]
pub struct AddressFields {
    /// Street line
    #[arg(long)]
    pub line: Option<String>,

    #[arg(long)]
    pub city: Option<String>,

    /// State or region
    #[arg(long)]
    pub state: Option<String>,

    #[arg(long)]
    pub postal_code: Option<String>,

    #[arg(long)]
    pub country: Option<String>,

    /// Contact phone for delivery
    #[arg(long)]
    pub phone: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum AddressesCommand {
    /// List saved addresses
    #[command(alias = "ls")]
    List,

    /// Add an address
    Add {
        #[command(flatten)]
        fields: AddressFields,

        /// Make it the default shipping address
        #[arg(long)]
        default: bool,
    },

    /// Edit an address
    Update {
        /// Address ID
        id: String,

        #[command(flatten)]
        fields: AddressFields,
    },

    /// Delete an address
    #[command(alias = "rm")]
    Delete {
        /// Address ID
        id: String,
    },

    /// Make an address the default
    SetDefault {
        /// Address ID
        id: String,
    },
}

// ── Wishlist ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct WishlistArgs {
    #[command(subcommand)]
    pub command: WishlistCommand,
}

#[derive(Debug, Subcommand)]
pub enum WishlistCommand {
    /// List saved products
    #[command(alias = "ls")]
    List,

    /// Save a product
    Add {
        /// Product ID
        product_id: String,
    },

    /// Remove a saved product
    #[command(alias = "rm")]
    Remove {
        /// Product ID
        product_id: String,
    },
}

// ── Orders ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct OrdersArgs {
    #[command(subcommand)]
    pub command: OrdersCommand,
}

#[derive(Debug, Subcommand)]
pub enum OrdersCommand {
    /// List past orders
    #[command(alias = "ls")]
    List,

    /// Show one order in detail
    Show {
        /// Order ID
        id: String,
    },
}

#[derive(Debug, Args)]
pub struct CheckoutArgs {
    /// Cart line as PRODUCT[:QTY] (repeatable, QTY defaults to 1)
    #[arg(long = "item", short = 'i', required = true)]
    pub items: Vec<String>,

    /// Shipping address ID (defaults to your default address)
    #[arg(long)]
    pub address: Option<String>,

    /// Payment method
    #[arg(long, value_enum)]
    pub payment: Payment,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Interactive setup wizard
    Init,

    /// Display the current configuration
    Show,

    /// Set a configuration value on the active profile
    Set {
        /// Key: api_url, token_store, token_file, timeout, include_credentials
        key: String,
        /// Value
        value: String,
    },

    /// Print the config file location
    Path,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
