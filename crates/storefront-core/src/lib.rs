// storefront-core: Resource services, a generic CRUD controller, and
// headless page state between storefront-api and hosts (CLI, tests).

pub mod config;
pub mod error;
pub mod notify;
pub mod pages;
pub mod resource;
pub mod services;
pub mod storefront;
pub mod validate;

#[cfg(test)]
mod testing;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use error::CoreError;
pub use notify::{Confirm, Level, Notification, NotificationLog, Notifier};
pub use resource::{
    CollectionState, CreateResource, DeleteResource, Deleted, ListResource, Resource,
    ResourceController, UpdateResource,
};
pub use storefront::Storefront;
pub use validate::{FieldErrors, MIN_PASSWORD_LEN, Validate};

pub use pages::{
    AccountPage, AddressBook, AddressDialog, AddressForm, CheckoutPage, CheckoutState,
    ForgotPasswordForm, LoginForm, LoginPage, MAX_AVATAR_BYTES, OrdersPage, PasswordForm,
    PaymentMethod, ProfileDraft, ProfilePhase, ProfileState, RecoveryPage, RegisterForm,
    RegisterPage, Registered, ResetPasswordForm, WishlistPage,
};
pub use services::{
    AddressApi, AddressService, AuthApi, AuthService, CheckoutApi, OrderApi, OrderService,
    ProfileApi, UserService, WishlistApi, WishlistDraft, WishlistService,
};

// Wire types callers need alongside the pages.
pub use storefront_api::{
    Address, AddressInput, AvatarFile, CheckoutLine, MemoryTokenStore, Navigator, Order,
    OrderStatus, ResourceId, TokenStore, User, WishlistItem,
};
