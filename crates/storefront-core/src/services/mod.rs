// ── Resource services ──
//
// Thin wrappers over `ApiClient` that fold every transport error into a
// `CoreError` with an operation-specific fallback message. Pages depend on
// the traits below, never on `ApiClient` directly, so tests can swap in
// in-memory fakes.

use std::future::Future;

use storefront_api::{
    Address, AddressInput, AuthResponse, AvatarFile, ChangePasswordRequest, LoginRequest,
    Order, PlaceOrderRequest, RegisterRequest, ResetPasswordRequest, ResourceId,
    UpdateProfileRequest, User, WishlistItem,
};

use crate::error::CoreError;
use crate::resource::{CreateResource, DeleteResource, ListResource, UpdateResource};

mod addresses;
mod auth;
mod orders;
mod users;
mod wishlist;

pub use addresses::AddressService;
pub use auth::AuthService;
pub use orders::OrderService;
pub use users::UserService;
pub use wishlist::{WishlistDraft, WishlistService};

// ── Page-facing capabilities ─────────────────────────────────────────

/// Full address CRUD plus the dedicated "make default" call.
pub trait AddressApi:
    UpdateResource<Item = Address, Draft = AddressInput> + DeleteResource
{
    fn set_default(&self, id: &ResourceId) -> impl Future<Output = Result<(), CoreError>> + Send;
}

/// The signed-in user's own record.
pub trait ProfileApi: Send + Sync {
    fn me(&self) -> impl Future<Output = Result<User, CoreError>> + Send;

    fn update_profile(
        &self,
        req: &UpdateProfileRequest,
    ) -> impl Future<Output = Result<User, CoreError>> + Send;

    fn change_password(
        &self,
        req: &ChangePasswordRequest,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;

    /// Returns the new avatar reference, when the server reports one.
    fn upload_avatar(
        &self,
        file: &AvatarFile,
    ) -> impl Future<Output = Result<Option<String>, CoreError>> + Send;

    fn remove_avatar(&self) -> impl Future<Output = Result<(), CoreError>> + Send;
}

/// Session and account-recovery endpoints.
pub trait AuthApi: Send + Sync {
    fn login(
        &self,
        req: &LoginRequest,
    ) -> impl Future<Output = Result<AuthResponse, CoreError>> + Send;

    fn register(
        &self,
        req: &RegisterRequest,
    ) -> impl Future<Output = Result<AuthResponse, CoreError>> + Send;

    fn logout(&self) -> impl Future<Output = Result<(), CoreError>> + Send;

    /// Returns the server's acknowledgement text.
    fn forgot_password(&self, email: &str)
    -> impl Future<Output = Result<String, CoreError>> + Send;

    fn reset_password(
        &self,
        req: &ResetPasswordRequest,
    ) -> impl Future<Output = Result<String, CoreError>> + Send;

    fn verify_email(&self, token: &str) -> impl Future<Output = Result<String, CoreError>> + Send;
}

/// Order history.
pub trait OrderApi: ListResource<Item = Order> {
    fn get(&self, id: &ResourceId) -> impl Future<Output = Result<Order, CoreError>> + Send;
}

pub trait CheckoutApi: Send + Sync {
    fn place_order(
        &self,
        req: &PlaceOrderRequest,
    ) -> impl Future<Output = Result<Order, CoreError>> + Send;
}

/// Saved products: add by product id, remove by product id.
pub trait WishlistApi:
    CreateResource<Item = WishlistItem, Draft = WishlistDraft> + DeleteResource
{
}

impl<T> WishlistApi for T where
    T: CreateResource<Item = WishlistItem, Draft = WishlistDraft> + DeleteResource
{
}
