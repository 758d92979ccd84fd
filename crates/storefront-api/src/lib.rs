// storefront-api: Async Rust client for the storefront REST API

pub mod addresses;
pub mod auth;
pub mod client;
pub mod error;
pub mod models;
pub mod orders;
pub mod session;
pub mod transport;
pub mod users;
pub mod wishlist;

pub use client::ApiClient;
pub use error::Error;
pub use models::{
    Address, AddressInput, AuthResponse, AvatarFile, AvatarResponse, ChangePasswordRequest,
    CheckoutLine, LoginRequest, MessageResponse, Order, OrderItem, OrderStatus,
    PlaceOrderRequest, RegisterRequest, ResetPasswordRequest, ResourceId, UpdateProfileRequest,
    User, WishlistItem,
};
pub use session::{FileTokenStore, MemoryTokenStore, Navigator, TOKEN_KEY, TokenStore};
pub use transport::TransportConfig;
