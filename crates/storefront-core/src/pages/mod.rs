// Page containers: headless state and actions for each storefront screen.

pub mod account;
pub mod address_book;
pub mod checkout;
pub mod login;
pub mod orders;
pub mod recovery;
pub mod register;
pub mod wishlist;

pub use account::{
    AccountPage, MAX_AVATAR_BYTES, PasswordForm, ProfileDraft, ProfilePhase, ProfileState,
};
pub use address_book::{AddressBook, AddressDialog, AddressForm};
pub use checkout::{CheckoutPage, CheckoutState, PaymentMethod};
pub use login::{LoginForm, LoginPage};
pub use orders::OrdersPage;
pub use recovery::{ForgotPasswordForm, RecoveryPage, ResetPasswordForm};
pub use register::{RegisterForm, RegisterPage, Registered};
pub use wishlist::WishlistPage;
