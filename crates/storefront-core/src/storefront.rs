// ── Storefront facade ──
//
// One shared `ApiClient` per process. Pages are vended from here with the
// production services wired in.

use std::sync::Arc;

use tracing::debug;

use storefront_api::{ApiClient, Navigator, TokenStore};

use crate::config::ClientConfig;
use crate::error::CoreError;
use crate::notify::Notifier;
use crate::pages::{
    AccountPage, AddressBook, CheckoutPage, LoginPage, OrdersPage, RecoveryPage, RegisterPage,
    WishlistPage,
};
use crate::services::{AddressService, AuthService, OrderService, UserService, WishlistService};

#[derive(Clone)]
pub struct Storefront {
    client: Arc<ApiClient>,
    notifier: Arc<dyn Notifier>,
}

impl Storefront {
    /// Build the HTTP client from `config`.
    ///
    /// `tokens` is where the session token lives; `navigator` (if any) is
    /// told to show the login page when a session expires.
    pub fn connect(
        config: &ClientConfig,
        tokens: Arc<dyn TokenStore>,
        navigator: Option<Arc<dyn Navigator>>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, CoreError> {
        let base_url = config.url()?;
        debug!(%base_url, "building storefront client");
        let client = ApiClient::new(base_url, &config.transport(), tokens, navigator)
            .map_err(|e| CoreError::normalize(e, "Could not create the HTTP client"))?;
        Ok(Self::with_client(Arc::new(client), notifier))
    }

    pub fn with_client(client: Arc<ApiClient>, notifier: Arc<dyn Notifier>) -> Self {
        Self { client, notifier }
    }

    pub fn client(&self) -> &Arc<ApiClient> {
        &self.client
    }

    pub fn is_signed_in(&self) -> bool {
        self.client.has_token()
    }

    pub fn address_book(&self) -> AddressBook {
        AddressBook::new(AddressService::new(self.client.clone()), self.notifier.clone())
    }

    pub fn account(&self) -> AccountPage {
        AccountPage::new(UserService::new(self.client.clone()), self.notifier.clone())
    }

    pub fn wishlist(&self) -> WishlistPage {
        WishlistPage::new(WishlistService::new(self.client.clone()), self.notifier.clone())
    }

    pub fn orders(&self) -> OrdersPage {
        OrdersPage::new(OrderService::new(self.client.clone()), self.notifier.clone())
    }

    pub fn checkout(&self) -> CheckoutPage {
        CheckoutPage::new(
            AddressService::new(self.client.clone()),
            OrderService::new(self.client.clone()),
            self.notifier.clone(),
        )
    }

    pub fn login(&self) -> LoginPage {
        LoginPage::new(
            AuthService::new(self.client.clone()),
            self.client.tokens().clone(),
            self.notifier.clone(),
        )
    }

    pub fn register(&self) -> RegisterPage {
        RegisterPage::new(
            AuthService::new(self.client.clone()),
            self.client.tokens().clone(),
            self.notifier.clone(),
        )
    }

    pub fn recovery(&self) -> RecoveryPage {
        RecoveryPage::new(AuthService::new(self.client.clone()), self.notifier.clone())
    }
}
