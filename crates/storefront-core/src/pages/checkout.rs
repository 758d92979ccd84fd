// ── Checkout page ──
//
// Picks a shipping address from the address book, collects a payment
// method and places the order for the current cart.

use std::sync::Arc;

use strum::{Display, EnumIter, EnumString};
use tokio::sync::watch;
use tracing::info;

use storefront_api::{Address, CheckoutLine, Order, PlaceOrderRequest, ResourceId};

use crate::error::CoreError;
use crate::notify::{Notification, Notifier};
use crate::resource::{InFlight, ResourceController};
use crate::services::{AddressApi, AddressService, CheckoutApi, OrderService};
use crate::validate::{FieldErrors, Validate};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter)]
pub enum PaymentMethod {
    #[strum(serialize = "card")]
    Card,
    #[strum(serialize = "paypal")]
    PayPal,
    #[strum(serialize = "cod")]
    CashOnDelivery,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutState {
    pub cart: Vec<CheckoutLine>,
    pub address_id: Option<ResourceId>,
    pub payment_method: Option<PaymentMethod>,
    pub errors: FieldErrors,
}

impl Validate for CheckoutState {
    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if self.cart.is_empty() {
            errors.insert("cart", "Your cart is empty");
        } else if self.cart.iter().any(|line| line.quantity == 0) {
            errors.insert("cart", "Quantity must be at least 1");
        }
        if self.address_id.is_none() {
            errors.insert("address", "Please select a shipping address");
        }
        if self.payment_method.is_none() {
            errors.insert("payment_method", "Please choose a payment method");
        }
        errors
    }
}

pub struct CheckoutPage<A: AddressApi = AddressService, C: CheckoutApi = OrderService> {
    addresses: ResourceController<A>,
    orders: C,
    notifier: Arc<dyn Notifier>,
    state: watch::Sender<CheckoutState>,
    placing: InFlight,
}

impl<A: AddressApi, C: CheckoutApi> CheckoutPage<A, C> {
    pub fn new(addresses: A, orders: C, notifier: Arc<dyn Notifier>) -> Self {
        let (state, _) = watch::channel(CheckoutState::default());
        Self {
            addresses: ResourceController::new(addresses, notifier.clone()),
            orders,
            notifier,
            state,
            placing: InFlight::default(),
        }
    }

    pub fn orders(&self) -> &C {
        &self.orders
    }

    pub fn snapshot(&self) -> CheckoutState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<CheckoutState> {
        self.state.subscribe()
    }

    pub fn addresses(&self) -> Vec<Address> {
        self.addresses.items()
    }

    /// Load the address book and preselect the default address.
    pub async fn mount(&self) -> Result<(), CoreError> {
        self.addresses.mount().await?;
        let default = self
            .addresses
            .items()
            .into_iter()
            .find(|a| a.is_default)
            .map(|a| a.id);
        self.state.send_if_modified(|s| {
            if s.address_id.is_some() || default.is_none() {
                return false;
            }
            s.address_id = default;
            true
        });
        Ok(())
    }

    pub fn unmount(&self) {
        self.addresses.unmount();
        self.state.send_replace(CheckoutState::default());
    }

    // ── Cart and choices ─────────────────────────────────────────────

    pub fn set_cart(&self, cart: Vec<CheckoutLine>) {
        self.state.send_modify(|s| s.cart = cart);
    }

    /// Add `quantity` of a product, merging with an existing line.
    pub fn add_line(&self, product_id: ResourceId, quantity: u32) {
        self.state.send_modify(|s| {
            match s.cart.iter_mut().find(|l| l.product_id == product_id) {
                Some(line) => line.quantity = line.quantity.saturating_add(quantity),
                None => s.cart.push(CheckoutLine {
                    product_id,
                    quantity,
                }),
            }
        });
    }

    pub fn select_address(&self, id: &ResourceId) -> Result<(), CoreError> {
        if self.addresses.find(id).is_none() {
            return Err(CoreError::NotFound {
                resource: "Address",
                id: id.to_string(),
            });
        }
        self.state.send_modify(|s| s.address_id = Some(id.clone()));
        Ok(())
    }

    pub fn select_payment(&self, method: PaymentMethod) {
        self.state.send_modify(|s| s.payment_method = Some(method));
    }

    // ── Place order ──────────────────────────────────────────────────

    pub async fn place_order(&self) -> Result<Order, CoreError> {
        let current = self.snapshot();
        let errors = current.validate();
        if !errors.is_empty() {
            self.notifier.notify(Notification::warning(errors.to_string()));
            self.state.send_modify(|s| s.errors = errors.clone());
            return Err(CoreError::Validation(errors));
        }
        let (Some(address_id), Some(method)) = (current.address_id, current.payment_method) else {
            return Err(CoreError::InvalidState("Checkout is incomplete"));
        };

        let _guard = self.placing.begin("Order placement")?;
        self.state.send_modify(|s| s.errors = FieldErrors::new());
        let req = PlaceOrderRequest {
            items: current.cart,
            address_id,
            payment_method: method.to_string(),
        };

        match self.orders.place_order(&req).await {
            Ok(order) => {
                info!(order = %order.id, total = order.total, "order placed");
                self.state.send_modify(|s| s.cart.clear());
                self.notifier
                    .notify(Notification::success(format!("Order {} placed", order.id)));
                Ok(order)
            }
            Err(e) => {
                self.notifier.notify(Notification::error(e.to_string()));
                Err(e)
            }
        }
    }
}
