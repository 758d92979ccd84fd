// In-memory service fakes for unit tests. Each fake counts the calls it
// receives so tests can assert "no network call was issued".

#![allow(clippy::unwrap_used)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use storefront_api::{
    Address, AddressInput, AuthResponse, AvatarFile, ChangePasswordRequest, LoginRequest, Order,
    OrderItem, OrderStatus, PlaceOrderRequest, RegisterRequest, ResetPasswordRequest, ResourceId,
    UpdateProfileRequest, User, WishlistItem,
};

use crate::error::CoreError;
use crate::resource::{CreateResource, DeleteResource, ListResource, UpdateResource};
use crate::services::{
    AddressApi, AuthApi, CheckoutApi, OrderApi, ProfileApi, WishlistDraft,
};

fn rejected(message: &Mutex<Option<String>>) -> Option<CoreError> {
    message.lock().unwrap().clone().map(|message| CoreError::Request {
        message,
        status: Some(500),
    })
}

fn bump(counter: &AtomicUsize) {
    counter.fetch_add(1, Ordering::SeqCst);
}

pub fn address(id: &str, is_default: bool) -> Address {
    Address {
        id: ResourceId::from(id),
        address_line: format!("{id} Main Street"),
        city: "Lyon".into(),
        state: "Rhone".into(),
        postal_code: "69001".into(),
        country: "France".into(),
        phone: "+33 4 12 34 56 78".into(),
        is_default,
    }
}

pub fn valid_address_input() -> AddressInput {
    AddressInput {
        address_line: "12 Rue de la Paix".into(),
        city: "Paris".into(),
        state: "Ile-de-France".into(),
        postal_code: "75002".into(),
        country: "France".into(),
        phone: "+33 1 23 45 67 89".into(),
        is_default: false,
    }
}

pub fn user(avatar: Option<&str>) -> User {
    User {
        id: ResourceId::from("u1"),
        name: "Ada Lovelace".into(),
        email: "ada@example.com".into(),
        phone: "+44 20 7946 0000".into(),
        avatar: avatar.map(str::to_owned),
        email_verified: true,
    }
}

// ── Addresses ────────────────────────────────────────────────────────

/// Behaves like a well-behaved backend: `set_default` clears every other
/// default flag.
#[derive(Default)]
pub struct FakeAddresses {
    rows: Mutex<Vec<Address>>,
    next_id: AtomicUsize,
    list_error: Mutex<Option<String>>,
    mutation_error: Mutex<Option<String>>,
    sloppy_defaults: AtomicBool,
    list_calls: AtomicUsize,
    create_calls: AtomicUsize,
    update_calls: AtomicUsize,
    delete_calls: AtomicUsize,
    set_default_calls: AtomicUsize,
    last_created: Mutex<Option<AddressInput>>,
}

impl FakeAddresses {
    pub fn with(rows: Vec<Address>) -> Self {
        Self {
            rows: Mutex::new(rows),
            ..Self::default()
        }
    }

    pub fn fail_list(&self, message: &str) {
        *self.list_error.lock().unwrap() = Some(message.into());
    }

    pub fn fail_mutations(&self, message: &str) {
        *self.mutation_error.lock().unwrap() = Some(message.into());
    }

    /// Make `set_default` forget to clear the previous default.
    pub fn keep_old_defaults(&self) {
        self.sloppy_defaults.store(true, Ordering::SeqCst);
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn update_calls(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    pub fn set_default_calls(&self) -> usize {
        self.set_default_calls.load(Ordering::SeqCst)
    }

    pub fn last_created(&self) -> Option<AddressInput> {
        self.last_created.lock().unwrap().clone()
    }
}

impl ListResource for FakeAddresses {
    type Item = Address;

    async fn list(&self) -> Result<Vec<Address>, CoreError> {
        bump(&self.list_calls);
        if let Some(e) = rejected(&self.list_error) {
            return Err(e);
        }
        Ok(self.rows.lock().unwrap().clone())
    }
}

impl CreateResource for FakeAddresses {
    type Draft = AddressInput;

    async fn create(&self, draft: &AddressInput) -> Result<Address, CoreError> {
        bump(&self.create_calls);
        if let Some(e) = rejected(&self.mutation_error) {
            return Err(e);
        }
        *self.last_created.lock().unwrap() = Some(draft.clone());
        let n = self.next_id.fetch_add(1, Ordering::SeqCst);
        let created = Address {
            id: ResourceId::from(format!("new-{n}")),
            address_line: draft.address_line.clone(),
            city: draft.city.clone(),
            state: draft.state.clone(),
            postal_code: draft.postal_code.clone(),
            country: draft.country.clone(),
            phone: draft.phone.clone(),
            is_default: draft.is_default,
        };
        self.rows.lock().unwrap().push(created.clone());
        Ok(created)
    }
}

impl UpdateResource for FakeAddresses {
    async fn update(&self, id: &ResourceId, draft: &AddressInput) -> Result<Address, CoreError> {
        bump(&self.update_calls);
        if let Some(e) = rejected(&self.mutation_error) {
            return Err(e);
        }
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|a| &a.id == id)
            .ok_or_else(|| CoreError::NotFound {
                resource: "Address",
                id: id.to_string(),
            })?;
        row.address_line.clone_from(&draft.address_line);
        row.city.clone_from(&draft.city);
        row.state.clone_from(&draft.state);
        row.postal_code.clone_from(&draft.postal_code);
        row.country.clone_from(&draft.country);
        row.phone.clone_from(&draft.phone);
        Ok(row.clone())
    }
}

impl DeleteResource for FakeAddresses {
    async fn delete(&self, id: &ResourceId) -> Result<(), CoreError> {
        bump(&self.delete_calls);
        if let Some(e) = rejected(&self.mutation_error) {
            return Err(e);
        }
        self.rows.lock().unwrap().retain(|a| &a.id != id);
        Ok(())
    }
}

impl AddressApi for FakeAddresses {
    async fn set_default(&self, id: &ResourceId) -> Result<(), CoreError> {
        bump(&self.set_default_calls);
        if let Some(e) = rejected(&self.mutation_error) {
            return Err(e);
        }
        let sloppy = self.sloppy_defaults.load(Ordering::SeqCst);
        for row in self.rows.lock().unwrap().iter_mut() {
            if &row.id == id {
                row.is_default = true;
            } else if !sloppy {
                row.is_default = false;
            }
        }
        Ok(())
    }
}

// ── Profile ──────────────────────────────────────────────────────────

#[derive(Default)]
pub struct FakeProfile {
    user: Mutex<Option<User>>,
    error: Mutex<Option<String>>,
    pub me_calls: AtomicUsize,
    pub update_calls: AtomicUsize,
    pub password_calls: AtomicUsize,
    pub upload_calls: AtomicUsize,
    pub remove_calls: AtomicUsize,
    last_update: Mutex<Option<UpdateProfileRequest>>,
    omit_avatar: AtomicBool,
}

impl FakeProfile {
    pub fn with(user: User) -> Self {
        Self {
            user: Mutex::new(Some(user)),
            ..Self::default()
        }
    }

    pub fn fail_with(&self, message: &str) {
        *self.error.lock().unwrap() = Some(message.into());
    }

    /// Store uploads but answer without the new path.
    pub fn omit_avatar_in_upload(&self) {
        self.omit_avatar.store(true, Ordering::SeqCst);
    }

    pub fn calls(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }

    pub fn last_update(&self) -> Option<UpdateProfileRequest> {
        self.last_update.lock().unwrap().clone()
    }

    fn current(&self) -> Result<User, CoreError> {
        self.user.lock().unwrap().clone().ok_or(CoreError::Request {
            message: "Failed to fetch profile".into(),
            status: Some(404),
        })
    }
}

impl ProfileApi for FakeProfile {
    async fn me(&self) -> Result<User, CoreError> {
        bump(&self.me_calls);
        if let Some(e) = rejected(&self.error) {
            return Err(e);
        }
        self.current()
    }

    async fn update_profile(&self, req: &UpdateProfileRequest) -> Result<User, CoreError> {
        bump(&self.update_calls);
        if let Some(e) = rejected(&self.error) {
            return Err(e);
        }
        *self.last_update.lock().unwrap() = Some(req.clone());
        let mut user = self.current()?;
        user.name.clone_from(&req.name);
        user.phone.clone_from(&req.phone);
        *self.user.lock().unwrap() = Some(user.clone());
        Ok(user)
    }

    async fn change_password(&self, _req: &ChangePasswordRequest) -> Result<(), CoreError> {
        bump(&self.password_calls);
        rejected(&self.error).map_or(Ok(()), Err)
    }

    async fn upload_avatar(&self, file: &AvatarFile) -> Result<Option<String>, CoreError> {
        bump(&self.upload_calls);
        if let Some(e) = rejected(&self.error) {
            return Err(e);
        }
        let path = format!("/uploads/{}", file.file_name);
        if self.omit_avatar.load(Ordering::SeqCst) {
            if let Some(user) = self.user.lock().unwrap().as_mut() {
                user.avatar = Some(path);
            }
            return Ok(None);
        }
        Ok(Some(path))
    }

    async fn remove_avatar(&self) -> Result<(), CoreError> {
        bump(&self.remove_calls);
        rejected(&self.error).map_or(Ok(()), Err)
    }
}

// ── Auth ─────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct FakeAuth {
    error: Mutex<Option<String>>,
    pub login_calls: AtomicUsize,
    pub register_calls: AtomicUsize,
    pub logout_calls: AtomicUsize,
    pub recovery_calls: AtomicUsize,
    last_register: Mutex<Option<RegisterRequest>>,
}

impl FakeAuth {
    pub fn fail_with(&self, message: &str) {
        *self.error.lock().unwrap() = Some(message.into());
    }

    pub fn calls(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }

    pub fn last_register(&self) -> Option<RegisterRequest> {
        self.last_register.lock().unwrap().clone()
    }
}

impl AuthApi for FakeAuth {
    async fn login(&self, req: &LoginRequest) -> Result<AuthResponse, CoreError> {
        bump(&self.login_calls);
        if let Some(e) = rejected(&self.error) {
            return Err(e);
        }
        let mut u = user(None);
        u.email.clone_from(&req.email);
        Ok(AuthResponse {
            token: Some("tok-123".into()),
            user: u,
        })
    }

    async fn register(&self, req: &RegisterRequest) -> Result<AuthResponse, CoreError> {
        bump(&self.register_calls);
        if let Some(e) = rejected(&self.error) {
            return Err(e);
        }
        *self.last_register.lock().unwrap() = Some(req.clone());
        let mut u = user(None);
        u.email.clone_from(&req.email);
        u.email_verified = false;
        Ok(AuthResponse { token: None, user: u })
    }

    async fn logout(&self) -> Result<(), CoreError> {
        bump(&self.logout_calls);
        rejected(&self.error).map_or(Ok(()), Err)
    }

    async fn forgot_password(&self, _email: &str) -> Result<String, CoreError> {
        bump(&self.recovery_calls);
        rejected(&self.error).map_or_else(|| Ok("Reset link sent".into()), Err)
    }

    async fn reset_password(&self, _req: &ResetPasswordRequest) -> Result<String, CoreError> {
        bump(&self.recovery_calls);
        rejected(&self.error).map_or_else(|| Ok("Password updated".into()), Err)
    }

    async fn verify_email(&self, _token: &str) -> Result<String, CoreError> {
        bump(&self.recovery_calls);
        rejected(&self.error).map_or_else(|| Ok("Email verified".into()), Err)
    }
}

// ── Orders ───────────────────────────────────────────────────────────

pub fn order(id: u64) -> Order {
    Order {
        id: ResourceId::from(id),
        status: OrderStatus::Pending,
        items: vec![OrderItem {
            product_id: ResourceId::from("p1"),
            name: "Tea".into(),
            quantity: 2,
            unit_price: 450,
        }],
        total: 900,
        shipping_address: None,
        created_at: None,
    }
}

#[derive(Default)]
pub struct FakeOrders {
    rows: Mutex<Vec<Order>>,
    pub list_calls: AtomicUsize,
    pub place_calls: AtomicUsize,
    last_placed: Mutex<Option<PlaceOrderRequest>>,
}

impl FakeOrders {
    pub fn with(rows: Vec<Order>) -> Self {
        Self {
            rows: Mutex::new(rows),
            ..Self::default()
        }
    }

    pub fn calls(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }

    pub fn last_placed(&self) -> Option<PlaceOrderRequest> {
        self.last_placed.lock().unwrap().clone()
    }
}

impl ListResource for FakeOrders {
    type Item = Order;

    async fn list(&self) -> Result<Vec<Order>, CoreError> {
        bump(&self.list_calls);
        Ok(self.rows.lock().unwrap().clone())
    }
}

impl OrderApi for FakeOrders {
    async fn get(&self, id: &ResourceId) -> Result<Order, CoreError> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|o| &o.id == id)
            .cloned()
            .ok_or_else(|| CoreError::NotFound {
                resource: "Order",
                id: id.to_string(),
            })
    }
}

impl CheckoutApi for FakeOrders {
    async fn place_order(&self, req: &PlaceOrderRequest) -> Result<Order, CoreError> {
        bump(&self.place_calls);
        *self.last_placed.lock().unwrap() = Some(req.clone());
        let mut placed = order(99);
        placed.items.clear();
        let mut rows = self.rows.lock().unwrap();
        rows.push(placed.clone());
        Ok(placed)
    }
}

// ── Wishlist ─────────────────────────────────────────────────────────

#[derive(Default)]
pub struct FakeWishlist {
    rows: Mutex<Vec<WishlistItem>>,
    pub create_calls: AtomicUsize,
    pub delete_calls: AtomicUsize,
}

impl FakeWishlist {
    pub fn calls(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

impl ListResource for FakeWishlist {
    type Item = WishlistItem;

    async fn list(&self) -> Result<Vec<WishlistItem>, CoreError> {
        Ok(self.rows.lock().unwrap().clone())
    }
}

impl CreateResource for FakeWishlist {
    type Draft = WishlistDraft;

    async fn create(&self, draft: &WishlistDraft) -> Result<WishlistItem, CoreError> {
        bump(&self.create_calls);
        let item = WishlistItem {
            product_id: ResourceId::from(draft.product_id.as_str()),
            name: "Teapot".into(),
            price: 2500,
            image: None,
            in_stock: true,
        };
        self.rows.lock().unwrap().push(item.clone());
        Ok(item)
    }
}

impl DeleteResource for FakeWishlist {
    async fn delete(&self, id: &ResourceId) -> Result<(), CoreError> {
        bump(&self.delete_calls);
        self.rows.lock().unwrap().retain(|w| &w.product_id != id);
        Ok(())
    }
}
