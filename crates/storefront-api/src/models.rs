// Wire types for the storefront REST API.
//
// Bodies are camelCase JSON. Fields the backend may omit carry a
// `#[serde(default)]` so callers never branch on "field absent".

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

// ── Identifiers ──────────────────────────────────────────────────────

/// Server-assigned identifier, kept as the exact text the server or the
/// user gave. Backends hand out either numbers or opaque strings; numbers
/// are read as their decimal text so `42` and `"42"` name the same record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "RawId")]
pub struct ResourceId(String);

/// Either JSON shape an identifier arrives in.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Unsigned(u64),
    Signed(i64),
    Text(String),
}

impl From<RawId> for ResourceId {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Unsigned(n) => Self(n.to_string()),
            RawId::Signed(n) => Self(n.to_string()),
            RawId::Text(s) => Self(s),
        }
    }
}

impl ResourceId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ResourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResourceId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for ResourceId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<u64> for ResourceId {
    fn from(n: u64) -> Self {
        Self(n.to_string())
    }
}

// ── Addresses ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(alias = "_id")]
    pub id: ResourceId,
    /// Street line, free text.
    #[serde(default)]
    pub address_line: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub postal_code: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub phone: String,
    /// Absent means "not the default".
    #[serde(default)]
    pub is_default: bool,
}

/// Body for creating or fully replacing an address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressInput {
    pub address_line: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
    pub phone: String,
    pub is_default: bool,
}

impl From<&Address> for AddressInput {
    fn from(a: &Address) -> Self {
        Self {
            address_line: a.address_line.clone(),
            city: a.city.clone(),
            state: a.state.clone(),
            postal_code: a.postal_code.clone(),
            country: a.country.clone(),
            phone: a.phone.clone(),
            is_default: a.is_default,
        }
    }
}

// ── Users ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(alias = "_id")]
    pub id: ResourceId,
    #[serde(default)]
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    /// URL or storage reference of the profile picture, if one was uploaded.
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub email_verified: bool,
}

/// Email is deliberately absent: it cannot change once set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub name: String,
    pub phone: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub token: String,
    pub password: String,
}

/// Login and registration both answer with a session token and the user.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    /// Registration may require email verification first, in which case
    /// no token is issued yet.
    #[serde(default)]
    pub token: Option<String>,
    pub user: User,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AvatarResponse {
    #[serde(default)]
    pub avatar: Option<String>,
}

/// Acknowledgement bodies (`{"message": "..."}`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

/// A file picked for the avatar control.
#[derive(Debug, Clone)]
pub struct AvatarFile {
    pub file_name: String,
    /// MIME type as reported by the picker (e.g. `image/png`).
    pub content_type: String,
    pub bytes: bytes::Bytes,
}

impl AvatarFile {
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_image(&self) -> bool {
        self.content_type
            .split('/')
            .next()
            .is_some_and(|top| top.eq_ignore_ascii_case("image"))
    }
}

// ── Orders ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: ResourceId,
    #[serde(default)]
    pub name: String,
    pub quantity: u32,
    /// Unit price in minor currency units.
    pub unit_price: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(alias = "_id")]
    pub id: ResourceId,
    pub status: OrderStatus,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    /// Total in minor currency units.
    #[serde(default)]
    pub total: i64,
    #[serde(default)]
    pub shipping_address: Option<Address>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutLine {
    pub product_id: ResourceId,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    pub items: Vec<CheckoutLine>,
    pub address_id: ResourceId,
    pub payment_method: String,
}

// ── Wishlist ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistItem {
    pub product_id: ResourceId,
    #[serde(default)]
    pub name: String,
    /// Price in minor currency units.
    #[serde(default)]
    pub price: i64,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default = "default_in_stock")]
    pub in_stock: bool,
}

fn default_in_stock() -> bool {
    true
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn address_missing_fields_get_defaults() {
        let a: Address = serde_json::from_value(json!({ "_id": "a1", "city": "Lyon" })).unwrap();
        assert_eq!(a.id, ResourceId::from("a1"));
        assert_eq!(a.city, "Lyon");
        assert!(!a.is_default);
        assert!(a.postal_code.is_empty());
    }

    #[test]
    fn resource_id_accepts_numbers_and_strings() {
        let n: ResourceId = serde_json::from_value(json!(42)).unwrap();
        let s: ResourceId = serde_json::from_value(json!("42")).unwrap();
        assert_eq!(n, s);
        assert_eq!(n, ResourceId::from("42"));
        assert_eq!(ResourceId::from("64f0c").to_string(), "64f0c");
    }

    #[test]
    fn resource_id_keeps_text_verbatim() {
        let id = ResourceId::from("042");
        assert_ne!(id, ResourceId::from(42_u64));
        assert_eq!(id.as_str(), "042");
        assert_eq!(
            serde_json::to_value(CheckoutLine { product_id: id, quantity: 1 }).unwrap(),
            json!({ "productId": "042", "quantity": 1 })
        );
    }

    #[test]
    fn unknown_order_status_is_tolerated() {
        let o: Order =
            serde_json::from_value(json!({ "id": 7, "status": "on-hold" })).unwrap();
        assert_eq!(o.status, OrderStatus::Unknown);
        assert!(o.items.is_empty());
        assert_eq!(o.total, 0);
    }

    #[test]
    fn avatar_image_detection() {
        let png = AvatarFile {
            file_name: "me.png".into(),
            content_type: "image/png".into(),
            bytes: bytes::Bytes::from_static(b"\x89PNG"),
        };
        assert!(png.is_image());
        let pdf = AvatarFile {
            content_type: "application/pdf".into(),
            ..png
        };
        assert!(!pdf.is_image());
    }
}
