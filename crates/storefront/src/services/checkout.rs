//! Checkout: form validation and order creation from the session cart.

use chrono::Utc;
use papalote_core::models::{Order, OrderItem, OrderTotals, ShippingAddress};
use papalote_core::{BuyerId, Email, OrderId, OrderStatus, PaymentMethod};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::Catalog;
use crate::services::cart::Cart;

/// Buyer id recorded for orders placed without one.
pub const GUEST_BUYER: &str = "guest";

/// Checkout form as posted by the checkout page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckoutForm {
    #[serde(default)]
    pub buyer_id: Option<String>,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub postal_code: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub payment_method: String,
}

/// A validation message for one form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// A checkout form that passed validation.
#[derive(Debug, Clone)]
pub struct ValidCheckout {
    pub buyer_id: BuyerId,
    pub email: Email,
    pub address: ShippingAddress,
    pub payment_method: PaymentMethod,
}

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("Your cart is empty")]
    EmptyCart,
    #[error("{0}")]
    Unavailable(String),
}

fn required(value: &str, field: &'static str, label: &str, errors: &mut Vec<FieldError>) -> String {
    let value = value.trim();
    if value.is_empty() {
        errors.push(FieldError::new(field, format!("{label} is required")));
    }
    value.to_string()
}

fn digits(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

impl CheckoutForm {
    /// Validate every field, collecting all problems.
    ///
    /// # Errors
    ///
    /// Returns every field error found.
    pub fn validate(&self) -> Result<ValidCheckout, Vec<FieldError>> {
        let mut errors = Vec::new();

        let full_name = required(&self.full_name, "full_name", "Full name", &mut errors);
        let street = required(&self.street, "street", "Street", &mut errors);
        let city = required(&self.city, "city", "City", &mut errors);
        let state = required(&self.state, "state", "State", &mut errors);

        let email = match Email::parse(&self.email) {
            Ok(email) => Some(email),
            Err(e) => {
                errors.push(FieldError::new("email", e.to_string()));
                None
            }
        };

        let postal_code = self.postal_code.trim().to_string();
        if postal_code.len() != 5 || !postal_code.chars().all(|c| c.is_ascii_digit()) {
            errors.push(FieldError::new("postal_code", "Postal code must be 5 digits"));
        }

        let phone = digits(&self.phone);
        if !(10..=13).contains(&phone.len()) {
            errors.push(FieldError::new("phone", "Phone must have 10 to 13 digits"));
        }

        let payment_method = match self.payment_method.parse::<PaymentMethod>() {
            Ok(method) => Some(method),
            Err(_) => {
                errors.push(FieldError::new(
                    "payment_method",
                    "Choose card, OXXO or bank transfer",
                ));
                None
            }
        };

        let (Some(email), Some(payment_method), true) = (email, payment_method, errors.is_empty())
        else {
            return Err(errors);
        };

        let buyer_id = self
            .buyer_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .unwrap_or(GUEST_BUYER);

        Ok(ValidCheckout {
            buyer_id: BuyerId::new(buyer_id),
            email,
            address: ShippingAddress {
                full_name,
                street,
                city,
                state,
                postal_code,
                phone,
            },
            payment_method,
        })
    }
}

/// Turn the cart into an order at current catalog prices.
///
/// The order starts pending; card payments are recorded as paid.
///
/// # Errors
///
/// `EmptyCart` for an empty cart, `Unavailable` when a product left the
/// catalog or no longer has enough stock.
pub fn place_order(
    cart: &Cart,
    catalog: &Catalog,
    checkout: ValidCheckout,
) -> Result<Order, CheckoutError> {
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let items = cart
        .lines()
        .iter()
        .map(|line| {
            let product = catalog.product(&line.product_id).ok_or_else(|| {
                CheckoutError::Unavailable(format!(
                    "Product {} is no longer available",
                    line.product_id
                ))
            })?;
            if product.stock < line.quantity {
                return Err(CheckoutError::Unavailable(format!(
                    "Only {} of {} left in stock",
                    product.stock, product.name
                )));
            }
            Ok(OrderItem {
                product_id: product.id,
                shop_id: product.shop_id,
                name: product.name,
                unit_price: product.price,
                quantity: line.quantity,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Order {
        id: OrderId::generate(),
        buyer_id: checkout.buyer_id,
        totals: OrderTotals::from_items(&items),
        items,
        shipping_address: checkout.address,
        contact_email: checkout.email.as_str().to_string(),
        payment_method: checkout.payment_method,
        status: OrderStatus::Pending,
        payment_status: checkout.payment_method.initial_payment_status(),
        tracking_number: None,
        created_at: Utc::now(),
        updated_at: None,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::catalog::tests::bundled;
    use papalote_core::PaymentStatus;

    fn form() -> CheckoutForm {
        CheckoutForm {
            buyer_id: None,
            full_name: "Lucía Hernández".to_string(),
            email: "lucia@example.mx".to_string(),
            street: "Av. Juárez 12".to_string(),
            city: "Puebla".to_string(),
            state: "Puebla".to_string(),
            postal_code: "72000".to_string(),
            phone: "222 123 4567".to_string(),
            payment_method: "oxxo".to_string(),
        }
    }

    #[test]
    fn test_valid_form_defaults_to_guest() {
        let valid = form().validate().unwrap();
        assert_eq!(valid.buyer_id.as_str(), GUEST_BUYER);
        assert_eq!(valid.address.phone, "2221234567");
        assert_eq!(valid.payment_method, PaymentMethod::Oxxo);
    }

    #[test]
    fn test_collects_every_error() {
        let bad = CheckoutForm {
            full_name: " ".to_string(),
            email: "not-an-email".to_string(),
            postal_code: "7200".to_string(),
            payment_method: "bitcoin".to_string(),
            ..form()
        };
        let errors = bad.validate().unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["full_name", "email", "postal_code", "payment_method"]);
    }

    #[test]
    fn test_postal_code_must_be_digits() {
        let bad = CheckoutForm {
            postal_code: "72a00".to_string(),
            ..form()
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_place_order_prices_from_catalog() {
        let catalog = Catalog::new(&bundled());
        let product = catalog
            .all_products()
            .iter()
            .find(|p| p.stock >= 2)
            .cloned()
            .unwrap();
        let mut cart = Cart::default();
        cart.add(&product, 2).unwrap();

        let checkout = CheckoutForm {
            payment_method: "card".to_string(),
            buyer_id: Some("buyer-ana".to_string()),
            ..form()
        }
        .validate()
        .unwrap();
        let order = place_order(&cart, &catalog, checkout).unwrap();

        assert_eq!(order.items[0].unit_price, product.price);
        assert_eq!(order.totals.subtotal, product.price * rust_decimal::Decimal::TWO);
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.payment_status, PaymentStatus::Paid);
        assert_eq!(order.buyer_id.as_str(), "buyer-ana");
    }

    #[test]
    fn test_empty_cart_rejected() {
        let catalog = Catalog::new(&bundled());
        let checkout = form().validate().unwrap();
        assert!(matches!(
            place_order(&Cart::default(), &catalog, checkout),
            Err(CheckoutError::EmptyCart)
        ));
    }
}
