//! Checkout and order confirmation pages.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use papalote_core::models::CompleteOrder;
use papalote_core::{OrderId, PaymentMethod};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, PageResult, add_breadcrumb};
use crate::filters;
use crate::services::buyer::complete_order;
use crate::services::cart::{Cart, CartView};
use crate::services::checkout::{CheckoutError, CheckoutForm, FieldError, place_order};
use crate::state::AppState;

#[derive(Template, WebTemplate)]
#[template(path = "checkout/form.html")]
pub struct CheckoutTemplate {
    pub cart: CartView,
    pub form: CheckoutForm,
    pub errors: Vec<FieldError>,
    pub payment_methods: &'static [PaymentMethod],
}

impl CheckoutTemplate {
    /// First message for a field, for inline display.
    pub fn error_for(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    /// Messages not tied to a form field.
    pub fn general_errors(&self) -> Vec<&str> {
        self.errors
            .iter()
            .filter(|e| e.field == "cart")
            .map(|e| e.message.as_str())
            .collect()
    }
}

#[derive(Template, WebTemplate)]
#[template(path = "orders/confirmation.html")]
pub struct ConfirmationTemplate {
    pub order: CompleteOrder,
}

fn render_form(cart: CartView, form: CheckoutForm, errors: Vec<FieldError>) -> CheckoutTemplate {
    CheckoutTemplate {
        cart,
        form,
        errors,
        payment_methods: PaymentMethod::ALL,
    }
}

/// Checkout form. An empty cart goes back to the cart page.
#[instrument(skip(state, session))]
pub async fn form(State(state): State<AppState>, session: Session) -> PageResult<Response> {
    let cart = Cart::load(&session).await?;
    if cart.is_empty() {
        return Ok(Redirect::to("/cart").into_response());
    }
    Ok(render_form(cart.view(state.catalog()), CheckoutForm::default(), Vec::new()).into_response())
}

/// Validate, place the order, clear the cart and redirect to the
/// confirmation page.
#[instrument(skip(state, session, form))]
pub async fn submit(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<CheckoutForm>,
) -> PageResult<Response> {
    let mut cart = Cart::load(&session).await?;
    if cart.is_empty() {
        return Ok(Redirect::to("/cart").into_response());
    }

    let valid = match form.validate() {
        Ok(valid) => valid,
        Err(errors) => {
            tracing::debug!(count = errors.len(), "Checkout form rejected");
            return Ok(render_form(cart.view(state.catalog()), form, errors).into_response());
        }
    };

    let order = match place_order(&cart, state.catalog(), valid) {
        Ok(order) => order,
        Err(CheckoutError::Unavailable(message)) => {
            let errors = vec![FieldError {
                field: "cart",
                message,
            }];
            return Ok(render_form(cart.view(state.catalog()), form, errors).into_response());
        }
        Err(e) => return Err(AppError::from(e).into()),
    };

    let order_id = order.id.clone();
    tracing::info!(order_id = %order_id, total = %order.totals.total, "Order placed");
    add_breadcrumb("checkout", "Order placed", Some(&[("order_id", order_id.as_str())]));

    state.store().insert_order(order);
    cart.clear();
    cart.save(&session).await?;

    Ok(Redirect::to(&format!("/orders/{order_id}/confirmation")).into_response())
}

/// Order confirmation.
#[instrument(skip(state))]
pub async fn confirmation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> PageResult<ConfirmationTemplate> {
    let id = OrderId::new(id);
    let order = state
        .store()
        .order(&id)
        .ok_or_else(|| AppError::NotFound(format!("Order {id}")))?;
    Ok(ConfirmationTemplate {
        order: complete_order(order, state.catalog()),
    })
}
