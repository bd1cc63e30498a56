//! Cart route handlers.
//!
//! The cart lives in the visitor's session. Forms post and redirect back to
//! the cart page; `/cart/add` answers HTMX requests with the count badge.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::HeaderMap,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use papalote_core::ProductId;
use papalote_core::models::Product;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{PageResult, add_breadcrumb};
use crate::filters;
use crate::services::cart::{Cart, CartError, CartView};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: String,
    pub quantity: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: String,
    pub quantity: u32,
}

#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: String,
}

#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment (HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

fn is_htmx(headers: &HeaderMap) -> bool {
    headers.contains_key("hx-request")
}

fn lookup(state: &AppState, id: &str) -> Result<Product, CartError> {
    let id = ProductId::new(id.trim());
    state
        .catalog()
        .product(&id)
        .ok_or(CartError::UnknownProduct(id))
}

/// Cart page.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> PageResult<CartShowTemplate> {
    let cart = Cart::load(&session).await?;
    Ok(CartShowTemplate {
        cart: cart.view(state.catalog()),
    })
}

/// Add a product. Quantity defaults to 1.
#[instrument(skip(state, session, headers))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<AddToCartForm>,
) -> PageResult<Response> {
    let product = lookup(&state, &form.product_id)?;
    let mut cart = Cart::load(&session).await?;
    let quantity = cart.add(&product, form.quantity.unwrap_or(1))?;
    cart.save(&session).await?;

    let line_quantity = quantity.to_string();
    add_breadcrumb(
        "cart",
        "Added to cart",
        Some(&[
            ("product_id", product.id.as_str()),
            ("quantity", line_quantity.as_str()),
        ]),
    );

    if is_htmx(&headers) {
        return Ok((
            AppendHeaders([("HX-Trigger", "cart-updated")]),
            CartCountTemplate {
                count: cart.item_count(),
            },
        )
            .into_response());
    }
    Ok(Redirect::to("/cart").into_response())
}

/// Set a line's quantity; 0 removes the line.
#[instrument(skip(state, session))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<UpdateCartForm>,
) -> PageResult<Redirect> {
    let product = lookup(&state, &form.product_id)?;
    let mut cart = Cart::load(&session).await?;
    cart.update(&product, form.quantity)?;
    cart.save(&session).await?;
    Ok(Redirect::to("/cart"))
}

/// Remove a line.
#[instrument(skip(session))]
pub async fn remove(
    session: Session,
    Form(form): Form<RemoveFromCartForm>,
) -> PageResult<Redirect> {
    let mut cart = Cart::load(&session).await?;
    cart.remove(&ProductId::new(form.product_id.trim()))?;
    cart.save(&session).await?;
    Ok(Redirect::to("/cart"))
}

/// Empty the cart.
#[instrument(skip(session))]
pub async fn clear(session: Session) -> PageResult<Redirect> {
    let mut cart = Cart::load(&session).await?;
    cart.clear();
    cart.save(&session).await?;
    Ok(Redirect::to("/cart"))
}

/// Cart count badge (HTMX).
#[instrument(skip(session))]
pub async fn count(session: Session) -> CartCountTemplate {
    let count = Cart::load(&session)
        .await
        .map(|cart| cart.item_count())
        .unwrap_or(0);
    CartCountTemplate { count }
}
