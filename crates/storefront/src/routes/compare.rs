//! Product comparison pages.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Form, extract::State, response::Redirect};
use papalote_core::ProductId;
use papalote_core::models::Product;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, PageResult};
use crate::filters;
use crate::services::compare::{CompareError, CompareList, MAX_COMPARE};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CompareForm {
    pub product_id: String,
}

#[derive(Template, WebTemplate)]
#[template(path = "compare.html")]
pub struct CompareTemplate {
    pub products: Vec<Product>,
    pub max: usize,
}

/// Side-by-side view of the compared products.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> PageResult<CompareTemplate> {
    let list = CompareList::load(&session).await?;
    Ok(CompareTemplate {
        products: state.catalog().products_by_ids(list.ids()),
        max: MAX_COMPARE,
    })
}

/// Add a product. A fifth product is rejected with 409.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<CompareForm>,
) -> PageResult<Redirect> {
    let id = ProductId::new(form.product_id.trim());
    if state.catalog().product(&id).is_none() {
        return Err(AppError::NotFound(format!("Product {id}")).into());
    }
    let mut list = CompareList::load(&session).await?;
    list.add(id)?;
    list.save(&session).await?;
    Ok(Redirect::to("/compare"))
}

#[instrument(skip(session))]
pub async fn remove(session: Session, Form(form): Form<CompareForm>) -> PageResult<Redirect> {
    let mut list = CompareList::load(&session).await?;
    match list.remove(&ProductId::new(form.product_id.trim())) {
        Ok(()) | Err(CompareError::NotListed(_)) => {}
        Err(e) => return Err(AppError::from(e).into()),
    }
    list.save(&session).await?;
    Ok(Redirect::to("/compare"))
}

#[instrument(skip(session))]
pub async fn clear(session: Session) -> PageResult<Redirect> {
    let mut list = CompareList::load(&session).await?;
    list.clear();
    list.save(&session).await?;
    Ok(Redirect::to("/compare"))
}
