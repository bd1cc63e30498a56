//! Product listing filters, sorting and pagination.

use std::cmp::Ordering;

use papalote_core::ShopId;
use papalote_core::models::Product;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

/// Default page size for listings.
pub const DEFAULT_PER_PAGE: u32 = 12;

/// Largest accepted page size.
pub const MAX_PER_PAGE: u32 = 60;

/// Listing sort order.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductSort {
    #[default]
    Featured,
    PriceAsc,
    PriceDesc,
    Rating,
    Newest,
}

impl ProductSort {
    /// Parse from URL parameter value, defaulting to `Featured`.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "price_asc" | "price-ascending" => Self::PriceAsc,
            "price_desc" | "price-descending" => Self::PriceDesc,
            "rating" => Self::Rating,
            "newest" => Self::Newest,
            _ => Self::Featured,
        }
    }

    /// Convert to URL parameter value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Featured => "featured",
            Self::PriceAsc => "price_asc",
            Self::PriceDesc => "price_desc",
            Self::Rating => "rating",
            Self::Newest => "newest",
        }
    }

    fn compare(self, a: &Product, b: &Product) -> Ordering {
        match self {
            Self::Featured => b
                .featured
                .cmp(&a.featured)
                .then_with(|| b.rating.total_cmp(&a.rating))
                .then_with(|| a.name.cmp(&b.name)),
            Self::PriceAsc => a.price.cmp(&b.price).then_with(|| a.name.cmp(&b.name)),
            Self::PriceDesc => b.price.cmp(&a.price).then_with(|| a.name.cmp(&b.name)),
            Self::Rating => b
                .rating
                .total_cmp(&a.rating)
                .then_with(|| b.review_count.cmp(&a.review_count)),
            Self::Newest => b.created_at.cmp(&a.created_at),
        }
    }
}

/// Deserialize empty strings as None for optional parsed fields.
pub fn empty_string_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

/// Listing query string as sent by the catalog page and `/api/products`.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductQueryParams {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub shop_id: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub min_price: Option<Decimal>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub max_price: Option<Decimal>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub min_rating: Option<u8>,
    #[serde(default)]
    pub in_stock: Option<String>,
    #[serde(default)]
    pub sort: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub page: Option<u32>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub per_page: Option<u32>,
}

/// Normalized listing query. Used as the listing cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProductQuery {
    /// Lowercased free-text needle.
    pub text: Option<String>,
    pub category: Option<String>,
    pub state: Option<String>,
    pub shop_id: Option<ShopId>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    /// Minimum whole-star rating, 1..=5.
    pub min_rating: Option<u8>,
    pub in_stock_only: bool,
    pub sort: ProductSort,
    /// 1-based page.
    pub page: u32,
    pub per_page: u32,
}

impl Default for ProductQuery {
    fn default() -> Self {
        Self {
            text: None,
            category: None,
            state: None,
            shop_id: None,
            min_price: None,
            max_price: None,
            min_rating: None,
            in_stock_only: false,
            sort: ProductSort::Featured,
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl From<ProductQueryParams> for ProductQuery {
    fn from(params: ProductQueryParams) -> Self {
        let in_stock_only = params
            .in_stock
            .as_deref()
            .is_some_and(|v| matches!(v, "1" | "true" | "on"));
        Self {
            text: non_empty(params.q).map(|q| q.to_lowercase()),
            category: non_empty(params.category),
            state: non_empty(params.state),
            shop_id: non_empty(params.shop_id).map(ShopId::from),
            min_price: params.min_price,
            max_price: params.max_price,
            min_rating: params.min_rating.map(|r| r.clamp(1, 5)),
            in_stock_only,
            sort: params
                .sort
                .as_deref()
                .map_or(ProductSort::Featured, ProductSort::parse),
            page: params.page.unwrap_or(1).max(1),
            per_page: params
                .per_page
                .unwrap_or(DEFAULT_PER_PAGE)
                .clamp(1, MAX_PER_PAGE),
        }
    }
}

impl ProductQuery {
    /// Whether a product passes every filter.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(text) = &self.text {
            if !product.matches_text(text) {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if !product.category.eq_ignore_ascii_case(category) {
                return false;
            }
        }
        if let Some(state) = &self.state {
            if !product.state.eq_ignore_ascii_case(state) {
                return false;
            }
        }
        if let Some(shop_id) = &self.shop_id {
            if &product.shop_id != shop_id {
                return false;
            }
        }
        if self.min_price.is_some_and(|min| product.price < min) {
            return false;
        }
        if self.max_price.is_some_and(|max| product.price > max) {
            return false;
        }
        if self
            .min_rating
            .is_some_and(|min| product.rating < f32::from(min))
        {
            return false;
        }
        !(self.in_stock_only && !product.in_stock())
    }

    /// Query string (leading `&`) that carries every filter except the page,
    /// for pagination links.
    #[must_use]
    pub fn preserve_params(&self) -> String {
        let mut params = Vec::new();
        if let Some(text) = &self.text {
            params.push(format!("q={}", urlencoding::encode(text)));
        }
        if let Some(category) = &self.category {
            params.push(format!("category={}", urlencoding::encode(category)));
        }
        if let Some(state) = &self.state {
            params.push(format!("state={}", urlencoding::encode(state)));
        }
        if let Some(shop_id) = &self.shop_id {
            params.push(format!("shopId={}", urlencoding::encode(shop_id.as_str())));
        }
        if let Some(min) = self.min_price {
            params.push(format!("minPrice={min}"));
        }
        if let Some(max) = self.max_price {
            params.push(format!("maxPrice={max}"));
        }
        if let Some(rating) = self.min_rating {
            params.push(format!("minRating={rating}"));
        }
        if self.in_stock_only {
            params.push("inStock=1".to_string());
        }
        if self.sort != ProductSort::Featured {
            params.push(format!("sort={}", self.sort.as_str()));
        }
        if self.per_page != DEFAULT_PER_PAGE {
            params.push(format!("perPage={}", self.per_page));
        }

        if params.is_empty() {
            String::new()
        } else {
            format!("&{}", params.join("&"))
        }
    }

    /// Filter, sort and paginate `products`.
    #[must_use]
    pub fn apply(&self, products: &[Product]) -> ProductPage {
        let mut matched: Vec<&Product> = products.iter().filter(|p| self.matches(p)).collect();
        matched.sort_by(|a, b| self.sort.compare(a, b));

        let total = matched.len();
        let per_page = self.per_page.max(1) as usize;
        let total_pages = total.div_ceil(per_page).max(1);
        let start = (self.page.max(1) as usize - 1).saturating_mul(per_page);

        let items = matched
            .into_iter()
            .skip(start)
            .take(per_page)
            .cloned()
            .collect();

        ProductPage {
            items,
            total,
            page: self.page.max(1),
            per_page: self.per_page,
            total_pages: u32::try_from(total_pages).unwrap_or(u32::MAX),
        }
    }
}

/// One page of listing results.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPage {
    pub items: Vec<Product>,
    pub total: usize,
    pub page: u32,
    pub per_page: u32,
    pub total_pages: u32,
}

impl ProductPage {
    /// Whether a following page exists.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// Whether a preceding page exists.
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.page > 1
    }
}
