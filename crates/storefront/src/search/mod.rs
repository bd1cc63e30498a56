//! Full-text search using Tantivy.
//!
//! One in-RAM index holds products and shops. The app starts with an empty
//! index; a background task builds the real one and swaps it in atomically.
//! Seller listing changes trigger a rebuild the same way.

mod indexer;

use std::ops::Bound;
use std::sync::{Arc, RwLock};

use papalote_core::Money;
use rust_decimal::Decimal;
use serde::Serialize;
use tantivy::collector::{Count, TopDocs};
use tantivy::query::{
    AllQuery, BooleanQuery, FuzzyTermQuery, Occur, Query, RangeQuery, RegexQuery, TermQuery,
};
use tantivy::schema::{
    Field, IndexRecordOption, NumericOptions, STORED, STRING, Schema, TextFieldIndexing,
    TextOptions, Value,
};
use tantivy::tokenizer::TokenStream;
use tantivy::{Index, IndexReader, Order, ReloadPolicy, Term};
use tracing::instrument;

pub use indexer::{build_index, build_index_async};

/// Tokenizer registered on every index: lowercase, accent folding, Spanish stems.
pub(crate) const TOKENIZER: &str = "es_fold";

/// Document types stored in the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocType {
    Product,
    Shop,
}

impl DocType {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Product => "product",
            Self::Shop => "shop",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "product" => Some(Self::Product),
            "shop" => Some(Self::Shop),
            _ => None,
        }
    }
}

/// A single search hit.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    pub doc_type: DocType,
    pub id: String,
    pub name: String,
    pub summary: String,
    pub state: String,
    pub image_url: Option<String>,
    pub price_cents: Option<u64>,
    pub available: bool,
    pub score: f32,
}

impl SearchHit {
    /// First path segment of the hit's page, `products` or `shops`.
    #[must_use]
    pub const fn path_segment(&self) -> &'static str {
        match self.doc_type {
            DocType::Product => "products",
            DocType::Shop => "shops",
        }
    }

    /// Price as display money, products only.
    #[must_use]
    pub fn price(&self) -> Option<Money> {
        self.price_cents
            .and_then(|c| i64::try_from(c).ok())
            .map(|c| Money::mxn(Decimal::new(c, 2)))
    }
}

/// Schema field handles.
#[derive(Clone)]
pub struct SearchFields {
    // Stored
    pub doc_type: Field,
    pub id: Field,
    pub name: Field,
    pub summary: Field,
    pub state: Field,
    pub image_url: Field,
    pub price_cents: Field,
    pub available: Field,
    // Indexed only
    pub name_text: Field,
    pub body_text: Field,
    pub tags_text: Field,
}

struct ReadyIndex {
    /// Catalog generation the index was built from.
    generation: u64,
    index: Index,
    reader: IndexReader,
    fields: SearchFields,
}

/// The search index.
///
/// Starts empty and is populated by a background task.
#[derive(Clone)]
pub struct SearchIndex {
    inner: Arc<RwLock<Option<ReadyIndex>>>,
}

impl Default for SearchIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchIndex {
    /// Create a new empty search index.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(None)),
        }
    }

    /// Check if the index is ready.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.inner
            .read()
            .map(|guard| guard.is_some())
            .unwrap_or(false)
    }

    /// Catalog generation of the installed index, `None` before the first
    /// build.
    #[must_use]
    pub fn generation(&self) -> Option<u64> {
        self.inner
            .read()
            .ok()
            .and_then(|guard| guard.as_ref().map(|ready| ready.generation))
    }

    /// Swap in an index built from catalog `generation`.
    ///
    /// A build older than the installed one is dropped. Returns whether the
    /// index was installed.
    pub(crate) fn set_ready(
        &self,
        index: Index,
        fields: SearchFields,
        generation: u64,
    ) -> Result<bool, SearchError> {
        let reader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()
            .map_err(|e| SearchError::Index(format!("Failed to create reader: {e}")))?;

        let mut guard = self
            .inner
            .write()
            .map_err(|_| SearchError::Index("Lock poisoned".to_string()))?;
        if guard
            .as_ref()
            .is_some_and(|installed| installed.generation > generation)
        {
            return Ok(false);
        }
        *guard = Some(ReadyIndex {
            generation,
            index,
            reader,
            fields,
        });
        Ok(true)
    }

    pub(crate) fn build_schema() -> (Schema, SearchFields) {
        let mut schema_builder = Schema::builder();

        let doc_type = schema_builder.add_text_field("doc_type", STRING | STORED);
        let id = schema_builder.add_text_field("id", STRING | STORED);
        let name = schema_builder.add_text_field("name", STORED);
        let summary = schema_builder.add_text_field("summary", STORED);
        let state = schema_builder.add_text_field("state", STRING | STORED);
        let image_url = schema_builder.add_text_field("image_url", STORED);

        let numeric = NumericOptions::default()
            .set_stored()
            .set_indexed()
            .set_fast();
        let price_cents = schema_builder.add_u64_field("price_cents", numeric.clone());
        let available = schema_builder.add_u64_field("available", numeric);

        let text_indexing = TextFieldIndexing::default()
            .set_tokenizer(TOKENIZER)
            .set_index_option(IndexRecordOption::WithFreqsAndPositions);
        let text_options = TextOptions::default().set_indexing_options(text_indexing);

        let name_text = schema_builder.add_text_field("name_text", text_options.clone());
        let body_text = schema_builder.add_text_field("body_text", text_options.clone());
        let tags_text = schema_builder.add_text_field("tags_text", text_options);

        let fields = SearchFields {
            doc_type,
            id,
            name,
            summary,
            state,
            image_url,
            price_cents,
            available,
            name_text,
            body_text,
            tags_text,
        };
        (schema_builder.build(), fields)
    }

    /// Search products and shops.
    ///
    /// Filters apply to products only. Shops are matched on text and only
    /// returned for a non-empty query. Returns empty results while the index
    /// is still building.
    ///
    /// # Errors
    ///
    /// Returns an error if the index lock is poisoned or the query fails.
    #[instrument(skip(self))]
    // The guard must outlive every borrow of `ready`.
    #[allow(clippy::significant_drop_tightening)]
    pub fn search(
        &self,
        query_str: &str,
        filters: &SearchFilters,
        sort: SearchSort,
        limit: usize,
    ) -> Result<SearchResults, SearchError> {
        let query_str = query_str.trim().to_string();

        let guard = self
            .inner
            .read()
            .map_err(|_| SearchError::Index("Lock poisoned".to_string()))?;

        let Some(ready) = guard.as_ref() else {
            return Ok(SearchResults {
                query: query_str,
                ..SearchResults::default()
            });
        };

        let terms = analyze(&ready.index, &query_str);
        let searcher = ready.reader.searcher();

        // Products
        let product_query = Self::product_query(&ready.fields, &terms, filters);
        let top = TopDocs::with_limit(limit.max(1));
        let (mut products, total_count) = match sort {
            SearchSort::Relevance => {
                let (top_docs, count) = searcher
                    .search(&product_query, &(top, Count))
                    .map_err(|e| SearchError::Query(format!("Search failed: {e}")))?;
                (Self::collect_hits(&searcher, &ready.fields, top_docs)?, count)
            }
            SearchSort::PriceAsc | SearchSort::PriceDesc => {
                let order = if sort == SearchSort::PriceAsc {
                    Order::Asc
                } else {
                    Order::Desc
                };
                let by_price = top.order_by_u64_field("price_cents", order);
                let (top_docs, count) = searcher
                    .search(&product_query, &(by_price, Count))
                    .map_err(|e| SearchError::Query(format!("Search failed: {e}")))?;
                let unscored = top_docs.into_iter().map(|(_, address)| (0.0, address));
                (Self::collect_hits(&searcher, &ready.fields, unscored)?, count)
            }
        };
        products.truncate(limit);

        let in_stock_query = BooleanQuery::new(vec![
            (Occur::Must, product_query.box_clone()),
            (Occur::Must, availability_query(&ready.fields, true)),
        ]);
        let in_stock_count = searcher
            .search(&in_stock_query, &Count)
            .map_err(|e| SearchError::Query(format!("Count failed: {e}")))?;

        // Shops
        let shops = if terms.is_empty() {
            Vec::new()
        } else {
            let shop_query = BooleanQuery::new(vec![
                (Occur::Must, doc_type_query(&ready.fields, DocType::Shop)),
                (Occur::Must, Self::text_query(&ready.fields, &terms)),
            ]);
            let top_docs = searcher
                .search(&shop_query, &TopDocs::with_limit(limit.max(1)))
                .map_err(|e| SearchError::Query(format!("Search failed: {e}")))?;
            Self::collect_hits(&searcher, &ready.fields, top_docs)?
        };

        Ok(SearchResults {
            products,
            shops,
            query: query_str,
            total_count,
            in_stock_count,
        })
    }

    /// Text match across name, body and tags.
    ///
    /// Short terms match as prefixes; longer terms match exactly or within
    /// one edit.
    fn text_query(fields: &SearchFields, terms: &[String]) -> Box<dyn Query> {
        if terms.is_empty() {
            return Box::new(AllQuery);
        }

        let mut subqueries: Vec<(Occur, Box<dyn Query>)> = Vec::new();
        for term in terms {
            if term.chars().count() < 3 {
                let pattern = format!("{}.*", escape_regex(term));
                for field in [fields.name_text, fields.tags_text] {
                    if let Ok(regex) = RegexQuery::from_pattern(&pattern, field) {
                        subqueries.push((Occur::Should, Box::new(regex)));
                    }
                }
                continue;
            }

            let name_term = Term::from_field_text(fields.name_text, term);
            subqueries.push((
                Occur::Should,
                Box::new(TermQuery::new(name_term.clone(), IndexRecordOption::Basic)),
            ));
            subqueries.push((
                Occur::Should,
                Box::new(FuzzyTermQuery::new(name_term, 1, true)),
            ));

            let body_term = Term::from_field_text(fields.body_text, term);
            subqueries.push((
                Occur::Should,
                Box::new(TermQuery::new(body_term.clone(), IndexRecordOption::Basic)),
            ));
            subqueries.push((
                Occur::Should,
                Box::new(FuzzyTermQuery::new(body_term, 1, true)),
            ));

            let tags_term = Term::from_field_text(fields.tags_text, term);
            subqueries.push((
                Occur::Should,
                Box::new(TermQuery::new(tags_term, IndexRecordOption::Basic)),
            ));
        }
        Box::new(BooleanQuery::new(subqueries))
    }

    fn product_query(
        fields: &SearchFields,
        terms: &[String],
        filters: &SearchFilters,
    ) -> Box<dyn Query> {
        let mut must: Vec<(Occur, Box<dyn Query>)> = vec![
            (Occur::Must, Self::text_query(fields, terms)),
            (Occur::Must, doc_type_query(fields, DocType::Product)),
        ];

        if let Some(available) = filters.available {
            must.push((Occur::Must, availability_query(fields, available)));
        }

        if filters.min_price_cents.is_some() || filters.max_price_cents.is_some() {
            let min = filters.min_price_cents.unwrap_or(0);
            let max = filters.max_price_cents.unwrap_or(u64::MAX);
            must.push((
                Occur::Must,
                Box::new(RangeQuery::new(
                    Bound::Included(Term::from_field_u64(fields.price_cents, min)),
                    Bound::Included(Term::from_field_u64(fields.price_cents, max)),
                )),
            ));
        }

        if let Some(state) = &filters.state {
            must.push((
                Occur::Must,
                Box::new(TermQuery::new(
                    Term::from_field_text(fields.state, state),
                    IndexRecordOption::Basic,
                )),
            ));
        }

        Box::new(BooleanQuery::new(must))
    }

    fn collect_hits(
        searcher: &tantivy::Searcher,
        fields: &SearchFields,
        top_docs: impl IntoIterator<Item = (f32, tantivy::DocAddress)>,
    ) -> Result<Vec<SearchHit>, SearchError> {
        top_docs
            .into_iter()
            .map(|(score, address)| {
                let doc = searcher
                    .doc::<tantivy::TantivyDocument>(address)
                    .map_err(|e| SearchError::Query(format!("Failed to retrieve doc: {e}")))?;
                Self::doc_to_hit(fields, &doc, score)
            })
            .collect()
    }

    fn doc_to_hit(
        fields: &SearchFields,
        doc: &tantivy::TantivyDocument,
        score: f32,
    ) -> Result<SearchHit, SearchError> {
        let get_text = |field: Field| -> String {
            doc.get_first(field)
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string()
        };
        let get_u64 = |field: Field| doc.get_first(field).and_then(|v| v.as_u64());

        let doc_type_str = get_text(fields.doc_type);
        let doc_type = DocType::parse(&doc_type_str)
            .ok_or_else(|| SearchError::Query(format!("Invalid doc_type: {doc_type_str}")))?;
        let image_url = get_text(fields.image_url);

        Ok(SearchHit {
            doc_type,
            id: get_text(fields.id),
            name: get_text(fields.name),
            summary: get_text(fields.summary),
            state: get_text(fields.state),
            image_url: (!image_url.is_empty()).then_some(image_url),
            price_cents: match doc_type {
                DocType::Product => get_u64(fields.price_cents),
                DocType::Shop => None,
            },
            available: get_u64(fields.available).is_some_and(|v| v == 1),
            score,
        })
    }

    /// Number of documents in the index, or 0 if not ready.
    #[must_use]
    pub fn num_docs(&self) -> u64 {
        self.inner
            .read()
            .ok()
            .and_then(|guard| guard.as_ref().map(|r| r.reader.searcher().num_docs()))
            .unwrap_or(0)
    }
}

fn doc_type_query(fields: &SearchFields, doc_type: DocType) -> Box<dyn Query> {
    Box::new(TermQuery::new(
        Term::from_field_text(fields.doc_type, doc_type.as_str()),
        IndexRecordOption::Basic,
    ))
}

fn availability_query(fields: &SearchFields, available: bool) -> Box<dyn Query> {
    Box::new(TermQuery::new(
        Term::from_field_u64(fields.available, u64::from(available)),
        IndexRecordOption::Basic,
    ))
}

/// Run text through the index tokenizer so query terms match indexed terms.
fn analyze(index: &Index, text: &str) -> Vec<String> {
    let Some(mut analyzer) = index.tokenizers().get(TOKENIZER) else {
        return text.split_whitespace().map(str::to_lowercase).collect();
    };
    let mut terms = Vec::new();
    let mut stream = analyzer.token_stream(text);
    stream.process(&mut |token| terms.push(token.text.clone()));
    terms
}

fn escape_regex(term: &str) -> String {
    term.chars()
        .flat_map(|c| match c {
            '.' | '*' | '+' | '?' | '^' | '$' | '(' | ')' | '[' | ']' | '{' | '}' | '|' | '\\' => {
                vec!['\\', c]
            }
            _ => vec![c],
        })
        .collect()
}

/// Product filters.
#[derive(Debug, Default, Clone)]
pub struct SearchFilters {
    /// Some(true) = in stock only, Some(false) = sold out only
    pub available: Option<bool>,
    /// Minimum price in centavos (inclusive)
    pub min_price_cents: Option<u64>,
    /// Maximum price in centavos (inclusive)
    pub max_price_cents: Option<u64>,
    /// Exact state of origin
    pub state: Option<String>,
}

/// Search sort order.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SearchSort {
    #[default]
    Relevance,
    PriceAsc,
    PriceDesc,
}

impl SearchSort {
    /// Parse from URL parameter value.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "price-ascending" | "price_asc" => Self::PriceAsc,
            "price-descending" | "price_desc" => Self::PriceDesc,
            _ => Self::Relevance,
        }
    }

    /// Convert to URL parameter value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Relevance => "relevance",
            Self::PriceAsc => "price_asc",
            Self::PriceDesc => "price_desc",
        }
    }
}

/// Search results.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults {
    pub products: Vec<SearchHit>,
    pub shops: Vec<SearchHit>,
    pub query: String,
    /// Matching products before the limit
    pub total_count: usize,
    /// Matching products that are in stock
    pub in_stock_count: usize,
}

impl SearchResults {
    /// Check if there are any results.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.products.is_empty() && self.shops.is_empty()
    }
}

/// Search errors.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("Index error: {0}")]
    Index(String),
    #[error("Query error: {0}")]
    Query(String),
    #[error("Build error: {0}")]
    Build(String),
}
