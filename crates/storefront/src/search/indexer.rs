//! Search index builder.
//!
//! Builds the index from the catalog snapshot, either inline or on a
//! blocking worker that swaps the result in when done.

use papalote_core::models::{Product, Shop};
use tantivy::tokenizer::{
    AsciiFoldingFilter, Language, LowerCaser, RemoveLongFilter, SimpleTokenizer, Stemmer,
    TextAnalyzer,
};
use tantivy::{Index, IndexWriter};
use tracing::{debug, error, info, instrument, warn};

use crate::catalog::Catalog;

use super::{DocType, SearchError, SearchFields, SearchIndex, TOKENIZER};

/// Spawn a blocking task that rebuilds the index from the catalog.
///
/// Until the first build completes, `SearchIndex::search()` returns empty
/// results. Later rebuilds keep serving the previous index until the swap.
pub fn build_index_async(search_index: SearchIndex, catalog: Catalog) {
    info!("Spawning background search index build task");
    tokio::task::spawn_blocking(move || {
        if let Err(e) = build_index(&search_index, &catalog) {
            error!(error = %e, "Failed to build search index");
        }
    });
}

/// Build the index from the current catalog snapshot and swap it in.
///
/// When builds overlap, the one from the newest snapshot wins regardless of
/// which finishes last.
///
/// # Errors
///
/// Returns `SearchError` if the writer cannot be created, the commit fails
/// or the lock is poisoned.
#[instrument(skip_all)]
pub fn build_index(search_index: &SearchIndex, catalog: &Catalog) -> Result<(), SearchError> {
    let (generation, products) = catalog.snapshot();
    let (index, fields) = build_ram_index(&products, catalog.shops())?;
    if search_index.set_ready(index, fields, generation)? {
        info!(generation, "Search index is ready");
    } else {
        debug!(generation, "Discarded search index built from an older catalog");
    }
    Ok(())
}

/// Index `products` and `shops` into a fresh in-RAM index.
pub(crate) fn build_ram_index(
    products: &[Product],
    shops: &[Shop],
) -> Result<(Index, SearchFields), SearchError> {
    let (schema, fields) = SearchIndex::build_schema();
    let index = Index::create_in_ram(schema);
    index.tokenizers().register(
        TOKENIZER,
        TextAnalyzer::builder(SimpleTokenizer::default())
            .filter(RemoveLongFilter::limit(40))
            .filter(LowerCaser)
            .filter(AsciiFoldingFilter)
            .filter(Stemmer::new(Language::Spanish))
            .build(),
    );

    let mut writer: IndexWriter = index
        .writer_with_num_threads(1, 20_000_000)
        .map_err(|e| SearchError::Build(format!("Failed to create writer: {e}")))?;

    let product_docs = index_products(products, &writer, &fields);
    let shop_docs = index_shops(shops, &writer, &fields);

    writer
        .commit()
        .map_err(|e| SearchError::Build(format!("Failed to commit index: {e}")))?;

    debug!(products = product_docs, shops = shop_docs, "Search documents committed");
    Ok((index, fields))
}

fn index_products(products: &[Product], writer: &IndexWriter, fields: &SearchFields) -> usize {
    let mut count = 0;
    for product in products {
        let body = format!(
            "{} {} {} {}",
            product.description,
            product.maker_name,
            product.category,
            product.materials.join(" ")
        );
        let doc = tantivy::doc!(
            fields.doc_type => DocType::Product.as_str(),
            fields.id => product.id.as_str(),
            fields.name => product.name.clone(),
            fields.summary => format!("{} · {}", product.maker_name, product.category),
            fields.state => product.state.clone(),
            fields.image_url => product.primary_image().unwrap_or_default(),
            fields.price_cents => product.money().cents(),
            fields.available => u64::from(product.in_stock()),
            fields.name_text => product.name.clone(),
            fields.body_text => body,
            fields.tags_text => product.tags.join(" ")
        );

        if let Err(e) = writer.add_document(doc) {
            warn!(error = %e, product_id = %product.id, "Failed to index product");
        } else {
            count += 1;
        }
    }
    count
}

fn index_shops(shops: &[Shop], writer: &IndexWriter, fields: &SearchFields) -> usize {
    let mut count = 0;
    for shop in shops {
        let doc = tantivy::doc!(
            fields.doc_type => DocType::Shop.as_str(),
            fields.id => shop.id.as_str(),
            fields.name => shop.name.clone(),
            fields.summary => format!("{} · {}, {}", shop.craft, shop.city, shop.state),
            fields.state => shop.state.clone(),
            fields.image_url => shop.avatar.clone().unwrap_or_default(),
            fields.price_cents => 0u64,
            fields.available => 1u64,
            fields.name_text => format!("{} {}", shop.name, shop.maker_name),
            fields.body_text => format!("{} {} {}", shop.bio, shop.city, shop.state),
            fields.tags_text => shop.craft.clone()
        );

        if let Err(e) = writer.add_document(doc) {
            warn!(error = %e, shop_id = %shop.id, "Failed to index shop");
        } else {
            count += 1;
        }
    }
    count
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::catalog::tests::bundled;
    use crate::search::{SearchFilters, SearchSort};

    fn ready_index() -> (SearchIndex, Catalog) {
        let catalog = Catalog::new(&bundled());
        let index = SearchIndex::new();
        build_index(&index, &catalog).unwrap();
        (index, catalog)
    }

    #[test]
    fn test_older_build_does_not_replace_newer() {
        let fixtures = bundled();
        let catalog = Catalog::new(&fixtures);
        let index = SearchIndex::new();
        let (old_generation, old_products) = catalog.snapshot();

        catalog.sync_listings(&[]);
        build_index(&index, &catalog).unwrap();
        let (new_generation, new_products) = catalog.snapshot();
        assert_eq!(index.generation(), Some(new_generation));

        let (stale, fields) = build_ram_index(&old_products, catalog.shops()).unwrap();
        assert!(!index.set_ready(stale, fields, old_generation).unwrap());
        assert_eq!(index.generation(), Some(new_generation));
        assert_eq!(
            index.num_docs(),
            (new_products.len() + catalog.shops().len()) as u64
        );
    }

    #[test]
    fn test_empty_before_build() {
        let index = SearchIndex::new();
        assert!(!index.is_ready());
        let results = index
            .search("barro", &SearchFilters::default(), SearchSort::Relevance, 10)
            .unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_indexes_products_and_shops() {
        let (index, catalog) = ready_index();
        assert!(index.is_ready());
        let expected = catalog.all_products().len() + catalog.shops().len();
        assert_eq!(index.num_docs(), expected as u64);
    }

    #[test]
    fn test_accent_insensitive_match() {
        let (index, _) = ready_index();
        let results = index
            .search("cantaro", &SearchFilters::default(), SearchSort::Relevance, 10)
            .unwrap();
        assert!(
            results
                .products
                .iter()
                .any(|hit| hit.name.contains("Cántaro"))
        );
    }

    #[test]
    fn test_fuzzy_match_tolerates_typo() {
        let (index, _) = ready_index();
        let results = index
            .search("alebrje", &SearchFilters::default(), SearchSort::Relevance, 10)
            .unwrap();
        assert!(!results.products.is_empty());
    }

    #[test]
    fn test_short_term_prefix() {
        let (index, _) = ready_index();
        let results = index
            .search("re", &SearchFilters::default(), SearchSort::Relevance, 10)
            .unwrap();
        assert!(results.products.iter().any(|hit| hit.name.starts_with("Rebozo")));
    }

    #[test]
    fn test_shop_matches() {
        let (index, _) = ready_index();
        let results = index
            .search("barro negro", &SearchFilters::default(), SearchSort::Relevance, 10)
            .unwrap();
        assert!(results.shops.iter().any(|hit| hit.id == "shop-oaxaca-barro"));
    }

    #[test]
    fn test_filters_and_price_sort() {
        let (index, _) = ready_index();
        let filters = SearchFilters {
            available: Some(true),
            max_price_cents: Some(100_000),
            ..SearchFilters::default()
        };
        let results = index
            .search("", &filters, SearchSort::PriceAsc, 50)
            .unwrap();
        assert!(!results.products.is_empty());
        assert!(results.products.iter().all(|h| h.available));
        assert!(
            results
                .products
                .iter()
                .all(|h| h.price_cents.unwrap() <= 100_000)
        );
        assert!(
            results
                .products
                .windows(2)
                .all(|w| w[0].price_cents <= w[1].price_cents)
        );
        assert_eq!(results.in_stock_count, results.total_count);
        assert!(results.shops.is_empty());
    }

    #[test]
    fn test_price_sort_spans_every_match() {
        let (index, catalog) = ready_index();
        let cents: Vec<u64> = catalog
            .all_products()
            .iter()
            .map(|p| p.money().cents())
            .collect();
        let cheapest = cents.iter().min().copied();
        let priciest = cents.iter().max().copied();

        let asc = index
            .search("", &SearchFilters::default(), SearchSort::PriceAsc, 1)
            .unwrap();
        assert_eq!(asc.products.len(), 1);
        assert_eq!(asc.products[0].price_cents, cheapest);
        assert_eq!(asc.total_count, cents.len());

        let desc = index
            .search("", &SearchFilters::default(), SearchSort::PriceDesc, 2)
            .unwrap();
        assert_eq!(desc.products[0].price_cents, priciest);
        assert!(desc.products[0].price_cents >= desc.products[1].price_cents);
    }
}
