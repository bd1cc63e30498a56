//! Fixture integrity check.
//!
//! # Usage
//!
//! ```bash
//! papalote-cli validate --data-dir crates/storefront/data
//! ```
//!
//! Exits non-zero when any problem is found.

use std::path::Path;

use papalote_storefront::catalog::{Fixtures, validate::validate};
use tracing::{info, warn};

/// Load the fixtures in `data_dir` and report every integrity problem.
///
/// # Errors
///
/// Returns an error if the fixtures fail to load or any problem is found.
pub fn run(data_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let fixtures = Fixtures::load(data_dir)?;
    let problems = validate(&fixtures);

    if problems.is_empty() {
        info!(
            products = fixtures.products.len(),
            shops = fixtures.shops.len(),
            orders = fixtures.orders.len(),
            "Fixtures are consistent"
        );
        return Ok(());
    }

    for problem in &problems {
        warn!("{problem}");
    }
    Err(format!("{} fixture problem(s) found", problems.len()).into())
}
