//! Name search index.
//!
//! A [`MembershipFilter`] holding every prefix of every normalized product
//! name sits in front of a [`PrefixIndex`] from normalized name to product id.
//! A search term the filter has never seen as a prefix is rejected without
//! walking the trie; any other term is answered by the trie.

use std::fmt;

use tracing::{debug, info, warn};

use super::product::{Product, ProductId};
use crate::config::index::IndexConfig;
use crate::data_structures::{
    normalize_key, MembershipFilter, MembershipFilterConfig, MembershipFilterError, PrefixIndex,
};

/// Search index over product names.
pub struct CatalogIndex {
    filter: MembershipFilter,
    names: PrefixIndex<ProductId>,
    filter_config: MembershipFilterConfig,
    saturation_warning_ratio: f64,
}

impl CatalogIndex {
    /// Create an empty index sized by `config`.
    pub fn new(config: &IndexConfig) -> Result<Self, MembershipFilterError> {
        let filter_config = config.filter_config();
        let filter = MembershipFilter::with_config(&filter_config)?;

        Ok(Self {
            filter,
            names: PrefixIndex::new(),
            filter_config,
            saturation_warning_ratio: config.saturation_warning_ratio,
        })
    }

    /// Index a product under its name.
    ///
    /// Two products whose names normalize to the same key collide; the later
    /// one wins and the earlier one is no longer reachable by name.
    pub fn add(&mut self, product: &Product) {
        let name = normalize_key(product.name());

        for (end, _) in name.char_indices().skip(1) {
            self.filter.add(&name[..end]);
        }
        self.filter.add(&name);

        if let Some(previous) = self.names.insert(&name, product.id().clone()) {
            if previous != *product.id() {
                warn!(
                    name = %name,
                    replaced = %previous,
                    by = %product.id(),
                    "Product name collision, earlier product no longer searchable by name"
                );
            }
        }

        debug!(product_id = %product.id(), name = %name, "Indexed product");
    }

    /// Ids of all products whose name starts with `term`, case-insensitively.
    ///
    /// Results are in lexicographic order of normalized name. An empty or
    /// whitespace-only term yields nothing. Spaces inside the term are matched
    /// as typed.
    pub fn search(&self, term: &str) -> Vec<&ProductId> {
        if term.trim().is_empty() {
            return Vec::new();
        }

        let key = normalize_key(term);
        if !self.filter.contains(&key) {
            debug!(term = %key, "Search term rejected by membership filter");
            return Vec::new();
        }

        self.names.search_prefix(&key).collect()
    }

    /// Whether some product has exactly this name, case-insensitively.
    pub fn contains_name(&self, name: &str) -> bool {
        self.lookup_name(name).is_some()
    }

    /// Id of the product indexed under exactly this name.
    pub fn lookup_name(&self, name: &str) -> Option<&ProductId> {
        let key = normalize_key(name);
        if !self.filter.contains(&key) {
            return None;
        }
        self.names.get(&key)
    }

    /// Discard both structures and index `products` from scratch.
    ///
    /// The filter keeps its configured size; a catalog that has outgrown it
    /// shows up as a saturation warning.
    pub fn rebuild<'a, I>(&mut self, products: I)
    where
        I: IntoIterator<Item = &'a Product>,
    {
        self.filter.clear();
        self.names.clear();

        for product in products {
            self.add(product);
        }

        let fill_ratio = self.filter.fill_ratio();
        info!(
            products = self.names.len(),
            filter_keys = self.filter.keys_added(),
            fill_ratio,
            "Search index rebuilt"
        );

        if fill_ratio > self.saturation_warning_ratio {
            warn!(
                fill_ratio,
                expected_keys = self.filter_config.expected_keys(),
                estimated_false_positive_rate = self.filter.estimated_false_positive_rate(),
                "Membership filter is saturated, raise index.expected_keys"
            );
        }
    }

    /// Number of distinct names indexed.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// The membership filter, for diagnostics.
    pub fn filter(&self) -> &MembershipFilter {
        &self.filter
    }
}

impl fmt::Debug for CatalogIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogIndex")
            .field("filter", &format_args!("{}", self.filter))
            .field("names", &self.names.len())
            .finish()
    }
}
