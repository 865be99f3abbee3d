// src/catalog.rs - Shop catalog filtering, sorting and pagination

use serde::{Deserialize, Serialize};

use crate::model::{Category, Product};
use crate::types::Money;

/// Products shown per shop page
pub const SHOP_PAGE_SIZE: usize = 16;

/// Upper bound of the price-range slider
pub const PRICE_CEILING: Money = 10_000.0;

/// Sort modes offered on the shop page.
///
/// `Newest`/`Oldest` order by the id string as a proxy for recency; this
/// matches the backend's sequential textual ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortMode {
    Default,
    PriceAsc,
    PriceDesc,
    Brand,
    Newest,
    Oldest,
}

impl Default for SortMode {
    fn default() -> Self {
        Self::Default
    }
}

/// The boolean-flag facet: at most one of the three may be selected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TypeFacet {
    Featured,
    NewArrival,
    Promotion,
}

impl TypeFacet {
    /// Parses the `type` token used in shop URLs
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "featured" => Some(Self::Featured),
            "new" => Some(Self::NewArrival),
            "promotion" => Some(Self::Promotion),
            _ => None,
        }
    }

    fn applies_to(self, product: &Product) -> bool {
        match self {
            Self::Featured => product.is_featured,
            Self::NewArrival => product.is_new_arrival,
            Self::Promotion => product.is_promotion,
        }
    }
}

/// User-adjustable filter state for the shop page.
///
/// Facets AND together; selections within one facet OR together. An empty
/// selection set means the facet does not constrain the result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShopFilter {
    pub price_min: Money,
    pub price_max: Money,
    pub categories: Vec<String>,
    pub brands: Vec<String>,
    pub sizes: Vec<String>,
    pub colors: Vec<String>,
    pub search: String,
    pub type_facet: Option<TypeFacet>,
    pub page: usize,
    pub sort: SortMode,
}

impl Default for ShopFilter {
    fn default() -> Self {
        Self {
            price_min: 0.0,
            price_max: PRICE_CEILING,
            categories: Vec::new(),
            brands: Vec::new(),
            sizes: Vec::new(),
            colors: Vec::new(),
            search: String::new(),
            type_facet: None,
            page: 1,
            sort: SortMode::Default,
        }
    }
}

impl ShopFilter {
    /// Whether any facet deviates from its cleared state
    pub fn is_active(&self) -> bool {
        let cleared = Self::default();
        self.price_min != cleared.price_min
            || self.price_max != cleared.price_max
            || !self.categories.is_empty()
            || !self.brands.is_empty()
            || !self.sizes.is_empty()
            || !self.colors.is_empty()
            || !self.search.is_empty()
            || self.type_facet.is_some()
    }

    fn matches(&self, product: &Product) -> bool {
        let matches_price = product.price >= self.price_min && product.price <= self.price_max;
        let matches_category =
            self.categories.is_empty() || self.categories.contains(&product.category_id);
        let matches_brand = self.brands.is_empty() || self.brands.contains(&product.brand.name);
        let matches_size =
            self.sizes.is_empty() || product.sizes.iter().any(|s| self.sizes.contains(s));
        let matches_color =
            self.colors.is_empty() || product.colors.iter().any(|c| self.colors.contains(c));
        let matches_search = self.search.is_empty() || {
            let query = self.search.to_lowercase();
            product.name.to_lowercase().contains(&query)
                || product.description.to_lowercase().contains(&query)
        };
        let matches_type = match self.type_facet {
            None => true,
            Some(facet) => facet.applies_to(product),
        };

        matches_price
            && matches_category
            && matches_brand
            && matches_size
            && matches_color
            && matches_search
            && matches_type
    }
}

/// One derived page of the filtered, sorted catalog
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogPage {
    pub items: Vec<Product>,
    pub total_matches: usize,
    pub total_pages: usize,
    /// The page actually shown after clamping into range
    pub page: usize,
    /// Page size the page was cut with
    pub page_size: usize,
}

impl CatalogPage {
    /// 1-based index of the first shown result, for "Showing x-y of z"
    pub fn start_index(&self) -> usize {
        if self.items.is_empty() {
            0
        } else {
            (self.page - 1) * self.page_size + 1
        }
    }

    /// 1-based index of the last shown result
    pub fn end_index(&self) -> usize {
        if self.items.is_empty() {
            0
        } else {
            self.start_index() + self.items.len() - 1
        }
    }
}

/// Derives the visible product subset from the immutable catalog snapshot.
///
/// Queries are pure: the same snapshot and filter always produce the same
/// page, and the snapshot's order is never mutated.
#[derive(Debug, Clone)]
pub struct CatalogEngine {
    products: Vec<Product>,
    page_size: usize,
}

impl CatalogEngine {
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            products,
            page_size: SHOP_PAGE_SIZE,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Distinct brand names in first-seen order
    pub fn brand_names(&self) -> Vec<String> {
        let mut seen = Vec::new();
        for p in &self.products {
            if !seen.contains(&p.brand.name) {
                seen.push(p.brand.name.clone());
            }
        }
        seen
    }

    /// Distinct sizes in first-seen order
    pub fn sizes(&self) -> Vec<String> {
        let mut seen = Vec::new();
        for p in &self.products {
            for s in &p.sizes {
                if !seen.contains(s) {
                    seen.push(s.clone());
                }
            }
        }
        seen
    }

    /// Distinct colors in first-seen order
    pub fn colors(&self) -> Vec<String> {
        let mut seen = Vec::new();
        for p in &self.products {
            for c in &p.colors {
                if !seen.contains(c) {
                    seen.push(c.clone());
                }
            }
        }
        seen
    }

    /// Applies the filter, sort and pagination and returns the visible page.
    ///
    /// Sorting works on a shallow copy with a stable sort. Out-of-range
    /// page requests clamp into range; an empty match set yields zero
    /// pages and an empty page 1.
    pub fn query(&self, filter: &ShopFilter) -> CatalogPage {
        let mut matched: Vec<Product> = self
            .products
            .iter()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect();

        match filter.sort {
            SortMode::Default => {}
            SortMode::PriceAsc => matched.sort_by(|a, b| {
                a.price
                    .partial_cmp(&b.price)
                    .unwrap_or(std::cmp::Ordering::Equal)
            }),
            SortMode::PriceDesc => matched.sort_by(|a, b| {
                b.price
                    .partial_cmp(&a.price)
                    .unwrap_or(std::cmp::Ordering::Equal)
            }),
            SortMode::Brand => matched
                .sort_by(|a, b| a.brand.name.to_lowercase().cmp(&b.brand.name.to_lowercase())),
            SortMode::Newest => matched.sort_by(|a, b| b.id.cmp(&a.id)),
            SortMode::Oldest => matched.sort_by(|a, b| a.id.cmp(&b.id)),
        }

        let total_matches = matched.len();
        let total_pages = total_matches.div_ceil(self.page_size);
        let page = filter.page.clamp(1, total_pages.max(1));

        let start = (page - 1) * self.page_size;
        let items: Vec<Product> = matched
            .into_iter()
            .skip(start)
            .take(self.page_size)
            .collect();

        CatalogPage {
            items,
            total_matches,
            total_pages,
            page,
            page_size: self.page_size,
        }
    }
}

/// One shop-page visit: the catalog snapshot plus live filter state.
///
/// Every filter or sort change resets the page to 1; the URL query string
/// is merged into filter state exactly once per visit.
#[derive(Debug, Clone)]
pub struct ShopSession {
    engine: CatalogEngine,
    categories: Vec<Category>,
    filter: ShopFilter,
    url_seeded: bool,
}

impl ShopSession {
    pub fn new(products: Vec<Product>, categories: Vec<Category>) -> Self {
        Self {
            engine: CatalogEngine::new(products),
            categories,
            filter: ShopFilter::default(),
            url_seeded: false,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.engine = self.engine.with_page_size(page_size);
        self
    }

    pub fn engine(&self) -> &CatalogEngine {
        &self.engine
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn filter(&self) -> &ShopFilter {
        &self.filter
    }

    /// The currently visible page
    pub fn view(&self) -> CatalogPage {
        self.engine.query(&self.filter)
    }

    /// Merges navigation query parameters into filter state.
    ///
    /// Recognizes `category` (a slug, resolved against the loaded category
    /// list), `search` and `type`. Applied once per session; later calls
    /// are no-ops so in-page filter changes do not fight the URL.
    pub fn seed_from_url(&mut self, query_string: &str) {
        if self.url_seeded {
            return;
        }
        self.url_seeded = true;

        for (key, value) in parse_query_string(query_string) {
            match key.as_str() {
                "category" => {
                    if let Some(category) = self.categories.iter().find(|c| c.slug == value) {
                        if !self.filter.categories.contains(&category.id) {
                            self.filter.categories = vec![category.id.clone()];
                        }
                    }
                }
                "search" if !value.is_empty() => self.filter.search = value,
                "type" => self.filter.type_facet = TypeFacet::from_token(&value),
                _ => {}
            }
        }
    }

    pub fn set_sort(&mut self, sort: SortMode) {
        self.filter.sort = sort;
        self.filter.page = 1;
    }

    pub fn set_price_range(&mut self, min: Money, max: Money) {
        self.filter.price_min = min;
        self.filter.price_max = max;
        self.filter.page = 1;
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.filter.search = search.into();
        self.filter.page = 1;
    }

    pub fn set_type_facet(&mut self, facet: Option<TypeFacet>) {
        self.filter.type_facet = facet;
        self.filter.page = 1;
    }

    pub fn toggle_category(&mut self, id: &str) {
        Self::toggle(&mut self.filter.categories, id);
        self.filter.page = 1;
    }

    pub fn toggle_brand(&mut self, name: &str) {
        Self::toggle(&mut self.filter.brands, name);
        self.filter.page = 1;
    }

    pub fn toggle_size(&mut self, size: &str) {
        Self::toggle(&mut self.filter.sizes, size);
        self.filter.page = 1;
    }

    pub fn toggle_color(&mut self, color: &str) {
        Self::toggle(&mut self.filter.colors, color);
        self.filter.page = 1;
    }

    /// Navigates to a page; the view clamps it into range
    pub fn set_page(&mut self, page: usize) {
        self.filter.page = page.max(1);
    }

    /// Resets every facet, the price bounds, the search text and the page
    pub fn clear_filters(&mut self) {
        let sort = self.filter.sort;
        self.filter = ShopFilter {
            sort,
            ..ShopFilter::default()
        };
    }

    fn toggle(set: &mut Vec<String>, value: &str) {
        if let Some(pos) = set.iter().position(|v| v == value) {
            set.remove(pos);
        } else {
            set.push(value.to_string());
        }
    }
}

/// Decodes an `application/x-www-form-urlencoded` query string, with or
/// without a leading `?`
fn parse_query_string(query: &str) -> Vec<(String, String)> {
    query
        .trim_start_matches('?')
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (decode_component(key), decode_component(value))
        })
        .collect()
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|c| c.into_owned())
        .unwrap_or(spaced)
}
