//! Navigable routes a search hit or a card can lead to.

use std::fmt;

use url::form_urlencoded;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Product(String),
    Store(String),
    Activity(u64),
    Block(u64),
    Search(String),
}

impl Route {
    /// Route to the search-results view, or `None` for a blank query.
    pub fn search(query: &str) -> Option<Self> {
        let trimmed = query.trim();
        (!trimmed.is_empty()).then(|| Route::Search(trimmed.to_string()))
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Product(id) => format!("/products/{id}"),
            Route::Store(id) => format!("/stores/{id}"),
            Route::Activity(id) => format!("/activities/{id}"),
            Route::Block(id) => format!("/blocks/{id}"),
            Route::Search(query) => {
                let encoded = form_urlencoded::Serializer::new(String::new())
                    .append_pair("query", query)
                    .finish();
                format!("/search?{encoded}")
            }
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_paths() {
        assert_eq!(Route::Home.path(), "/");
        assert_eq!(Route::Product("p1".into()).path(), "/products/p1");
        assert_eq!(Route::Store("s1".into()).path(), "/stores/s1");
        assert_eq!(Route::Activity(3).to_string(), "/activities/3");
        assert_eq!(Route::Block(2).path(), "/blocks/2");
    }

    #[test]
    fn search_route_trims_and_encodes() {
        let route = Route::search("  nasi & ayam ").unwrap();
        assert_eq!(route, Route::Search("nasi & ayam".into()));
        assert_eq!(route.path(), "/search?query=nasi+%26+ayam");
        assert_eq!(Route::search("   "), None);
    }
}
