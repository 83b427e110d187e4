//! Query-string state of the browse page.
//!
//! The whole browse state lives in the URL so every view is linkable. List
//! parameters (`roast`, `origin`, `flavor`, `compare`, `saved`) are
//! comma-separated.

use std::collections::BTreeSet;

use beanscout_core::{CoreError, FilterState, PriceRange, QuickFilter, SortKey};
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::Deserialize;

use crate::templates::Theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListParam {
    Roast,
    Origin,
    Flavor,
    Compare,
    Wishlist,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BrowseQuery {
    pub q: Option<String>,
    pub roast: Option<String>,
    pub origin: Option<String>,
    pub flavor: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub sort: Option<String>,
    pub quick: Option<String>,
    pub compare: Option<String>,
    pub saved: Option<String>,
    pub theme: Option<String>,
}

fn split_list(value: Option<&str>) -> Vec<String> {
    value
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

fn join_list(values: &[String]) -> Option<String> {
    (!values.is_empty()).then(|| values.join(","))
}

impl BrowseQuery {
    fn list_slot(&mut self, param: ListParam) -> &mut Option<String> {
        match param {
            ListParam::Roast => &mut self.roast,
            ListParam::Origin => &mut self.origin,
            ListParam::Flavor => &mut self.flavor,
            ListParam::Compare => &mut self.compare,
            ListParam::Wishlist => &mut self.saved,
        }
    }

    /// Values of a list parameter in URL order.
    #[must_use]
    pub fn list(&self, param: ListParam) -> Vec<String> {
        let raw = match param {
            ListParam::Roast => &self.roast,
            ListParam::Origin => &self.origin,
            ListParam::Flavor => &self.flavor,
            ListParam::Compare => &self.compare,
            ListParam::Wishlist => &self.saved,
        };
        split_list(raw.as_deref())
    }

    pub fn set_list(&mut self, param: ListParam, values: &[String]) {
        *self.list_slot(param) = join_list(values);
    }

    #[must_use]
    pub fn theme(&self) -> Theme {
        Theme::parse(self.theme.as_deref())
    }

    /// Builds the filter state, defaulting the price range to `catalog_range`.
    ///
    /// A single explicit bound that falls outside the catalog range stretches
    /// the other bound to meet it.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError`] for an unknown `sort` or `quick` value or an
    /// inverted explicit price range.
    pub fn filters(&self, catalog_range: PriceRange) -> Result<FilterState, CoreError> {
        let (min, max) = match (self.min_price, self.max_price) {
            (Some(min), Some(max)) => (min, max),
            (Some(min), None) => (min, catalog_range.max().max(min)),
            (None, Some(max)) => (catalog_range.min().min(max), max),
            (None, None) => (catalog_range.min(), catalog_range.max()),
        };

        let set = |param| self.list(param).into_iter().collect::<BTreeSet<_>>();

        Ok(FilterState {
            price_range: PriceRange::new(min, max)?,
            roast_levels: set(ListParam::Roast),
            origins: set(ListParam::Origin),
            flavor_profiles: set(ListParam::Flavor),
            search: self.q.clone().unwrap_or_default(),
            sort: self.sort.as_deref().map(str::parse::<SortKey>).transpose()?.unwrap_or_default(),
            quick: self.quick.as_deref().map(str::parse::<QuickFilter>).transpose()?.unwrap_or_default(),
        })
    }

    /// Copy of this query with `value` added to or removed from `param`.
    #[must_use]
    pub fn toggled(&self, param: ListParam, value: &str) -> Self {
        let mut values = self.list(param);
        if let Some(pos) = values.iter().position(|v| v == value) {
            values.remove(pos);
        } else {
            values.push(value.to_owned());
        }
        let mut next = self.clone();
        next.set_list(param, &values);
        next
    }

    #[must_use]
    pub fn with_quick(&self, quick: QuickFilter) -> Self {
        Self {
            quick: (quick != QuickFilter::All).then(|| quick.as_str().to_owned()),
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_sort(&self, sort: SortKey) -> Self {
        let value = match sort {
            SortKey::Score => None,
            SortKey::Price => Some("price"),
            SortKey::Name => Some("name"),
        };
        Self {
            sort: value.map(ToOwned::to_owned),
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_theme(&self, theme: Theme) -> Self {
        Self {
            theme: Some(theme.as_str().to_owned()),
            ..self.clone()
        }
    }

    /// Clears the filters. Theme, comparison and wishlist survive.
    #[must_use]
    pub fn reset(&self) -> Self {
        Self {
            compare: self.compare.clone(),
            saved: self.saved.clone(),
            theme: self.theme.clone(),
            ..Self::default()
        }
    }

    /// Non-empty parameters as `(name, value)` pairs, in a fixed order.
    #[must_use]
    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        let text = [
            ("q", &self.q),
            ("roast", &self.roast),
            ("origin", &self.origin),
            ("flavor", &self.flavor),
        ];
        let mut pairs: Vec<(&'static str, String)> = text
            .into_iter()
            .filter_map(|(k, v)| v.as_ref().filter(|s| !s.trim().is_empty()).map(|s| (k, s.clone())))
            .collect();
        if let Some(min) = self.min_price {
            pairs.push(("min_price", min.to_string()));
        }
        if let Some(max) = self.max_price {
            pairs.push(("max_price", max.to_string()));
        }
        for (k, v) in [
            ("sort", &self.sort),
            ("quick", &self.quick),
            ("compare", &self.compare),
            ("saved", &self.saved),
            ("theme", &self.theme),
        ] {
            if let Some(v) = v.as_ref().filter(|s| !s.trim().is_empty()) {
                pairs.push((k, v.clone()));
            }
        }
        pairs
    }

    /// Link to the browse page carrying this query.
    #[must_use]
    pub fn href(&self) -> String {
        let query = self
            .pairs()
            .into_iter()
            .map(|(k, v)| format!("{k}={}", utf8_percent_encode(&v, NON_ALPHANUMERIC)))
            .collect::<Vec<_>>()
            .join("&");
        if query.is_empty() {
            "/".to_owned()
        } else {
            format!("/?{query}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range() -> PriceRange {
        PriceRange::new(16.0, 24.0).unwrap()
    }

    #[test]
    fn empty_query_defaults_to_catalog_range_and_score_sort() {
        let filters = BrowseQuery::default().filters(range()).unwrap();
        assert_eq!(filters.price_range, range());
        assert_eq!(filters.sort, SortKey::Score);
        assert_eq!(filters.quick, QuickFilter::All);
        assert!(filters.roast_levels.is_empty());
    }

    #[test]
    fn list_params_split_on_commas() {
        let query = BrowseQuery {
            roast: Some("Light, Dark,,".to_string()),
            ..BrowseQuery::default()
        };
        let filters = query.filters(range()).unwrap();
        assert_eq!(
            filters.roast_levels.into_iter().collect::<Vec<_>>(),
            ["Dark", "Light"]
        );
    }

    #[test]
    fn single_bound_stretches_the_other() {
        let query = BrowseQuery {
            min_price: Some(30.0),
            ..BrowseQuery::default()
        };
        let filters = query.filters(range()).unwrap();
        assert_eq!(filters.price_range.min(), 30.0);
        assert_eq!(filters.price_range.max(), 30.0);

        let query = BrowseQuery {
            max_price: Some(20.0),
            ..BrowseQuery::default()
        };
        let filters = query.filters(range()).unwrap();
        assert_eq!(filters.price_range.min(), 16.0);
        assert_eq!(filters.price_range.max(), 20.0);
    }

    #[test]
    fn inverted_explicit_range_is_rejected() {
        let query = BrowseQuery {
            min_price: Some(25.0),
            max_price: Some(15.0),
            ..BrowseQuery::default()
        };
        assert!(matches!(
            query.filters(range()),
            Err(CoreError::InvalidPriceRange { .. })
        ));
    }

    #[test]
    fn unknown_sort_and_quick_are_rejected() {
        let query = BrowseQuery {
            sort: Some("popularity".to_string()),
            ..BrowseQuery::default()
        };
        assert!(matches!(query.filters(range()), Err(CoreError::UnknownSortKey(_))));

        let query = BrowseQuery {
            quick: Some("cheap".to_string()),
            ..BrowseQuery::default()
        };
        assert!(matches!(query.filters(range()), Err(CoreError::UnknownQuickFilter(_))));
    }

    #[test]
    fn toggled_adds_then_removes() {
        let query = BrowseQuery::default().toggled(ListParam::Roast, "Dark");
        assert_eq!(query.roast.as_deref(), Some("Dark"));
        let query = query.toggled(ListParam::Roast, "Light");
        assert_eq!(query.roast.as_deref(), Some("Dark,Light"));
        let query = query.toggled(ListParam::Roast, "Dark").toggled(ListParam::Roast, "Light");
        assert!(query.roast.is_none());
    }

    #[test]
    fn href_encodes_values_in_fixed_order() {
        let query = BrowseQuery {
            q: Some("cold brew".to_string()),
            origin: Some("Costa Rica".to_string()),
            min_price: Some(15.5),
            theme: Some("latte".to_string()),
            ..BrowseQuery::default()
        };
        assert_eq!(
            query.href(),
            "/?q=cold%20brew&origin=Costa%20Rica&min_price=15.5&theme=latte"
        );
        assert_eq!(BrowseQuery::default().href(), "/");
    }

    #[test]
    fn quick_and_sort_defaults_drop_out_of_the_url() {
        let query = BrowseQuery::default()
            .with_quick(QuickFilter::Deals)
            .with_sort(SortKey::Price);
        assert_eq!(query.href(), "/?sort=price&quick=deals");
        let query = query.with_quick(QuickFilter::All).with_sort(SortKey::Score);
        assert_eq!(query.href(), "/");
    }

    #[test]
    fn reset_clears_filters_but_keeps_theme() {
        let query = BrowseQuery {
            q: Some("x".to_string()),
            roast: Some("Dark".to_string()),
            theme: Some("latte".to_string()),
            ..BrowseQuery::default()
        };
        assert_eq!(query.reset().href(), "/?theme=latte");
    }

    #[test]
    fn reset_keeps_selections() {
        let query = BrowseQuery {
            min_price: Some(20.0),
            compare: Some("p16".to_string()),
            saved: Some("p20,p24".to_string()),
            ..BrowseQuery::default()
        }
        .toggled(ListParam::Wishlist, "p16");
        assert_eq!(query.list(ListParam::Wishlist), ["p20", "p24", "p16"]);
        assert_eq!(query.reset().href(), "/?compare=p16&saved=p20%2Cp24%2Cp16");
    }
}
