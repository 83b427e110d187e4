use std::collections::BTreeSet;

use beanscout_core::{FacetOptions, FilterState, Notice, QuickFilter, ScoredProduct, SortKey};
use chrono::{DateTime, Utc};
use maud::{html, Markup};

use super::components::{chip, compare_table, product_card, PLACEHOLDER_GLYPH};
use super::layout::page;
use super::Theme;
use crate::query::{BrowseQuery, ListParam};

pub struct BrowsePage<'a> {
    pub catalog_name: &'a str,
    pub theme: Theme,
    pub query: &'a BrowseQuery,
    pub filters: &'a FilterState,
    pub facets: &'a FacetOptions,
    pub products: &'a [ScoredProduct],
    pub compared: &'a [&'a ScoredProduct],
    pub wishlist: &'a BTreeSet<String>,
    pub notice: Option<&'a Notice>,
    pub last_updated: Option<DateTime<Utc>>,
}

const SORTS: [(SortKey, &str); 3] = [
    (SortKey::Score, "Best score"),
    (SortKey::Price, "Lowest price"),
    (SortKey::Name, "Name"),
];

fn facet_chips(
    label: &str,
    values: &[String],
    active: &BTreeSet<String>,
    param: ListParam,
    query: &BrowseQuery,
) -> Markup {
    html! {
        @if !values.is_empty() {
            div class="chips" {
                span class="facet-label" { (label) }
                @for value in values {
                    (chip(value, &query.toggled(param, value).href(), active.contains(value)))
                }
            }
        }
    }
}

fn search_form(query: &BrowseQuery, search: &str) -> Markup {
    html! {
        form class="search" method="get" action="/" {
            input type="search" name="q" value=(search) placeholder="Search coffee or roaster...";
            @for (name, value) in query.pairs() {
                @if name != "q" {
                    input type="hidden" name=(name) value=(value);
                }
            }
            button class="chip" type="submit" { "Search" }
        }
    }
}

pub fn browse_page(view: &BrowsePage<'_>) -> Markup {
    let query = view.query;
    let filters = view.filters;

    let content = html! {
        header {
            span { (PLACEHOLDER_GLYPH) }
            h1 { "Deals" }
            a class="chip" href=(query.with_theme(view.theme.other()).href()) {
                (view.theme.other().as_str())
            }
        }
        p class="meta" style="padding: 0 1rem" { (view.catalog_name) }

        (search_form(query, &filters.search))

        div class="chips" {
            @for quick in QuickFilter::ALL {
                (chip(quick.label(), &query.with_quick(quick).href(), filters.quick == quick))
            }
        }
        div class="chips" {
            span class="facet-label" { "Sort" }
            @for (sort, label) in SORTS {
                (chip(label, &query.with_sort(sort).href(), filters.sort == sort))
            }
        }
        (facet_chips("Roast", &view.facets.roast_levels, &filters.roast_levels, ListParam::Roast, query))
        (facet_chips("Origin", &view.facets.origins, &filters.origins, ListParam::Origin, query))
        (facet_chips("Flavor", &view.facets.flavor_notes, &filters.flavor_profiles, ListParam::Flavor, query))
        div class="chips" {
            span class="facet-label" {
                "Price " (format!("${:.2} \u{2013} ${:.2}", filters.price_range.min(), filters.price_range.max()))
            }
            a class="chip" href=(query.reset().href()) { "Reset filters" }
        }

        @if let Some(notice) = view.notice {
            div class="notice" role="alert" { (notice.to_string()) }
        }

        @if !view.compared.is_empty() {
            (compare_table(view.compared))
        }

        @if view.products.is_empty() {
            div class="empty" {
                div { (PLACEHOLDER_GLYPH) }
                p { "No coffee found" }
            }
        } @else {
            div class="grid" {
                @for product in view.products {
                    (product_card(
                        product,
                        query,
                        view.compared.iter().any(|c| c.id == product.id),
                        view.wishlist.contains(&product.id),
                    ))
                }
            }
        }

        @if let Some(updated) = view.last_updated {
            p class="meta" style="padding: 1rem" {
                "Last updated " (updated.format("%Y-%m-%d %H:%M UTC").to_string())
            }
        }
    };

    page("Coffee Price Tracker | Find the Best Coffee Deals", view.theme, content)
}
