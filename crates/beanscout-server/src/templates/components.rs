use beanscout_core::{ScoreBadge, ScoredProduct};
use maud::{html, Markup};

use crate::query::{BrowseQuery, ListParam};

/// Shown in place of a missing product image.
pub const PLACEHOLDER_GLYPH: &str = "\u{2615}";

pub fn chip(label: &str, href: &str, active: bool) -> Markup {
    html! {
        a class=(if active { "chip active" } else { "chip" }) href=(href) { (label) }
    }
}

pub fn product_card(
    product: &ScoredProduct,
    query: &BrowseQuery,
    compared: bool,
    wishlisted: bool,
) -> Markup {
    let image_style = product
        .image_url
        .as_ref()
        .map(|url| format!("background-image: url(\"{url}\")"));
    let badge = ScoreBadge::from_score(product.ai_score);
    let compare_href = query.toggled(ListParam::Compare, &product.id).href();
    let save_href = query.toggled(ListParam::Wishlist, &product.id).href();
    let share = product.share_payload();

    html! {
        div class=(if wishlisted { "card wishlisted" } else { "card" }) data-id=(product.id) {
            div class="card-image" style=[image_style] {
                @if product.image_url.is_none() {
                    span class="placeholder" { (PLACEHOLDER_GLYPH) }
                }
                div class=(format!("badge {}", badge.css_class())) { (product.ai_score) }
            }
            p class="roaster" { (product.roaster) }
            p class="name" { (product.name) }
            p class="meta" {
                (format!("${:.2}/oz", product.price_per_oz)) " \u{00b7} " (product.recommendation.label())
            }
            p class="price" { (format!("${:.2}", product.price)) }
            div class="actions" {
                a href=(save_href) {
                    @if wishlisted { "\u{2665} Saved" } @else { "\u{2661} Save" }
                }
                a href=(compare_href) {
                    @if compared { "Remove from compare" } @else { "Compare" }
                }
                a class="share" href=(share.url) data-title=(share.title) data-text=(share.text) { "Share" }
            }
            a class="buy" href=(product.link) target="_blank" rel="noopener noreferrer" { "Buy" }
        }
    }
}

pub fn compare_table(products: &[&ScoredProduct]) -> Markup {
    html! {
        table class="compare" {
            tr {
                th { "" }
                @for p in products { th { (p.name) } }
            }
            tr {
                th { "Score" }
                @for p in products { td { (p.ai_score) " (" (p.recommendation.label()) ")" } }
            }
            tr {
                th { "Price" }
                @for p in products { td { (format!("${:.2}", p.price)) } }
            }
            tr {
                th { "Per oz" }
                @for p in products { td { (format!("${:.2}", p.price_per_oz)) } }
            }
            tr {
                th { "Roaster" }
                @for p in products { td { (p.roaster) } }
            }
            tr {
                th { "Origin" }
                @for p in products { td { (p.origin.as_deref().unwrap_or("\u{2014}")) } }
            }
            tr {
                th { "Roast" }
                @for p in products { td { (p.roast_level.as_deref().unwrap_or("\u{2014}")) } }
            }
        }
    }
}
