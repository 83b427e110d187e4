//! Plain-text rendering for terminal output.

use beanscout_core::{CatalogDefinition, ScoredProduct};

const COLUMN_WIDTH: usize = 24;

#[must_use]
pub(crate) fn header_row() -> String {
    format!(
        "  {:>5}  {:<14}  {:>8}  {:>7}  {}",
        "SCORE", "LABEL", "PRICE", "$/OZ", "COFFEE"
    )
}

/// One grid row. Wishlisted products are marked with `*`.
#[must_use]
pub(crate) fn product_row(product: &ScoredProduct, wishlisted: bool) -> String {
    format!(
        "{} {:>5}  {:<14}  {:>8}  {:>7}  {} ({}) [{}]",
        if wishlisted { '*' } else { ' ' },
        product.ai_score,
        product.recommendation.label(),
        format!("${:.2}", product.price),
        format!("${:.2}", product.price_per_oz),
        product.name,
        product.roaster,
        product.id,
    )
}

#[must_use]
pub(crate) fn catalog_line(definition: &CatalogDefinition, active: bool) -> String {
    format!(
        "{} {:<24} {:<24} baseline ${:.2}/oz  {}",
        if active { '*' } else { ' ' },
        definition.name,
        definition.slug(),
        definition.baseline_price_per_oz,
        definition.source.kind(),
    )
}

fn truncate(value: &str) -> String {
    if value.chars().count() <= COLUMN_WIDTH {
        value.to_string()
    } else {
        let mut cut: String = value.chars().take(COLUMN_WIDTH - 1).collect();
        cut.push('~');
        cut
    }
}

/// Side-by-side comparison, one line per attribute.
#[must_use]
pub(crate) fn compare_lines(products: &[&ScoredProduct]) -> Vec<String> {
    type Cell = fn(&ScoredProduct) -> String;
    let rows: [(&str, Cell); 7] = [
        ("", |p: &ScoredProduct| p.name.clone()),
        ("Score", |p: &ScoredProduct| format!("{} ({})", p.ai_score, p.recommendation.label())),
        ("Price", |p: &ScoredProduct| format!("${:.2}", p.price)),
        ("Per oz", |p: &ScoredProduct| format!("${:.2}", p.price_per_oz)),
        ("Roaster", |p: &ScoredProduct| p.roaster.clone()),
        ("Origin", |p: &ScoredProduct| p.origin.clone().unwrap_or_else(|| "-".to_string())),
        ("Roast", |p: &ScoredProduct| p.roast_level.clone().unwrap_or_else(|| "-".to_string())),
    ];

    rows.iter()
        .map(|(label, cell)| {
            let cells: String = products
                .iter()
                .map(|p| format!("{:<width$}", truncate(&cell(*p)), width = COLUMN_WIDTH + 2))
                .collect();
            format!("{label:<8}  {}", cells.trim_end())
        })
        .collect()
}
