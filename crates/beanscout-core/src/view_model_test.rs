use super::*;
use crate::products::fixtures::product;
use crate::score::Recommendation;

fn baseline() -> ScoreBaseline {
    ScoreBaseline::new(1.70).unwrap()
}

fn scored(id: &str, price: f64, ai_score: u8) -> ScoredProduct {
    ScoredProduct {
        product: product(id, price, price / 12.0),
        ai_score,
        recommendation: Recommendation::from_score(ai_score),
    }
}

fn ids(view: &[ScoredProduct]) -> Vec<&str> {
    view.iter().map(|p| p.id.as_str()).collect()
}

fn set(values: &[&str]) -> BTreeSet<String> {
    values.iter().map(|v| (*v).to_string()).collect()
}

fn three_product_catalog() -> Vec<Product> {
    vec![
        product("p24", 24.0, 2.00),
        product("p16", 16.0, 1.33),
        product("p20", 20.0, 1.67),
    ]
}

#[test]
fn price_range_rejects_inverted_bounds() {
    assert!(matches!(
        PriceRange::new(30.0, 10.0),
        Err(CoreError::InvalidPriceRange { .. })
    ));
    assert!(PriceRange::new(f64::NAN, 10.0).is_err());
    assert!(PriceRange::new(10.0, 10.0).is_ok());
}

#[test]
fn price_range_is_inclusive() {
    let range = PriceRange::new(15.0, 22.0).unwrap();
    assert!(range.contains(15.0));
    assert!(range.contains(22.0));
    assert!(!range.contains(22.01));
    assert!(!range.contains(14.99));
}

#[test]
fn price_range_covering_catalog() {
    let range = PriceRange::covering(&three_product_catalog());
    assert_eq!(range.min(), 16.0);
    assert_eq!(range.max(), 24.0);
    assert_eq!(PriceRange::covering(&[]), PriceRange::unbounded());
}

#[test]
fn price_filter_and_price_sort_end_to_end() {
    let filters = FilterState {
        price_range: PriceRange::new(15.0, 22.0).unwrap(),
        sort: SortKey::Price,
        ..FilterState::default()
    };
    let view = build_view(&three_product_catalog(), baseline(), &filters);
    assert_eq!(ids(&view), ["p16", "p20"]);
    assert_eq!(view[0].price, 16.0);
    assert_eq!(view[1].price, 20.0);
}

#[test]
fn empty_filters_return_every_product_ordered_by_sort_key() {
    let catalog = three_product_catalog();
    let filters = FilterState {
        price_range: PriceRange::covering(&catalog),
        ..FilterState::default()
    };
    let view = build_view(&catalog, baseline(), &filters);
    // scores: p16=80, p20=75, p24=71
    assert_eq!(ids(&view), ["p16", "p20", "p24"]);

    let by_name = FilterState {
        sort: SortKey::Name,
        ..filters
    };
    let view = build_view(&catalog, baseline(), &by_name);
    assert_eq!(view.len(), 3);
    assert_eq!(ids(&view), ["p16", "p20", "p24"]);
}

#[test]
fn filtering_is_idempotent() {
    let catalog = three_product_catalog();
    let filters = FilterState {
        search: "coffee".to_string(),
        ..FilterState::default()
    };
    let first = build_view(&catalog, baseline(), &filters);
    let second = build_view(&catalog, baseline(), &filters);
    assert_eq!(first, second);
}

#[test]
fn score_sort_is_stable_for_ties() {
    let products = vec![
        scored("first", 18.0, 70),
        scored("top", 18.0, 90),
        scored("second", 18.0, 70),
        scored("third", 18.0, 70),
    ];
    let view = filter_and_sort(&products, &FilterState::default());
    assert_eq!(ids(&view), ["top", "first", "second", "third"]);
}

#[test]
fn price_sort_is_stable_for_ties() {
    let products = vec![
        scored("b", 20.0, 10),
        scored("a", 20.0, 90),
        scored("cheap", 10.0, 50),
    ];
    let filters = FilterState {
        sort: SortKey::Price,
        ..FilterState::default()
    };
    let view = filter_and_sort(&products, &filters);
    assert_eq!(ids(&view), ["cheap", "b", "a"]);
}

#[test]
fn roast_filter_passes_products_without_roast_level() {
    let mut light = scored("light", 18.0, 70);
    light.product.roast_level = Some("Light".to_string());
    let mut dark = scored("dark", 18.0, 70);
    dark.product.roast_level = Some("Dark".to_string());
    let unknown = scored("unknown", 18.0, 70);

    let filters = FilterState {
        roast_levels: set(&["Light"]),
        ..FilterState::default()
    };
    let view = filter_and_sort(&[light, dark, unknown], &filters);
    assert_eq!(ids(&view), ["light", "unknown"]);
}

#[test]
fn origin_filter_treats_multi_origin_as_set_membership() {
    let mut blend = scored("blend", 18.0, 70);
    blend.product.origin = Some("Ethiopia, Kenya".to_string());
    let mut brazil = scored("brazil", 18.0, 70);
    brazil.product.origin = Some("Brazil".to_string());
    let no_origin = scored("none", 18.0, 70);

    let filters = FilterState {
        origins: set(&["Kenya"]),
        ..FilterState::default()
    };
    let view = filter_and_sort(&[blend, brazil, no_origin], &filters);
    assert_eq!(ids(&view), ["blend", "none"]);
}

#[test]
fn origin_filter_does_not_match_substrings() {
    let mut p = scored("p", 18.0, 70);
    p.product.origin = Some("Papua New Guinea".to_string());
    let filters = FilterState {
        origins: set(&["Guinea"]),
        ..FilterState::default()
    };
    assert!(filter_and_sort(&[p], &filters).is_empty());
}

#[test]
fn flavor_filter_matches_any_note() {
    let mut choc = scored("choc", 18.0, 70);
    choc.product.flavor_notes = Some(vec!["Chocolate".to_string(), "Nutty".to_string()]);
    let mut citrus = scored("citrus", 18.0, 70);
    citrus.product.flavor_notes = Some(vec!["Citrus".to_string()]);
    let untagged = scored("untagged", 18.0, 70);

    let filters = FilterState {
        flavor_profiles: set(&["Nutty", "Caramel"]),
        ..FilterState::default()
    };
    let view = filter_and_sort(&[choc, citrus, untagged], &filters);
    assert_eq!(ids(&view), ["choc", "untagged"]);
}

#[test]
fn search_is_case_insensitive_over_name_roaster_and_origin() {
    let mut a = scored("a", 18.0, 70);
    a.product.name = "Morning Glory".to_string();
    let mut b = scored("b", 18.0, 70);
    b.product.roaster = "Glory Roasters".to_string();
    let mut c = scored("c", 18.0, 70);
    c.product.origin = Some("Colombia".to_string());
    let d = scored("d", 18.0, 70);

    let filters = FilterState {
        search: "  GLORY ".to_string(),
        ..FilterState::default()
    };
    let products = [a, b, c, d];
    assert_eq!(ids(&filter_and_sort(&products, &filters)), ["a", "b"]);

    let filters = FilterState {
        search: "colom".to_string(),
        ..FilterState::default()
    };
    assert_eq!(ids(&filter_and_sort(&products, &filters)), ["c"]);
}

#[test]
fn predicates_compose_as_conjunction() {
    let mut a = scored("a", 18.0, 70);
    a.product.roast_level = Some("Light".to_string());
    a.product.origin = Some("Kenya".to_string());
    let mut b = scored("b", 30.0, 70);
    b.product.roast_level = Some("Light".to_string());
    b.product.origin = Some("Kenya".to_string());
    let mut c = scored("c", 18.0, 70);
    c.product.roast_level = Some("Light".to_string());
    c.product.origin = Some("Brazil".to_string());

    let filters = FilterState {
        price_range: PriceRange::new(10.0, 20.0).unwrap(),
        roast_levels: set(&["Light"]),
        origins: set(&["Kenya"]),
        ..FilterState::default()
    };
    assert_eq!(ids(&filter_and_sort(&[a, b, c], &filters)), ["a"]);
}

#[test]
fn quick_filters() {
    let products = [
        scored("deal", 18.0, 80),
        scored("budget", 20.0, 60),
        scored("mid", 22.0, 75),
        scored("premium", 26.0, 50),
    ];
    let run = |quick| {
        let filters = FilterState {
            quick,
            sort: SortKey::Price,
            ..FilterState::default()
        };
        filter_and_sort(&products, &filters)
            .iter()
            .map(|p| p.id.clone())
            .collect::<Vec<_>>()
    };
    assert_eq!(run(QuickFilter::All).len(), 4);
    assert_eq!(run(QuickFilter::Deals), ["deal"]);
    assert_eq!(run(QuickFilter::Budget), ["deal", "budget"]);
    assert_eq!(run(QuickFilter::Premium), ["premium"]);
}

#[test]
fn toggle_flips_membership() {
    let mut roasts = BTreeSet::new();
    FilterState::toggle(&mut roasts, "Dark");
    assert!(roasts.contains("Dark"));
    FilterState::toggle(&mut roasts, "Dark");
    assert!(roasts.is_empty());
}

#[test]
fn sort_key_and_quick_filter_parse() {
    assert_eq!("Price".parse::<SortKey>().unwrap(), SortKey::Price);
    assert_eq!(" name ".parse::<SortKey>().unwrap(), SortKey::Name);
    assert!(matches!(
        "rating".parse::<SortKey>(),
        Err(CoreError::UnknownSortKey(_))
    ));
    assert_eq!("deals".parse::<QuickFilter>().unwrap(), QuickFilter::Deals);
    assert!("cheap".parse::<QuickFilter>().is_err());
}

#[test]
fn facet_options_collect_distinct_values_in_first_seen_order() {
    let mut a = product("a", 16.0, 1.33);
    a.roast_level = Some("Light".to_string());
    a.origin = Some("Ethiopia, Kenya".to_string());
    a.flavor_notes = Some(vec!["Fruity".to_string(), "Citrus".to_string()]);
    let mut b = product("b", 24.0, 2.0);
    b.roast_level = Some("Dark".to_string());
    b.origin = Some("Kenya".to_string());
    b.flavor_notes = Some(vec!["Chocolate".to_string(), "Fruity".to_string()]);
    let mut c = product("c", 20.0, 1.67);
    c.roast_level = Some("Light".to_string());

    let facets = FacetOptions::from_products(&[a, b, c]);
    assert_eq!(facets.roast_levels, ["Light", "Dark"]);
    assert_eq!(facets.origins, ["Ethiopia", "Kenya"]);
    assert_eq!(facets.flavor_notes, ["Fruity", "Citrus", "Chocolate"]);
    assert_eq!(facets.price_range.min(), 16.0);
    assert_eq!(facets.price_range.max(), 24.0);
}
