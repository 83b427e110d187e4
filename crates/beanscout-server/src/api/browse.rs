use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Response},
    Extension,
};
use beanscout_core::{
    build_view, CatalogSnapshot, FacetOptions, Notice, PriceRange, SelectionState, Toggle,
    COMPARISON_CAPACITY,
};

use super::{ApiError, AppState, ErrorCode};
use crate::middleware::RequestId;
use crate::query::{BrowseQuery, ListParam};
use crate::templates::{browse_page as render, BrowsePage};

/// Replays the `compare` ids into `selection` so the set never exceeds
/// capacity. Returns the selection and whether any id was turned away.
fn replay_comparison(mut selection: SelectionState, ids: &[String]) -> (SelectionState, bool) {
    let mut rejected = false;
    for id in ids {
        if selection.is_compared(id) {
            continue;
        }
        rejected |= selection.toggle_comparison(id) == Toggle::Rejected;
    }
    (selection, rejected)
}

/// Server-rendered browse page. All state comes from the query string.
pub(super) async fn browse_page(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(mut query): Query<BrowseQuery>,
) -> Response {
    let (catalog, mut notice) = match state.cache.get().await {
        Ok(catalog) => (Some(catalog), None),
        Err(e) => {
            tracing::warn!(error = %e, "browse page rendered without a catalog");
            (
                None,
                Some(Notice::FetchFailed {
                    message: e.to_string(),
                }),
            )
        }
    };
    let products = catalog.as_deref().map_or(&[][..], |c| c.products.as_slice());

    let filters = match query.filters(PriceRange::covering(products)) {
        Ok(filters) => filters,
        Err(e) => return ApiError::new(req_id.0, ErrorCode::ValidationError, e.to_string()).into_response(),
    };

    let saved = SelectionState::with_wishlist(query.list(ListParam::Wishlist).into_iter().collect());
    let (selection, rejected) = replay_comparison(saved, &query.list(ListParam::Compare));
    if rejected {
        notice = Some(Notice::ComparisonFull {
            capacity: COMPARISON_CAPACITY,
        });
    }
    query.set_list(ListParam::Compare, selection.comparison());

    let visible = catalog.as_deref().map_or_else(Vec::new, |c| {
        build_view(&c.products, c.baseline, &filters)
    });
    let all_scored = catalog.as_deref().map_or_else(Vec::new, CatalogSnapshot::scored);
    let compared = selection.compared(&all_scored);
    let facets = FacetOptions::from_products(products);

    let markup = render(&BrowsePage {
        catalog_name: &state.catalog_name,
        theme: query.theme(),
        query: &query,
        filters: &filters,
        facets: &facets,
        products: &visible,
        compared: &compared,
        wishlist: &selection.wishlist,
        notice: notice.as_ref(),
        last_updated: catalog.as_deref().map(|c| c.fetched_at),
    });
    Html(markup.into_string()).into_response()
}
