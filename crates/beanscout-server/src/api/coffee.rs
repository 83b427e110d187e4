use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use beanscout_core::{build_view, FilterState, ScoredProduct};
use chrono::SecondsFormat;
use serde::Serialize;

use super::AppState;

/// Body of a successful `GET /api/coffee`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct CoffeeResponse {
    success: bool,
    count: usize,
    last_updated: String,
    products: Vec<ScoredProduct>,
}

/// Body of a failed `GET /api/coffee`; served with status 500.
#[derive(Debug, Serialize)]
pub(super) struct CoffeeFailure {
    success: bool,
    error: &'static str,
    message: String,
}

impl CoffeeFailure {
    fn new(message: String) -> Self {
        Self {
            success: false,
            error: "Failed to fetch coffee prices",
            message,
        }
    }
}

impl IntoResponse for CoffeeFailure {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, Json(self)).into_response()
    }
}

/// Every product in the active catalog, scored and sorted by score descending.
pub(super) async fn get_coffee(
    State(state): State<AppState>,
) -> Result<Json<CoffeeResponse>, CoffeeFailure> {
    let catalog = state
        .cache
        .get()
        .await
        .map_err(|e| CoffeeFailure::new(e.to_string()))?;

    let products = build_view(&catalog.products, catalog.baseline, &FilterState::default());

    Ok(Json(CoffeeResponse {
        success: true,
        count: products.len(),
        last_updated: catalog
            .fetched_at
            .to_rfc3339_opts(SecondsFormat::Millis, true),
        products,
    }))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use beanscout_catalog::{CatalogSource, FeedClient};
    use beanscout_core::ScoreBaseline;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::api::test_support::{app_with, get, house_app};

    #[tokio::test]
    async fn coffee_returns_scored_products_sorted_by_score() {
        let (status, body) = get(house_app(), "/api/coffee").await;
        assert_eq!(status, StatusCode::OK);

        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["count"], 3);
        assert!(json["lastUpdated"].as_str().unwrap().ends_with('Z'));

        let products = json["products"].as_array().unwrap();
        let ids: Vec<_> = products.iter().map(|p| p["id"].as_str().unwrap()).collect();
        assert_eq!(ids, ["p16", "p20", "p24"]);
        let scores: Vec<_> = products.iter().map(|p| p["aiScore"].as_u64().unwrap()).collect();
        assert_eq!(scores, [80, 75, 71]);
        assert_eq!(products[0]["recommendation"], "Excellent Deal");
        assert_eq!(products[1]["recommendation"], "Good Value");
        assert_eq!(products[0]["pricePerOz"], 1.33);
        assert_eq!(products[0]["imageUrl"], "https://example.com/p16.jpg");
        assert!(products[1].get("imageUrl").is_none());
    }

    #[tokio::test]
    async fn coffee_failure_returns_500_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let source = CatalogSource::Remote {
            client: FeedClient::new(5, "beanscout-test/0.1", 0, 0).unwrap(),
            url: format!("{}/coffee/hot", server.uri()),
            limit: 20,
            pricing_seed: 1,
            baseline: ScoreBaseline::new(2.5).unwrap(),
        };
        let (status, body) = get(app_with(source, 120), "/api/coffee").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Failed to fetch coffee prices");
        assert!(json["message"].as_str().unwrap().contains("502"));
    }

    #[tokio::test]
    async fn coffee_is_rate_limited() {
        let app = app_with(
            CatalogSource::Static {
                products: crate::api::test_support::house_products(),
                baseline: ScoreBaseline::new(1.70).unwrap(),
            },
            1,
        );
        let (first, _) = get(app.clone(), "/api/coffee").await;
        let (second, body) = get(app, "/api/coffee").await;
        assert_eq!(first, StatusCode::OK);
        assert_eq!(second, StatusCode::TOO_MANY_REQUESTS);
        assert!(body.contains("rate_limited"));
    }
}
