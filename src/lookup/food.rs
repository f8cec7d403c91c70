//! Open Food Facts search client

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::{debug, warn};

use super::{FoodInfo, FoodLookup};
use crate::errors::LookupError;

/// Client for the Open Food Facts product search
#[derive(Debug, Clone)]
pub struct OpenFoodFactsClient {
    client: Client,
    base_url: String,
}

impl OpenFoodFactsClient {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl FoodLookup for OpenFoodFactsClient {
    async fn find_food(&self, product_name: &str) -> Result<FoodInfo, LookupError> {
        let url = format!("{}/cgi/search.pl", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("action", "process"),
                ("search_terms", product_name),
                ("json", "true"),
            ])
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            warn!(
                status = %status,
                product = %product_name,
                "Food search returned an error status"
            );
            return Err(LookupError::Status(status.as_u16()));
        }

        let body: Value = response.json().await?;
        let info = parse_search_response(&body)
            .ok_or_else(|| LookupError::NotFound(product_name.to_string()))?;
        debug!(product = %product_name, calories = info.calories_per_100g, "Food search matched");
        Ok(info)
    }
}

/// Extract the first product of a search response
pub fn parse_search_response(body: &Value) -> Option<FoodInfo> {
    let product = body.get("products")?.as_array()?.first()?;

    let name = product
        .get("product_name")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string);

    let calories_per_100g = product
        .get("nutriments")
        .and_then(|n| n.get("energy-kcal_100g"))
        .and_then(number_or_numeric_string)
        .unwrap_or(0.0);

    Some(FoodInfo {
        name,
        calories_per_100g,
    })
}

fn number_or_numeric_string(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_first_product_is_used() {
        let body = json!({
            "products": [
                {"product_name": "Apple", "nutriments": {"energy-kcal_100g": 52}},
                {"product_name": "Apple pie", "nutriments": {"energy-kcal_100g": 237}}
            ]
        });
        let info = parse_search_response(&body).unwrap();
        assert_eq!(info.name.as_deref(), Some("Apple"));
        assert_eq!(info.calories_per_100g, 52.0);
    }

    #[test]
    fn test_missing_fields_use_sentinels() {
        let body = json!({"products": [{"code": "0001"}]});
        let info = parse_search_response(&body).unwrap();
        assert_eq!(info.name, None);
        assert_eq!(info.calories_per_100g, 0.0);

        let body = json!({
            "products": [{"product_name": "", "nutriments": {"energy-kcal_100g": "41.5"}}]
        });
        let info = parse_search_response(&body).unwrap();
        assert_eq!(info.name, None);
        assert_eq!(info.calories_per_100g, 41.5);
    }

    #[test]
    fn test_empty_search_is_not_found() {
        assert!(parse_search_response(&json!({"products": []})).is_none());
        assert!(parse_search_response(&json!({"count": 0})).is_none());
    }
}
