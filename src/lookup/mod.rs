//! External lookup collaborators
//!
//! The conversation engine only sees the two traits below; the HTTP clients
//! live in the submodules and tests plug in in-memory fakes.

pub mod food;
pub mod weather;

use async_trait::async_trait;

use crate::errors::LookupError;

pub use food::OpenFoodFactsClient;
pub use weather::OpenWeatherClient;

/// Nutrition facts for the first product matching a search
#[derive(Clone, Debug, PartialEq)]
pub struct FoodInfo {
    /// Display name, `None` when the product has no name
    pub name: Option<String>,
    /// Energy per 100 g in kcal, 0 when unknown
    pub calories_per_100g: f64,
}

/// Food database search
#[async_trait]
pub trait FoodLookup: Send + Sync {
    async fn find_food(&self, product_name: &str) -> Result<FoodInfo, LookupError>;
}

/// Current temperature for a city, in °C
#[async_trait]
pub trait WeatherLookup: Send + Sync {
    async fn temperature(&self, city: &str) -> Result<f64, LookupError>;
}
