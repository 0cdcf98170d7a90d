use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Deserialize, Serialize, sqlx::FromRow)]
pub struct Record {
    pub id: i32,
}

/// One pricing tier of a vehicle category.
///
/// `days = 0` is the hourly tier and its price is a per-hour rate. Every other
/// tier is a flat price for the whole span (1 = daily, 7 = weekly, 15, 30, or a
/// custom fixed-duration package).
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PricingPackage {
    pub days: i32,
    /// `None` when the price was absent or not numeric; the tier is then unavailable.
    #[serde(default, deserialize_with = "deserialize_price")]
    pub price: Option<f64>,
}

impl PricingPackage {
    pub fn new(days: i32, price: f64) -> Self {
        Self {
            days,
            price: Some(price),
        }
    }
}

fn deserialize_price<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    let price = match value {
        Some(serde_json::Value::Number(number)) => number.as_f64(),
        Some(serde_json::Value::String(text)) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(price.filter(|p| p.is_finite()))
}

#[derive(Debug, Deserialize, Serialize, sqlx::FromRow)]
pub struct PricingPackageModel {
    pub id: i32,
    pub category_id: i32,
    pub days: i32,
    pub price: f64,
}

#[derive(Debug, Deserialize)]
pub struct PostPricingPackage {
    pub days: i32,
    pub price: f64,
}

/// Elapsed rental time split into whole days and leftover hours.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Duration {
    pub hours: f64,
    pub days: i64,
    pub remaining_hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreakdownLine {
    pub description: String,
    pub amount: f64,
}

impl BreakdownLine {
    pub fn new(description: impl Into<String>, amount: f64) -> Self {
        Self {
            description: description.into(),
            amount,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BookingCharge {
    pub rental_amount: i64,
    pub discount_amount: i64,
    pub gst_amount: i64,
    pub deposit_amount: i64,
    pub total_payable: i64,
}

#[derive(Debug, Deserialize)]
pub struct QuoteRequest {
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    #[serde(default)]
    pub selected_package: Option<PricingPackage>,
    #[serde(default)]
    pub packages: Vec<PricingPackage>,
    #[serde(default)]
    pub discount_amount: i64,
    #[serde(default)]
    pub deposit_amount: i64,
}

#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub duration: Duration,
    pub breakdown: Vec<BreakdownLine>,
    pub charge: BookingCharge,
}
