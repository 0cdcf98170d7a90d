//! Rental price calculation.
//!
//! Everything here is a pure function of its arguments. Prices are derived from
//! the elapsed hours of a booking and the pricing packages of the vehicle
//! category:
//!
//! * under 6 hours the hourly rate is charged,
//! * from 6 up to 24 hours one flat day is charged,
//! * from 24 hours on, whole days are billed through an exact package, a
//!   7/15/30-day package or the daily rate, plus a charge for leftover hours.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;

use crate::error::PricingError;
use crate::model::{
    BookingCharge, BreakdownLine, Duration, PricingPackage, QuoteRequest, QuoteResponse,
};

pub const DEFAULT_HOURLY_RATE: f64 = 100.0;
pub const DEFAULT_DAILY_RATE: f64 = 500.0;
pub const DEFAULT_GST_PERCENTAGE: f64 = 5.0;

const HOURS_PER_DAY: f64 = 24.0;
/// Below this many hours a booking (or its leftover part) is billed by the hour.
const HOURLY_BILLING_LIMIT: f64 = 6.0;
/// Checked in this order; the first one that applies wins even if a later one is cheaper.
const PERIOD_TIERS: [i64; 3] = [7, 15, 30];

/// Usable pricing tiers of a category, keyed by `days`.
///
/// Packages without a usable price or with negative `days` are dropped, and only
/// the first package seen for each `days` value is kept.
#[derive(Debug, Clone, Default)]
pub struct PricingCatalog {
    tiers: BTreeMap<i32, f64>,
}

impl PricingCatalog {
    pub fn new(packages: &[PricingPackage]) -> Self {
        let mut tiers = BTreeMap::new();
        for package in packages.iter().filter(|p| p.days >= 0) {
            if let Some(price) = usable_price(package.price) {
                tiers.entry(package.days).or_insert(price);
            }
        }
        Self { tiers }
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    pub fn price_for(&self, days: i64) -> Option<f64> {
        let days = i32::try_from(days).ok()?;
        self.tiers.get(&days).copied()
    }

    pub fn hourly_rate(&self) -> f64 {
        self.price_for(0).unwrap_or(DEFAULT_HOURLY_RATE)
    }

    pub fn daily_rate(&self) -> f64 {
        self.price_for(1).unwrap_or(DEFAULT_DAILY_RATE)
    }

    /// Packages in billing order: the hourly tier first, then ascending by days.
    pub fn packages(&self) -> Vec<PricingPackage> {
        self.tiers
            .iter()
            .map(|(days, price)| PricingPackage::new(*days, *price))
            .collect()
    }

    fn period_tier(&self, days: i64) -> Option<(i64, f64)> {
        PERIOD_TIERS
            .iter()
            .filter(|period| days >= **period)
            .find_map(|period| self.price_for(*period).map(|price| (*period, price)))
    }
}

impl Duration {
    /// Splits a number of hours into whole days and leftover hours.
    pub fn from_hours(hours: f64) -> Self {
        Self {
            hours,
            days: (hours / HOURS_PER_DAY).floor() as i64,
            remaining_hours: round_to_cents(hours % HOURS_PER_DAY),
        }
    }
}

pub fn calculate_duration(
    start_date: NaiveDateTime,
    end_date: NaiveDateTime,
) -> Result<Duration, PricingError> {
    if end_date <= start_date {
        return Err(PricingError::InvalidDuration {
            start: start_date,
            end: end_date,
        });
    }

    let millis = (end_date - start_date).num_milliseconds();
    Ok(Duration::from_hours(round_to_cents(
        millis as f64 / 3_600_000.0,
    )))
}

/// Rental amount for a booking.
///
/// A selected package with a usable price overrides all tier logic. Otherwise the
/// catalog tiers are applied, falling back to 100/hour and 500/day for missing
/// hourly and daily tiers.
pub fn calculate_estimated_price(
    duration: &Duration,
    selected_package: Option<&PricingPackage>,
    packages: &[PricingPackage],
) -> i64 {
    if let Some(price) = selected_package.and_then(|p| usable_price(p.price)) {
        return price.round() as i64;
    }

    let catalog = PricingCatalog::new(packages);
    total_of(&breakdown_lines(duration, &catalog))
}

pub fn calculate_gst(amount: i64, percentage: f64) -> i64 {
    (amount as f64 * percentage / 100.0).round() as i64
}

pub fn get_pricing_breakdown(total_hours: f64, packages: &[PricingPackage]) -> Vec<BreakdownLine> {
    let catalog = PricingCatalog::new(packages);
    breakdown_lines(&Duration::from_hours(total_hours), &catalog)
}

fn breakdown_lines(duration: &Duration, catalog: &PricingCatalog) -> Vec<BreakdownLine> {
    let hourly_rate = catalog.hourly_rate();
    let daily_rate = catalog.daily_rate();
    let hours = duration.hours;
    let mut lines = Vec::new();

    if hours < HOURLY_BILLING_LIMIT {
        lines.push(BreakdownLine::new(
            format!("{} hours at {}/hour", format_number(hours), format_number(hourly_rate)),
            hourly_charge(hours, hourly_rate),
        ));
        return without_empty(lines);
    }

    if hours < HOURS_PER_DAY {
        lines.push(BreakdownLine::new("1 day (minimum daily charge)", daily_rate));
        return without_empty(lines);
    }

    let days = duration.days;
    let remaining_hours = duration.remaining_hours;

    if remaining_hours == 0.0 {
        if let Some(price) = catalog.price_for(days) {
            lines.push(BreakdownLine::new(format!("{}-day package", days), price));
            return without_empty(lines);
        }
    }

    match catalog.period_tier(days) {
        Some((period, period_price)) => {
            let periods = days / period;
            let extra_days = days % period;
            lines.push(BreakdownLine::new(
                format!("{} x {}-day package", periods, period),
                periods as f64 * period_price,
            ));
            lines.push(BreakdownLine::new(
                format!("{} at {}/day", days_label(extra_days), format_number(daily_rate)),
                extra_days as f64 * daily_rate,
            ));
        }
        None => lines.push(BreakdownLine::new(
            format!("{} at {}/day", days_label(days), format_number(daily_rate)),
            days as f64 * daily_rate,
        )),
    }

    if remaining_hours >= HOURLY_BILLING_LIMIT {
        lines.push(BreakdownLine::new(
            format!("{} remaining hours charged as 1 day", format_number(remaining_hours)),
            daily_rate,
        ));
    } else if remaining_hours > 0.0 {
        lines.push(BreakdownLine::new(
            format!(
                "{} remaining hours at {}/hour",
                format_number(remaining_hours),
                format_number(hourly_rate)
            ),
            hourly_charge(remaining_hours, hourly_rate),
        ));
    }

    without_empty(lines)
}

/// Runs a whole quote: duration, rental amount, breakdown and payable charge.
pub fn quote(request: &QuoteRequest, gst_percentage: f64) -> Result<QuoteResponse, PricingError> {
    let duration = calculate_duration(request.start_date, request.end_date)?;
    let selected_package = request
        .selected_package
        .as_ref()
        .filter(|p| usable_price(p.price).is_some());

    let rental_amount =
        calculate_estimated_price(&duration, selected_package, &request.packages);
    let breakdown = match selected_package {
        Some(package) => vec![BreakdownLine::new(
            format!("Selected {}-day package", package.days),
            rental_amount as f64,
        )],
        None => breakdown_lines(&duration, &PricingCatalog::new(&request.packages)),
    };
    let charge = BookingCharge::compose(
        rental_amount,
        request.discount_amount,
        request.deposit_amount,
        gst_percentage,
    )?;

    Ok(QuoteResponse {
        duration,
        breakdown,
        charge,
    })
}

impl BookingCharge {
    /// GST is charged on the discounted rental only, never on the deposit.
    pub fn compose(
        rental_amount: i64,
        discount_amount: i64,
        deposit_amount: i64,
        gst_percentage: f64,
    ) -> Result<Self, PricingError> {
        if discount_amount < 0 {
            return Err(PricingError::InvalidAmount(format!(
                "discount amount {} must not be negative",
                discount_amount
            )));
        }
        if deposit_amount < 0 {
            return Err(PricingError::InvalidAmount(format!(
                "deposit amount {} must not be negative",
                deposit_amount
            )));
        }
        if discount_amount > rental_amount {
            return Err(PricingError::InvalidAmount(format!(
                "discount amount {} exceeds rental amount {}",
                discount_amount, rental_amount
            )));
        }

        let taxable_amount = rental_amount - discount_amount;
        let gst_amount = calculate_gst(taxable_amount, gst_percentage);

        let total_payable = taxable_amount
            .checked_add(gst_amount)
            .and_then(|amount| amount.checked_add(deposit_amount))
            .ok_or_else(|| {
                PricingError::InvalidAmount(format!(
                    "total payable overflows for rental {} and deposit {}",
                    rental_amount, deposit_amount
                ))
            })?;

        Ok(Self {
            rental_amount,
            discount_amount,
            gst_amount,
            deposit_amount,
            total_payable,
        })
    }
}

/// Prices that are missing, non-finite or negative make a tier unusable.
fn usable_price(price: Option<f64>) -> Option<f64> {
    price.filter(|p| p.is_finite() && *p >= 0.0)
}

fn hourly_charge(hours: f64, hourly_rate: f64) -> f64 {
    // 1.1 * 100.0 is 110.00000000000001 in binary floating point
    let amount = (hours * hourly_rate * 1_000_000.0).round() / 1_000_000.0;
    amount.ceil()
}

fn total_of(lines: &[BreakdownLine]) -> i64 {
    lines.iter().map(|line| line.amount).sum::<f64>().round() as i64
}

fn without_empty(mut lines: Vec<BreakdownLine>) -> Vec<BreakdownLine> {
    lines.retain(|line| line.amount != 0.0);
    lines
}

fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn days_label(days: i64) -> String {
    if days == 1 {
        "1 day".to_string()
    } else {
        format!("{} days", days)
    }
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{}", round_to_cents(value))
    }
}
