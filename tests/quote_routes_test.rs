use actix_web::{test, web, App};
use serde_json::{json, Value};

use rental_pricing::routes::{configure_quote_routes, PricingSettings};

macro_rules! quote_app {
    () => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(PricingSettings {
                    gst_percentage: 5.0,
                }))
                .configure(configure_quote_routes),
        )
        .await
    };
}

#[actix_rt::test]
async fn test_health() {
    let app = quote_app!();

    let req = test::TestRequest::get().uri("/health").to_request();
    let body = test::call_and_read_body(&app, req).await;

    assert_eq!(body, "OK");
}

#[actix_rt::test]
async fn test_quote_weekly_booking_with_discount_and_deposit() {
    let app = quote_app!();

    let req = test::TestRequest::post()
        .uri("/api/bookings/quote")
        .set_json(json!({
            "start_date": "2024-03-01T08:00:00",
            "end_date": "2024-03-11T14:30:00",
            "packages": [
                { "days": 0, "price": 100 },
                { "days": 1, "price": "500" },
                { "days": 7, "price": 3000 }
            ],
            "discount_amount": 300,
            "deposit_amount": 2000
        }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["duration"]["days"], 10);
    assert_eq!(body["duration"]["remaining_hours"], 6.5);
    assert_eq!(body["charge"]["rental_amount"], 5000);
    assert_eq!(body["charge"]["gst_amount"], 235);
    assert_eq!(body["charge"]["total_payable"], 5000 - 300 + 235 + 2000);
    assert_eq!(body["breakdown"].as_array().map(|lines| lines.len()), Some(3));
}

#[actix_rt::test]
async fn test_quote_without_catalog_uses_default_rates() {
    let app = quote_app!();

    let req = test::TestRequest::post()
        .uri("/api/bookings/quote")
        .set_json(json!({
            "start_date": "2024-03-01T08:00:00",
            "end_date": "2024-03-01T11:00:00"
        }))
        .to_request();

    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["charge"]["rental_amount"], 300);
    assert_eq!(body["charge"]["gst_amount"], 15);
    assert_eq!(body["charge"]["total_payable"], 315);
}

#[actix_rt::test]
async fn test_quote_rejects_end_before_start() {
    let app = quote_app!();

    let req = test::TestRequest::post()
        .uri("/api/bookings/quote")
        .set_json(json!({
            "start_date": "2024-03-02T08:00:00",
            "end_date": "2024-03-01T08:00:00"
        }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "InvalidDuration");
}

#[actix_rt::test]
async fn test_quote_rejects_discount_above_rental() {
    let app = quote_app!();

    let req = test::TestRequest::post()
        .uri("/api/bookings/quote")
        .set_json(json!({
            "start_date": "2024-03-01T08:00:00",
            "end_date": "2024-03-01T10:00:00",
            "discount_amount": 1000
        }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "InvalidAmount");
}

#[actix_rt::test]
async fn test_quote_rejects_malformed_dates() {
    let app = quote_app!();

    let req = test::TestRequest::post()
        .uri("/api/bookings/quote")
        .set_json(json!({
            "start_date": "yesterday",
            "end_date": "2024-03-01T10:00:00"
        }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}
