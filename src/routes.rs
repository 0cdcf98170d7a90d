use actix_web::{delete, get, post, web, HttpResponse, Responder};
use log::{error, warn};
use sqlx::postgres::PgPool;

use crate::model::*;
use crate::pricing;

pub struct AppState {
    pub db: PgPool,
}

pub struct PricingSettings {
    pub gst_percentage: f64,
}

#[get("/health")]
async fn health() -> impl Responder {
    "OK"
}

#[get("/api/prices/category/{category_id}")]
async fn get_category_prices(
    data: web::Data<AppState>,
    path: web::Path<(i32,)>,
) -> impl Responder {
    let category_id = path.into_inner().0;
    let result = sqlx::query_as::<_, PricingPackageModel>(
        r#"
        SELECT id, category_id, days, price
        FROM public.pricing_packages
        WHERE category_id = $1
        ORDER BY days;
        "#,
    )
    .bind(category_id)
    .fetch_all(&data.db)
    .await;

    match result {
        Ok(packages) => {
            let json_response = serde_json::json!({
                "rows": packages.len(),
                "packages": packages
            });
            HttpResponse::Ok().json(json_response)
        }
        Err(e) => {
            error!("Failed to query packages of category {}: {}", category_id, e);
            HttpResponse::InternalServerError().body("Failed to query packages")
        }
    }
}

#[post("/api/prices/category/{category_id}")]
async fn post_category_price(
    data: web::Data<AppState>,
    path: web::Path<(i32,)>,
    request: web::Json<PostPricingPackage>,
) -> impl Responder {
    let category_id = path.into_inner().0;
    let package = request.into_inner();

    if package.days < 0 || !package.price.is_finite() || package.price < 0.0 {
        return HttpResponse::BadRequest().body("Days and price must be non-negative numbers");
    }

    let result = sqlx::query_as::<_, Record>(
        r#"
        INSERT INTO public.pricing_packages
        (category_id, days, price)
        VALUES($1, $2, $3)
        ON CONFLICT (category_id, days) DO UPDATE SET price = EXCLUDED.price
        RETURNING id;
        "#,
    )
    .bind(category_id)
    .bind(package.days)
    .bind(package.price)
    .fetch_one(&data.db)
    .await;

    match result {
        Ok(record) => HttpResponse::Ok().json(record.id),
        Err(e) => {
            error!("Failed to save package for category {}: {}", category_id, e);
            HttpResponse::InternalServerError().body("Failed to save package")
        }
    }
}

#[delete("/api/prices/category/{category_id}/{days}")]
async fn delete_category_price(
    data: web::Data<AppState>,
    path: web::Path<(i32, i32)>,
) -> impl Responder {
    let (category_id, days) = path.into_inner();
    let result = sqlx::query_as::<_, Record>(
        r#"
        DELETE FROM public.pricing_packages
        WHERE category_id = $1 AND days = $2
        RETURNING id;
        "#,
    )
    .bind(category_id)
    .bind(days)
    .fetch_optional(&data.db)
    .await;

    match result {
        Ok(Some(_)) => HttpResponse::Ok().body("Package deleted"),
        Ok(None) => HttpResponse::NotFound().body("Package not found"),
        Err(e) => {
            error!("Failed to delete package for category {}: {}", category_id, e);
            HttpResponse::InternalServerError().body("Failed to delete package")
        }
    }
}

#[post("/api/bookings/quote")]
async fn post_quote(
    settings: web::Data<PricingSettings>,
    request: web::Json<QuoteRequest>,
) -> impl Responder {
    match pricing::quote(&request, settings.gst_percentage) {
        Ok(quote) => HttpResponse::Ok().json(quote),
        Err(e) => {
            warn!("Rejected quote request: {}", e);
            HttpResponse::BadRequest().json(serde_json::json!({
                "error": e.kind(),
                "message": e.to_string()
            }))
        }
    }
}

/// Routes that need nothing but [`PricingSettings`].
pub fn configure_quote_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(health).service(post_quote);
}

/// Catalog routes backed by the database in [`AppState`].
pub fn configure_pricing_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(get_category_prices)
        .service(post_category_price)
        .service(delete_category_price);
}
