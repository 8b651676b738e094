// server/src/web/routes.rs

use actix_web::web;

async fn health_check_handler() -> actix_web::HttpResponse {
  actix_web::HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

// Called in `main.rs` to configure services for the Actix App. Paths match
// what the mobile client already calls.
pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg.service(
    web::scope("/api/v1")
      // Health Check Route
      .route("/health", web::get().to(health_check_handler))
      // Order workflow
      .route(
        "/make-a-order",
        web::post().to(crate::web::handlers::order_handlers::make_a_order_handler),
      )
      .route(
        "/repeat_order/{id}",
        web::post().to(crate::web::handlers::order_handlers::repeat_order_handler),
      )
      // Payment verification (driven by the client after the gateway flow)
      .route(
        "/verify-payment",
        web::post().to(crate::web::handlers::payment_handlers::verify_payment_handler),
      )
      // Cart-time coupon preview
      .route(
        "/apply-coupon_code",
        web::post().to(crate::web::handlers::coupon_handlers::apply_coupon_handler),
      )
      // Prescription upload (multipart, up to 5 images)
      .route(
        "/upload",
        web::post().to(crate::web::handlers::prescription_handlers::upload_prescription_handler),
      ),
  );
}
