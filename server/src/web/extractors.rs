// server/src/web/extractors.rs

//! Shared request extractors.

use actix_web::http::header::AUTHORIZATION;
use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::db;
use crate::errors::AppError;
use crate::models::Customer;
use crate::state::AppState;

/// The calling customer, resolved from the bearer token against the
/// customers table. Every workflow endpoint requires this.
#[derive(Debug)]
pub struct AuthenticatedCustomer {
  pub customer: Customer,
}

pub(crate) fn bearer_token(req: &HttpRequest) -> Option<String> {
  req
    .headers()
    .get(AUTHORIZATION)?
    .to_str()
    .ok()?
    .strip_prefix("Bearer ")
    .map(|t| t.trim().to_string())
    .filter(|t| !t.is_empty())
}

impl FromRequest for AuthenticatedCustomer {
  type Error = AppError;
  type Future = LocalBoxFuture<'static, Result<Self, AppError>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    let state = req.app_data::<web::Data<AppState>>().cloned();
    let token = bearer_token(req);

    Box::pin(async move {
      let Some(state) = state else {
        return Err(AppError::Internal("application state not configured".to_string()));
      };
      let Some(token) = token else {
        warn!("AuthenticatedCustomer extractor: missing or malformed Authorization header.");
        return Err(AppError::Auth("authentication required".to_string()));
      };

      let customer = db::customers::find_by_token(&state.db_pool, &token)
        .await?
        .ok_or_else(|| AppError::Auth("invalid or expired token".to_string()))?;
      Ok(AuthenticatedCustomer { customer })
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use actix_web::test::TestRequest;

  #[test]
  fn bearer_token_is_extracted_from_authorization_header() {
    let req = TestRequest::default()
      .insert_header((AUTHORIZATION, "Bearer tok_123"))
      .to_http_request();
    assert_eq!(bearer_token(&req).as_deref(), Some("tok_123"));
  }

  #[test]
  fn missing_or_non_bearer_headers_yield_no_token() {
    let bare = TestRequest::default().to_http_request();
    assert!(bearer_token(&bare).is_none());

    let basic = TestRequest::default()
      .insert_header((AUTHORIZATION, "Basic abc"))
      .to_http_request();
    assert!(bearer_token(&basic).is_none());

    let empty = TestRequest::default()
      .insert_header((AUTHORIZATION, "Bearer "))
      .to_http_request();
    assert!(bearer_token(&empty).is_none());
  }
}
