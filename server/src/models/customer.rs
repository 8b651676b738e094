// server/src/models/customer.rs

use sqlx::FromRow;

/// A storefront customer. The api_token is an opaque credential resolved by
/// the `AuthenticatedCustomer` extractor; it never leaves the server.
#[derive(Debug, Clone, FromRow)]
pub struct Customer {
  pub id: i64,
  pub name: String,
  pub mobile: String,
  pub email: Option<String>,
}
