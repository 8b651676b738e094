// server/src/db/customers.rs

use crate::errors::Result;
use crate::models::Customer;
use sqlx::MySqlPool;

pub async fn find_by_token(pool: &MySqlPool, api_token: &str) -> Result<Option<Customer>> {
  let customer = sqlx::query_as::<_, Customer>("SELECT id, name, mobile, email FROM customers WHERE api_token = ?")
    .bind(api_token)
    .fetch_optional(pool)
    .await?;
  Ok(customer)
}

pub async fn find_by_id(pool: &MySqlPool, id: i64) -> Result<Option<Customer>> {
  let customer = sqlx::query_as::<_, Customer>("SELECT id, name, mobile, email FROM customers WHERE id = ?")
    .bind(id)
    .fetch_optional(pool)
    .await?;
  Ok(customer)
}
