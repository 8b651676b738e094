// server/src/db/coupons.rs

use crate::errors::Result;
use crate::models::Coupon;
use sqlx::MySqlPool;

pub async fn find_by_code(pool: &MySqlPool, code: &str) -> Result<Option<Coupon>> {
  let coupon = sqlx::query_as::<_, Coupon>(
    "SELECT id, code, discount_type, percentage_off, discount_amount, max_discount, min_order_value, status \
     FROM coupons WHERE code = ?",
  )
  .bind(code)
  .fetch_optional(pool)
  .await?;
  Ok(coupon)
}
