// server/src/db/orders.rs

use crate::errors::{AppError, Result};
use crate::models::pending_order::PendingStatus;
use crate::models::{CartLine, NewOrder, Order, OrderDetail, OrderStatus, PaymentOption, PaymentStatus, PendingOrder};
use sqlx::{MySql, MySqlPool, Transaction};

fn txn_no_for(order_id: i64) -> String {
  format!("PH-{}", order_id)
}

async fn insert_detail_rows(
  tx: &mut Transaction<'_, MySql>,
  lines: &[CartLine],
  order_id: Option<i64>,
  pending_order_id: Option<i64>,
) -> Result<()> {
  for line in lines {
    sqlx::query(
      "INSERT INTO order_details \
       (order_id, pending_order_id, product_id, product_name, product_image, price, quantity, tax) \
       VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(order_id)
    .bind(pending_order_id)
    .bind(line.product_id)
    .bind(&line.name)
    .bind(&line.image)
    .bind(line.price)
    .bind(line.quantity)
    .bind(line.tax)
    .execute(&mut **tx)
    .await?;
  }
  Ok(())
}

/// Inserts a confirmed COD order with all its line items and the back-filled
/// transaction number, atomically. Returns the order id and txn number.
pub async fn insert_cod_order(pool: &MySqlPool, order: &NewOrder, lines: &[CartLine]) -> Result<(i64, String)> {
  let mut tx = pool.begin().await?;

  let result = sqlx::query(
    "INSERT INTO orders \
     (customer_id, rx_id, patient_name, patient_phone, hospital_name, doctor_name, prescription_notes, \
      street, city, pincode, house_no, address_type, \
      subtotal, coupon_code, discount, shipping_charge, additional_charge, amount, \
      payment_option, payment_status, status) \
     VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
  )
  .bind(order.customer_id)
  .bind(&order.rx_id)
  .bind(&order.patient_name)
  .bind(&order.patient_phone)
  .bind(&order.hospital_name)
  .bind(&order.doctor_name)
  .bind(&order.prescription_notes)
  .bind(&order.street)
  .bind(&order.city)
  .bind(&order.pincode)
  .bind(&order.house_no)
  .bind(&order.address_type)
  .bind(order.subtotal)
  .bind(&order.coupon_code)
  .bind(order.discount)
  .bind(order.shipping_charge)
  .bind(order.additional_charge)
  .bind(order.amount)
  .bind(order.payment_option)
  .bind(PaymentStatus::Pending)
  .bind(OrderStatus::Confirmed)
  .execute(&mut *tx)
  .await?;
  let order_id = result.last_insert_id() as i64;

  insert_detail_rows(&mut tx, lines, Some(order_id), None).await?;

  let txn_no = txn_no_for(order_id);
  sqlx::query("UPDATE orders SET txn_no = ? WHERE id = ?")
    .bind(&txn_no)
    .bind(order_id)
    .execute(&mut *tx)
    .await?;

  tx.commit().await?;
  Ok((order_id, txn_no))
}

/// Stages an online order: a pending row carrying the gateway order id, plus
/// its line items, atomically. Returns the pending order id.
pub async fn insert_pending_order(
  pool: &MySqlPool,
  order: &NewOrder,
  lines: &[CartLine],
  gateway_order_id: &str,
) -> Result<i64> {
  let mut tx = pool.begin().await?;

  let result = sqlx::query(
    "INSERT INTO pending_orders \
     (gateway_order_id, customer_id, rx_id, patient_name, patient_phone, hospital_name, doctor_name, \
      prescription_notes, street, city, pincode, house_no, address_type, \
      subtotal, coupon_code, discount, shipping_charge, additional_charge, amount, status) \
     VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
  )
  .bind(gateway_order_id)
  .bind(order.customer_id)
  .bind(&order.rx_id)
  .bind(&order.patient_name)
  .bind(&order.patient_phone)
  .bind(&order.hospital_name)
  .bind(&order.doctor_name)
  .bind(&order.prescription_notes)
  .bind(&order.street)
  .bind(&order.city)
  .bind(&order.pincode)
  .bind(&order.house_no)
  .bind(&order.address_type)
  .bind(order.subtotal)
  .bind(&order.coupon_code)
  .bind(order.discount)
  .bind(order.shipping_charge)
  .bind(order.additional_charge)
  .bind(order.amount)
  .bind(PendingStatus::Pending)
  .execute(&mut *tx)
  .await?;
  let pending_id = result.last_insert_id() as i64;

  insert_detail_rows(&mut tx, lines, None, Some(pending_id)).await?;

  tx.commit().await?;
  Ok(pending_id)
}

/// Optimistic claim of a pending order for promotion: flips `Pending` to
/// `Processing` only if no other verification call got there first. Returns
/// whether this caller won the claim.
pub async fn claim_pending(pool: &MySqlPool, gateway_order_id: &str) -> Result<bool> {
  let result = sqlx::query("UPDATE pending_orders SET status = ? WHERE gateway_order_id = ? AND status = ?")
    .bind(PendingStatus::Processing)
    .bind(gateway_order_id)
    .bind(PendingStatus::Pending)
    .execute(pool)
    .await?;
  Ok(result.rows_affected() > 0)
}

/// Promotes a claimed pending order into a confirmed, paid order: copies the
/// staged fields, re-points the line items, back-fills the transaction
/// number, and deletes the staging row — all in one transaction.
pub async fn promote_pending(
  pool: &MySqlPool,
  gateway_order_id: &str,
  gateway_payment_id: &str,
) -> Result<(i64, String, PendingOrder)> {
  let pending = sqlx::query_as::<_, PendingOrder>("SELECT * FROM pending_orders WHERE gateway_order_id = ?")
    .bind(gateway_order_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("pending order not found for gateway order {}", gateway_order_id)))?;

  let mut tx = pool.begin().await?;

  let result = sqlx::query(
    "INSERT INTO orders \
     (customer_id, rx_id, patient_name, patient_phone, hospital_name, doctor_name, prescription_notes, \
      street, city, pincode, house_no, address_type, \
      subtotal, coupon_code, discount, shipping_charge, additional_charge, amount, \
      payment_option, payment_status, status, gateway_order_id, gateway_payment_id) \
     VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
  )
  .bind(pending.customer_id)
  .bind(&pending.rx_id)
  .bind(&pending.patient_name)
  .bind(&pending.patient_phone)
  .bind(&pending.hospital_name)
  .bind(&pending.doctor_name)
  .bind(&pending.prescription_notes)
  .bind(&pending.street)
  .bind(&pending.city)
  .bind(&pending.pincode)
  .bind(&pending.house_no)
  .bind(&pending.address_type)
  .bind(pending.subtotal)
  .bind(&pending.coupon_code)
  .bind(pending.discount)
  .bind(pending.shipping_charge)
  .bind(pending.additional_charge)
  .bind(pending.amount)
  .bind(PaymentOption::Online)
  .bind(PaymentStatus::Paid)
  .bind(OrderStatus::Confirmed)
  .bind(&pending.gateway_order_id)
  .bind(gateway_payment_id)
  .execute(&mut *tx)
  .await?;
  let order_id = result.last_insert_id() as i64;

  sqlx::query("UPDATE order_details SET order_id = ?, pending_order_id = NULL WHERE pending_order_id = ?")
    .bind(order_id)
    .bind(pending.id)
    .execute(&mut *tx)
    .await?;

  let txn_no = txn_no_for(order_id);
  sqlx::query("UPDATE orders SET txn_no = ? WHERE id = ?")
    .bind(&txn_no)
    .bind(order_id)
    .execute(&mut *tx)
    .await?;

  sqlx::query("DELETE FROM pending_orders WHERE id = ?")
    .bind(pending.id)
    .execute(&mut *tx)
    .await?;

  tx.commit().await?;
  Ok((order_id, txn_no, pending))
}

pub async fn find_for_customer(pool: &MySqlPool, order_id: i64, customer_id: i64) -> Result<Option<Order>> {
  let order = sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = ? AND customer_id = ?")
    .bind(order_id)
    .bind(customer_id)
    .fetch_optional(pool)
    .await?;
  Ok(order)
}

pub async fn details_for_order(pool: &MySqlPool, order_id: i64) -> Result<Vec<OrderDetail>> {
  let details = sqlx::query_as::<_, OrderDetail>("SELECT * FROM order_details WHERE order_id = ?")
    .bind(order_id)
    .fetch_all(pool)
    .await?;
  Ok(details)
}

/// Sweeps stale pending orders to `Abandoned`. Returns how many rows moved.
pub async fn mark_abandoned(pool: &MySqlPool, older_than_hours: i64) -> Result<u64> {
  let result = sqlx::query(
    "UPDATE pending_orders SET status = ? WHERE status = ? AND created_at < DATE_SUB(NOW(), INTERVAL ? HOUR)",
  )
  .bind(PendingStatus::Abandoned)
  .bind(PendingStatus::Pending)
  .bind(older_than_hours)
  .execute(pool)
  .await?;
  Ok(result.rows_affected())
}
