// server/src/coupon.rs

//! The coupon evaluator: a pure function from a coupon record and a cart
//! total to a discount. No side effects; the single place that interprets
//! `discount_type` strings.

use crate::models::Coupon;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscountType {
  Percentage,
  Amount,
  FreeDelivery,
}

impl DiscountType {
  /// Historical rows spell fixed-amount coupons either "Amount" or "Fixed".
  pub fn parse(raw: &str) -> Option<Self> {
    match raw {
      "Percentage" => Some(DiscountType::Percentage),
      "Amount" | "Fixed" => Some(DiscountType::Amount),
      "FreeDelivery" => Some(DiscountType::FreeDelivery),
      _ => None,
    }
  }
}

/// Outcome of a successful evaluation. `free_delivery` tells pricing to
/// waive the shipping charge; the monetary `amount` is zero in that case.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Discount {
  pub amount: f64,
  pub free_delivery: bool,
}

impl Discount {
  pub fn grand_total(&self, cart_total: f64) -> f64 {
    cart_total - self.amount
  }
}

/// Evaluation knobs. `cap_percentage` is off by default: the historical
/// behavior caps only fixed-amount coupons by `max_discount`, and that
/// asymmetry stays until the business confirms it was unintentional.
#[derive(Debug, Clone, Copy, Default)]
pub struct CouponRules {
  pub cap_percentage: bool,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CouponError {
  #[error("cart total must be a positive amount")]
  InvalidCartTotal,

  #[error("this coupon is not active")]
  Inactive,

  #[error("order total does not meet the coupon's minimum of {min_order_value}")]
  NotApplicable { min_order_value: f64 },

  #[error("coupon has an unrecognized discount type '{0}'")]
  InvalidConfiguration(String),

  #[error("coupon yields no applicable discount for this order")]
  NoApplicableDiscount,
}

pub fn evaluate(coupon: &Coupon, cart_total: f64, rules: &CouponRules) -> Result<Discount, CouponError> {
  if !(cart_total > 0.0) {
    return Err(CouponError::InvalidCartTotal);
  }
  if !coupon.is_active() {
    return Err(CouponError::Inactive);
  }
  if cart_total < coupon.min_order_value {
    return Err(CouponError::NotApplicable {
      min_order_value: coupon.min_order_value,
    });
  }

  let discount_type = DiscountType::parse(&coupon.discount_type)
    .ok_or_else(|| CouponError::InvalidConfiguration(coupon.discount_type.clone()))?;

  let amount = match discount_type {
    DiscountType::FreeDelivery => {
      return Ok(Discount {
        amount: 0.0,
        free_delivery: true,
      });
    }
    DiscountType::Amount => coupon.discount_amount.min(coupon.max_discount),
    DiscountType::Percentage => {
      let raw = (cart_total * coupon.percentage_off / 100.0).ceil();
      if rules.cap_percentage {
        raw.min(coupon.max_discount)
      } else {
        raw
      }
    }
  };

  if amount <= 0.0 {
    return Err(CouponError::NoApplicableDiscount);
  }

  Ok(Discount {
    amount,
    free_delivery: false,
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  fn coupon(discount_type: &str) -> Coupon {
    Coupon {
      id: 1,
      code: "SAVE10".to_string(),
      discount_type: discount_type.to_string(),
      percentage_off: 10.0,
      discount_amount: 150.0,
      max_discount: 100.0,
      min_order_value: 1000.0,
      status: "Active".to_string(),
    }
  }

  #[test]
  fn percentage_discount_is_ceil_of_fraction() {
    let d = evaluate(&coupon("Percentage"), 1800.0, &CouponRules::default()).unwrap();
    assert_eq!(d.amount, 180.0);
    assert_eq!(d.grand_total(1800.0), 1620.0);

    // 10% of 1005 is 100.5; the evaluator rounds the customer's way, up.
    let d = evaluate(&coupon("Percentage"), 1005.0, &CouponRules::default()).unwrap();
    assert_eq!(d.amount, 101.0);
  }

  #[test]
  fn percentage_discount_is_uncapped_by_default() {
    // max_discount is 100 but 10% of 1800 is 180: historical behavior keeps 180.
    let d = evaluate(&coupon("Percentage"), 1800.0, &CouponRules::default()).unwrap();
    assert_eq!(d.amount, 180.0);
  }

  #[test]
  fn percentage_discount_honors_cap_when_configured() {
    let rules = CouponRules { cap_percentage: true };
    let d = evaluate(&coupon("Percentage"), 1800.0, &rules).unwrap();
    assert_eq!(d.amount, 100.0);
  }

  #[test]
  fn amount_discount_is_capped_by_max_discount() {
    // discount_amount 150 vs max_discount 100
    let d = evaluate(&coupon("Amount"), 1800.0, &CouponRules::default()).unwrap();
    assert_eq!(d.amount, 100.0);
  }

  #[test]
  fn fixed_spelling_is_accepted_for_amount_coupons() {
    let d = evaluate(&coupon("Fixed"), 1800.0, &CouponRules::default()).unwrap();
    assert_eq!(d.amount, 100.0);
  }

  #[test]
  fn below_minimum_order_value_is_not_applicable() {
    let err = evaluate(&coupon("Percentage"), 999.0, &CouponRules::default()).unwrap_err();
    assert_eq!(
      err,
      CouponError::NotApplicable {
        min_order_value: 1000.0
      }
    );
  }

  #[test]
  fn unknown_discount_type_is_invalid_configuration() {
    let err = evaluate(&coupon("BuyOneGetOne"), 1800.0, &CouponRules::default()).unwrap_err();
    assert_eq!(err, CouponError::InvalidConfiguration("BuyOneGetOne".to_string()));
  }

  #[test]
  fn zero_computed_discount_is_rejected() {
    let mut c = coupon("Amount");
    c.discount_amount = 0.0;
    let err = evaluate(&c, 1800.0, &CouponRules::default()).unwrap_err();
    assert_eq!(err, CouponError::NoApplicableDiscount);
  }

  #[test]
  fn inactive_coupon_is_rejected() {
    let mut c = coupon("Percentage");
    c.status = "Disabled".to_string();
    let err = evaluate(&c, 1800.0, &CouponRules::default()).unwrap_err();
    assert_eq!(err, CouponError::Inactive);
  }

  #[test]
  fn non_positive_cart_total_is_rejected() {
    let err = evaluate(&coupon("Percentage"), 0.0, &CouponRules::default()).unwrap_err();
    assert_eq!(err, CouponError::InvalidCartTotal);
  }

  #[test]
  fn free_delivery_coupon_yields_marker_not_money() {
    let d = evaluate(&coupon("FreeDelivery"), 1800.0, &CouponRules::default()).unwrap();
    assert_eq!(d.amount, 0.0);
    assert!(d.free_delivery);
  }
}
