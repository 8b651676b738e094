// server/src/pricing.rs

//! Quote arithmetic for the pricing stage: shipping, COD fee, discount,
//! final amount. Pure functions over the settings row.

use crate::coupon::Discount;
use crate::models::{PaymentOption, Settings};

/// The priced order: everything the persist stage writes into money columns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quote {
  pub subtotal: f64,
  pub discount: f64,
  pub shipping_charge: f64,
  pub additional_charge: f64,
  pub total: f64,
  pub free_delivery: bool,
}

pub fn shipping_charge(subtotal: f64, settings: &Settings) -> f64 {
  if subtotal > settings.shipping_threshold {
    0.0
  } else {
    settings.shipping_charge
  }
}

pub fn build_quote(
  subtotal: f64,
  discount: Option<&Discount>,
  settings: &Settings,
  payment_option: PaymentOption,
) -> Quote {
  let free_delivery = discount.map_or(false, |d| d.free_delivery);
  let discount_amount = discount.map_or(0.0, |d| d.amount);

  let shipping = if free_delivery {
    0.0
  } else {
    shipping_charge(subtotal, settings)
  };
  let additional = match payment_option {
    PaymentOption::Cod => settings.cod_fee,
    PaymentOption::Online => 0.0,
  };

  Quote {
    subtotal,
    discount: discount_amount,
    shipping_charge: shipping,
    additional_charge: additional,
    total: subtotal - discount_amount + shipping + additional,
    free_delivery,
  }
}

/// Rupees to the gateway's minor unit (paise).
pub fn to_minor_units(amount: f64) -> i64 {
  (amount * 100.0).round() as i64
}

#[cfg(test)]
mod tests {
  use super::*;

  fn settings() -> Settings {
    Settings {
      shipping_charge: 40.0,
      shipping_threshold: 1500.0,
      cod_fee: 20.0,
    }
  }

  #[test]
  fn shipping_is_free_above_threshold() {
    assert_eq!(shipping_charge(2000.0, &settings()), 0.0);
  }

  #[test]
  fn shipping_is_charged_at_or_below_threshold() {
    assert_eq!(shipping_charge(1000.0, &settings()), 40.0);
    // The threshold itself is not free: the rule is strictly greater-than.
    assert_eq!(shipping_charge(1500.0, &settings()), 40.0);
  }

  #[test]
  fn cod_orders_carry_the_cod_fee() {
    let q = build_quote(1000.0, None, &settings(), PaymentOption::Cod);
    assert_eq!(q.additional_charge, 20.0);
    assert_eq!(q.total, 1000.0 + 40.0 + 20.0);
  }

  #[test]
  fn online_orders_carry_no_additional_charge() {
    let q = build_quote(1000.0, None, &settings(), PaymentOption::Online);
    assert_eq!(q.additional_charge, 0.0);
    assert_eq!(q.total, 1000.0 + 40.0);
  }

  #[test]
  fn free_delivery_coupon_waives_shipping_below_threshold() {
    let d = Discount {
      amount: 0.0,
      free_delivery: true,
    };
    let q = build_quote(1000.0, Some(&d), &settings(), PaymentOption::Online);
    assert_eq!(q.shipping_charge, 0.0);
    assert_eq!(q.total, 1000.0);
  }

  #[test]
  fn discounted_cod_quote_matches_expected_arithmetic() {
    // 1800 cart, 10% coupon -> 180 off, above threshold so no shipping,
    // COD fee applies on top of the discounted amount.
    let d = Discount {
      amount: 180.0,
      free_delivery: false,
    };
    let q = build_quote(1800.0, Some(&d), &settings(), PaymentOption::Cod);
    assert_eq!(q.discount, 180.0);
    assert_eq!(q.shipping_charge, 0.0);
    assert_eq!(q.total, 1620.0 + q.shipping_charge + q.additional_charge);
  }

  #[test]
  fn minor_unit_conversion_rounds_to_paise() {
    assert_eq!(to_minor_units(1620.0), 162000);
    assert_eq!(to_minor_units(45.5), 4550);
    assert_eq!(to_minor_units(0.335), 34);
  }
}
