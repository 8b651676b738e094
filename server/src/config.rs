// server/src/config.rs

use crate::coupon::CouponRules;
use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  pub database_url: String,

  // Payment gateway (Razorpay-shaped API)
  pub razorpay_key_id: String,
  pub razorpay_key_secret: String,
  pub razorpay_api_base: String,

  // WhatsApp / SMS notification channel (Meta graph-shaped API)
  pub whatsapp_token: String,
  pub whatsapp_phone_number_id: String,
  pub whatsapp_api_base: String,

  // Transactional email (Brevo-shaped API)
  pub email_api_key: String,
  pub email_api_base: String,
  pub email_sender: String,

  // Image hosting for prescription uploads
  pub image_api_base: String,
  pub image_upload_preset: String,

  // Fallbacks used when the settings table has no row yet.
  pub shipping_charge_fallback: f64,
  pub shipping_threshold_fallback: f64,
  pub cod_fee_fallback: f64,

  // Whether percentage coupons honor max_discount. Off by default until the
  // business confirms the historical uncapped behavior was unintentional.
  pub coupon_cap_percentage: bool,

  // Pending orders older than this are swept to Abandoned.
  pub pending_ttl_hours: i64,
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present

    let get_env = |var_name: &str| {
      env::var(var_name).map_err(|e| AppError::Config(format!("Missing environment variable '{}': {}", var_name, e)))
    };
    let get_env_f64 = |var_name: &str, default: f64| -> Result<f64> {
      match env::var(var_name) {
        Ok(raw) => raw
          .parse::<f64>()
          .map_err(|e| AppError::Config(format!("Invalid {}: {}", var_name, e))),
        Err(_) => Ok(default),
      }
    };

    let server_host = get_env("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let server_port = get_env("SERVER_PORT")
      .unwrap_or_else(|_| "8080".to_string())
      .parse::<u16>()
      .map_err(|e| AppError::Config(format!("Invalid SERVER_PORT: {}", e)))?;
    let database_url = get_env("DATABASE_URL")?;

    let razorpay_key_id = get_env("RAZORPAY_KEY_ID").unwrap_or_else(|_| "rzp_test_key".to_string());
    let razorpay_key_secret = get_env("RAZORPAY_KEY_SECRET").unwrap_or_else(|_| "rzp_test_secret".to_string());
    let razorpay_api_base = get_env("RAZORPAY_API_BASE").unwrap_or_else(|_| "https://api.razorpay.com".to_string());

    let whatsapp_token = get_env("WHATSAPP_TOKEN").unwrap_or_default();
    let whatsapp_phone_number_id = get_env("WHATSAPP_PHONE_NUMBER_ID").unwrap_or_default();
    let whatsapp_api_base =
      get_env("WHATSAPP_API_BASE").unwrap_or_else(|_| "https://graph.facebook.com/v21.0".to_string());

    let email_api_key = get_env("EMAIL_API_KEY").unwrap_or_default();
    let email_api_base = get_env("EMAIL_API_BASE").unwrap_or_else(|_| "https://api.brevo.com".to_string());
    let email_sender = get_env("EMAIL_SENDER").unwrap_or_else(|_| "orders@medikart.example".to_string());

    let image_api_base = get_env("IMAGE_API_BASE").unwrap_or_default();
    let image_upload_preset = get_env("IMAGE_UPLOAD_PRESET").unwrap_or_else(|_| "prescriptions".to_string());

    let shipping_charge_fallback = get_env_f64("SHIPPING_CHARGE", 40.0)?;
    let shipping_threshold_fallback = get_env_f64("SHIPPING_THRESHOLD", 500.0)?;
    let cod_fee_fallback = get_env_f64("COD_FEE", 20.0)?;

    let coupon_cap_percentage = get_env("COUPON_CAP_PERCENTAGE")
      .unwrap_or_else(|_| "false".to_string())
      .parse::<bool>()
      .map_err(|e| AppError::Config(format!("Invalid COUPON_CAP_PERCENTAGE value: {}", e)))?;

    let pending_ttl_hours = get_env("PENDING_ORDER_TTL_HOURS")
      .unwrap_or_else(|_| "24".to_string())
      .parse::<i64>()
      .map_err(|e| AppError::Config(format!("Invalid PENDING_ORDER_TTL_HOURS: {}", e)))?;

    tracing::info!("Application configuration loaded successfully.");

    Ok(Self {
      server_host,
      server_port,
      database_url,
      razorpay_key_id,
      razorpay_key_secret,
      razorpay_api_base,
      whatsapp_token,
      whatsapp_phone_number_id,
      whatsapp_api_base,
      email_api_key,
      email_api_base,
      email_sender,
      image_api_base,
      image_upload_preset,
      shipping_charge_fallback,
      shipping_threshold_fallback,
      cod_fee_fallback,
      coupon_cap_percentage,
      pending_ttl_hours,
    })
  }

  pub fn coupon_rules(&self) -> CouponRules {
    CouponRules {
      cap_percentage: self.coupon_cap_percentage,
    }
  }
}
