// server/src/services/mod.rs

//! Outbound adapters: payment gateway, WhatsApp notifications, email, image
//! hosting. Each is a trait so the workflows depend on the seam, not the
//! vendor; the concrete types here speak the vendors' HTTP APIs.

pub mod email;
pub mod imaging;
pub mod notify;
pub mod razorpay;
