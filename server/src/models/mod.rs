// server/src/models/mod.rs

//! Data structures representing database entities and client payloads.

pub mod address;
pub mod cart;
pub mod coupon;
pub mod customer;
pub mod order;
pub mod order_detail;
pub mod pending_order;
pub mod prescription;
pub mod settings;

pub use address::AddressPayload;
pub use cart::{CartLine, CartPayload};
pub use coupon::Coupon;
pub use customer::Customer;
pub use order::{NewOrder, Order, OrderStatus, PaymentOption, PaymentStatus};
pub use order_detail::OrderDetail;
pub use pending_order::PendingOrder;
pub use prescription::Prescription;
pub use settings::Settings;
