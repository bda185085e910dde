//! # Paycode Hex
//!
//! Application service layer and HTTP adapter for the payment code service.
//!
//! ## Architecture
//!
//! - `service/` - The three engines: payment code lifecycle, inquiry binding,
//!   payment recording
//! - `sweeper` - Periodic expiry of past-due payment codes
//! - `inbound/` - HTTP adapter (Axum server)
//!
//! Services are generic over the port traits, allowing different repository
//! and delivery implementations to be injected.

pub mod inbound;
pub mod openapi;
pub mod service;
pub mod sweeper;

#[cfg(test)]
mod service_tests;

pub use service::{InquiryService, PaymentCodeService, PaymentService, Store};
pub use sweeper::ExpirySweeper;
