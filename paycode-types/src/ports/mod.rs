//! Port traits (interfaces for adapters).
//!
//! These are the contracts that adapters must implement.
//! The application layer depends on these traits, not concrete implementations.

mod delivery;
mod repository;

pub use delivery::{DeliveryError, PaymentCodeNotifier, PaymentPublisher};
pub use repository::{InquiryRepository, PaymentCodeRepository, PaymentRepository};
