//! Application Services
//!
//! Orchestrate domain operations through the repository and delivery ports.
//! Contain NO infrastructure logic - pure business orchestration.

mod inquiry;
mod payment;
mod payment_code;

pub use inquiry::InquiryService;
pub use payment::PaymentService;
pub use payment_code::PaymentCodeService;

use paycode_types::{InquiryRepository, PaymentCodeRepository, PaymentRepository};

/// A single storage backend serving all three repositories.
///
/// Cloning must be cheap (a pool handle or shared map); each service keeps
/// its own clone.
pub trait Store: PaymentCodeRepository + InquiryRepository + PaymentRepository + Clone {}

impl<T> Store for T where T: PaymentCodeRepository + InquiryRepository + PaymentRepository + Clone {}
