//! Domain models for the payment code service.

pub mod id;
pub mod inquiry;
pub mod payment;
pub mod payment_code;

pub use id::{InquiryId, PaymentCodeId, PaymentId};
pub use inquiry::Inquiry;
pub use payment::Payment;
pub use payment_code::{PaymentCode, PaymentCodeStatus, VALIDITY_MONTHS};
