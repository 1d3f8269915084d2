pub mod actor;
pub mod errors;
pub mod status;

pub use actor::{Actor, Role};
pub use errors::DomainError;
pub use status::{
    InstrumentStatus, InvoiceStatus, OrderPaymentStatus, OrderStatus, OrderType, PaymentStatus,
};
