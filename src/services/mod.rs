pub mod inventory_service;
pub mod invoice_service;
pub mod notify;
pub mod numbering;
pub mod order_service;
pub mod payment_service;
pub mod pricing;
