pub mod client;
pub mod client_address;
pub mod instrument;
pub mod invoice;
pub mod order;
pub mod order_item;
pub mod payment;
