pub mod message;
pub mod order;
