//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod actions;
pub mod chat_message;
pub mod dispatch;
pub mod flipcard_interaction;
pub mod process_model_response;
pub(crate) mod shared;
pub mod stage_transaction;
pub mod stock_allocation;

#[cfg(test)]
pub(crate) mod test_support;
