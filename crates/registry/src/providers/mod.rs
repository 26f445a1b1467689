//! Registry provider implementations.

pub mod hub;
pub mod mock;

pub use hub::HubClient;
pub use mock::{MockRegistry, RecordedCall};
