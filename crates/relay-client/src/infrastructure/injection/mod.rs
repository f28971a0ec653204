//! Input injection adapters.
//!
//! The real injector drives the OS through the `enigo` crate; the mock
//! records calls for tests. Both implement
//! [`crate::application::execute::InputInjector`].

pub mod enigo_injector;
pub mod mock;

pub use enigo_injector::EnigoInjector;
pub use mock::MockInjector;
