//! Infrastructure layer for the relay client.
//!
//! Contains the adapters that touch the outside world: the WebSocket
//! connection to the relay service, OS input injection, and the on-disk
//! configuration file.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `relay_core`, but MUST NOT be imported by the `application` layer.
//!
//! # Sub-modules
//!
//! - **`injection`** – [`crate::application::execute::InputInjector`]
//!   implementations: the real `enigo`-backed injector and a recording mock
//!   for tests.
//!
//! - **`network`** – WebSocket client that connects to the relay service,
//!   registers this machine as the PC client, and forwards inbound command
//!   events to the dispatch loop.
//!
//! - **`config`** – TOML configuration: server URL, initial window region
//!   and click offset, executor timing constants.

pub mod config;
pub mod injection;
pub mod network;
