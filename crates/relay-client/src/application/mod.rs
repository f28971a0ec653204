//! Application layer use cases for the relay client.
//!
//! - **`execute`** – The input action executor: one operation per primitive
//!   (key tap, click, drag), each delegating to an [`execute::InputInjector`]
//!   implementation injected at construction time. Owns the focus-assurance
//!   discipline and the post-action settle delays.
//!
//! - **`dispatch`** – The command dispatcher: validates an inbound command,
//!   routes it to exactly one executor operation, and packages the outcome
//!   into an acknowledgment.
//!
//! - **`calibrate`** – The interactive calibration procedure: collects six
//!   confirmed pointer samples, derives a candidate window rectangle,
//!   performs verification clicks, and commits or discards.
//!
//! - **`self_test`** – Canned exercise of the executor so the operator can
//!   verify input injection works before going live.
//!
//! **Dependency rule**: this layer depends only on `relay_core` and the
//! traits it defines itself. Infrastructure adapters implement those traits.

pub mod calibrate;
pub mod dispatch;
pub mod execute;
pub mod self_test;
