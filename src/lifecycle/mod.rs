//! Task lifecycle and time accounting.
//!
//! [`store::TaskStore`] holds the records; [`controller::LifecycleController`]
//! is the only thing allowed to move a task between states.

pub mod controller;
pub mod store;

pub use controller::LifecycleController;
