//! Caller-facing cached rendering session.

pub mod view_session;

pub use view_session::{ViewSession, ViewSessionOpts};
