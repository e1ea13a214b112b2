//! Data transfer shapes mirrored from the remote service.
//!
//! The client never owns authoritative copies of these records; they are
//! decoded from API responses for display and edited before being sent back.

pub mod common;
pub mod donation;
pub mod hospital;
pub mod inventory;
pub mod request;
pub mod user;

pub use common::*;
pub use donation::*;
pub use hospital::*;
pub use inventory::*;
pub use request::*;
pub use user::*;
