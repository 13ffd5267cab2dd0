//! CLI command implementations

pub mod compare;
pub mod convert;
pub mod detect;
pub mod extract;
pub mod verify;
