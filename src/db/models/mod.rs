//! Database models split into domain-specific modules.
//!
//! This module re-exports all types so handlers can import from `crate::db`.

pub mod common;
pub mod exercise;
pub mod template;
pub mod user;
pub mod workout;
pub mod workout_log;

pub use common::*;
pub use exercise::*;
pub use template::*;
pub use user::*;
pub use workout::*;
pub use workout_log::*;
