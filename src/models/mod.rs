//! Data models for the Ecclesia website backend.
//!
//! Field names serialize in camelCase to match the website's form payloads.

mod contact;
mod user;
mod verse;

pub use contact::*;
pub use user::*;
pub use verse::*;
