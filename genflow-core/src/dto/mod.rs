//! Data Transfer Objects for the remote generation services
//!
//! Request and response bodies exactly as the remote APIs spell them.
//! Field names are camelCase on the wire and snake_case in Rust.

pub mod docs;
pub mod gamma;
