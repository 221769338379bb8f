//! Core domain types
//!
//! This module contains the structures that describe a remote generation
//! job independently of which service produced it. The poller only ever
//! looks at these types, never at raw response bodies.

pub mod job;
