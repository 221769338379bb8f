//! Genflow Core
//!
//! Core types shared by the genflow client and CLI.
//!
//! This crate contains:
//! - Domain types: generation jobs and their status snapshots
//! - DTOs: request/response bodies for the Gamma and DocsAutomator APIs

pub mod domain;
pub mod dto;
