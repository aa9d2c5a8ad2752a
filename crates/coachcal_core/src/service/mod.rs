//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Own the application operations (demo reset, CSV export) that sit
//!   above individual repositories.
//! - Keep shells (CLI, UI bridges) decoupled from storage details.

pub mod calendar_service;
pub mod client_service;
pub mod demo;
pub mod export;
pub mod session_service;
