//! # Cadastro API Server Library
//!
//! HTTP surface for the department, company and user registry.
//!
//! ## Modules
//!
//! - `app`: Application state, router builder and session gate
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod routes;
