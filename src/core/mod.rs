//! Core Catalog Modules
//!
//! This module contains the two pieces every dashboard interaction runs on:
//! - Canonical and raw record models
//! - The normalization pipeline and the filter/search engine

pub mod models;
pub mod engine;
