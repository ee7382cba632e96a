//! Batch SEO metadata enricher for WooCommerce product CSV exports.
//!
//! Reads product rows, asks a local generation service for an SEO title
//! and meta description, then forces both through a deterministic
//! synthesis pipeline (sanitize, length enforcement, keyphrase
//! injection, single-CTA placement) that yields a valid result for any
//! input.

pub mod application;
pub mod domain;
pub mod infrastructure;
