//! Validation rules and the default validator for message drafts.
//!
//! Rules are enforced at the ingestion boundary, before a draft reaches
//! the repository, so a rejected send leaves the store unchanged.

pub mod rules;
pub mod service;
