//! Non-command Discord interaction handlers.

/// Autocomplete handlers for employee, engagement and client names
pub mod autocomplete;
