//! `StaffingBuddy` - A Discord bot for consultancy staffing and engagement tracking
//!
//! This crate answers the everyday scheduling questions of a security consultancy: who is
//! free between two dates, what is everyone doing today, how utilized is the team, and
//! which engagements and findings need attention. Assignment and leave changes are
//! announced to managers through a background notification queue.

#![deny(
    unsafe_code,
    unsafe_op_in_unsafe_fn,
    unreachable_code,
    unreachable_patterns,
    unused_must_use,
    rustdoc::broken_intra_doc_links,
    rustdoc::private_intra_doc_links,
)]
#![warn(
    missing_docs,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    // Dates and money flow through here; panics and lossy float compares are bugs
    clippy::expect_used,
    clippy::float_cmp,
    clippy::panic,
    clippy::unwrap_used,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro,
    clippy::exit,
    clippy::clone_on_ref_ptr,
    clippy::needless_pass_by_value,
    clippy::large_types_passed_by_value,
    clippy::cognitive_complexity,
    clippy::too_many_lines,
    clippy::match_same_arms,
    clippy::enum_glob_use,
    clippy::wildcard_imports,
    clippy::semicolon_if_nothing_returned,
    clippy::redundant_closure_for_method_calls,
    future_incompatible,
    rust_2018_idioms,
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    // Day counts and percentages are small; i64/f64/u64 conversions are intentional
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
)]

/// Discord bot interface - commands, handlers, and bot context
pub mod bot;
/// Database connection and `config.toml` settings
pub mod config;
/// Core business logic - availability engine, aggregates, and store operations
pub mod core;
/// SeaORM entity definitions for database tables
pub mod entities;
/// Unified error types and result handling
pub mod errors;
/// Manager notifications and the queue that delivers them
pub mod notify;

#[cfg(test)]
pub mod test_utils;
