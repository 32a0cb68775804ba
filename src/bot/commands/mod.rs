//! Discord command implementations organized by category.

#![allow(clippy::too_long_first_doc_paragraph)]

/// Client commands
pub mod client;

/// Employee status, availability and leave commands
pub mod employee;

/// Engagement scheduling and staffing commands
pub mod engagement;

/// General utility commands
pub mod general;

/// Vulnerability tracking commands
pub mod vulnerability;

// Export commands
pub use client::*;
pub use employee::*;
pub use engagement::*;
pub use general::*;
pub use vulnerability::*;
