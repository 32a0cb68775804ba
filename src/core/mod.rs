//! Core scheduling and reporting logic, independent of Discord.
//!
//! The pure engine ([`availability`], [`status`], [`utilization`], [`risk`]) works on
//! already loaded models and never touches the database. The remaining modules pair
//! store operations with the aggregates built on top of them.

pub mod availability;
pub mod client;
pub mod dashboard;
pub mod dates;
pub mod employee;
pub mod engagement;
pub mod leave;
pub mod risk;
pub mod service;
pub mod status;
pub mod utilization;
pub mod vulnerability;
