//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod client;
pub mod employee;
pub mod engagement;
pub mod engagement_employee;
pub mod leave;
pub mod service;
pub mod vulnerability;

// Re-export specific types to avoid conflicts
pub use client::{Column as ClientColumn, Entity as Client, Model as ClientModel};
pub use employee::{Column as EmployeeColumn, Entity as Employee, Model as EmployeeModel};
pub use engagement::{Column as EngagementColumn, Entity as Engagement, Model as EngagementModel};
pub use engagement_employee::{
    Column as EngagementEmployeeColumn, Entity as EngagementEmployee,
    Model as EngagementEmployeeModel,
};
pub use leave::{Column as LeaveColumn, Entity as Leave, Model as LeaveModel};
pub use service::{Column as ServiceColumn, Entity as Service, Model as ServiceModel};
pub use vulnerability::{
    Column as VulnerabilityColumn, Entity as Vulnerability, Model as VulnerabilityModel,
};
