// Library interface for liftplan modules
// The binary and the integration tests both go through this crate root

pub mod calendar;
pub mod config;
pub mod error;
pub mod export;
pub mod logging;
pub mod models;
pub mod plan;
pub mod prescription;
pub mod report;
pub mod rpe;
pub mod scheduler;
pub mod strength;
pub mod templates;

// Re-export commonly used types for convenience
pub use models::*;
pub use calendar::CalendarEvent;
pub use config::PlanConfig;
pub use error::{PlanError, Result};
pub use logging::{LogConfig, LogFormat, LogLevel};
pub use plan::{GeneratedPlan, PlanGenerator, PlanRequest};
pub use prescription::PrescriptionEngine;
pub use rpe::RpeTable;
pub use scheduler::build_cycle;
pub use strength::{estimate_one_rep_max, BodyComposition, MaximaMap};
pub use templates::DayCount;
