//! Domain models for the MedBuddy core.

mod calendar;
mod chat;
mod medication;
mod notification;
mod pharmacy;
mod profile;
mod validation;

pub use calendar::*;
pub use chat::*;
pub use medication::*;
pub use notification::*;
pub use pharmacy::*;
pub use profile::*;
pub use validation::*;
