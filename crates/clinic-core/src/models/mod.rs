//! Domain models for the clinic records service.

mod aggregate;
mod doctor;
mod patient;
mod visit;

pub use aggregate::*;
pub use doctor::*;
pub use patient::*;
pub use visit::*;
