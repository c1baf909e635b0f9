//! Command implementations for the CLI
//!
//! - recent: list the most recent call logs
//! - bookings: list calls with a confirmed booking
//! - stats: aggregate call statistics
//! - save: persist a call record from a JSON file
//! - config: configuration display and validation

pub mod bookings;
pub mod config;
pub mod recent;
pub mod save;
pub mod stats;
