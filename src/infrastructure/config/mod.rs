//! Infrastructure configuration modules.

pub mod logging;
pub mod metrics;
pub mod schedule;
pub mod settings;
pub mod supervisor;
pub mod telegram;

pub use settings::Config;
