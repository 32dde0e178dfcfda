//! Alert use cases: periodic evaluation and chat-driven management.

pub mod evaluator;
pub mod service;

pub use evaluator::{AlertEvaluator, CycleReport};
pub use service::AlertService;
