pub mod scoring;
pub mod engine;

pub use scoring::{bias, score, wbias, wmape};
pub use engine::{ErrorReport, ItemScore, MetricsEngine, PredictionRecord, YoyKpis};
