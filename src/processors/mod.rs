pub mod datum_pipeline;

pub use datum_pipeline::{ConversionSummary, DatumPipeline};
