pub mod constants;
pub mod coordinates;
pub mod filename;
pub mod progress;

pub use constants::*;
pub use coordinates::{decode_sexagesimal, encode_sexagesimal, haversine_distance};
pub use filename::derive_output_filename;
pub use progress::ProgressReporter;
