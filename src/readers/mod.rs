pub mod gpx_reader;
pub mod track_log_reader;

pub use gpx_reader::GpxReader;
pub use track_log_reader::TrackLogReader;
