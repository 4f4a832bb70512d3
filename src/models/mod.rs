pub mod track;

pub use track::{LatLon, Segment, Track, TrackPoint};
