pub mod gpx_writer;

pub use gpx_writer::GpxWriter;
