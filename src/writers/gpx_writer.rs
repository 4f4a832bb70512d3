use crate::error::{ConversionError, Result};
use crate::models::{Track, TrackPoint};
use crate::utils::constants::GPX_CREATOR;
use geo_types::Point;
use gpx::{Gpx, GpxVersion, TrackSegment, Waypoint};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use time::{OffsetDateTime, UtcOffset};

/// Writes tracks as a GPX 1.1 document
pub struct GpxWriter {
    creator: String,
}

impl GpxWriter {
    pub fn new() -> Self {
        Self {
            creator: GPX_CREATOR.to_string(),
        }
    }

    pub fn write_file(&self, tracks: &[Track], path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_to(tracks, &mut writer)?;
        writer.flush()?;
        Ok(())
    }

    pub fn write_to<W: Write>(&self, tracks: &[Track], writer: W) -> Result<()> {
        let document = self.build_document(tracks)?;
        gpx::write(&document, writer)?;
        Ok(())
    }

    fn build_document(&self, tracks: &[Track]) -> Result<Gpx> {
        let tracks = tracks
            .iter()
            .map(|track| {
                let segments = track
                    .segments
                    .iter()
                    .map(|segment| {
                        let points = segment
                            .points
                            .iter()
                            .map(to_waypoint)
                            .collect::<Result<Vec<_>>>()?;
                        Ok(TrackSegment { points })
                    })
                    .collect::<Result<Vec<_>>>()?;

                Ok(gpx::Track {
                    name: track.name.clone(),
                    comment: None,
                    description: None,
                    source: None,
                    links: vec![],
                    type_: None,
                    number: None,
                    segments,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Gpx {
            version: GpxVersion::Gpx11,
            creator: Some(self.creator.clone()),
            metadata: None,
            waypoints: vec![],
            tracks,
            routes: vec![],
        })
    }
}

impl Default for GpxWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn to_waypoint(point: &TrackPoint) -> Result<Waypoint> {
    let mut waypoint = Waypoint::new(Point::new(point.longitude, point.latitude));
    waypoint.elevation = point.elevation_meters();

    if let Some(timestamp) = point.parsed_timestamp()? {
        let nanos = timestamp.timestamp_nanos_opt().ok_or_else(|| {
            ConversionError::InvalidFormat(format!("Timestamp out of range: {}", timestamp))
        })?;
        let offset = UtcOffset::from_whole_seconds(timestamp.offset().local_minus_utc())
            .map_err(|e| ConversionError::InvalidFormat(format!("Invalid UTC offset: {}", e)))?;
        let instant = OffsetDateTime::from_unix_timestamp_nanos(i128::from(nanos))
            .map_err(|e| ConversionError::InvalidFormat(format!("Invalid timestamp: {}", e)))?
            .to_offset(offset);
        waypoint.time = Some(instant.into());
    }

    Ok(waypoint)
}
