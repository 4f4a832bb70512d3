use crate::error::{ConversionError, Result};
use crate::models::{Segment, Track, TrackPoint};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, warn};

/// Reads the track part of a GPX document. Waypoints and routes are ignored.
pub struct GpxReader;

impl GpxReader {
    pub fn new() -> Self {
        Self
    }

    pub fn read_tracks(&self, path: &Path) -> Result<Vec<Track>> {
        let file = File::open(path)?;
        self.read_tracks_from(BufReader::new(file))
    }

    pub fn read_tracks_from<R: Read>(&self, input: R) -> Result<Vec<Track>> {
        let document = gpx::read(input)?;

        if !document.waypoints.is_empty() || !document.routes.is_empty() {
            warn!(
                "Ignoring {} waypoints and {} routes, only tracks are converted",
                document.waypoints.len(),
                document.routes.len()
            );
        }

        let tracks = document
            .tracks
            .iter()
            .map(|track| {
                let segments = track
                    .segments
                    .iter()
                    .map(|segment| {
                        segment
                            .points
                            .iter()
                            .map(Self::to_track_point)
                            .collect::<Result<Vec<_>>>()
                            .map(Segment::new)
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(Track::new(track.name.clone(), segments))
            })
            .collect::<Result<Vec<_>>>()?;

        debug!("Read {} tracks from GPX", tracks.len());
        Ok(tracks)
    }

    fn to_track_point(waypoint: &gpx::Waypoint) -> Result<TrackPoint> {
        let position = waypoint.point();
        let timestamp = match &waypoint.time {
            Some(time) => Some(time.format()?),
            None => None,
        };

        TrackPoint::new(
            position.y(),
            position.x(),
            waypoint.elevation.map(|e| e.to_string()),
            timestamp,
        )
        .map_err(|e| ConversionError::InvalidFormat(format!("GPX track point: {}", e)))
    }
}

impl Default for GpxReader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCUMENT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="test" xmlns="http://www.topografix.com/GPX/1/1">
  <wpt lat="35.0" lon="139.0"><name>ignored</name></wpt>
  <trk>
    <name>Imperial Palace loop</name>
    <trkseg>
      <trkpt lat="35.6852" lon="139.7528"><ele>12.5</ele><time>2024-05-01T00:00:00Z</time></trkpt>
      <trkpt lat="35.6870" lon="139.7540"><ele>13</ele></trkpt>
    </trkseg>
    <trkseg>
      <trkpt lat="35.6890" lon="139.7560"></trkpt>
    </trkseg>
  </trk>
</gpx>"#;

    #[test]
    fn test_reads_tracks_only() {
        let tracks = GpxReader::new().read_tracks_from(DOCUMENT.as_bytes()).unwrap();

        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].name.as_deref(), Some("Imperial Palace loop"));
        assert_eq!(tracks[0].segments.len(), 2);

        let first = &tracks[0].segments[0].points[0];
        assert!((first.latitude - 35.6852).abs() < 1e-9);
        assert!((first.longitude - 139.7528).abs() < 1e-9);
        assert_eq!(first.elevation.as_deref(), Some("12.5"));
        assert!(first.parsed_timestamp().unwrap().is_some());

        let second = &tracks[0].segments[0].points[1];
        assert_eq!(second.elevation.as_deref(), Some("13"));
        assert!(second.timestamp.is_none());
    }

    #[test]
    fn test_rejects_invalid_document() {
        assert!(GpxReader::new().read_tracks_from("<gpx".as_bytes()).is_err());
    }
}
