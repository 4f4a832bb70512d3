use crate::error::{ConversionError, Result};
use crate::models::{Segment, Track, TrackPoint};
use csv::{ReaderBuilder, StringRecord, Trim};
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// One row of a track log:
/// `track,segment,latitude,longitude,elevation,time`
#[derive(Debug, Deserialize)]
struct TrackLogRow {
    track: String,
    segment: u32,
    latitude: f64,
    longitude: f64,
    elevation: Option<String>,
    time: Option<String>,
}

pub struct TrackLogReader {
    has_headers: bool,
}

impl TrackLogReader {
    pub fn new() -> Self {
        Self { has_headers: true }
    }

    pub fn with_headers(has_headers: bool) -> Self {
        Self { has_headers }
    }

    /// Read a track log file into tracks and segments
    pub fn read_tracks(&self, path: &Path) -> Result<Vec<Track>> {
        let file = File::open(path)?;
        self.read_tracks_from(file)
    }

    /// Consecutive rows sharing a track name form one track; within it,
    /// consecutive rows sharing a segment number form one segment.
    pub fn read_tracks_from<R: Read>(&self, input: R) -> Result<Vec<Track>> {
        let mut reader = ReaderBuilder::new()
            .has_headers(self.has_headers)
            .comment(Some(b'#'))
            .trim(Trim::All)
            .from_reader(input);

        let headers = if self.has_headers {
            reader.headers()?.clone()
        } else {
            StringRecord::from(vec!["track", "segment", "latitude", "longitude", "elevation", "time"])
        };

        let mut tracks: Vec<Track> = Vec::new();
        let mut current: Option<(String, u32)> = None;

        for (index, record) in reader.records().enumerate() {
            let record = record?;
            let row: TrackLogRow = record.deserialize(Some(&headers))?;
            let point = self.parse_point(&row).map_err(|e| {
                ConversionError::InvalidFormat(format!("Track log row {}: {}", index + 1, e))
            })?;

            let key = (row.track.clone(), row.segment);
            match current {
                Some((ref track, segment)) if *track == key.0 && segment == key.1 => {}
                Some((ref track, _)) if *track == key.0 => {
                    if let Some(last) = tracks.last_mut() {
                        last.segments.push(Segment::default());
                    }
                }
                _ => {
                    let name = if row.track.is_empty() {
                        None
                    } else {
                        Some(row.track.clone())
                    };
                    tracks.push(Track::new(name, vec![Segment::default()]));
                }
            }
            current = Some(key);

            if let Some(segment) = tracks.last_mut().and_then(|t| t.segments.last_mut()) {
                segment.points.push(point);
            }
        }

        Ok(tracks)
    }

    fn parse_point(&self, row: &TrackLogRow) -> Result<TrackPoint> {
        let elevation = row.elevation.clone().filter(|e| !e.is_empty());
        let time = row.time.clone().filter(|t| !t.is_empty());
        TrackPoint::new(row.latitude, row.longitude, elevation, time)
    }
}

impl Default for TrackLogReader {
    fn default() -> Self {
        Self::new()
    }
}
