use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{ConversionError, Result};

/// A latitude/longitude pair in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    pub latitude: f64,
    pub longitude: f64,
}

impl LatLon {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct TrackPoint {
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,

    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,

    /// Elevation in metres, kept as the decimal text it was read as
    pub elevation: Option<String>,

    /// RFC 3339 timestamp text
    pub timestamp: Option<String>,
}

impl TrackPoint {
    /// Build a validated track point. Elevation must be decimal text and the
    /// timestamp an RFC 3339 point in time when present.
    pub fn new(
        latitude: f64,
        longitude: f64,
        elevation: Option<String>,
        timestamp: Option<String>,
    ) -> Result<Self> {
        let point = Self {
            latitude,
            longitude,
            elevation,
            timestamp,
        };

        point.validate()?;

        if let Some(ref elevation) = point.elevation {
            elevation.parse::<f64>().map_err(|_| {
                ConversionError::InvalidFormat(format!("Invalid elevation: '{}'", elevation))
            })?;
        }

        point.parsed_timestamp()?;

        Ok(point)
    }

    pub fn lat_lon(&self) -> LatLon {
        LatLon::new(self.latitude, self.longitude)
    }

    pub fn set_lat_lon(&mut self, position: LatLon) {
        self.latitude = position.latitude;
        self.longitude = position.longitude;
    }

    pub fn elevation_meters(&self) -> Option<f64> {
        self.elevation.as_deref().and_then(|e| e.parse::<f64>().ok())
    }

    pub fn parsed_timestamp(&self) -> Result<Option<DateTime<FixedOffset>>> {
        match self.timestamp.as_deref() {
            Some(text) => Ok(Some(DateTime::parse_from_rfc3339(text)?)),
            None => Ok(None),
        }
    }
}

/// Ordered run of track points; order defines the trajectory
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub points: Vec<TrackPoint>,
}

impl Segment {
    pub fn new(points: Vec<TrackPoint>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn positions(&self) -> Vec<LatLon> {
        self.points.iter().map(TrackPoint::lat_lon).collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub name: Option<String>,
    pub segments: Vec<Segment>,
}

impl Track {
    pub fn new(name: Option<String>, segments: Vec<Segment>) -> Self {
        Self { name, segments }
    }

    pub fn point_count(&self) -> usize {
        self.segments.iter().map(Segment::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_point_validation() {
        let point = TrackPoint::new(
            35.6812,
            139.7671,
            Some("40.5".to_string()),
            Some("2024-05-01T09:30:00+09:00".to_string()),
        )
        .unwrap();

        assert_eq!(point.elevation_meters(), Some(40.5));
        assert!(point.parsed_timestamp().unwrap().is_some());
    }

    #[test]
    fn test_invalid_coordinates() {
        assert!(TrackPoint::new(91.0, 139.7671, None, None).is_err());
        assert!(TrackPoint::new(35.0, 181.0, None, None).is_err());
    }

    #[test]
    fn test_invalid_elevation_and_timestamp() {
        assert!(TrackPoint::new(35.0, 139.0, Some("high".to_string()), None).is_err());
        assert!(TrackPoint::new(35.0, 139.0, None, Some("yesterday".to_string())).is_err());
    }

    #[test]
    fn test_segment_positions_keep_order() {
        let segment = Segment::new(vec![
            TrackPoint::new(35.0, 139.0, None, None).unwrap(),
            TrackPoint::new(35.1, 139.1, None, None).unwrap(),
        ]);

        assert_eq!(
            segment.positions(),
            vec![LatLon::new(35.0, 139.0), LatLon::new(35.1, 139.1)]
        );
    }
}
