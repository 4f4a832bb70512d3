use crate::converters::BatchConverter;
use crate::error::{ConversionError, Result};
use crate::models::Track;
use crate::utils::coordinates::haversine_distance;
use crate::utils::progress::ProgressReporter;
use tracing::{debug, info};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConversionSummary {
    pub tracks: usize,
    pub segments: usize,
    pub points: usize,
    /// Largest horizontal shift applied to any point, in metres
    pub max_shift_meters: f64,
}

impl ConversionSummary {
    pub fn summary(&self) -> String {
        format!(
            "Converted {} points in {} segments of {} tracks (max shift {:.1} m)",
            self.points, self.segments, self.tracks, self.max_shift_meters
        )
    }
}

/// Shifts every track point through a batch converter, one segment per batch
pub struct DatumPipeline {
    converter: Box<dyn BatchConverter>,
}

impl DatumPipeline {
    pub fn new(converter: Box<dyn BatchConverter>) -> Self {
        Self { converter }
    }

    pub fn converter_name(&self) -> &'static str {
        self.converter.name()
    }

    /// Convert all segments in place. Elevation and timestamps are untouched.
    pub async fn convert_tracks(
        &self,
        tracks: &mut [Track],
        progress: Option<&ProgressReporter>,
    ) -> Result<ConversionSummary> {
        let mut summary = ConversionSummary {
            tracks: tracks.len(),
            ..Default::default()
        };

        for (track_index, track) in tracks.iter_mut().enumerate() {
            for (segment_index, segment) in track.segments.iter_mut().enumerate() {
                if let Some(p) = progress {
                    p.set_message(&format!(
                        "Converting track {} segment {} via {}",
                        track_index + 1,
                        segment_index + 1,
                        self.converter.name()
                    ));
                }

                if segment.is_empty() {
                    debug!(
                        "Skipping empty segment {} of track {}",
                        segment_index + 1,
                        track_index + 1
                    );
                    if let Some(p) = progress {
                        p.increment(1);
                    }
                    continue;
                }

                let positions = segment.positions();
                let converted = self.converter.convert(&positions).await?;

                if converted.len() != positions.len() {
                    return Err(ConversionError::LengthMismatch {
                        expected: positions.len(),
                        actual: converted.len(),
                    });
                }

                for (point, position) in segment.points.iter_mut().zip(converted) {
                    let shift_km = haversine_distance(
                        point.latitude,
                        point.longitude,
                        position.latitude,
                        position.longitude,
                    );
                    summary.max_shift_meters = summary.max_shift_meters.max(shift_km * 1000.0);
                    point.set_lat_lon(position);
                }

                summary.segments += 1;
                summary.points += positions.len();

                info!(
                    "Track {} segment {}: converted {} points",
                    track_index + 1,
                    segment_index + 1,
                    positions.len()
                );

                if let Some(p) = progress {
                    p.increment(1);
                }
            }
        }

        if let Some(p) = progress {
            p.finish_with_message(&summary.summary());
        }

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LatLon, Segment, TrackPoint};
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Shifts by a fixed offset, optionally dropping the last point
    struct OffsetConverter {
        offset: f64,
        drop_last: bool,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl BatchConverter for OffsetConverter {
        async fn convert(&self, points: &[LatLon]) -> Result<Vec<LatLon>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut out: Vec<LatLon> = points
                .iter()
                .map(|p| LatLon::new(p.latitude + self.offset, p.longitude - self.offset))
                .collect();
            if self.drop_last {
                out.pop();
            }
            Ok(out)
        }

        fn name(&self) -> &'static str {
            "offset"
        }
    }

    fn pipeline(drop_last: bool) -> (DatumPipeline, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let converter = OffsetConverter {
            offset: 0.001,
            drop_last,
            calls: Arc::clone(&calls),
        };
        (DatumPipeline::new(Box::new(converter)), calls)
    }

    fn point(lat: f64, lon: f64, ele: &str, time: &str) -> TrackPoint {
        TrackPoint::new(lat, lon, Some(ele.to_string()), Some(time.to_string())).unwrap()
    }

    fn tracks() -> Vec<Track> {
        vec![Track::new(
            Some("t".to_string()),
            vec![
                Segment::new(vec![
                    point(35.0, 139.0, "10", "2024-05-01T00:00:00Z"),
                    point(35.1, 139.1, "11", "2024-05-01T00:00:05Z"),
                ]),
                Segment::default(),
                Segment::new(vec![point(36.0, 140.0, "12", "2024-05-01T00:10:00Z")]),
            ],
        )]
    }

    #[tokio::test]
    async fn test_overwrites_positions_in_order() {
        let (pipeline, calls) = pipeline(false);
        let mut tracks = tracks();

        let summary = pipeline.convert_tracks(&mut tracks, None).await.unwrap();

        assert_eq!(summary.points, 3);
        assert_eq!(summary.segments, 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2); // empty segment skipped

        let first = &tracks[0].segments[0].points;
        assert!((first[0].latitude - 35.001).abs() < 1e-12);
        assert!((first[1].longitude - 139.099).abs() < 1e-12);
        assert_eq!(first[1].elevation.as_deref(), Some("11"));
        assert_eq!(first[1].timestamp.as_deref(), Some("2024-05-01T00:00:05Z"));
        assert!(summary.max_shift_meters > 100.0 && summary.max_shift_meters < 200.0);
    }

    #[tokio::test]
    async fn test_length_mismatch_is_fatal() {
        let (pipeline, _) = pipeline(true);
        let mut tracks = tracks();
        let before = tracks.clone();

        let result = pipeline.convert_tracks(&mut tracks, None).await;

        assert!(matches!(
            result,
            Err(ConversionError::LengthMismatch {
                expected: 2,
                actual: 1
            })
        ));
        // no partial overwrite of the failing segment
        assert_eq!(tracks[0].segments[0], before[0].segments[0]);
    }
}
