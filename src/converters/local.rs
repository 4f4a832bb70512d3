use crate::converters::BatchConverter;
use crate::error::{ConversionError, Result};
use crate::models::LatLon;
use async_trait::async_trait;
use geodesy::prelude::*;
use tracing::debug;

/// Offline datum shift backed by a geodesy operator pipeline.
///
/// The operator context is rebuilt per call so the adapter itself only holds
/// the definition and stays `Send + Sync`.
pub struct LocalTransform {
    definition: String,
}

impl LocalTransform {
    /// Checks that `definition` parses before accepting it
    pub fn new(definition: &str) -> Result<Self> {
        let transform = Self {
            definition: definition.to_string(),
        };
        transform.context()?;
        Ok(transform)
    }

    fn context(&self) -> Result<(Minimal, OpHandle)> {
        let mut context = Minimal::new();
        let op = context.op(&self.definition).map_err(|e| {
            ConversionError::LocalTransform(format!(
                "Invalid operator '{}': {}",
                self.definition, e
            ))
        })?;
        Ok((context, op))
    }

    /// Shift a single position; elevation is carried through the ellipsoidal
    /// height channel and returned alongside.
    pub fn transform(&self, latitude: f64, longitude: f64, elevation: f64) -> Result<(f64, f64, f64)> {
        let shifted = self.transform_batch(&[(latitude, longitude, elevation)])?;
        shifted.into_iter().next().ok_or_else(|| {
            ConversionError::LocalTransform("Operator returned no coordinates".to_string())
        })
    }

    fn transform_batch(&self, points: &[(f64, f64, f64)]) -> Result<Vec<(f64, f64, f64)>> {
        let (context, op) = self.context()?;

        let mut data: Vec<Coor4D> = points
            .iter()
            .map(|&(lat, lon, h)| Coor4D::geo(lat, lon, h, 0.0))
            .collect();

        context
            .apply(op, Fwd, &mut data)
            .map_err(|e| ConversionError::LocalTransform(e.to_string()))?;

        data.iter()
            .map(|c| {
                let (lon, lat, h) = (c.0[0].to_degrees(), c.0[1].to_degrees(), c.0[2]);
                if !lat.is_finite() || !lon.is_finite() {
                    return Err(ConversionError::LocalTransform(
                        "Operator produced a non-finite coordinate".to_string(),
                    ));
                }
                Ok((lat, lon, h))
            })
            .collect()
    }
}

#[async_trait]
impl BatchConverter for LocalTransform {
    async fn convert(&self, points: &[LatLon]) -> Result<Vec<LatLon>> {
        debug!("Transforming {} points locally", points.len());

        let input: Vec<(f64, f64, f64)> = points
            .iter()
            .map(|p| (p.latitude, p.longitude, 0.0))
            .collect();

        Ok(self
            .transform_batch(&input)?
            .into_iter()
            .map(|(lat, lon, _)| LatLon::new(lat, lon))
            .collect())
    }

    fn name(&self) -> &'static str {
        "local"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::constants::DEFAULT_LOCAL_PIPELINE;

    #[test]
    fn test_invalid_definition_rejected() {
        assert!(LocalTransform::new("no_such_operator x=1").is_err());
    }

    #[test]
    fn test_tokyo_shift_direction() {
        let transform = LocalTransform::new(DEFAULT_LOCAL_PIPELINE).unwrap();

        // Tokyo Station, Tokyo datum
        let (lat, lon, _) = transform.transform(35.6812, 139.7671, 0.0).unwrap();

        // Tokyo to JGD2000 moves points roughly 12" north and 12" west around Tokyo
        let dlat = lat - 35.6812;
        let dlon = lon - 139.7671;
        assert!(dlat > 0.002 && dlat < 0.005, "dlat = {}", dlat);
        assert!(dlon < -0.002 && dlon > -0.005, "dlon = {}", dlon);
    }

    #[tokio::test]
    async fn test_batch_preserves_count_and_order() {
        let transform = LocalTransform::new(DEFAULT_LOCAL_PIPELINE).unwrap();
        let input = vec![
            LatLon::new(35.0, 135.0),
            LatLon::new(36.0, 140.0),
            LatLon::new(34.5, 133.5),
        ];

        let output = transform.convert(&input).await.unwrap();

        assert_eq!(output.len(), input.len());
        for (before, after) in input.iter().zip(&output) {
            assert!((before.latitude - after.latitude).abs() < 0.01);
            assert!((before.longitude - after.longitude).abs() < 0.01);
        }
    }
}
