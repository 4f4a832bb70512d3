pub mod local;
pub mod web;

pub use local::LocalTransform;
pub use web::{HttpTransport, ReqwestTransport, WebConverter};

use crate::error::Result;
use crate::models::LatLon;
use crate::settings::Settings;
use async_trait::async_trait;

/// Converts a batch of Tokyo-datum positions to the target datum.
///
/// Implementations return exactly one position per input, in input order.
#[async_trait]
pub trait BatchConverter: Send + Sync {
    async fn convert(&self, points: &[LatLon]) -> Result<Vec<LatLon>>;

    fn name(&self) -> &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConverterKind {
    /// Delegate to the web conversion service
    Web,
    /// Apply the configured geodesy pipeline locally
    Local,
}

impl ConverterKind {
    pub fn build(self, settings: &Settings) -> Result<Box<dyn BatchConverter>> {
        match self {
            ConverterKind::Web => {
                let transport = ReqwestTransport::new()?;
                Ok(Box::new(WebConverter::new(
                    transport,
                    settings.authority.clone(),
                )?))
            }
            ConverterKind::Local => Ok(Box::new(LocalTransform::new(&settings.local.pipeline)?)),
        }
    }
}

impl std::fmt::Display for ConverterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConverterKind::Web => write!(f, "web"),
            ConverterKind::Local => write!(f, "local"),
        }
    }
}
