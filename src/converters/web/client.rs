use crate::converters::web::session::ConversionSession;
use crate::converters::web::transport::{HttpTransport, RawResponse, UploadForm};
use crate::converters::BatchConverter;
use crate::error::{ConversionError, Result};
use crate::models::LatLon;
use crate::settings::AuthoritySettings;
use crate::utils::constants::{COMMENT_MARKER, DOWNLOAD_PATH, SUBMIT_PATH, TRIGGER_PATH};
use crate::utils::coordinates::{decode_sexagesimal, encode_sexagesimal};
use async_trait::async_trait;
use chrono::Utc;
use encoding_rs::Encoding;
use std::future::Future;
use tracing::{debug, info, warn};

/// Drives the conversion service's upload / execute / redirect / download
/// workflow for one batch of points at a time.
pub struct WebConverter<T: HttpTransport> {
    transport: T,
    settings: AuthoritySettings,
    base_url: String,
    encoding: &'static Encoding,
}

impl<T: HttpTransport> WebConverter<T> {
    pub fn new(transport: T, settings: AuthoritySettings) -> Result<Self> {
        let base_url = settings.base_url()?.to_string();
        let encoding = Encoding::for_label(settings.response_encoding.as_bytes()).ok_or_else(
            || {
                ConversionError::Config(format!(
                    "Unknown response encoding: '{}'",
                    settings.response_encoding
                ))
            },
        )?;

        Ok(Self {
            transport,
            settings,
            base_url,
            encoding,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Absolute redirect targets are used as given, anything else is taken
    /// relative to the base URL.
    fn resolve_location(&self, location: &str) -> String {
        if location.starts_with("http://") || location.starts_with("https://") {
            location.to_string()
        } else {
            self.endpoint(location)
        }
    }

    /// Run one request under the step deadline. Timeouts and transport
    /// failures come back as a description for the step's own error.
    async fn within_deadline<F>(&self, request: F) -> std::result::Result<RawResponse, String>
    where
        F: Future<Output = Result<RawResponse>>,
    {
        let deadline = self.settings.step_timeout();
        match tokio::time::timeout(deadline, request).await {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(e)) => Err(format!("request failed: {}", e)),
            Err(_) => Err(format!("no response within {}s", deadline.as_secs())),
        }
    }

    /// Step 1: upload the encoded points and open a server-side session
    async fn submit(&self, session: &mut ConversionSession, points: &[LatLon]) -> Result<()> {
        let payload = encode_payload(points)?;
        let form = UploadForm {
            fields: vec![
                ("direction".to_string(), self.settings.direction.clone()),
                ("mode".to_string(), self.settings.mode.clone()),
                ("echo_input".to_string(), self.settings.echo_input.clone()),
            ],
            file_field: "file".to_string(),
            file_name: session.input_filename.clone(),
            file_body: payload.into_bytes(),
        };

        let url = self.endpoint(SUBMIT_PATH);
        debug!("Step 1/4: uploading {} points to {}", points.len(), url);

        let response = self
            .within_deadline(self.transport.post_form(&url, form))
            .await
            .map_err(|detail| ConversionError::Submission { detail })?;

        if !response.is_success() {
            return Err(ConversionError::Submission {
                detail: format!("HTTP status {}", response.status),
            });
        }

        session.cookies.absorb(response.set_cookies.as_slice());
        if session.cookies.is_empty() {
            return Err(ConversionError::Submission {
                detail: "service did not return a session cookie".to_string(),
            });
        }

        debug!("Step 1/4: session opened with {} cookies", session.cookies.len());
        Ok(())
    }

    /// Step 2: start the computation and capture where the service redirects to
    async fn trigger(&self, session: &mut ConversionSession) -> Result<()> {
        let url = self.endpoint(TRIGGER_PATH);
        let query = vec![
            ("mode".to_string(), self.settings.mode.clone()),
            ("zone".to_string(), self.settings.zone.clone()),
            ("echo_input".to_string(), self.settings.echo_input.clone()),
            ("filename".to_string(), session.input_filename.clone()),
            ("direction".to_string(), self.settings.direction.clone()),
            ("t".to_string(), Utc::now().timestamp_millis().to_string()),
        ];
        debug!("Step 2/4: triggering conversion at {}", url);

        let response = self
            .within_deadline(
                self.transport
                    .get(&url, &query, &session.cookies.header_value()),
            )
            .await
            .map_err(|detail| ConversionError::Trigger { detail })?;

        if !response.is_redirect() {
            return Err(ConversionError::Trigger {
                detail: format!("expected a redirect, got HTTP status {}", response.status),
            });
        }

        let location = response.location.ok_or_else(|| ConversionError::Trigger {
            detail: format!(
                "HTTP status {} without a Location header",
                response.status
            ),
        })?;

        debug!("Step 2/4: redirected to {}", location);
        session.redirect_target = Some(location);
        Ok(())
    }

    /// Step 3: visit the redirect target. The service can finish the job even
    /// when this page answers with an error, so problems are only logged.
    async fn follow(&self, session: &ConversionSession) {
        let Some(ref location) = session.redirect_target else {
            warn!("Step 3/4: no redirect target recorded, skipping");
            return;
        };

        let url = self.resolve_location(location);
        debug!("Step 3/4: following redirect to {}", url);

        match self
            .within_deadline(
                self.transport
                    .get(&url, &[], &session.cookies.header_value()),
            )
            .await
        {
            Ok(response) if response.is_success() => {
                debug!("Step 3/4: redirect target answered {}", response.status)
            }
            Ok(response) => warn!(
                "Step 3/4: redirect target {} answered HTTP status {}, continuing",
                url, response.status
            ),
            Err(detail) => warn!(
                "Step 3/4: redirect target {} {}, continuing",
                url, detail
            ),
        }
    }

    /// Step 4: download the result file and transcode it to UTF-8
    async fn retrieve(&self, session: &ConversionSession) -> Result<String> {
        let url = self.endpoint(DOWNLOAD_PATH);
        let query = vec![("outfile".to_string(), session.output_filename.clone())];
        debug!("Step 4/4: downloading {} from {}", session.output_filename, url);

        let response = self
            .within_deadline(
                self.transport
                    .get(&url, &query, &session.cookies.header_value()),
            )
            .await
            .map_err(|detail| ConversionError::Retrieval { detail })?;

        if !response.is_success() {
            return Err(ConversionError::Retrieval {
                detail: format!("HTTP status {}", response.status),
            });
        }

        let (text, _, had_errors) = self.encoding.decode(&response.body);
        if had_errors {
            warn!(
                "Step 4/4: result contained bytes invalid in {}, replaced",
                self.encoding.name()
            );
        }

        debug!("Step 4/4: received {} bytes", response.body.len());
        Ok(text.into_owned())
    }
}

#[async_trait]
impl<T: HttpTransport> BatchConverter for WebConverter<T> {
    async fn convert(&self, points: &[LatLon]) -> Result<Vec<LatLon>> {
        let mut session = ConversionSession::new(&self.settings.input_filename);

        self.submit(&mut session, points).await?;
        self.trigger(&mut session).await?;
        self.follow(&session).await;
        let body = self.retrieve(&session).await?;

        let converted = parse_result_body(&body)?;
        info!(
            "Conversion service returned {} points for {} submitted",
            converted.len(),
            points.len()
        );
        Ok(converted)
    }

    fn name(&self) -> &'static str {
        "web"
    }
}

/// One `"<lat> <lon>"` sexagesimal line per point
pub fn encode_payload(points: &[LatLon]) -> Result<String> {
    let lines = points
        .iter()
        .map(|p| {
            Ok(format!(
                "{} {}",
                encode_sexagesimal(p.latitude)?,
                encode_sexagesimal(p.longitude)?
            ))
        })
        .collect::<Result<Vec<String>>>()?;

    Ok(lines.join("\n"))
}

/// Parse the downloaded result: comment lines (containing `#`) and blank
/// lines are skipped, the first two whitespace separated tokens of every
/// other line are latitude and longitude.
pub fn parse_result_body(body: &str) -> Result<Vec<LatLon>> {
    let mut points = Vec::new();

    for line in body.lines() {
        if line.contains(COMMENT_MARKER) || line.trim().is_empty() {
            continue;
        }

        let mut tokens = line.split_whitespace();
        let (Some(lat), Some(lon)) = (tokens.next(), tokens.next()) else {
            return Err(ConversionError::Format(format!(
                "Expected latitude and longitude in result line '{}'",
                line
            )));
        };

        points.push(LatLon::new(
            decode_sexagesimal(lat)?,
            decode_sexagesimal(lon)?,
        ));
    }

    Ok(points)
}
