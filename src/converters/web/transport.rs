use crate::error::Result;
use async_trait::async_trait;
use reqwest::header::{COOKIE, LOCATION, SET_COOKIE};
use reqwest::multipart::{Form, Part};
use reqwest::redirect::Policy;
use reqwest::{Client, Response};

/// The parts of an HTTP response the conversion workflow looks at
#[derive(Debug, Clone, Default)]
pub struct RawResponse {
    pub status: u16,
    pub set_cookies: Vec<String>,
    pub location: Option<String>,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_redirect(&self) -> bool {
        (300..400).contains(&self.status)
    }
}

/// Multipart upload: plain text fields plus one file attachment
#[derive(Debug, Clone)]
pub struct UploadForm {
    pub fields: Vec<(String, String)>,
    pub file_field: String,
    pub file_name: String,
    pub file_body: Vec<u8>,
}

/// HTTP seam of the web converter. Implementations must not follow
/// redirects, the trigger step needs to see the `Location` header.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn post_form(&self, url: &str, form: UploadForm) -> Result<RawResponse>;

    async fn get(&self, url: &str, query: &[(String, String)], cookie_header: &str)
        -> Result<RawResponse>;
}

pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .redirect(Policy::none())
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    async fn into_raw(response: Response) -> Result<RawResponse> {
        let status = response.status().as_u16();
        let set_cookies = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .map(str::to_string)
            .collect();
        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await?.to_vec();

        Ok(RawResponse {
            status,
            set_cookies,
            location,
            body,
        })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn post_form(&self, url: &str, form: UploadForm) -> Result<RawResponse> {
        let mut multipart = Form::new();
        for (name, value) in form.fields {
            multipart = multipart.text(name, value);
        }
        let part = Part::bytes(form.file_body)
            .file_name(form.file_name)
            .mime_str("text/plain")?;
        multipart = multipart.part(form.file_field, part);

        let response = self.client.post(url).multipart(multipart).send().await?;
        Self::into_raw(response).await
    }

    async fn get(
        &self,
        url: &str,
        query: &[(String, String)],
        cookie_header: &str,
    ) -> Result<RawResponse> {
        let mut request = self.client.get(url).query(query);
        if !cookie_header.is_empty() {
            request = request.header(COOKIE, cookie_header);
        }

        let response = request.send().await?;
        Self::into_raw(response).await
    }
}
