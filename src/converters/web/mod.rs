pub mod client;
pub mod session;
pub mod transport;

pub use client::{encode_payload, parse_result_body, WebConverter};
pub use session::{ConversionSession, CookieSet};
pub use transport::{HttpTransport, RawResponse, ReqwestTransport, UploadForm};
