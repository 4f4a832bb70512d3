use crate::utils::filename::derive_output_filename;

/// Cookies handed out by the conversion service, in the order first seen
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieSet {
    cookies: Vec<(String, String)>,
}

impl CookieSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take `name=value` from each `Set-Cookie` header, ignoring attributes.
    /// A later value for the same name replaces the earlier one.
    pub fn absorb<S: AsRef<str>>(&mut self, set_cookie_headers: &[S]) {
        for header in set_cookie_headers {
            let pair = header.as_ref().split(';').next().unwrap_or("").trim();
            let Some((name, value)) = pair.split_once('=') else {
                continue;
            };
            let name = name.trim();
            if name.is_empty() {
                continue;
            }

            match self.cookies.iter_mut().find(|(n, _)| n == name) {
                Some(existing) => existing.1 = value.trim().to_string(),
                None => self
                    .cookies
                    .push((name.to_string(), value.trim().to_string())),
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    /// Value for a `Cookie` request header
    pub fn header_value(&self) -> String {
        self.cookies
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// State of one run against the conversion service. Owned by a single
/// `convert` call and dropped when it returns.
#[derive(Debug)]
pub struct ConversionSession {
    pub cookies: CookieSet,
    pub input_filename: String,
    pub output_filename: String,
    pub redirect_target: Option<String>,
}

impl ConversionSession {
    pub fn new(input_filename: &str) -> Self {
        Self {
            cookies: CookieSet::new(),
            input_filename: input_filename.to_string(),
            output_filename: derive_output_filename(input_filename),
            redirect_target: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absorb_strips_attributes() {
        let mut cookies = CookieSet::new();
        cookies.absorb(&[
            "JSESSIONID=abc123; Path=/; HttpOnly",
            "lang=ja",
            "broken-cookie",
        ]);

        assert_eq!(cookies.len(), 2);
        assert_eq!(cookies.header_value(), "JSESSIONID=abc123; lang=ja");
    }

    #[test]
    fn test_absorb_replaces_by_name() {
        let mut cookies = CookieSet::new();
        cookies.absorb(&["sid=1"]);
        cookies.absorb(&["sid=2; Secure"]);

        assert_eq!(cookies.header_value(), "sid=2");
    }

    #[test]
    fn test_session_derives_output_filename() {
        let session = ConversionSession::new("latlons.in");

        assert_eq!(session.output_filename, "latlons.out");
        assert!(session.cookies.is_empty());
        assert!(session.redirect_target.is_none());
    }
}
