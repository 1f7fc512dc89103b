use crate::error::DocTextError;
use crate::ocr::sigv4::Credentials;

/// OCR service settings, read once at startup.
#[derive(Debug, Clone)]
pub struct OcrConfig {
    pub region: String,
    pub credentials: Credentials,
    /// Overrides `https://textract.{region}.amazonaws.com` (e.g. a local stack).
    pub endpoint: Option<String>,
}

impl OcrConfig {
    /// Read settings from the process environment.
    ///
    /// `AWS_REGION` (or `AWS_DEFAULT_REGION`), `AWS_ACCESS_KEY_ID` and
    /// `AWS_SECRET_ACCESS_KEY` are required. `AWS_SESSION_TOKEN` and
    /// `TEXTRACT_ENDPOINT` are optional.
    pub fn from_env() -> Result<Self, DocTextError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, DocTextError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let require = |key: &str| {
            get(key).ok_or_else(|| DocTextError::Config(format!("{key} is not set")))
        };

        let region = match get("AWS_REGION").or_else(|| get("AWS_DEFAULT_REGION")) {
            Some(r) => r,
            None => {
                return Err(DocTextError::Config(
                    "AWS_REGION is not set (AWS_DEFAULT_REGION is also accepted)".into(),
                ))
            }
        };

        Ok(OcrConfig {
            region,
            credentials: Credentials {
                access_key_id: require("AWS_ACCESS_KEY_ID")?,
                secret_access_key: require("AWS_SECRET_ACCESS_KEY")?,
                session_token: get("AWS_SESSION_TOKEN"),
            },
            endpoint: get("TEXTRACT_ENDPOINT"),
        })
    }

    pub fn endpoint_url(&self) -> String {
        match &self.endpoint {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("https://textract.{}.amazonaws.com", self.region),
        }
    }
}
