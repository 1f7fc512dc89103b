use base64::Engine;
use reqwest::blocking::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::sigv4::{self, Credentials};
use super::{Block, OcrError, OcrService};
use crate::config::OcrConfig;
use crate::error::DocTextError;

const SERVICE: &str = "textract";
const JSON_CONTENT_TYPE: &str = "application/x-amz-json-1.1";
const DETECT_TARGET: &str = "Textract.DetectDocumentText";

/// AWS Textract `DetectDocumentText` over the JSON 1.1 protocol.
///
/// The HTTP client is built once and shared by every call.
pub struct TextractClient {
    http: Client,
    endpoint: String,
    host: String,
    region: String,
    credentials: Credentials,
}

#[derive(Serialize)]
struct DetectRequest {
    #[serde(rename = "Document")]
    document: DocumentBytes,
}

#[derive(Serialize)]
struct DocumentBytes {
    #[serde(rename = "Bytes")]
    bytes: String,
}

#[derive(Deserialize)]
struct DetectResponse {
    #[serde(rename = "Blocks", default)]
    blocks: Vec<Block>,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(rename = "__type")]
    error_type: Option<String>,
    #[serde(alias = "Message")]
    message: Option<String>,
}

impl TextractClient {
    pub fn new(config: &OcrConfig) -> Result<Self, DocTextError> {
        let endpoint = config.endpoint_url();
        let host = host_from_endpoint(&endpoint)
            .ok_or_else(|| DocTextError::Config(format!("invalid Textract endpoint: {endpoint}")))?;
        let http = Client::builder()
            .build()
            .map_err(|e| DocTextError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(TextractClient {
            http,
            endpoint,
            host,
            region: config.region.clone(),
            credentials: config.credentials.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl OcrService for TextractClient {
    fn detect_document_text(&self, document: &[u8]) -> Result<Vec<Block>, OcrError> {
        let payload = serde_json::to_vec(&DetectRequest {
            document: DocumentBytes {
                bytes: base64::engine::general_purpose::STANDARD.encode(document),
            },
        })
        .map_err(|e| OcrError::InvalidResponse(format!("failed to encode request: {e}")))?;

        let signature = sigv4::sign(
            &self.credentials,
            &self.region,
            SERVICE,
            &self.host,
            &[
                ("content-type", JSON_CONTENT_TYPE),
                ("x-amz-target", DETECT_TARGET),
            ],
            &payload,
            chrono::Utc::now(),
        );

        debug!(
            endpoint = %self.endpoint,
            bytes = document.len(),
            "calling Textract DetectDocumentText"
        );

        let mut request = self
            .http
            .post(&self.endpoint)
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .header("x-amz-target", DETECT_TARGET)
            .header("x-amz-date", &signature.amz_date)
            .header(AUTHORIZATION, &signature.authorization);
        if let Some(token) = &self.credentials.session_token {
            request = request.header("x-amz-security-token", token);
        }

        let response = request
            .body(payload)
            .send()
            .map_err(|e| OcrError::Transport(e.to_string()))?;
        let status = response.status();
        let body = response
            .bytes()
            .map_err(|e| OcrError::Transport(format!("failed to read response body: {e}")))?;

        if !status.is_success() {
            return Err(parse_error(status.as_u16(), &body));
        }
        parse_response(&body)
    }

    fn service_name(&self) -> &str {
        "textract"
    }
}

fn parse_response(body: &[u8]) -> Result<Vec<Block>, OcrError> {
    let response: DetectResponse =
        serde_json::from_slice(body).map_err(|e| OcrError::InvalidResponse(e.to_string()))?;
    Ok(response.blocks)
}

/// Turn a non-2xx response into a service error.
///
/// `__type` looks like `com.amazonaws.textract#InvalidParameterException`;
/// only the part after `#` is kept.
fn parse_error(status: u16, body: &[u8]) -> OcrError {
    match serde_json::from_slice::<ErrorBody>(body) {
        Ok(ErrorBody {
            error_type: Some(error_type),
            message,
        }) => OcrError::Service {
            code: error_type
                .rsplit('#')
                .next()
                .unwrap_or(&error_type)
                .to_string(),
            message: message.unwrap_or_default(),
        },
        _ => OcrError::Service {
            code: format!("HTTP {status}"),
            message: String::from_utf8_lossy(body).trim().to_string(),
        },
    }
}

fn host_from_endpoint(endpoint: &str) -> Option<String> {
    let rest = endpoint
        .strip_prefix("https://")
        .or_else(|| endpoint.strip_prefix("http://"))?;
    let host = rest.split('/').next()?;
    if host.is_empty() {
        None
    } else {
        Some(host.to_string())
    }
}
