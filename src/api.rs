//! HTTP client for the hair advisor backend

use crate::constants::{ANALYZE_PATH, MSG_CANNOT_CONNECT};
use crate::types::{AnalyzeResponse, Attachment};
use reqwest::multipart::{Form, Part};
use tracing::{debug, warn};

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("backend unreachable: {0}")]
    Unreachable(#[source] reqwest::Error),
    #[error("server returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),
}

impl From<reqwest::Error> for ChatError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_connect() || e.is_timeout() {
            ChatError::Unreachable(e)
        } else {
            ChatError::Request(e)
        }
    }
}

impl ChatError {
    /// Text shown to the user in a bot bubble
    pub fn user_message(&self) -> String {
        match self {
            ChatError::Unreachable(_) => MSG_CANNOT_CONNECT.to_string(),
            ChatError::Status { status, body } if body.trim().is_empty() => {
                format!("Server error ({})", status)
            }
            ChatError::Status { status, body } => format!("Server error ({}): {}", status, body.trim()),
            ChatError::Decode(e) => format!("Something went wrong: unexpected response from the server ({})", e),
            ChatError::Request(e) => format!("Something went wrong: {}", e),
        }
    }
}

/// One submission to `/chatbot/analyze`
#[derive(Debug, Clone)]
pub struct AnalyzeRequest {
    pub message: String,
    pub image: Option<Attachment>,
    pub session_id: Option<String>,
}

impl AnalyzeRequest {
    /// Names of the multipart fields this request will carry, in order.
    pub fn field_names(&self) -> Vec<&'static str> {
        let mut names = vec!["message"];
        if self.image.is_some() {
            names.push("image");
        }
        if self.session_id.is_some() {
            names.push("session_id");
        }
        names
    }

    fn into_form(self) -> Result<Form, ChatError> {
        let mut form = Form::new().text("message", self.message);
        if let Some(image) = self.image {
            let part = Part::bytes(image.bytes)
                .file_name(image.file_name)
                .mime_str(&image.mime)?;
            form = form.part("image", part);
        }
        if let Some(session_id) = self.session_id {
            form = form.text("session_id", session_id);
        }
        Ok(form)
    }
}

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn analyze_url(&self) -> String {
        format!("{}{}", self.base_url, ANALYZE_PATH)
    }

    /// Post a message and/or photo and decode the reply.
    ///
    /// An empty or `null` body decodes to an empty response.
    pub async fn analyze(&self, request: AnalyzeRequest) -> Result<AnalyzeResponse, ChatError> {
        let url = self.analyze_url();
        debug!(url = %url, fields = ?request.field_names(), "Posting analyze request");

        let form = request.into_form()?;
        let response = self.http.post(&url).multipart(form).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Analyze request rejected");
            return Err(ChatError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(AnalyzeResponse::default());
        }
        let value: serde_json::Value = serde_json::from_str(&text)?;
        if value.is_null() {
            return Ok(AnalyzeResponse::default());
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Fetch the welcome line served at the backend root, if any.
    pub async fn greeting(&self) -> Result<Option<String>, ChatError> {
        let url = format!("{}/", self.base_url);
        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChatError::Status {
                status: status.as_u16(),
                body,
            });
        }
        let value: serde_json::Value = serde_json::from_str(&response.text().await?)?;
        Ok(value
            .get("message")
            .and_then(|m| m.as_str())
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_string))
    }
}


#[cfg(test)]
mod tests {
    use super::test_server::{dead_url, serve_once};
    use super::*;

    fn text_request(message: &str) -> AnalyzeRequest {
        AnalyzeRequest {
            message: message.to_string(),
            image: None,
            session_id: Some("sess-1".to_string()),
        }
    }

    #[test]
    fn field_names_follow_contents() {
        assert_eq!(text_request("hi").field_names(), vec!["message", "session_id"]);
        let req = AnalyzeRequest {
            message: String::new(),
            image: Some(Attachment::new("hair.jpg", vec![1, 2, 3])),
            session_id: None,
        };
        assert_eq!(req.field_names(), vec!["message", "image"]);
    }

    #[tokio::test]
    async fn analyze_posts_multipart_and_decodes() {
        let (url, server) = serve_once("200 OK", r#"{"message": "Try product X"}"#).await;
        let client = ApiClient::new(url);
        let resp = client.analyze(text_request("My hair feels dry")).await.unwrap();
        assert_eq!(resp.message.as_deref(), Some("Try product X"));

        let raw = String::from_utf8_lossy(&server.await.unwrap()).to_string();
        assert!(raw.starts_with("POST /chatbot/analyze "));
        assert!(raw.to_ascii_lowercase().contains("content-type: multipart/form-data"));
        assert!(raw.contains("name=\"message\""));
        assert!(raw.contains("My hair feels dry"));
        assert!(raw.contains("name=\"session_id\""));
        assert!(raw.contains("sess-1"));
        assert!(!raw.contains("name=\"image\""));
    }

    #[tokio::test]
    async fn image_only_request_sends_empty_message_and_file() {
        let (url, server) = serve_once("200 OK", r#"{"reply": "Nice photo"}"#).await;
        let client = ApiClient::new(url);
        let req = AnalyzeRequest {
            message: String::new(),
            image: Some(Attachment::new("hair.jpg", b"fake-jpeg-bytes".to_vec())),
            session_id: None,
        };
        let resp = client.analyze(req).await.unwrap();
        assert_eq!(resp.reply.as_deref(), Some("Nice photo"));

        let raw = String::from_utf8_lossy(&server.await.unwrap()).to_string();
        assert!(raw.contains("name=\"message\"\r\n\r\n\r\n"));
        assert!(raw.contains("name=\"image\"; filename=\"hair.jpg\""));
        assert!(raw.to_ascii_lowercase().contains("content-type: image/jpeg"));
        assert!(raw.contains("fake-jpeg-bytes"));
        assert!(!raw.contains("name=\"session_id\""));
    }

    #[tokio::test]
    async fn non_success_status_carries_code_and_body() {
        let (url, _server) = serve_once("500 Internal Server Error", r#"{"detail":"boom"}"#).await;
        let err = ApiClient::new(url).analyze(text_request("hi")).await.unwrap_err();
        match &err {
            ChatError::Status { status, body } => {
                assert_eq!(*status, 500);
                assert!(body.contains("boom"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.user_message().contains("500"));
    }

    #[tokio::test]
    async fn refused_connection_is_unreachable() {
        let err = ApiClient::new(dead_url().await)
            .analyze(text_request("hi"))
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::Unreachable(_)));
        assert_eq!(err.user_message(), MSG_CANNOT_CONNECT);
    }

    #[tokio::test]
    async fn empty_and_null_bodies_decode_to_default() {
        let (url, _server) = serve_once("200 OK", "null").await;
        let resp = ApiClient::new(url).analyze(text_request("hi")).await.unwrap();
        assert!(resp.message.is_none() && resp.reply.is_none());

        let (url, _server) = serve_once("200 OK", "").await;
        let resp = ApiClient::new(url).analyze(text_request("hi")).await.unwrap();
        assert!(resp.error.is_none());
    }

    #[tokio::test]
    async fn garbage_body_is_decode_error() {
        let (url, _server) = serve_once("200 OK", "<html>oops</html>").await;
        let err = ApiClient::new(url).analyze(text_request("hi")).await.unwrap_err();
        assert!(matches!(err, ChatError::Decode(_)));
        assert!(err.user_message().starts_with("Something went wrong"));
    }

    #[tokio::test]
    async fn greeting_reads_root_message() {
        let (url, server) = serve_once("200 OK", r#"{"message": "Welcome!"}"#).await;
        let greeting = ApiClient::new(url).greeting().await.unwrap();
        assert_eq!(greeting.as_deref(), Some("Welcome!"));
        let raw = String::from_utf8_lossy(&server.await.unwrap()).to_string();
        assert!(raw.starts_with("GET / "));
    }
}
