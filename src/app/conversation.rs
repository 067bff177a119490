//! Chat history and the per-submission state machine (idle -> awaiting reply -> idle)

use crate::api::AnalyzeRequest;
use crate::reply::Reconciled;
use crate::types::{Attachment, HairProfile, Message};
use tracing::debug;

#[derive(Default)]
pub struct Conversation {
    messages: Vec<Message>,
    loading: bool,
    pub input: String,
    pending: Option<Attachment>,
    profile: HairProfile,
    need_more_info: bool,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn profile(&self) -> &HairProfile {
        &self.profile
    }

    pub fn need_more_info(&self) -> bool {
        self.need_more_info
    }

    pub fn push_bot(&mut self, text: impl Into<String>) {
        self.messages.push(Message::bot(text));
    }

    /// Show the welcome line, unless the user has already started chatting.
    pub fn push_greeting(&mut self, text: impl Into<String>) -> bool {
        if !self.messages.is_empty() {
            return false;
        }
        self.push_bot(text);
        true
    }

    pub fn set_attachment(&mut self, attachment: Attachment) {
        self.pending = Some(attachment);
    }

    pub fn can_submit(&self) -> bool {
        !self.loading && (!self.input.trim().is_empty() || self.pending.is_some())
    }

    /// Queue the typed text and pending photo into a request.
    ///
    /// Returns `None` (and changes nothing) when there is nothing to send or a
    /// reply is still outstanding.
    pub fn begin_submit(&mut self, session_id: Option<&str>) -> Option<AnalyzeRequest> {
        if !self.can_submit() {
            debug!(loading = self.loading, "Submit ignored");
            return None;
        }

        let text = self.input.trim().to_string();
        let image = self.pending.take();
        let attachment_name = image.as_ref().map(|a| a.file_name.clone());

        let shown = match (&attachment_name, text.is_empty()) {
            (Some(name), true) => format!("Uploaded image: {}", name),
            _ => text.clone(),
        };
        self.messages.push(Message::user(shown, attachment_name));
        self.input.clear();
        self.loading = true;

        Some(AnalyzeRequest {
            message: text,
            image,
            session_id: session_id.map(str::to_string),
        })
    }

    /// Append the bot's answer and return to idle.
    pub fn finish_submit(&mut self, outcome: Reconciled) {
        self.messages.push(Message::bot(outcome.text));
        if let Some(profile) = outcome.profile {
            self.profile = profile;
        }
        self.need_more_info = outcome.need_more_info;
        self.loading = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_server::{dead_url, serve_once};
    use crate::api::ApiClient;
    use crate::app::submit::run_submission;
    use crate::constants::MSG_CANNOT_CONNECT;
    use crate::types::Sender;

    #[test]
    fn empty_submit_is_noop() {
        let mut conv = Conversation::new();
        conv.input = "   ".into();
        assert!(conv.begin_submit(Some("s")).is_none());
        assert!(conv.messages().is_empty());
        assert!(!conv.is_loading());
    }

    #[test]
    fn text_submit_appends_user_message() {
        let mut conv = Conversation::new();
        conv.input = "My hair feels dry".into();
        let req = conv.begin_submit(Some("sess")).unwrap();
        assert_eq!(req.message, "My hair feels dry");
        assert_eq!(req.session_id.as_deref(), Some("sess"));
        assert!(req.image.is_none());
        assert_eq!(conv.messages().len(), 1);
        assert_eq!(conv.messages()[0].sender, Sender::User);
        assert_eq!(conv.messages()[0].text, "My hair feels dry");
        assert!(conv.input.is_empty());
        assert!(conv.is_loading());
    }

    #[test]
    fn image_only_submit_uses_placeholder() {
        let mut conv = Conversation::new();
        conv.set_attachment(Attachment::new("hair.jpg", vec![0xff, 0xd8, 0xff]));
        let req = conv.begin_submit(None).unwrap();
        assert_eq!(req.message, "");
        assert_eq!(req.field_names(), vec!["message", "image"]);
        let shown = &conv.messages()[0];
        assert!(shown.text.contains("hair.jpg"));
        assert_eq!(shown.attachment.as_deref(), Some("hair.jpg"));
    }

    #[test]
    fn text_with_image_keeps_literal_text() {
        let mut conv = Conversation::new();
        conv.input = "What about this?".into();
        conv.set_attachment(Attachment::new("hair.png", vec![1]));
        let req = conv.begin_submit(Some("s")).unwrap();
        assert_eq!(conv.messages()[0].text, "What about this?");
        assert_eq!(req.field_names(), vec!["message", "image", "session_id"]);
    }

    #[test]
    fn second_submit_refused_while_loading() {
        let mut conv = Conversation::new();
        conv.input = "first".into();
        assert!(conv.begin_submit(None).is_some());
        conv.input = "second".into();
        assert!(conv.begin_submit(None).is_none());
        assert_eq!(conv.messages().len(), 1);
        assert_eq!(conv.input, "second");
    }

    #[test]
    fn pending_attachment_cleared_after_queueing() {
        let mut conv = Conversation::new();
        conv.set_attachment(Attachment::new("hair.jpg", vec![1]));
        conv.begin_submit(None).unwrap();
        conv.finish_submit(Reconciled::failure("x"));
        assert!(!conv.can_submit());
    }

    #[test]
    fn greeting_only_on_empty_history() {
        let mut conv = Conversation::new();
        assert!(conv.push_greeting("hello"));
        assert!(!conv.push_greeting("hello again"));
        assert_eq!(conv.messages().len(), 1);
    }

    #[tokio::test]
    async fn successful_round_trip() {
        let (url, _server) = serve_once("200 OK", r#"{"message": "Try product X"}"#).await;
        let client = ApiClient::new(url);
        let mut conv = Conversation::new();
        conv.input = "My hair feels dry".into();
        let req = conv.begin_submit(Some("s")).unwrap();

        conv.finish_submit(run_submission(&client, req).await);

        let msgs = conv.messages();
        assert_eq!(msgs.len(), 2);
        assert_eq!(msgs[1].sender, Sender::Bot);
        assert_eq!(msgs[1].text, "Try product X");
        assert!(!conv.is_loading());
    }

    #[tokio::test]
    async fn server_error_clears_loading() {
        let (url, _server) = serve_once("503 Service Unavailable", "down").await;
        let client = ApiClient::new(url);
        let mut conv = Conversation::new();
        conv.input = "hello".into();
        let req = conv.begin_submit(None).unwrap();

        conv.finish_submit(run_submission(&client, req).await);

        assert!(conv.messages()[1].text.contains("503"));
        assert!(!conv.is_loading());
    }

    #[tokio::test]
    async fn transport_failure_clears_loading() {
        let client = ApiClient::new(dead_url().await);
        let mut conv = Conversation::new();
        conv.input = "hello".into();
        let req = conv.begin_submit(None).unwrap();

        conv.finish_submit(run_submission(&client, req).await);

        assert_eq!(conv.messages()[1].text, MSG_CANNOT_CONNECT);
        assert!(!conv.is_loading());
        conv.input = "again".into();
        assert!(conv.can_submit());
    }

    #[test]
    fn profile_replaced_when_present() {
        let mut conv = Conversation::new();
        conv.input = "hi".into();
        conv.begin_submit(None).unwrap();
        conv.finish_submit(Reconciled {
            text: "Tell me more".into(),
            session_id: None,
            profile: Some(HairProfile {
                hair_texture: Some("fine".into()),
                ..HairProfile::default()
            }),
            need_more_info: true,
        });
        assert_eq!(conv.profile().hair_texture.as_deref(), Some("fine"));
        assert!(conv.need_more_info());

        conv.input = "again".into();
        conv.begin_submit(None).unwrap();
        conv.finish_submit(Reconciled::failure("oops"));
        assert_eq!(conv.profile().hair_texture.as_deref(), Some("fine"));
        assert!(!conv.need_more_info());
    }
}
