//! Turning a backend reply (or failure) into the bot's chat message

use crate::api::ChatError;
use crate::constants::{MSG_NO_REPLY, RECOMMENDATION_FALLBACK};
use crate::types::{is_truthy, value_text, AnalyzeResponse, HairProfile};

/// Everything the conversation needs from one finished submission
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciled {
    pub text: String,
    pub session_id: Option<String>,
    pub profile: Option<HairProfile>,
    pub need_more_info: bool,
}

impl Reconciled {
    pub fn failure(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            session_id: None,
            profile: None,
            need_more_info: false,
        }
    }
}

pub fn reconcile(result: Result<AnalyzeResponse, ChatError>) -> Reconciled {
    let resp = match result {
        Ok(resp) => resp,
        Err(e) => return Reconciled::failure(e.user_message()),
    };

    if let Some(error) = resp.error.as_ref().filter(|e| !e.is_null()) {
        let detail = value_text(error).unwrap_or_else(|| error.to_string());
        return Reconciled::failure(format!("Error: {}", detail));
    }

    Reconciled {
        text: compose_reply(&resp),
        session_id: resp.session_id.clone(),
        profile: resp.user_profile.as_ref().map(HairProfile::from_value),
        need_more_info: is_truthy(resp.need_more_info.as_ref()),
    }
}

/// Primary reply text followed by recommendations and clarification options.
pub fn compose_reply(resp: &AnalyzeResponse) -> String {
    let mut text = [&resp.message, &resp.reply]
        .into_iter()
        .flatten()
        .map(|s| s.trim())
        .find(|s| !s.is_empty())
        .unwrap_or(MSG_NO_REPLY)
        .to_string();

    if is_truthy(resp.final_recommendation.as_ref()) {
        if let Some(recs) = resp.combined_recommendations.as_ref().filter(|r| !r.is_empty()) {
            let lines: Vec<String> = recs
                .iter()
                .enumerate()
                .map(|(i, rec)| {
                    let label = rec.label().unwrap_or_else(|| RECOMMENDATION_FALLBACK.to_string());
                    format!("{}. {}", i + 1, label)
                })
                .collect();
            text.push_str("\n\n");
            text.push_str(&lines.join("\n"));
        }
    }

    if is_truthy(resp.need_clarification.as_ref()) {
        let options: Vec<String> = resp
            .options
            .iter()
            .flatten()
            .filter_map(value_text)
            .collect();
        if !options.is_empty() {
            text.push_str("\n\nOptions: ");
            text.push_str(&options.join(", "));
        }
    }

    text
}
