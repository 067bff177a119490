//! Application constants and configuration

pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000";
pub const ANALYZE_PATH: &str = "/chatbot/analyze";
pub const API_URL_ENV: &str = "HAIR_ADVISOR_API_URL";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const APP_NAME: &str = "Hair Advisor Chat";

/// Durable slot holding the conversation session id
pub const SESSION_KEY: &str = "chatbot_session_id";

// User-facing fixed strings
pub const MSG_CANNOT_CONNECT: &str =
    "Cannot connect to the server. Please check that the backend is running and try again.";
pub const MSG_NO_REPLY: &str = "Sorry, I didn't get a response. Could you try again?";
pub const MSG_WELCOME: &str =
    "Hi there! I'm your personal hair care assistant. Tell me about your hair or send me a photo to get started.";
pub const RECOMMENDATION_FALLBACK: &str = "Recommended product";
