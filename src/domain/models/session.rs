use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

/// What `user.login` hands back for an authenticated session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionInfo {
    #[serde(rename = "sessid")]
    pub session_id: String,
    pub session_name: String,
    /// CSRF token to echo back on every following call.
    pub token: String,
    #[serde(default)]
    pub user: Value,
}

impl SessionInfo {
    /// Cookie equivalent of the session, for services that do not send
    /// `Set-Cookie`.
    pub fn cookie(&self) -> String {
        return format!("{}={}", self.session_name, self.session_id);
    }

    pub fn username(&self) -> Option<&str> {
        return self.user.get("name").and_then(|name| return name.as_str());
    }
}
