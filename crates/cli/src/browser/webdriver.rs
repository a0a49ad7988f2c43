//! Minimal W3C WebDriver client.
//!
//! Plain JSON over HTTP against a chromedriver-compatible server. Only
//! the endpoints the portal flows use are implemented: session open and
//! close, navigation, element queries, clicks, text, and cookies.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::debug;

use crate::error::{JarvisError, Result};

/// Key the protocol uses for element references in responses.
const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

/// Cookie shape shared by the wire protocol and the saved-session file.
///
/// Expiry is not carried on purpose: restored cookies come back as
/// session cookies and the portal revalidates them on first load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredCookie {
    pub name: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default)]
    pub secure: bool,
}

/// HTTP client bound to one WebDriver server.
#[derive(Debug, Clone)]
pub struct WebDriverClient {
    http: reqwest::Client,
    base: String,
}

impl WebDriverClient {
    pub fn new(server_url: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|err| JarvisError::Session(format!("failed to build http client: {err}")))?;
        Ok(WebDriverClient {
            http,
            base: server_url.trim_end_matches('/').to_string(),
        })
    }

    /// Open a Chrome session. The sandbox flags keep Chrome usable under
    /// container and CI setups where the suid sandbox is unavailable.
    pub async fn new_chrome_session(self, headless: bool) -> Result<DriverSession> {
        let mut args = vec![
            "--no-sandbox".to_string(),
            "--disable-dev-shm-usage".to_string(),
        ];
        if headless {
            args.push("--headless=new".to_string());
        }
        let body = json!({
            "capabilities": {
                "alwaysMatch": {
                    "browserName": "chrome",
                    "goog:chromeOptions": { "args": args },
                }
            }
        });
        let value = self
            .execute(reqwest::Method::POST, "/session", Some(body))
            .await?;
        let session_id = value
            .pointer("/sessionId")
            .and_then(Value::as_str)
            .ok_or_else(|| JarvisError::Session("no sessionId in new-session response".to_string()))?
            .to_string();
        debug!(target = "jarvis", session = %session_id, headless, "webdriver session created");
        Ok(DriverSession {
            client: self,
            session_id,
        })
    }

    /// Send one request and unwrap the `value` envelope. Protocol-level
    /// failures come back as [`JarvisError::Remote`] with the server's
    /// error code intact.
    async fn execute(&self, method: reqwest::Method, path: &str, body: Option<Value>) -> Result<Value> {
        let url = format!("{}{path}", self.base);
        let mut request = self.http.request(method, &url);
        if let Some(body) = body {
            request = request.json(&body);
        }
        let response = request
            .send()
            .await
            .map_err(|err| JarvisError::Session(format!("webdriver request failed: {err}")))?;
        let status = response.status();
        let payload: Value = response
            .json()
            .await
            .map_err(|err| JarvisError::Session(format!("webdriver response was not json: {err}")))?;
        let value = payload.get("value").cloned().unwrap_or(Value::Null);
        if !status.is_success() {
            let error = value
                .pointer("/error")
                .and_then(Value::as_str)
                .unwrap_or("unknown error")
                .to_string();
            let message = value
                .pointer("/message")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            return Err(JarvisError::Remote { error, message });
        }
        Ok(value)
    }
}

/// One live browser session.
#[derive(Debug)]
pub struct DriverSession {
    client: WebDriverClient,
    session_id: String,
}

impl DriverSession {
    fn path(&self, suffix: &str) -> String {
        format!("/session/{}{suffix}", self.session_id)
    }

    pub async fn goto(&self, url: &str) -> Result<()> {
        self.client
            .execute(
                reqwest::Method::POST,
                &self.path("/url"),
                Some(json!({ "url": url })),
            )
            .await?;
        Ok(())
    }

    /// Element references matching the locator, in document order.
    /// An empty list is a normal answer, not an error.
    pub async fn find_elements(&self, using: &str, value: &str) -> Result<Vec<String>> {
        let response = self
            .client
            .execute(
                reqwest::Method::POST,
                &self.path("/elements"),
                Some(json!({ "using": using, "value": value })),
            )
            .await?;
        let ids = response
            .as_array()
            .map(|elements| {
                elements
                    .iter()
                    .filter_map(|element| element.get(ELEMENT_KEY).and_then(Value::as_str))
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        Ok(ids)
    }

    pub async fn click(&self, element: &str) -> Result<()> {
        self.client
            .execute(
                reqwest::Method::POST,
                &self.path(&format!("/element/{element}/click")),
                Some(json!({})),
            )
            .await?;
        Ok(())
    }

    pub async fn text(&self, element: &str) -> Result<String> {
        let value = self
            .client
            .execute(
                reqwest::Method::GET,
                &self.path(&format!("/element/{element}/text")),
                None,
            )
            .await?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    pub async fn cookies(&self) -> Result<Vec<StoredCookie>> {
        let value = self
            .client
            .execute(reqwest::Method::GET, &self.path("/cookie"), None)
            .await?;
        let cookies = serde_json::from_value(value)?;
        Ok(cookies)
    }

    pub async fn add_cookie(&self, cookie: &StoredCookie) -> Result<()> {
        self.client
            .execute(
                reqwest::Method::POST,
                &self.path("/cookie"),
                Some(json!({ "cookie": cookie })),
            )
            .await?;
        Ok(())
    }

    pub async fn quit(self) -> Result<()> {
        self.client
            .execute(reqwest::Method::DELETE, &self.path(""), None)
            .await?;
        debug!(target = "jarvis", session = %self.session_id, "webdriver session closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_cookie_ignores_wire_only_fields() {
        let raw = serde_json::json!([{
            "name": "sid",
            "value": "abc",
            "domain": "camper.campuslands.com",
            "path": "/",
            "secure": true,
            "httpOnly": true,
            "expiry": 1_900_000_000u64,
            "sameSite": "Lax",
        }]);

        let cookies: Vec<StoredCookie> = serde_json::from_value(raw).unwrap();
        assert_eq!(cookies.len(), 1);
        assert_eq!(cookies[0].name, "sid");
        assert_eq!(cookies[0].domain.as_deref(), Some("camper.campuslands.com"));
        assert!(cookies[0].secure);
    }

    #[test]
    fn stored_cookie_serializes_without_empty_fields() {
        let cookie = StoredCookie {
            name: "sid".to_string(),
            value: "abc".to_string(),
            domain: None,
            path: None,
            secure: false,
        };

        let json = serde_json::to_value(&cookie).unwrap();
        assert!(json.get("domain").is_none());
        assert!(json.get("path").is_none());
        assert_eq!(json["secure"], serde_json::json!(false));
    }
}
