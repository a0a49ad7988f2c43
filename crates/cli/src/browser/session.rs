//! Portal session: a live browser window driven through the WebDriver
//! client, exposed to the engine as a [`PortalPage`].

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use jarvis::{PortalPage, Selector};
use tracing::{debug, info};

use crate::browser::webdriver::{DriverSession, StoredCookie, WebDriverClient};
use crate::error::{JarvisError, Result};

pub struct PortalSession {
    session: DriverSession,
}

impl PortalSession {
    /// Open a Chrome session against a running WebDriver server.
    pub async fn connect(server_url: &str, headless: bool) -> Result<Self> {
        let client = WebDriverClient::new(server_url)?;
        let session = client.new_chrome_session(headless).await?;
        Ok(PortalSession { session })
    }

    /// Persist the current session cookies as pretty JSON.
    pub async fn save_cookies(&self, path: &Path) -> Result<usize> {
        let cookies = self.session.cookies().await?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, serde_json::to_string_pretty(&cookies)?)?;
        info!(
            target = "jarvis",
            count = cookies.len(),
            path = %path.display(),
            "session cookies saved"
        );
        Ok(cookies.len())
    }

    /// Restore cookies from a saved-session file into the browser. The
    /// browser must already be on the portal origin for the cookies to
    /// land on the right domain.
    pub async fn load_cookies(&self, path: &Path) -> Result<usize> {
        let raw = std::fs::read_to_string(path)?;
        let cookies: Vec<StoredCookie> = serde_json::from_str(&raw)?;
        for cookie in &cookies {
            self.session.add_cookie(cookie).await?;
        }
        debug!(target = "jarvis", count = cookies.len(), "session cookies restored");
        Ok(cookies.len())
    }

    /// Close the browser session.
    pub async fn quit(self) -> Result<()> {
        self.session.quit().await
    }
}

/// Lower an engine selector to a WebDriver location strategy.
fn locator(selector: &Selector) -> (&'static str, String) {
    match selector {
        Selector::Css(css) => ("css selector", css.clone()),
        Selector::ButtonText { class, label } => (
            "xpath",
            format!("//button[contains(@class, '{class}') and text()='{label}']"),
        ),
    }
}

fn driver_err(err: JarvisError) -> jarvis::Error {
    jarvis::Error::driver(err)
}

#[async_trait]
impl PortalPage for PortalSession {
    async fn goto(&self, url: &str) -> jarvis::Result<()> {
        self.session
            .goto(url)
            .await
            .map_err(|err| jarvis::Error::Navigation {
                url: url.to_string(),
                source: anyhow::Error::new(err),
            })
    }

    async fn count(&self, selector: &Selector) -> jarvis::Result<usize> {
        let (using, value) = locator(selector);
        let elements = self
            .session
            .find_elements(using, &value)
            .await
            .map_err(driver_err)?;
        Ok(elements.len())
    }

    async fn texts(&self, selector: &Selector) -> jarvis::Result<Vec<String>> {
        let (using, value) = locator(selector);
        let elements = self
            .session
            .find_elements(using, &value)
            .await
            .map_err(driver_err)?;
        let mut texts = Vec::with_capacity(elements.len());
        for element in &elements {
            texts.push(self.session.text(element).await.map_err(driver_err)?);
        }
        Ok(texts)
    }

    async fn click_first(&self, selector: &Selector) -> jarvis::Result<bool> {
        let (using, value) = locator(selector);
        let elements = self
            .session
            .find_elements(using, &value)
            .await
            .map_err(driver_err)?;
        let Some(element) = elements.first() else {
            return Ok(false);
        };
        match self.session.click(element).await {
            Ok(()) => Ok(true),
            // vanished between the query and the click
            Err(err) if err.is_missing_element() => Ok(false),
            Err(err) => Err(driver_err(err)),
        }
    }

    async fn click_nth(&self, selector: &Selector, index: usize) -> jarvis::Result<bool> {
        let (using, value) = locator(selector);
        let elements = self
            .session
            .find_elements(using, &value)
            .await
            .map_err(driver_err)?;
        let Some(element) = elements.get(index) else {
            return Ok(false);
        };
        match self.session.click(element).await {
            Ok(()) => Ok(true),
            Err(err) if err.is_missing_element() => Ok(false),
            Err(err) => Err(driver_err(err)),
        }
    }

    async fn click_each(&self, selector: &Selector, pause: Duration) -> jarvis::Result<usize> {
        let (using, value) = locator(selector);
        let elements = self
            .session
            .find_elements(using, &value)
            .await
            .map_err(driver_err)?;
        let mut clicked = 0;
        for element in &elements {
            match self.session.click(element).await {
                Ok(()) => clicked += 1,
                Err(err) if err.is_missing_element() => continue,
                Err(err) => return Err(driver_err(err)),
            }
            if !pause.is_zero() {
                tokio::time::sleep(pause).await;
            }
        }
        Ok(clicked)
    }
}
