//! Layered CLI configuration: built-in defaults, then `jarvis.toml`,
//! then command-line flags.
//!
//! Every selector and URL here belongs to an external web application we
//! do not control, so all of them can be overridden from the file; the
//! defaults match the portal as last observed.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use jarvis::{Selector, WaitConfig};

use crate::cli::{ListingPage, ReactionArg, RecoveryArg};
use crate::error::{JarvisError, Result};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub portal: PortalConfig,
    pub selectors: SelectorConfig,
    pub traversal: TraversalSettings,
    pub launcher: LauncherConfig,
    pub driver: DriverConfig,
    pub auth: AuthConfig,
    pub github: GithubConfig,
}

impl Config {
    /// Load configuration. An explicit `--config` path must exist;
    /// otherwise `jarvis.toml` in the working directory is used when
    /// present, and built-in defaults when not.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => {
                let default = PathBuf::from("jarvis.toml");
                default.exists().then_some(default)
            }
        };

        let Some(path) = path else {
            return Ok(Config::default());
        };

        let raw = std::fs::read_to_string(&path).map_err(|source| JarvisError::ConfigRead {
            path: path.clone(),
            source,
        })?;
        let config = toml::from_str(&raw).map_err(|source| JarvisError::ConfigParse {
            path: path.clone(),
            source,
        })?;
        debug!(target = "jarvis", path = %path.display(), "loaded config file");
        Ok(config)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PortalConfig {
    pub base_url: String,
    pub grades_path: String,
    pub skills_path: String,
}

impl Default for PortalConfig {
    fn default() -> Self {
        PortalConfig {
            base_url: "https://camper.campuslands.com/".into(),
            grades_path: "calificaciones".into(),
            skills_path: "skills".into(),
        }
    }
}

impl PortalConfig {
    /// Login happens at the portal origin.
    pub fn login_url(&self) -> &str {
        &self.base_url
    }

    pub fn grades_url(&self) -> Result<String> {
        self.join(&self.grades_path)
    }

    pub fn skills_url(&self) -> Result<String> {
        self.join(&self.skills_path)
    }

    fn join(&self, path: &str) -> Result<String> {
        let base = url::Url::parse(&self.base_url)
            .map_err(|err| JarvisError::Config(format!("invalid portal base_url: {err}")))?;
        let joined = base
            .join(path)
            .map_err(|err| JarvisError::Config(format!("invalid portal path {path}: {err}")))?;
        Ok(joined.into())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Marker that tells us a listing page rendered.
    pub listing_ready: String,
    /// Pending buttons on the grades listing, matched by class fragment
    /// plus exact label.
    pub pending_grades_class: String,
    pub pending_grades_label: String,
    /// Pending buttons on the skills listing.
    pub pending_skills: String,
    /// Proceed control on a detail page.
    pub proceed: String,
    /// Course cards on the skills page.
    pub course_card: String,
    /// A last card whose label contains one of these is skipped.
    pub skip_courses: Vec<String>,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        SelectorConfig {
            listing_ready: "#app".into(),
            pending_grades_class: "btn-short".into(),
            pending_grades_label: "Calificar".into(),
            pending_skills: ".btn-secondary-short.f-12.hf-24px.wf-76px".into(),
            proceed: ".btn-medium.w-fit.mt-14".into(),
            course_card: ".el-scrollbar__view .d-middle.w-full.gap-x-5".into(),
            skip_courses: vec!["Software Saturdays".into()],
        }
    }
}

impl SelectorConfig {
    pub fn ready_marker(&self) -> Selector {
        Selector::css(self.listing_ready.clone())
    }

    pub fn pending_for(&self, page: ListingPage) -> Selector {
        match page {
            ListingPage::Grades => Selector::button_text(
                self.pending_grades_class.clone(),
                self.pending_grades_label.clone(),
            ),
            ListingPage::Skills => Selector::css(self.pending_skills.clone()),
        }
    }

    pub fn proceed_control(&self) -> Selector {
        Selector::css(self.proceed.clone())
    }

    pub fn course_cards(&self) -> Selector {
        Selector::css(self.course_card.clone())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TraversalSettings {
    /// Reaction applied to each item.
    pub reaction: ReactionArg,
    /// Recovery when the proceed control goes missing.
    pub recovery: RecoveryArg,
    /// Ceiling for every readiness poll, in milliseconds.
    pub wait_timeout_ms: u64,
    /// Sleep between poll attempts, in milliseconds.
    pub poll_interval_ms: u64,
    /// Pause between individual icon clicks, in milliseconds.
    pub icon_pause_ms: u64,
}

impl Default for TraversalSettings {
    fn default() -> Self {
        TraversalSettings {
            reaction: ReactionArg::Happy,
            recovery: RecoveryArg::Relist,
            wait_timeout_ms: 10_000,
            poll_interval_ms: 250,
            icon_pause_ms: 100,
        }
    }
}

impl TraversalSettings {
    pub fn wait(&self) -> WaitConfig {
        WaitConfig {
            timeout: Duration::from_millis(self.wait_timeout_ms),
            interval: Duration::from_millis(self.poll_interval_ms),
        }
    }

    pub fn icon_pause(&self) -> Duration {
        Duration::from_millis(self.icon_pause_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LauncherConfig {
    /// Shell script driving the hello/bye lifecycle hooks.
    pub lifecycle_script: String,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        LauncherConfig {
            lifecycle_script: "./jarvis.sh".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// WebDriver binary discovered on PATH.
    pub binary: String,
    /// Port the managed server listens on.
    pub port: u16,
    /// Attach to an already-running server instead of managing one.
    pub url: Option<String>,
    /// Run the browser without a visible window.
    pub headless: bool,
}

impl Default for DriverConfig {
    fn default() -> Self {
        DriverConfig {
            binary: "chromedriver".into(),
            port: 9515,
            url: None,
            headless: false,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Where saved session cookies live.
    pub cookies_file: Option<PathBuf>,
}

impl AuthConfig {
    pub fn cookies_path(&self) -> PathBuf {
        match &self.cookies_file {
            Some(path) => path.clone(),
            None => dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".jarvis")
                .join("cookies.json"),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GithubConfig {
    /// Identity exported to the hello hook.
    pub email: Option<String>,
    pub username: Option<String>,
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn defaults_match_the_portal() {
        let config = Config::default();
        assert_eq!(
            config.portal.grades_url().unwrap(),
            "https://camper.campuslands.com/calificaciones"
        );
        assert_eq!(
            config.portal.skills_url().unwrap(),
            "https://camper.campuslands.com/skills"
        );
        assert_eq!(config.selectors.listing_ready, "#app");
        assert_eq!(config.traversal.reaction, ReactionArg::Happy);
        assert_eq!(config.traversal.recovery, RecoveryArg::Relist);
        assert_eq!(config.driver.port, 9515);
        assert_eq!(config.launcher.lifecycle_script, "./jarvis.sh");
    }

    #[test]
    fn pending_selector_depends_on_the_listing() {
        let selectors = SelectorConfig::default();
        assert_eq!(
            selectors.pending_for(ListingPage::Grades),
            Selector::button_text("btn-short", "Calificar")
        );
        assert_eq!(
            selectors.pending_for(ListingPage::Skills),
            Selector::css(".btn-secondary-short.f-12.hf-24px.wf-76px")
        );
    }

    #[test]
    fn load_merges_partial_file_over_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[traversal]
reaction = "random"
wait_timeout_ms = 2500

[github]
email = "dev@example.com"
"#
        )
        .unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.traversal.reaction, ReactionArg::Random);
        assert_eq!(config.traversal.wait_timeout_ms, 2500);
        assert_eq!(config.github.email.as_deref(), Some("dev@example.com"));
        // Untouched sections keep their defaults.
        assert_eq!(config.traversal.poll_interval_ms, 250);
        assert_eq!(config.portal.base_url, "https://camper.campuslands.com/");
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let err = Config::load(Some(Path::new("/nonexistent/jarvis.toml"))).unwrap_err();
        assert!(matches!(err, JarvisError::ConfigRead { .. }));
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "traversal = \"nope\"").unwrap();

        let err = Config::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, JarvisError::ConfigParse { .. }));
    }
}
