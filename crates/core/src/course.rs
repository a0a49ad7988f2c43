use tracing::{debug, info, warn};

use crate::error::Result;
use crate::portal::PortalPage;
use crate::selector::Selector;
use crate::wait::{self, WaitConfig};

/// Course-selection step ahead of the skills listing.
#[derive(Debug, Clone)]
pub struct CourseConfig {
    /// Page listing the course cards.
    pub skills_url: String,
    /// The card elements.
    pub card: Selector,
    /// A last card whose label contains any of these entries is skipped
    /// in favor of its predecessor.
    pub skip_labels: Vec<String>,
    pub wait: WaitConfig,
}

/// Open the newest course: navigate to the skills page, wait for the
/// cards, and click the last one, or the one before it when the last
/// label matches a skip entry.
///
/// Returns the index clicked, or `None` when fewer than two cards
/// rendered or the chosen card vanished before the click.
pub async fn open_latest(page: &dyn PortalPage, config: &CourseConfig) -> Result<Option<usize>> {
    page.goto(&config.skills_url).await?;
    wait::until_present(page, &config.card, config.wait).await?;

    let labels = page.texts(&config.card).await?;
    if labels.len() < 2 {
        warn!(target = "jarvis", cards = labels.len(), "not enough course cards to pick from");
        return Ok(None);
    }

    let last = labels.len() - 1;
    let skip_last = config
        .skip_labels
        .iter()
        .any(|skip| labels[last].contains(skip.as_str()));
    let index = if skip_last { last - 1 } else { last };
    debug!(target = "jarvis", index, label = %labels[index], "opening course card");

    if !page.click_nth(&config.card, index).await? {
        warn!(target = "jarvis", index, "course card vanished before click");
        return Ok(None);
    }
    info!(target = "jarvis", label = %labels[index], "course opened");
    Ok(Some(index))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::testing::{FakeAction, FakePortal};

    fn config() -> CourseConfig {
        CourseConfig {
            skills_url: "https://portal.test/skills".into(),
            card: Selector::css(".el-scrollbar__view .d-middle.w-full.gap-x-5"),
            skip_labels: vec!["Software Saturdays".into()],
            wait: WaitConfig {
                timeout: Duration::from_millis(40),
                interval: Duration::from_millis(5),
            },
        }
    }

    fn cards(page: &FakePortal, cfg: &CourseConfig, labels: &[&str]) {
        page.set_course_cards(
            cfg.card.clone(),
            labels.iter().map(|l| l.to_string()).collect(),
        );
    }

    #[tokio::test]
    async fn opens_the_last_card() {
        let cfg = config();
        let page = FakePortal::empty(Selector::css("#app"));
        cards(&page, &cfg, &["Intro", "Java Basics", "Rust"]);

        let opened = open_latest(&page, &cfg).await.unwrap();

        assert_eq!(opened, Some(2));
        assert_eq!(
            page.actions(),
            vec![
                FakeAction::Goto {
                    url: cfg.skills_url.clone()
                },
                FakeAction::OpenCard { index: 2 },
            ]
        );
    }

    #[tokio::test]
    async fn skips_a_matching_last_card() {
        let cfg = config();
        let page = FakePortal::empty(Selector::css("#app"));
        cards(&page, &cfg, &["Intro", "Rust", "Software Saturdays S3"]);

        let opened = open_latest(&page, &cfg).await.unwrap();

        assert_eq!(opened, Some(1));
        assert!(page.actions().contains(&FakeAction::OpenCard { index: 1 }));
    }

    #[tokio::test]
    async fn one_card_is_not_enough() {
        let cfg = config();
        let page = FakePortal::empty(Selector::css("#app"));
        cards(&page, &cfg, &["Only Course"]);

        let opened = open_latest(&page, &cfg).await.unwrap();

        assert_eq!(opened, None);
        assert!(
            !page
                .actions()
                .iter()
                .any(|a| matches!(a, FakeAction::OpenCard { .. }))
        );
    }

    #[tokio::test]
    async fn no_cards_at_all_times_out() {
        let cfg = config();
        let page = FakePortal::empty(Selector::css("#app"));

        let err = open_latest(&page, &cfg).await.unwrap_err();
        assert!(err.is_timeout());
    }
}
