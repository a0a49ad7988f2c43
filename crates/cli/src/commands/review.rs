//! The grading run: restore the saved session, open the listing, drain
//! every pending item, report what happened.

use jarvis::{CourseConfig, Outcome, PortalPage, Traversal, TraversalConfig, TraversalReport};
use tracing::{info, warn};

use crate::browser::{PortalSession, driver};
use crate::cli::{ListingPage, ReviewArgs};
use crate::config::Config;
use crate::error::Result;
use crate::output::{OutputFormat, ResultBuilder, ReviewData, print_result};

pub async fn execute(args: ReviewArgs, config: &Config, format: OutputFormat) -> Result<()> {
    let listing_url = match args.page {
        ListingPage::Grades => config.portal.grades_url()?,
        ListingPage::Skills => config.portal.skills_url()?,
    };
    let traversal_config = TraversalConfig {
        listing_url: listing_url.clone(),
        listing_ready: config.selectors.ready_marker(),
        pending: config.selectors.pending_for(args.page),
        proceed: config.selectors.proceed_control(),
        reaction_policy: args.reaction.unwrap_or(config.traversal.reaction).into(),
        recovery: args.recovery.unwrap_or(config.traversal.recovery).into(),
        wait: config.traversal.wait(),
        icon_pause: config.traversal.icon_pause(),
    };

    info!(
        target = "jarvis",
        page = %args.page,
        url = %listing_url,
        "starting review run"
    );

    let headless = args.headless || config.driver.headless;
    let (server_url, server) = driver::acquire(&config.driver).await?;
    let session = match PortalSession::connect(&server_url, headless).await {
        Ok(session) => session,
        Err(err) => {
            if let Some(server) = server {
                let _ = server.shutdown().await;
            }
            return Err(err);
        }
    };

    let outcome = run(&session, &args, &traversal_config, config).await;

    if args.keep_open {
        // Dropping the server handle leaves the process running.
        info!(target = "jarvis", "leaving browser and driver open");
    } else {
        let quit = session.quit().await;
        if let Some(server) = server {
            server.shutdown().await?;
        }
        quit?;
    }

    let report = outcome?;
    if report.outcome == Outcome::ProceedLost {
        warn!(target = "jarvis", "run stopped after losing the proceed control");
    }
    print_result(
        &ResultBuilder::new("review")
            .data(ReviewData {
                page: args.page.to_string(),
                listing_url,
                report,
            })
            .build(),
        format,
    );
    Ok(())
}

async fn run(
    session: &PortalSession,
    args: &ReviewArgs,
    traversal_config: &TraversalConfig,
    config: &Config,
) -> Result<TraversalReport> {
    // Cookies only land on the right domain once the browser is on the
    // portal origin.
    session.goto(config.portal.login_url()).await?;

    let cookies_path = config.auth.cookies_path();
    if cookies_path.exists() {
        session.load_cookies(&cookies_path).await?;
    } else {
        info!(
            target = "jarvis",
            path = %cookies_path.display(),
            "no saved session cookies, run `jarvis auth login` to capture one"
        );
    }

    match args.page {
        ListingPage::Skills => {
            let course = CourseConfig {
                skills_url: traversal_config.listing_url.clone(),
                card: config.selectors.course_cards(),
                skip_labels: config.selectors.skip_courses.clone(),
                wait: config.traversal.wait(),
            };
            jarvis::open_latest(session, &course).await?;
        }
        ListingPage::Grades => {
            session.goto(&traversal_config.listing_url).await?;
        }
    }

    let mut traversal = match args.seed {
        Some(seed) => Traversal::with_seed(traversal_config.clone(), seed),
        None => Traversal::new(traversal_config.clone()),
    };
    Ok(traversal.run(session).await?)
}
