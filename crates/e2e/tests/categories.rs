//! Category-order verifier against a scripted page

mod common;

use std::path::PathBuf;
use std::time::Duration;

use common::{lines, ScriptedPage};
use physlab_e2e::categories::verify_categories;
use physlab_e2e::{CategoryCheck, DriverConfig, Reporter};

const HEADINGS: &str = "h2.font-headline";

async fn run(page: &mut ScriptedPage) -> (physlab_e2e::VerificationReport, Vec<String>) {
    let mut reporter = Reporter::new(Vec::new());
    let report = verify_categories(
        page,
        &DriverConfig::default(),
        &CategoryCheck::default(),
        &mut reporter,
    )
    .await;
    (report, lines(reporter.into_inner()))
}

#[tokio::test]
async fn tools_last_is_reported_as_success() {
    let mut page = ScriptedPage::new().with_texts(
        HEADINGS,
        &["Meccanica", "Elettromagnetismo", "Strumenti"],
    );

    let (report, out) = run(&mut page).await;

    assert_eq!(
        out,
        vec![
            "Navigating to homepage...",
            "Waiting for headings...",
            r#"Found headings: ["Meccanica", "Elettromagnetismo", "Strumenti"]"#,
            "SUCCESS: 'Strumenti' is the last category.",
            "Screenshot saved to verification.png",
        ]
    );
    assert!(report.success);
    assert_eq!(page.gotos, vec![("http://localhost:9002".to_string(), Some(Duration::from_secs(10)))]);
    assert_eq!(page.waits, vec![(HEADINGS.to_string(), Duration::from_secs(60))]);
    assert_eq!(page.screenshots, vec![(PathBuf::from("verification.png"), true)]);
    assert_eq!(page.close_calls, 1);
}

#[tokio::test]
async fn tools_not_last_reports_actual_last() {
    let mut page = ScriptedPage::new().with_texts(HEADINGS, &["Strumenti", "Meccanica"]);

    let (report, out) = run(&mut page).await;

    assert!(out.contains(
        &"FAILURE: 'Strumenti' is not the last category. Last is 'Meccanica'".to_string()
    ));
    assert!(!report.success);
    assert!(report.error.is_none());
    assert_eq!(report.checks[0].detail.as_deref(), Some("Last is 'Meccanica'"));
    // A failed verdict still ends with the regular screenshot
    assert_eq!(page.screenshots, vec![(PathBuf::from("verification.png"), true)]);
    assert!(page.closed());
}

#[tokio::test]
async fn no_headings_reports_none() {
    let mut page = ScriptedPage::new().with_texts(HEADINGS, &[]);

    let (report, out) = run(&mut page).await;

    assert!(out.contains(&"Found headings: []".to_string()));
    assert!(out.contains(
        &"FAILURE: 'Strumenti' is not the last category. Last is 'None'".to_string()
    ));
    assert!(!report.success);
    assert!(page.closed());
}

#[tokio::test(start_paused = true)]
async fn navigation_retries_until_server_answers() {
    let mut page = ScriptedPage::new()
        .failing_gotos(2)
        .with_texts(HEADINGS, &["Meccanica", "Strumenti"]);

    let (report, out) = run(&mut page).await;

    assert_eq!(page.gotos.len(), 3);
    assert_eq!(
        &out[1..3],
        &[
            "Attempt 1 failed: Navigation to http://localhost:9002 failed: net::ERR_CONNECTION_REFUSED".to_string(),
            "Attempt 2 failed: Navigation to http://localhost:9002 failed: net::ERR_CONNECTION_REFUSED".to_string(),
        ]
    );
    assert!(report.success);
}

#[tokio::test(start_paused = true)]
async fn unreachable_server_is_swallowed_and_browser_released() {
    let mut page = ScriptedPage::new().unreachable().failing_screenshots();
    let started = tokio::time::Instant::now();

    let (report, out) = run(&mut page).await;

    assert_eq!(page.gotos.len(), 10);
    assert!(page.gotos.iter().all(|(_, t)| *t == Some(Duration::from_secs(10))));
    // Nine pauses between ten attempts
    let waited = started.elapsed();
    assert!(waited >= Duration::from_secs(45) && waited < Duration::from_secs(46));

    let attempts = out.iter().filter(|l| l.starts_with("Attempt ")).count();
    assert_eq!(attempts, 10);
    assert_eq!(
        out.last().map(String::as_str),
        Some("Error: Navigation to http://localhost:9002 failed: net::ERR_CONNECTION_REFUSED")
    );

    // Never got far enough to wait for headings
    assert!(page.waits.is_empty());
    assert!(page.screenshots.is_empty());
    assert!(report.error.is_some());
    assert!(report.screenshot.is_none());
    assert_eq!(page.close_calls, 1);
}

#[tokio::test]
async fn heading_timeout_takes_error_screenshot() {
    let mut page = ScriptedPage::new().never_shows(HEADINGS);

    let (report, out) = run(&mut page).await;

    let error = out.last().unwrap();
    assert!(error.starts_with("Error: Timeout waiting for: wait:h2.font-headline"));
    assert_eq!(page.screenshots, vec![(PathBuf::from("error.png"), false)]);
    assert_eq!(report.screenshot, Some(PathBuf::from("error.png")));
    assert!(!report.success);
    assert!(page.closed());
}

#[tokio::test]
async fn artifacts_land_in_configured_directory() {
    let dir = tempfile::tempdir().unwrap();
    let config = DriverConfig {
        artifact_dir: dir.path().to_path_buf(),
        ..Default::default()
    };
    let mut page = ScriptedPage::new().with_texts(HEADINGS, &["Strumenti"]);
    let mut reporter = Reporter::new(Vec::new());

    let report = verify_categories(&mut page, &config, &CategoryCheck::default(), &mut reporter).await;

    let expected = dir.path().join("verification.png");
    assert_eq!(page.screenshots, vec![(expected.clone(), true)]);
    assert_eq!(report.screenshot, Some(expected));
}
