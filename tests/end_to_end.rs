//! Full pipeline against local stand-ins for GitHub and the Slack webhook.

use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use chrono::NaiveDate;
use kusa::{ExitStatus, GithubClient, Kusa, SlackConfig, SlackNotifier};
use serde_json::Value;

type Inbox = Arc<Mutex<Vec<Value>>>;

const CALENDAR_PAGE: &str = r##"<html><body>
<svg width="828" height="128" class="js-calendar-graph-svg">
  <g>
    <rect class="day" fill="#c6e48b" data-count="1" data-date="2024-03-05"/>
    <rect class="day" fill="#c6e48b" data-count="1" data-date="2024-03-06"/>
    <rect class="day" fill="#c6e48b" data-count="1" data-date="2024-03-07"/>
    <rect class="day" fill="#ebedf0" data-count="0" data-date="2024-03-08"/>
    <rect class="day" fill="#7bc96f" data-count="2" data-date="2024-03-09"/>
    <rect class="day" fill="#7bc96f" data-count="2" data-date="2024-03-10"/>
    <rect class="day" fill="#196127" data-count="40" data-date="2024-03-11"/>
  </g>
</svg>
</body></html>"##;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
}

async fn profile(Path(user): Path<String>) -> (StatusCode, String) {
    match user.as_str() {
        "streaker" => (StatusCode::OK, CALENDAR_PAGE.to_string()),
        "newbie" => (StatusCode::OK, "<html><body>Hello</body></html>".to_string()),
        _ => (StatusCode::NOT_FOUND, "Not Found".to_string()),
    }
}

async fn webhook(State(inbox): State<Inbox>, Json(body): Json<Value>) -> &'static str {
    inbox.lock().unwrap().push(body);
    "ok"
}

async fn spawn(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

async fn fixtures() -> (String, String, Inbox) {
    let github = spawn(Router::new().route("/{user}", get(profile))).await;

    let inbox = Inbox::default();
    let slack = spawn(
        Router::new()
            .route("/hook", post(webhook))
            .with_state(inbox.clone()),
    )
    .await;

    (github, format!("{slack}/hook"), inbox)
}

fn notifier(webhook_url: String, github_url: &str) -> SlackNotifier {
    let mut config = SlackConfig::new(webhook_url, "#kusa");
    config.github_url = github_url.to_string();
    SlackNotifier::new(config)
}

#[tokio::test]
async fn scraped_calendar_is_posted_to_slack() {
    let (github, webhook_url, inbox) = fixtures().await;
    let kusa = Kusa::new(
        GithubClient::new(github.as_str()),
        notifier(webhook_url, &github),
    );

    let report = kusa.run(&["streaker".to_string()], today()).await;
    assert!(report.is_success(), "{:?}", report.reports);

    let posted = inbox.lock().unwrap();
    assert_eq!(posted.len(), 1);

    let payload = &posted[0];
    assert_eq!(payload["channel"], "#kusa");
    assert_eq!(payload["username"], "kusabot");
    assert_eq!(payload["icon_emoji"], ":seedling:");
    assert!(payload.get("text").is_none());

    let attachment = &payload["attachments"][0];
    assert_eq!(attachment["color"], "good");
    assert_eq!(attachment["title_link"], format!("{github}/streaker"));

    // The 2024-03-11 cell is in the future and must not count.
    let values: Vec<&str> = attachment["fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["value"].as_str().unwrap())
        .collect();
    assert_eq!(
        values,
        vec![
            ":cherry_blossom::cherry_blossom:",
            "2 days",
            "3 days",
            "7 contributions",
            "7 contributions",
        ]
    );
}

#[tokio::test]
async fn page_without_calendar_posts_the_warning() {
    let (github, webhook_url, inbox) = fixtures().await;
    let kusa = Kusa::new(
        GithubClient::new(github.as_str()),
        notifier(webhook_url, &github),
    );

    let report = kusa.run(&["newbie".to_string()], today()).await;
    assert!(report.is_success());

    let posted = inbox.lock().unwrap();
    let payload = &posted[0];
    assert_eq!(payload["icon_emoji"], ":japanese_goblin:");
    assert_eq!(payload["attachments"][0]["color"], "danger");
    assert_eq!(
        payload["attachments"][0]["fields"][0]["value"],
        ":warning: There are no contributions today ! :warning:"
    );
    assert_eq!(payload["attachments"][0]["fields"][3]["value"], "0 contributions");
}

#[tokio::test]
async fn missing_user_fails_without_stopping_others() {
    let (github, webhook_url, inbox) = fixtures().await;
    let kusa = Kusa::new(
        GithubClient::new(github.as_str()),
        notifier(webhook_url, &github),
    );

    let users = vec!["ghost".to_string(), "streaker".to_string()];
    let report = kusa.run(&users, today()).await;

    assert_eq!(report.exit_status(), ExitStatus::FetchFailed);
    assert_eq!(inbox.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn rejected_webhook_is_a_delivery_failure() {
    let (github, _, inbox) = fixtures().await;
    let kusa = Kusa::new(
        GithubClient::new(github.as_str()),
        notifier(format!("{github}/no/such/hook"), &github),
    );

    let report = kusa.run(&["streaker".to_string()], today()).await;

    assert_eq!(report.exit_status(), ExitStatus::DeliveryFailed);
    assert!(inbox.lock().unwrap().is_empty());
}
