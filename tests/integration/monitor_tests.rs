//! End-to-end tests of the monitoring runner

use crate::common::{page_with_link, test_context};
use linkamp::model::{LinkResult, LinkType, StageOutcome};
use linkamp::pipeline::{run_monitor, EventSink};
use linkamp::storage::{CampaignStore, SqliteCampaignStore};
use linkamp::LinkampError;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A stored link as a previous amplification run would have left it
fn amplified_link(url: &str) -> LinkResult {
    let mut link = LinkResult::new(url);
    link.validation = StageOutcome::Success;
    link.search_notify = StageOutcome::Success;
    link.aggregator_ping = StageOutcome::Failure;
    link.short_link = StageOutcome::Success;
    link.live = Some(true);
    link.page_title = Some("Old Title".to_string());
    link.anchor_text = Some("Old Anchor".to_string());
    link.link_type = LinkType::Dofollow;
    link.short_url = Some("https://sho.rt/old".to_string());
    link
}

#[tokio::test]
async fn test_monitor_overwrites_liveness_only() {
    let server = MockServer::start().await;

    // First link is still live, now with a nofollow anchor and a new title
    Mock::given(method("GET"))
        .and(path("/alive"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page_with_link(
            "New Title",
            "http://target.com/x",
            Some("nofollow"),
            "New Anchor",
        )))
        .mount(&server)
        .await;

    // Second link is gone
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let ctx = test_context(&server.uri());
    let (events, _log_rx, mut progress_rx) = EventSink::channel();

    let stored = vec![
        amplified_link(&format!("{}/alive", server.uri())),
        amplified_link(&format!("{}/gone", server.uri())),
    ];

    let checked = run_monitor(&ctx, stored, "target.com", &events)
        .await
        .unwrap();

    assert_eq!(checked.len(), 2);

    let alive = &checked[0];
    assert_eq!(alive.validation, StageOutcome::Success);
    assert_eq!(alive.live, Some(true));
    assert_eq!(alive.page_title.as_deref(), Some("New Title"));
    assert_eq!(alive.anchor_text.as_deref(), Some("New Anchor"));
    assert_eq!(alive.link_type, LinkType::Nofollow);
    assert!(alive.last_checked_at.is_some());

    let gone = &checked[1];
    assert_eq!(gone.validation, StageOutcome::Failure);
    assert_eq!(gone.live, Some(false));
    assert_eq!(gone.page_title, None);
    assert_eq!(gone.link_type, LinkType::Unknown);

    // Monitoring never touches the other stage outcomes
    for link in &checked {
        assert_eq!(link.search_notify, StageOutcome::Success);
        assert_eq!(link.aggregator_ping, StageOutcome::Failure);
        assert_eq!(link.short_link, StageOutcome::Success);
        assert_eq!(link.short_url.as_deref(), Some("https://sho.rt/old"));
    }

    // One progress event per stored link
    let mut seen = Vec::new();
    while let Ok(p) = progress_rx.try_recv() {
        seen.push((p.completed, p.total));
    }
    assert_eq!(seen, vec![(1, 2), (2, 2)]);
}

#[tokio::test]
async fn test_monitor_roundtrip_through_storage() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/post"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let mut store = SqliteCampaignStore::new_in_memory().unwrap();
    let campaign_id = store.create_campaign("watch", "target.com").unwrap();
    store
        .append_links(
            campaign_id,
            &[amplified_link(&format!("{}/post", server.uri()))],
        )
        .unwrap();

    let ctx = test_context(&server.uri());
    let (events, _log_rx, _progress_rx) = EventSink::channel();

    let stored = store.load_links(campaign_id).unwrap();
    let checked = run_monitor(&ctx, stored, "target.com", &events)
        .await
        .unwrap();
    store.update_link_checks(campaign_id, &checked).unwrap();

    let reloaded = store.load_links(campaign_id).unwrap();
    assert_eq!(reloaded.len(), 1);
    assert_eq!(reloaded[0].validation, StageOutcome::Failure);
    assert_eq!(reloaded[0].live, Some(false));
    assert!(reloaded[0].last_checked_at.is_some());
    // Prior amplification outcomes survived the check in the database too
    assert_eq!(reloaded[0].search_notify, StageOutcome::Success);
    assert_eq!(reloaded[0].short_url.as_deref(), Some("https://sho.rt/old"));
}

#[tokio::test]
async fn test_monitor_rejects_empty_target_domain() {
    let server = MockServer::start().await;
    let ctx = test_context(&server.uri());
    let (events, _log_rx, _progress_rx) = EventSink::channel();

    let result = run_monitor(&ctx, vec![LinkResult::new("http://a.test/")], "", &events).await;
    assert!(matches!(result, Err(LinkampError::Configuration(_))));
}
