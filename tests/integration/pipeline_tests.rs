//! End-to-end tests of the batch runner and stage pipeline

use crate::common::{page_with_link, test_config, test_context};
use linkamp::config::OperationMode;
use linkamp::model::{LinkType, StageConfig, StageOutcome};
use linkamp::pipeline::{run_batch, AmplifyContext, EventSink};
use linkamp::LinkampError;
use std::collections::HashSet;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Stage config running only validation
fn validate_only() -> StageConfig {
    StageConfig {
        validate: true,
        search_notify: false,
        aggregator_ping: false,
        short_link: false,
    }
}

/// Mounts happy-path mocks for the three side-effect services
async fn mount_side_effect_services(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("Sitemap notification received"),
        )
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/aggregate"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Pinging complete!"))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/shorten"))
        .respond_with(ResponseTemplate::new(200).set_body_string("https://sho.rt/abc"))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_validation_success_with_nofollow_link() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/post"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page_with_link(
            "A Blog Post",
            "http://target.com/x",
            Some("nofollow"),
            "Click",
        )))
        .mount(&server)
        .await;

    let ctx = test_context(&server.uri());
    let (events, _log_rx, _progress_rx) = EventSink::channel();
    let urls = vec![format!("{}/post", server.uri())];

    let results = run_batch(
        &ctx,
        &urls,
        "target.com",
        validate_only(),
        &HashSet::new(),
        &events,
    )
    .await
    .unwrap();

    assert_eq!(results.len(), 1);
    let result = &results[0];
    assert_eq!(result.validation, StageOutcome::Success);
    assert_eq!(result.live, Some(true));
    assert_eq!(result.link_type, LinkType::Nofollow);
    assert_eq!(result.anchor_text.as_deref(), Some("Click"));
    assert_eq!(result.page_title.as_deref(), Some("A Blog Post"));
    // Disabled stages stay NotRun
    assert_eq!(result.search_notify, StageOutcome::NotRun);
    assert_eq!(result.aggregator_ping, StageOutcome::NotRun);
    assert_eq!(result.short_link, StageOutcome::NotRun);
    assert!(result.last_processed_at.is_some());
}

#[tokio::test]
async fn test_validation_failure_halts_pipeline() {
    let server = MockServer::start().await;

    // Page is live but does not link to the target domain
    Mock::given(method("GET"))
        .and(path("/post"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page_with_link(
            "A Blog Post",
            "http://unrelated.com/x",
            None,
            "Elsewhere",
        )))
        .mount(&server)
        .await;

    // No side-effect service may be contacted after the early exit
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/aggregate"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/shorten"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let ctx = test_context(&server.uri());
    let (events, _log_rx, _progress_rx) = EventSink::channel();
    let urls = vec![format!("{}/post", server.uri())];

    let results = run_batch(
        &ctx,
        &urls,
        "target.com",
        StageConfig::all_enabled(),
        &HashSet::new(),
        &events,
    )
    .await
    .unwrap();

    let result = &results[0];
    assert_eq!(result.validation, StageOutcome::Failure);
    assert_eq!(result.live, Some(false));
    assert_eq!(result.search_notify, StageOutcome::NotRun);
    assert_eq!(result.aggregator_ping, StageOutcome::NotRun);
    assert_eq!(result.short_link, StageOutcome::NotRun);
    assert!(result.error_message.is_some());
}

#[tokio::test]
async fn test_dead_page_is_validation_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let ctx = test_context(&server.uri());
    let (events, _log_rx, _progress_rx) = EventSink::channel();
    let urls = vec![format!("{}/gone", server.uri())];

    let results = run_batch(
        &ctx,
        &urls,
        "target.com",
        validate_only(),
        &HashSet::new(),
        &events,
    )
    .await
    .unwrap();

    let result = &results[0];
    assert_eq!(result.validation, StageOutcome::Failure);
    assert_eq!(result.live, Some(false));
    assert!(result.error_message.as_deref().unwrap().contains("404"));
}

#[tokio::test]
async fn test_validation_disabled_never_fetches() {
    let server = MockServer::start().await;

    // The backlink page must not be fetched when validation is off
    Mock::given(method("GET"))
        .and(path("/post"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    mount_side_effect_services(&server).await;

    let ctx = test_context(&server.uri());
    let (events, _log_rx, _progress_rx) = EventSink::channel();
    let urls = vec![format!("{}/post", server.uri())];

    let stages = StageConfig {
        validate: false,
        search_notify: true,
        aggregator_ping: true,
        short_link: true,
    };

    let results = run_batch(&ctx, &urls, "target.com", stages, &HashSet::new(), &events)
        .await
        .unwrap();

    let result = &results[0];
    assert_eq!(result.validation, StageOutcome::NotRun);
    assert_eq!(result.live, None);
    assert_eq!(result.page_title, None);
    assert_eq!(result.link_type, LinkType::Unknown);
    // The other stages ran normally
    assert_eq!(result.search_notify, StageOutcome::Success);
    assert_eq!(result.aggregator_ping, StageOutcome::Success);
    assert_eq!(result.short_link, StageOutcome::Success);
    assert_eq!(result.short_url.as_deref(), Some("https://sho.rt/abc"));
}

#[tokio::test]
async fn test_full_pipeline_happy_path() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/post"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page_with_link(
            "A Blog Post",
            "https://www.target.com/page",
            None,
            "Go",
        )))
        .mount(&server)
        .await;
    mount_side_effect_services(&server).await;

    let ctx = test_context(&server.uri());
    let (events, _log_rx, mut progress_rx) = EventSink::channel();
    let urls = vec![format!("{}/post", server.uri())];

    let results = run_batch(
        &ctx,
        &urls,
        "target.com",
        StageConfig::all_enabled(),
        &HashSet::new(),
        &events,
    )
    .await
    .unwrap();

    let result = &results[0];
    assert_eq!(result.validation, StageOutcome::Success);
    assert_eq!(result.link_type, LinkType::Dofollow);
    assert_eq!(result.search_notify, StageOutcome::Success);
    assert_eq!(result.aggregator_ping, StageOutcome::Success);
    assert_eq!(result.short_link, StageOutcome::Success);
    assert_eq!(result.short_url.as_deref(), Some("https://sho.rt/abc"));

    let progress = progress_rx.try_recv().unwrap();
    assert_eq!((progress.completed, progress.total), (1, 1));
}

#[tokio::test]
async fn test_stage_failures_after_validation_do_not_halt() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/post"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page_with_link(
            "A Blog Post",
            "http://target.com/",
            None,
            "Go",
        )))
        .mount(&server)
        .await;

    // Search notification rejects the credential
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;
    // Aggregator is down
    Mock::given(method("GET"))
        .and(path("/aggregate"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    // Both shortener providers fail
    Mock::given(method("GET"))
        .and(path("/shorten"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/shorten-fallback"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let ctx = test_context(&server.uri());
    let (events, _log_rx, _progress_rx) = EventSink::channel();
    let urls = vec![format!("{}/post", server.uri())];

    let results = run_batch(
        &ctx,
        &urls,
        "target.com",
        StageConfig::all_enabled(),
        &HashSet::new(),
        &events,
    )
    .await
    .unwrap();

    // Every stage ran despite the failures before it
    let result = &results[0];
    assert_eq!(result.validation, StageOutcome::Success);
    assert_eq!(result.search_notify, StageOutcome::Failure);
    assert_eq!(result.aggregator_ping, StageOutcome::Failure);
    assert_eq!(result.short_link, StageOutcome::Failure);
    assert_eq!(result.short_url, None);
}

#[tokio::test]
async fn test_shortener_fallback_succeeds() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/post"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page_with_link(
            "T",
            "http://target.com/",
            None,
            "Go",
        )))
        .mount(&server)
        .await;

    // Primary answers with garbage, fallback with a real short URL
    Mock::given(method("GET"))
        .and(path("/shorten"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ERROR: over quota"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/shorten-fallback"))
        .respond_with(ResponseTemplate::new(200).set_body_string("https://fallback.rt/xyz"))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = test_context(&server.uri());
    let (events, _log_rx, _progress_rx) = EventSink::channel();
    let urls = vec![format!("{}/post", server.uri())];

    let stages = StageConfig {
        validate: true,
        search_notify: false,
        aggregator_ping: false,
        short_link: true,
    };

    let results = run_batch(&ctx, &urls, "target.com", stages, &HashSet::new(), &events)
        .await
        .unwrap();

    let result = &results[0];
    assert_eq!(result.short_link, StageOutcome::Success);
    assert_eq!(result.short_url.as_deref(), Some("https://fallback.rt/xyz"));
    assert!(result.error_message.is_none());
}

#[tokio::test]
async fn test_aggregator_optimistic_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/post"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page_with_link(
            "T",
            "http://target.com/",
            None,
            "Go",
        )))
        .mount(&server)
        .await;

    // 2xx without the confirmation marker still counts as success
    Mock::given(method("GET"))
        .and(path("/aggregate"))
        .respond_with(ResponseTemplate::new(200).set_body_string("queued, maybe"))
        .mount(&server)
        .await;

    let ctx = test_context(&server.uri());
    let (events, mut log_rx, _progress_rx) = EventSink::channel();
    let urls = vec![format!("{}/post", server.uri())];

    let stages = StageConfig {
        validate: true,
        search_notify: false,
        aggregator_ping: true,
        short_link: false,
    };

    let results = run_batch(&ctx, &urls, "target.com", stages, &HashSet::new(), &events)
        .await
        .unwrap();

    assert_eq!(results[0].aggregator_ping, StageOutcome::Success);

    // The unconfirmed receipt surfaces as a warning, not silently
    let mut saw_warning = false;
    while let Ok(event) = log_rx.try_recv() {
        if event.severity == linkamp::pipeline::Severity::Warning
            && event.message.contains("confirm")
        {
            saw_warning = true;
        }
    }
    assert!(saw_warning);
}

#[tokio::test]
async fn test_privacy_mode_blocks_search_notify() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/post"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page_with_link(
            "T",
            "http://target.com/",
            None,
            "Go",
        )))
        .mount(&server)
        .await;

    // The search endpoint must never be contacted in privacy mode
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/aggregate"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Pinging complete!"))
        .mount(&server)
        .await;

    let ctx = test_context(&server.uri()).with_operation_mode(OperationMode::Privacy);
    let (events, _log_rx, _progress_rx) = EventSink::channel();
    let urls = vec![format!("{}/post", server.uri())];

    let stages = StageConfig {
        validate: true,
        search_notify: true,
        aggregator_ping: true,
        short_link: false,
    };

    let results = run_batch(&ctx, &urls, "target.com", stages, &HashSet::new(), &events)
        .await
        .unwrap();

    let result = &results[0];
    assert_eq!(result.search_notify, StageOutcome::Failure);
    assert!(result
        .error_message
        .as_deref()
        .unwrap()
        .contains("privacy mode"));
    // The later stage still ran
    assert_eq!(result.aggregator_ping, StageOutcome::Success);
}

#[tokio::test]
async fn test_missing_credential_fails_search_stage() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/post"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page_with_link(
            "T",
            "http://target.com/",
            None,
            "Go",
        )))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut config = test_config(&server.uri());
    config.search.token = None;
    let ctx = AmplifyContext::from_config(&config).unwrap();

    let (events, _log_rx, _progress_rx) = EventSink::channel();
    let urls = vec![format!("{}/post", server.uri())];

    let stages = StageConfig {
        validate: true,
        search_notify: true,
        aggregator_ping: false,
        short_link: false,
    };

    let results = run_batch(&ctx, &urls, "target.com", stages, &HashSet::new(), &events)
        .await
        .unwrap();

    assert_eq!(results[0].search_notify, StageOutcome::Failure);
    assert!(results[0]
        .error_message
        .as_deref()
        .unwrap()
        .contains("credential"));
}

#[tokio::test]
async fn test_batch_preserves_input_order() {
    let server = MockServer::start().await;
    for page in ["/a", "/b", "/c"] {
        Mock::given(method("GET"))
            .and(path(page))
            .respond_with(ResponseTemplate::new(200).set_body_string(page_with_link(
                "T",
                "http://target.com/",
                None,
                "Go",
            )))
            .mount(&server)
            .await;
    }

    let ctx = test_context(&server.uri());
    let (events, _log_rx, _progress_rx) = EventSink::channel();
    let urls = vec![
        format!("{}/a", server.uri()),
        format!("{}/b", server.uri()),
        format!("{}/c", server.uri()),
    ];

    let results = run_batch(
        &ctx,
        &urls,
        "target.com",
        validate_only(),
        &HashSet::new(),
        &events,
    )
    .await
    .unwrap();

    let result_urls: Vec<&str> = results.iter().map(|r| r.url.as_str()).collect();
    assert_eq!(result_urls, urls.iter().map(String::as_str).collect::<Vec<_>>());
}

#[tokio::test]
async fn test_dedup_skips_known_urls() {
    let server = MockServer::start().await;

    // Nothing may be fetched: the only URL is already in the campaign
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let ctx = test_context(&server.uri());
    let (events, _log_rx, mut progress_rx) = EventSink::channel();

    let url = format!("{}/known", server.uri());
    let urls = vec![url.clone()];
    let existing: HashSet<String> = [url].into_iter().collect();

    let results = run_batch(
        &ctx,
        &urls,
        "target.com",
        validate_only(),
        &existing,
        &events,
    )
    .await
    .unwrap();

    assert!(results.is_empty());
    // Skipped URLs never reach the progress numerator
    assert!(progress_rx.try_recv().is_err());
}

#[tokio::test]
async fn test_dedup_is_exact_match() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/post"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page_with_link(
            "T",
            "http://target.com/",
            None,
            "Go",
        )))
        .mount(&server)
        .await;

    let ctx = test_context(&server.uri());
    let (events, _log_rx, _progress_rx) = EventSink::channel();

    // Known URL differs by a trailing slash: not a dedup match
    let urls = vec![format!("{}/post", server.uri())];
    let existing: HashSet<String> = [format!("{}/post/", server.uri())].into_iter().collect();

    let results = run_batch(
        &ctx,
        &urls,
        "target.com",
        validate_only(),
        &existing,
        &events,
    )
    .await
    .unwrap();

    assert_eq!(results.len(), 1);
}

#[tokio::test]
async fn test_progress_counts_processed_over_total() {
    let server = MockServer::start().await;
    for page in ["/a", "/c"] {
        Mock::given(method("GET"))
            .and(path(page))
            .respond_with(ResponseTemplate::new(200).set_body_string(page_with_link(
                "T",
                "http://target.com/",
                None,
                "Go",
            )))
            .mount(&server)
            .await;
    }

    let ctx = test_context(&server.uri());
    let (events, _log_rx, mut progress_rx) = EventSink::channel();

    let skipped = format!("{}/b", server.uri());
    let urls = vec![
        format!("{}/a", server.uri()),
        skipped.clone(),
        format!("{}/c", server.uri()),
    ];
    let existing: HashSet<String> = [skipped].into_iter().collect();

    let results = run_batch(
        &ctx,
        &urls,
        "target.com",
        validate_only(),
        &existing,
        &events,
    )
    .await
    .unwrap();

    assert_eq!(results.len(), 2);

    // Numerator counts processed URLs only; denominator is the full list
    let mut seen = Vec::new();
    while let Ok(p) = progress_rx.try_recv() {
        seen.push((p.completed, p.total));
    }
    assert_eq!(seen, vec![(1, 3), (2, 3)]);
}

#[tokio::test]
async fn test_empty_target_domain_rejected_before_network() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let ctx = test_context(&server.uri());
    let (events, mut log_rx, _progress_rx) = EventSink::channel();
    let urls = vec![format!("{}/post", server.uri())];

    let result = run_batch(&ctx, &urls, "", validate_only(), &HashSet::new(), &events).await;

    assert!(matches!(result, Err(LinkampError::Configuration(_))));

    // One error log line, then nothing
    let event = log_rx.try_recv().unwrap();
    assert_eq!(event.severity, linkamp::pipeline::Severity::Error);
}
