//! End-to-end tests for the channel request parameter processor: gating,
//! target resolution, multipart absorption, and commit semantics.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use {bytes::Bytes, http::Method};

use {
    porta_common::{ChannelId, PortalRequest, UploadOutcome, UploadStatus},
    porta_config::UploadConfig,
    porta_params::{
        ChannelParameterManager, ChannelRequestParameterProcessor, Disposition, RequestResolution,
        UPLOAD_STATUS_PARAM,
    },
    porta_service_traits::{
        ChannelParameterSink as _, ErrorReporter, PortletRoute, PortletTargetService, Severity,
        StaticLayoutService,
    },
};

const BOUNDARY: &str = "----porta-e2e-boundary";

/// Gate that always answers the same way.
struct FixedGate(PortletRoute);

impl PortletTargetService for FixedGate {
    fn targeted_window(&self, _request: &PortalRequest) -> PortletRoute {
        self.0.clone()
    }
}

/// Gate that is not ready on the first pass and ready afterwards.
struct FlakyGate {
    calls: AtomicUsize,
}

impl FlakyGate {
    fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }
}

impl PortletTargetService for FlakyGate {
    fn targeted_window(&self, _request: &PortalRequest) -> PortletRoute {
        if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
            PortletRoute::Incomplete
        } else {
            PortletRoute::NotTargeted
        }
    }
}

/// Reporter that counts what reaches it.
#[derive(Default)]
struct CountingReporter {
    reports: AtomicUsize,
}

impl ErrorReporter for CountingReporter {
    fn report(&self, _severity: Severity, _error: &(dyn std::error::Error + 'static)) {
        self.reports.fetch_add(1, Ordering::SeqCst);
    }
}

struct Harness {
    processor: ChannelRequestParameterProcessor,
    manager: Arc<ChannelParameterManager>,
    reporter: Arc<CountingReporter>,
}

fn harness_with(gate: Arc<dyn PortletTargetService>, upload: UploadConfig) -> Harness {
    let manager = Arc::new(ChannelParameterManager::new());
    let reporter = Arc::new(CountingReporter::default());
    let layout = Arc::new(StaticLayoutService::new().with_subscription("weather", "n12"));
    let processor = ChannelRequestParameterProcessor::new(
        gate,
        layout,
        manager.clone(),
        reporter.clone(),
        upload,
    );
    Harness {
        processor,
        manager,
        reporter,
    }
}

fn harness() -> Harness {
    harness_with(
        Arc::new(FixedGate(PortletRoute::NotTargeted)),
        UploadConfig::default(),
    )
}

fn multipart_body(parts: &[(&str, Option<&str>, &[u8])]) -> Bytes {
    let mut body = Vec::new();
    for (name, filename, data) in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match filename {
            Some(f) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{name}\"; filename=\"{f}\"\r\n\r\n"
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
            ),
        }
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    Bytes::from(body)
}

fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={BOUNDARY}")
}

#[tokio::test]
async fn plain_request_commits_exact_bag() {
    let h = harness();
    let req = PortalRequest::builder()
        .parameter("uP_channelTarget", "n7")
        .parameter("a", "1")
        .parameters("b", ["2", "3"])
        .build();

    assert_eq!(h.processor.process(&req).await, Disposition::Complete);

    let bag = h
        .manager
        .parameters_for(req.id(), &ChannelId::new("n7"))
        .expect("bag committed for n7");
    assert_eq!(bag.len(), 2);
    assert_eq!(bag["a"][0].as_text(), Some("1"));
    let b: Vec<_> = bag["b"].iter().filter_map(|v| v.as_text()).collect();
    assert_eq!(b, ["2", "3"]);
    assert!(!bag.contains_key(UPLOAD_STATUS_PARAM));
}

#[tokio::test]
async fn no_target_is_marked_explicitly() {
    let h = harness();
    let req = PortalRequest::builder()
        .parameter("story", "42")
        .portal_path("render.userLayoutRootNode.uP")
        .build();

    assert_eq!(h.processor.process(&req).await, Disposition::Complete);
    assert!(matches!(
        h.manager.resolution(req.id()),
        Some(RequestResolution::NoChannel)
    ));
}

#[tokio::test]
async fn reserved_routing_keys_never_reach_the_bag() {
    let h = harness();
    let req = PortalRequest::builder()
        .parameter("uP_fname", "weather")
        .parameter("uP_channelTarget", "n1")
        .parameter("uP_help_target", "n2")
        .parameter("uP_about_target", "n3")
        .parameter("uP_edit_target", "n4")
        .parameter("uP_detach_target", "n5")
        .parameter("kept", "yes")
        .build();

    assert_eq!(h.processor.process(&req).await, Disposition::Complete);

    // fname wins the cascade.
    let bag = h
        .manager
        .parameters_for(req.id(), &ChannelId::new("n12"))
        .expect("bag committed for fname channel");
    assert_eq!(bag.len(), 1);
    assert_eq!(bag["kept"][0].as_text(), Some("yes"));
}

#[tokio::test]
async fn portlet_request_commits_empty_bag() {
    let h = harness_with(
        Arc::new(FixedGate(PortletRoute::Targeted("w3".into()))),
        UploadConfig::default(),
    );
    let req = PortalRequest::builder()
        .method(Method::POST)
        .parameter("uP_channelTarget", "n7")
        .parameter("ignored", "param")
        .content_type(multipart_content_type())
        .body(multipart_body(&[("also-ignored", None, b"field")]))
        .build();

    assert_eq!(h.processor.process(&req).await, Disposition::Complete);

    let bag = h
        .manager
        .parameters_for(req.id(), &ChannelId::new("n7"))
        .expect("empty bag committed");
    assert!(bag.is_empty());
}

#[tokio::test]
async fn incomplete_gate_defers_and_retry_succeeds() {
    let h = harness_with(Arc::new(FlakyGate::new()), UploadConfig::default());
    let req = PortalRequest::builder()
        .parameter("uP_channelTarget", "n7")
        .parameter("a", "1")
        .build();

    assert_eq!(h.processor.process(&req).await, Disposition::Deferred);
    assert!(!h.manager.is_resolved(req.id()));

    // Retry with the unchanged request reaches a definitive outcome.
    assert_eq!(h.processor.process(&req).await, Disposition::Complete);
    let bag = h
        .manager
        .parameters_for(req.id(), &ChannelId::new("n7"))
        .expect("bag committed on retry");
    assert_eq!(bag["a"][0].as_text(), Some("1"));
}

#[tokio::test]
async fn definitive_outcome_is_stable_across_repeat_passes() {
    let h = harness();
    let req = PortalRequest::builder()
        .parameter("uP_channelTarget", "n7")
        .parameter("a", "1")
        .build();

    assert_eq!(h.processor.process(&req).await, Disposition::Complete);
    assert_eq!(h.processor.process(&req).await, Disposition::Complete);

    let bag = h
        .manager
        .parameters_for(req.id(), &ChannelId::new("n7"))
        .expect("bag still committed");
    assert_eq!(bag.len(), 1);
    assert_eq!(bag["a"][0].as_text(), Some("1"));
}

#[tokio::test]
async fn multipart_upload_success() {
    let h = harness();
    let req = PortalRequest::builder()
        .method(Method::POST)
        .parameter("uP_channelTarget", "n7")
        .parameter("page", "2")
        .content_type(multipart_content_type())
        .body(multipart_body(&[
            ("comment", None, b"see attachment"),
            ("attachment", Some("notes.txt"), b"line one"),
        ]))
        .build();

    assert_eq!(h.processor.process(&req).await, Disposition::Complete);

    let bag = h
        .manager
        .parameters_for(req.id(), &ChannelId::new("n7"))
        .expect("bag committed");

    assert_eq!(bag["comment"][0].as_text(), Some("see attachment"));
    assert_eq!(bag["page"][0].as_text(), Some("2"));

    let file = bag["attachment"][0].as_file().expect("file handle");
    assert_eq!(file.original_filename(), "notes.txt");
    // Spilled content stays readable after processing finished.
    assert_eq!(std::fs::read(file.path()).expect("spilled file"), b"line one");

    let status = bag[UPLOAD_STATUS_PARAM][0]
        .as_upload_status()
        .expect("upload status entry");
    assert_eq!(
        *status,
        UploadStatus::success(UploadConfig::default().max_file_size)
    );
    assert_eq!(h.reporter.reports.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn multipart_parse_failure_degrades_gracefully() {
    let upload = UploadConfig::default();
    let max = upload.max_file_size;
    let h = harness_with(Arc::new(FixedGate(PortletRoute::NotTargeted)), upload);

    let mut body = multipart_body(&[("gathered", None, b"before the failure")]).to_vec();
    body.truncate(body.len() - format!("--{BOUNDARY}--\r\n").len());
    body.extend_from_slice(format!("--{BOUNDARY}\r\nContent-Disp").as_bytes());

    let req = PortalRequest::builder()
        .method(Method::POST)
        .parameter("uP_channelTarget", "n7")
        .parameter("survivor", "yes")
        .content_type(multipart_content_type())
        .body(Bytes::from(body))
        .build();

    // A failed upload degrades, it never fails the page request.
    assert_eq!(h.processor.process(&req).await, Disposition::Complete);

    let bag = h
        .manager
        .parameters_for(req.id(), &ChannelId::new("n7"))
        .expect("bag committed despite parse failure");
    assert_eq!(bag["gathered"][0].as_text(), Some("before the failure"));
    assert_eq!(bag["survivor"][0].as_text(), Some("yes"));

    let status = bag[UPLOAD_STATUS_PARAM][0]
        .as_upload_status()
        .expect("upload status entry");
    assert_eq!(status.outcome, UploadOutcome::Failure);
    assert_eq!(status.max_file_size, max);
    assert_eq!(h.reporter.reports.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn oversize_upload_records_failure_with_configured_limit() {
    let upload = UploadConfig {
        max_file_size: 8,
        ..UploadConfig::default()
    };
    let h = harness_with(Arc::new(FixedGate(PortletRoute::NotTargeted)), upload);

    let req = PortalRequest::builder()
        .method(Method::POST)
        .parameter("uP_channelTarget", "n7")
        .content_type(multipart_content_type())
        .body(multipart_body(&[(
            "attachment",
            Some("big.bin"),
            &[0u8; 64],
        )]))
        .build();

    assert_eq!(h.processor.process(&req).await, Disposition::Complete);

    let bag = h
        .manager
        .parameters_for(req.id(), &ChannelId::new("n7"))
        .expect("bag committed");
    let status = bag[UPLOAD_STATUS_PARAM][0]
        .as_upload_status()
        .expect("upload status entry");
    assert_eq!(*status, UploadStatus::failure(8));
    assert!(!bag.contains_key("attachment"));
}

#[tokio::test]
async fn non_post_multipart_content_type_is_not_parsed() {
    let h = harness();
    let req = PortalRequest::builder()
        .parameter("uP_channelTarget", "n7")
        .content_type(multipart_content_type())
        .body(multipart_body(&[("field", None, b"value")]))
        .build();

    assert_eq!(h.processor.process(&req).await, Disposition::Complete);

    let bag = h
        .manager
        .parameters_for(req.id(), &ChannelId::new("n7"))
        .expect("bag committed");
    assert!(!bag.contains_key(UPLOAD_STATUS_PARAM));
    assert!(!bag.contains_key("field"));
}
