use crate::config::{ConfigStore, WebhookConfig};
use crate::error::{ClientError, StoreError, WorkflowError};
use crate::model::{AnalysisRequest, PredictionResult};
use crate::notice::Notice;
use crate::webhook::{ForwardJob, ForwardOutcome};
use strum_macros::AsRefStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr)]
pub enum WorkflowState {
    Idle,
    ImageSelected,
    Analyzing,
    ResultReady,
    Failed,
}

/// Issued when an analysis starts; the completion must present it back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisTicket {
    cycle: u64,
    request: Uuid,
}

impl AnalysisTicket {
    /// Id of the image this analysis was started for.
    pub fn request_id(&self) -> Uuid {
        self.request
    }
}

/// Owner of the upload-analyze-display lifecycle. Nothing else writes the
/// state; the UI feeds it events and renders what it exposes.
pub struct Workflow<S, P> {
    store: S,
    webhook: WebhookConfig,
    state: WorkflowState,
    request: Option<AnalysisRequest<P>>,
    result: Option<PredictionResult>,
    cycle: u64,
    notices: Vec<Notice>,
}

impl<S: ConfigStore, P> Workflow<S, P> {
    pub fn new(store: S) -> Self {
        let webhook = store.get();
        if let Some(url) = webhook.url() {
            log::info!("Loaded webhook URL: {}", url);
        }
        Self {
            store,
            webhook,
            state: WorkflowState::Idle,
            request: None,
            result: None,
            cycle: 0,
            notices: Vec::new(),
        }
    }

    pub fn state(&self) -> WorkflowState {
        self.state
    }

    pub fn request(&self) -> Option<&AnalysisRequest<P>> {
        self.request.as_ref()
    }

    /// Only populated in `ResultReady`.
    pub fn result(&self) -> Option<&PredictionResult> {
        self.result.as_ref()
    }

    pub fn webhook(&self) -> &WebhookConfig {
        &self.webhook
    }

    pub fn is_analyzing(&self) -> bool {
        self.state == WorkflowState::Analyzing
    }

    pub fn can_analyze(&self) -> bool {
        self.request.is_some() && !self.is_analyzing()
    }

    pub fn select_image(&mut self, request: AnalysisRequest<P>) -> Result<(), WorkflowError> {
        if self.is_analyzing() {
            log::warn!("Ignoring {} while an analysis is in flight", request.filename());
            return Err(WorkflowError::AlreadyAnalyzing);
        }

        log::info!(
            "Selected image {} ({}) as request {}",
            request.filename(),
            request.mime_type(),
            request.id()
        );
        self.request = Some(request);
        self.result = None;
        self.state = WorkflowState::ImageSelected;
        Ok(())
    }

    pub fn begin_analysis(&mut self) -> Result<AnalysisTicket, WorkflowError> {
        if self.is_analyzing() {
            log::debug!("Analysis trigger ignored, cycle {} still running", self.cycle);
            return Err(WorkflowError::AlreadyAnalyzing);
        }
        let Some(request) = self.request.as_ref().map(AnalysisRequest::id) else {
            let err = WorkflowError::NoImageSelected;
            self.notices.push(Notice::warning(err.to_string()));
            return Err(err);
        };

        self.cycle += 1;
        self.result = None;
        self.state = WorkflowState::Analyzing;
        self.notices.push(Notice::info("Analyzing... Please wait."));
        log::debug!("Cycle {} started for request {}", self.cycle, request);
        Ok(AnalysisTicket {
            cycle: self.cycle,
            request,
        })
    }

    /// Records the prediction outcome. Returns the webhook forward to run when
    /// a URL is configured; its result goes to `finish_forward`, never here.
    pub fn finish_analysis(
        &mut self,
        ticket: AnalysisTicket,
        outcome: Result<PredictionResult, ClientError>,
    ) -> Option<ForwardJob> {
        let current = self.request.as_ref().map(AnalysisRequest::id);
        if !self.is_analyzing() || ticket.cycle != self.cycle || current != Some(ticket.request) {
            log::warn!(
                "Discarding stale completion for cycle {} (request {})",
                ticket.cycle,
                ticket.request
            );
            return None;
        }

        match outcome {
            Ok(result) => {
                self.state = WorkflowState::ResultReady;
                self.result = Some(result);
                self.notices.push(Notice::success("Analysis complete"));
                self.forward_job()
            }
            Err(e) => {
                log::error!("Prediction error: {}", e);
                self.state = WorkflowState::Failed;
                self.result = None;
                self.notices
                    .push(Notice::error(format!("Error during analysis: {e}. Please try again.")));
                None
            }
        }
    }

    pub fn finish_forward(&mut self, outcome: &ForwardOutcome) {
        self.notices.push(outcome.notice());
    }

    /// Re-sends the displayed result on user request.
    pub fn manual_forward(&mut self) -> Option<ForwardJob> {
        let result = self.result.as_ref()?;
        if result.is_simulated() {
            log::warn!("Refusing to send a simulated result to the webhook");
            self.notices
                .push(Notice::warning("Simulated demo results are not sent to the webhook"));
            return None;
        }
        if !self.webhook.is_configured() {
            self.notices.push(Notice::error(
                "Webhook URL not configured. Open 'Webhook Config' to set it up.",
            ));
            return None;
        }
        self.forward_job()
    }

    pub fn save_webhook_url(&mut self, url: &str) -> Result<(), StoreError> {
        if let Err(e) = self.store.set(url) {
            log::error!("Failed to save webhook URL: {}", e);
            self.notices.push(Notice::error(format!("Could not save webhook URL: {e}")));
            return Err(e);
        }

        self.reload_config();
        let notice = if self.webhook.is_configured() {
            Notice::success("Webhook URL saved locally")
        } else {
            Notice::info("Webhook URL cleared")
        };
        self.notices.push(notice);
        Ok(())
    }

    pub fn reload_config(&mut self) -> &WebhookConfig {
        self.webhook = self.store.get();
        &self.webhook
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    fn forward_job(&self) -> Option<ForwardJob> {
        let url = self.webhook.url()?;
        let result = self.result.clone()?;
        let request = self.request.as_ref()?;
        if result.is_simulated() {
            log::warn!("Simulated result for {} is not forwarded to the webhook", request.filename());
            return None;
        }
        let filename = request.filename().to_string();
        Some(ForwardJob {
            url: url.to_string(),
            filename,
            result,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MemoryStore;
    use crate::model::{Label, RawPrediction};
    use crate::notice::NoticeLevel;
    use crate::predict::{PredictTransport, PredictionClient};
    use crate::webhook::{WebhookForwarder, WebhookPayload, WebhookTransport};
    use futures::executor::block_on;
    use std::cell::Cell;

    type Bytes = Vec<u8>;

    struct StubEndpoint {
        body: Result<&'static str, ClientError>,
        calls: Cell<usize>,
    }

    impl StubEndpoint {
        fn ok(body: &'static str) -> Self {
            Self { body: Ok(body), calls: Cell::new(0) }
        }

        fn unreachable() -> Self {
            Self {
                body: Err(ClientError::Network("Failed to fetch".into())),
                calls: Cell::new(0),
            }
        }
    }

    impl PredictTransport<Bytes> for &StubEndpoint {
        async fn send(&self, _request: &AnalysisRequest<Bytes>) -> Result<RawPrediction, ClientError> {
            self.calls.set(self.calls.get() + 1);
            RawPrediction::from_json(self.body.clone()?)
        }
    }

    struct BrokenWebhook;

    impl WebhookTransport for BrokenWebhook {
        async fn post_json(&self, _url: &str, _payload: &WebhookPayload) -> Result<(), ClientError> {
            Err(ClientError::Network("webhook unreachable".into()))
        }
    }

    fn image(name: &str) -> AnalysisRequest<Bytes> {
        AnalysisRequest::new(name, "image/png", vec![0x89, 0x50]).unwrap()
    }

    fn analyze(workflow: &mut Workflow<MemoryStore, Bytes>, endpoint: StubEndpoint) -> Option<ForwardJob> {
        let client = PredictionClient::new(&endpoint, || 0.5);
        let ticket = workflow.begin_analysis().unwrap();
        let request = workflow.request().cloned().unwrap();
        let outcome = block_on(client.analyze(&request));
        workflow.finish_analysis(ticket, outcome)
    }

    fn errors(notices: &[Notice]) -> usize {
        notices.iter().filter(|n| n.level == NoticeLevel::Error).count()
    }

    #[test]
    fn test_starts_idle_with_stored_webhook() {
        let workflow: Workflow<_, Bytes> = Workflow::new(MemoryStore::with_url("https://h/x"));
        assert_eq!(workflow.state(), WorkflowState::Idle);
        assert_eq!(workflow.webhook().url(), Some("https://h/x"));
        assert!(!workflow.can_analyze());
    }

    #[test]
    fn test_trigger_without_image_warns() {
        let mut workflow: Workflow<_, Bytes> = Workflow::new(MemoryStore::default());
        assert_eq!(workflow.begin_analysis(), Err(WorkflowError::NoImageSelected));
        assert_eq!(workflow.state(), WorkflowState::Idle);
        let notices = workflow.take_notices();
        assert_eq!(notices, vec![Notice::warning("Please upload an image first")]);
    }

    #[test]
    fn test_second_trigger_while_analyzing_is_ignored() {
        let mut workflow = Workflow::new(MemoryStore::default());
        workflow.select_image(image("a.png")).unwrap();

        let ticket = workflow.begin_analysis().unwrap();
        assert_eq!(workflow.begin_analysis(), Err(WorkflowError::AlreadyAnalyzing));
        assert_eq!(workflow.state(), WorkflowState::Analyzing);
        assert!(!workflow.can_analyze());

        // selecting another image mid-flight is refused as well
        assert_eq!(workflow.select_image(image("b.png")), Err(WorkflowError::AlreadyAnalyzing));
        assert_eq!(workflow.request().unwrap().filename(), "a.png");

        let endpoint = StubEndpoint::ok(r#"{"prediction":"cancerous","confidence":80}"#);
        let client = PredictionClient::new(&endpoint, || 0.5);
        let outcome = block_on(client.analyze(workflow.request().unwrap()));
        workflow.finish_analysis(ticket, outcome);
        assert_eq!(endpoint.calls.get(), 1);
        assert_eq!(workflow.state(), WorkflowState::ResultReady);
    }

    #[test]
    fn test_scenario_mixed_case_label() {
        let mut workflow = Workflow::new(MemoryStore::default());
        workflow.select_image(image("scan.png")).unwrap();
        let job = analyze(&mut workflow, StubEndpoint::ok(r#"{"prediction":"Cancerous","confidence":92.5}"#));

        assert!(job.is_none());
        assert_eq!(workflow.state(), WorkflowState::ResultReady);
        let result = workflow.result().unwrap();
        assert_eq!(result.label(), Label::Cancerous);
        assert_eq!(result.confidence().to_string(), "92.50");
        assert_eq!(result.processing_time_ms(), None);
    }

    #[test]
    fn test_scenario_unknown_label() {
        let mut workflow = Workflow::new(MemoryStore::default());
        workflow.select_image(image("scan.png")).unwrap();
        analyze(&mut workflow, StubEndpoint::ok(r#"{"prediction":"weird_value","confidence":10}"#));
        assert_eq!(workflow.result().unwrap().label(), Label::Uncertain);
    }

    #[test]
    fn test_scenario_unreachable_endpoint() {
        let mut workflow = Workflow::new(MemoryStore::with_url("https://h/x"));
        workflow.select_image(image("scan.png")).unwrap();
        workflow.take_notices();

        let job = analyze(&mut workflow, StubEndpoint::unreachable());
        assert!(job.is_none());
        assert_eq!(workflow.state(), WorkflowState::Failed);
        assert!(workflow.result().is_none());
        assert_eq!(errors(&workflow.take_notices()), 1);
    }

    #[test]
    fn test_failed_cycle_can_be_retriggered() {
        let mut workflow = Workflow::new(MemoryStore::default());
        workflow.select_image(image("scan.png")).unwrap();
        analyze(&mut workflow, StubEndpoint::unreachable());
        assert!(workflow.can_analyze());

        analyze(&mut workflow, StubEndpoint::ok(r#"{"prediction":"non_cancerous","confidence":77}"#));
        assert_eq!(workflow.state(), WorkflowState::ResultReady);
    }

    #[test]
    fn test_webhook_failure_keeps_result() {
        let mut workflow = Workflow::new(MemoryStore::with_url("https://hooks.example.com/x"));
        workflow.select_image(image("scan.png")).unwrap();
        let job = analyze(&mut workflow, StubEndpoint::ok(r#"{"prediction":"cancerous","confidence":90}"#))
            .expect("webhook configured");
        assert_eq!(job.url, "https://hooks.example.com/x");
        assert_eq!(job.filename, "scan.png");

        let outcome = block_on(job.run(&WebhookForwarder::new(BrokenWebhook)));
        workflow.finish_forward(&outcome);

        assert_eq!(workflow.state(), WorkflowState::ResultReady);
        assert_eq!(workflow.result().unwrap().label(), Label::Cancerous);
        let notices = workflow.take_notices();
        assert_eq!(notices.last().unwrap().level, NoticeLevel::Error);
    }

    #[test]
    fn test_new_image_clears_previous_result() {
        for body in [Some(r#"{"prediction":"cancerous","confidence":90}"#), None] {
            let mut workflow = Workflow::new(MemoryStore::default());
            workflow.select_image(image("first.png")).unwrap();
            let endpoint = body.map(StubEndpoint::ok).unwrap_or_else(StubEndpoint::unreachable);
            analyze(&mut workflow, endpoint);

            workflow.select_image(image("second.png")).unwrap();
            assert_eq!(workflow.state(), WorkflowState::ImageSelected);
            assert!(workflow.result().is_none());
            assert_eq!(workflow.request().unwrap().filename(), "second.png");
        }
    }

    #[test]
    fn test_stale_ticket_is_discarded() {
        let mut workflow = Workflow::new(MemoryStore::default());
        workflow.select_image(image("a.png")).unwrap();
        let old = workflow.begin_analysis().unwrap();
        workflow.finish_analysis(old, Err(ClientError::Network("down".into())));

        let current = workflow.begin_analysis().unwrap();
        let late = PredictionResult::from_raw(RawPrediction {
            prediction: "cancerous".into(),
            confidence: 99.0,
            processing_time_ms: None,
        })
        .unwrap();
        assert!(workflow.finish_analysis(old, Ok(late)).is_none());
        assert_eq!(workflow.state(), WorkflowState::Analyzing);
        assert_ne!(old, current);
    }

    #[test]
    fn test_manual_forward_requires_url() {
        let mut workflow = Workflow::new(MemoryStore::default());
        assert!(workflow.manual_forward().is_none());

        workflow.select_image(image("scan.png")).unwrap();
        analyze(&mut workflow, StubEndpoint::ok(r#"{"prediction":"cancerous","confidence":90}"#));
        workflow.take_notices();

        assert!(workflow.manual_forward().is_none());
        assert_eq!(workflow.take_notices()[0].level, NoticeLevel::Error);

        workflow.save_webhook_url("https://hooks.example.com/y").unwrap();
        let job = workflow.manual_forward().unwrap();
        assert_eq!(job.url, "https://hooks.example.com/y");
    }

    #[test]
    fn test_simulated_result_is_never_forwarded() {
        let mut workflow = Workflow::new(MemoryStore::with_url("https://hooks.example.com/db"));
        workflow.select_image(image("scan.png")).unwrap();

        let endpoint = StubEndpoint::unreachable();
        let client = PredictionClient::new(&endpoint, || 0.9).with_demo_fallback(true);
        let ticket = workflow.begin_analysis().unwrap();
        let outcome = block_on(client.analyze(workflow.request().unwrap()));

        assert!(workflow.finish_analysis(ticket, outcome).is_none());
        assert_eq!(workflow.state(), WorkflowState::ResultReady);
        assert!(workflow.result().unwrap().is_simulated());
        workflow.take_notices();

        assert!(workflow.manual_forward().is_none());
        let notices = workflow.take_notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Warning);
    }

    #[test]
    fn test_ticket_carries_request_id() {
        let mut workflow = Workflow::new(MemoryStore::default());
        workflow.select_image(image("a.png")).unwrap();
        let ticket = workflow.begin_analysis().unwrap();
        assert_eq!(ticket.request_id(), workflow.request().unwrap().id());

        workflow.finish_analysis(ticket, Err(ClientError::Network("down".into())));
        workflow.select_image(image("a.png")).unwrap();
        let next = workflow.begin_analysis().unwrap();
        assert_ne!(next.request_id(), ticket.request_id());
    }

    #[test]
    fn test_save_and_clear_webhook() {
        let mut workflow: Workflow<_, Bytes> = Workflow::new(MemoryStore::default());
        workflow.save_webhook_url("https://hooks.example.com/z").unwrap();
        assert_eq!(workflow.webhook().url(), Some("https://hooks.example.com/z"));
        assert_eq!(workflow.reload_config().url(), Some("https://hooks.example.com/z"));

        workflow.save_webhook_url("").unwrap();
        assert!(!workflow.webhook().is_configured());
        assert!(!workflow.reload_config().is_configured());
    }
}
