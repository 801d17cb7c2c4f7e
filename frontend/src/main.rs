mod api;
mod components;
mod storage;

use api::{HttpPredictTransport, HttpWebhookTransport};
use components::utils::generate_id;
use gloo_file::{File as GlooFile, ObjectUrl};
use gloo_timers::callback::Timeout;
use shared::{
    AnalysisTicket, ClientError, ClientSettings, ForwardJob, ForwardOutcome, InputChannel, Notice,
    PredictionClient, PredictionResult, UploadSurface, WebhookForwarder, Workflow, WorkflowError,
};
use storage::LocalStorageStore;
use wasm_bindgen_futures::spawn_local;
use web_sys::DragEvent;
use yew::prelude::*;

const NOTICE_TTL_MS: u32 = 4000;

struct Toast {
    id: u64,
    notice: Notice,
    _timeout: Timeout,
}

// Yew msg components
enum Msg {
    // Upload surface
    FileOffered(web_sys::File, InputChannel),
    HandleDrop(DragEvent),
    SetDragging(bool),
    PreviewFailed,

    // Analysis
    Analyze,
    AnalysisFinished(AnalysisTicket, Result<PredictionResult, ClientError>),
    ForwardFinished(ForwardOutcome),
    SaveToWebhook,

    // Configuration
    SettingsLoaded(ClientSettings),
    ToggleConfig,
    WebhookInput(String),
    SaveWebhookUrl,

    DismissNotice(u64),
}

// Main component
struct Model {
    workflow: Workflow<LocalStorageStore, GlooFile>,
    surface: UploadSurface,
    settings: ClientSettings,
    preview_url: Option<ObjectUrl>,
    preview_failed: bool,
    show_config: bool,
    webhook_draft: String,
    toasts: Vec<Toast>,
}

impl Component for Model {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let workflow = Workflow::new(LocalStorageStore);
        let webhook_draft = workflow.webhook().url().unwrap_or_default().to_string();

        let link = ctx.link().clone();
        spawn_local(async move {
            link.send_message(Msg::SettingsLoaded(api::fetch_settings().await));
        });

        Self {
            workflow,
            surface: UploadSurface::default(),
            settings: ClientSettings::default(),
            preview_url: None,
            preview_failed: false,
            show_config: false,
            webhook_draft,
            toasts: Vec::new(),
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        let changed = match msg {
            Msg::FileOffered(file, channel) => self.handle_file_offered(file, channel),
            Msg::HandleDrop(event) => self.handle_drop(event),
            Msg::SetDragging(is_dragging) => {
                if is_dragging {
                    self.surface.drag_enter();
                } else {
                    self.surface.drag_leave();
                }
                true
            }
            Msg::PreviewFailed => {
                self.preview_failed = true;
                true
            }

            Msg::Analyze => self.handle_analyze(ctx),
            Msg::AnalysisFinished(ticket, outcome) => {
                if let Some(job) = self.workflow.finish_analysis(ticket, outcome) {
                    spawn_forward(ctx, job);
                }
                true
            }
            Msg::ForwardFinished(outcome) => {
                self.workflow.finish_forward(&outcome);
                true
            }
            Msg::SaveToWebhook => {
                if let Some(job) = self.workflow.manual_forward() {
                    spawn_forward(ctx, job);
                }
                true
            }

            Msg::SettingsLoaded(settings) => {
                if settings.demo_fallback {
                    log::warn!("Demo fallback enabled: failed predictions are replaced by simulated results");
                }
                self.settings = settings;
                false
            }
            Msg::ToggleConfig => {
                self.show_config = !self.show_config;
                true
            }
            Msg::WebhookInput(value) => {
                self.webhook_draft = value;
                true
            }
            Msg::SaveWebhookUrl => {
                if self.workflow.save_webhook_url(&self.webhook_draft).is_ok() {
                    self.webhook_draft = self.workflow.webhook().url().unwrap_or_default().to_string();
                    self.show_config = false;
                }
                true
            }

            Msg::DismissNotice(id) => {
                self.toasts.retain(|toast| toast.id != id);
                true
            }
        };

        self.flush_notices(ctx) || changed
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        html! {
            <div class="container">
                { components::header::render_header() }

                <main class="main-content">
                    { components::config_panel::render_config_panel(self, ctx) }
                    { components::upload_section::render_upload_section(self, ctx) }
                    { components::preview_area::render_analyze_button(self, ctx) }
                    { components::results::render_results(self, ctx) }
                </main>

                { components::notifications::render_notifications(self, ctx) }

                <footer class="app-footer">
                    <p>{"This tool is designed to assist healthcare professionals and is not a substitute for professional medical advice."}</p>
                </footer>
            </div>
        }
    }
}

// Handler methods
impl Model {
    fn handle_file_offered(&mut self, file: web_sys::File, channel: InputChannel) -> bool {
        let (name, mime_type) = (file.name(), file.type_());
        let mut accepted = None;
        self.surface.receive(channel, &name, &mime_type, GlooFile::from(file), |request| {
            accepted = Some(request)
        });

        let Some(request) = accepted else {
            return channel == InputChannel::Drop;
        };

        let preview = ObjectUrl::from(request.payload().clone());
        if let Err(err) = self.workflow.select_image(request) {
            log::warn!("Image not selected: {}", err);
            return true;
        }
        self.preview_url = Some(preview);
        self.preview_failed = false;
        true
    }

    fn handle_drop(&mut self, event: DragEvent) -> bool {
        event.prevent_default();
        let file = event
            .data_transfer()
            .and_then(|transfer| transfer.files())
            .and_then(|files| files.item(0));

        match file {
            Some(file) => self.handle_file_offered(file, InputChannel::Drop),
            None => {
                self.surface.drag_leave();
                true
            }
        }
    }

    fn handle_analyze(&mut self, ctx: &Context<Self>) -> bool {
        let ticket = match self.workflow.begin_analysis() {
            Ok(ticket) => ticket,
            Err(WorkflowError::AlreadyAnalyzing) => return false,
            Err(WorkflowError::NoImageSelected) => return true,
        };
        let Some(request) = self.workflow.request().cloned() else {
            return true;
        };

        let client = PredictionClient::new(
            HttpPredictTransport::new(&self.settings.predict_url),
            js_sys::Math::random,
        )
        .with_demo_fallback(self.settings.demo_fallback);

        let link = ctx.link().clone();
        spawn_local(async move {
            let outcome = client.analyze(&request).await;
            link.send_message(Msg::AnalysisFinished(ticket, outcome));
        });
        true
    }

    /// Moves pending workflow notices into auto-dismissing toasts.
    fn flush_notices(&mut self, ctx: &Context<Self>) -> bool {
        let notices = self.workflow.take_notices();
        if notices.is_empty() {
            return false;
        }

        for notice in notices {
            let id = generate_id();
            let link = ctx.link().clone();
            let timeout = Timeout::new(NOTICE_TTL_MS, move || {
                link.send_message(Msg::DismissNotice(id));
            });
            self.toasts.push(Toast {
                id,
                notice,
                _timeout: timeout,
            });
        }
        true
    }
}

fn spawn_forward(ctx: &Context<Model>, job: ForwardJob) {
    let link = ctx.link().clone();
    spawn_local(async move {
        let forwarder = WebhookForwarder::new(HttpWebhookTransport);
        let outcome = job.run(&forwarder).await;
        link.send_message(Msg::ForwardFinished(outcome));
    });
}

fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("App starting...");
    yew::Renderer::<Model>::new().render();
}
