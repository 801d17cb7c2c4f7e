pub mod config;
pub mod error;
pub mod model;
pub mod notice;
pub mod predict;
pub mod upload;
pub mod webhook;
pub mod workflow;

pub use config::{stored_url, ClientSettings, ConfigStore, MemoryStore, WebhookConfig, WEBHOOK_URL_KEY};
pub use error::{ClientError, StoreError, ValidationError, WorkflowError};
pub use model::{AnalysisRequest, Confidence, Label, PredictionResult, RawPrediction};
pub use notice::{Notice, NoticeLevel};
pub use predict::{Entropy, PredictTransport, PredictionClient};
pub use upload::{InputChannel, UploadSurface};
pub use webhook::{ForwardJob, ForwardOutcome, WebhookForwarder, WebhookPayload, WebhookTransport};
pub use workflow::{AnalysisTicket, Workflow, WorkflowState};
