use gloo_console::error;
use gloo_file::File as GlooFile;
use gloo_net::http::{Request, Response};
use shared::{
    AnalysisRequest, ClientError, ClientSettings, PredictTransport, RawPrediction, WebhookPayload,
    WebhookTransport,
};
use wasm_bindgen::JsValue;
use web_sys::FormData;

fn js_error(err: JsValue) -> ClientError {
    ClientError::Request(format!("{:?}", err))
}

fn status_error(response: &Response) -> ClientError {
    ClientError::Status {
        status: response.status(),
        status_text: response.status_text(),
    }
}

pub struct HttpPredictTransport {
    url: String,
}

impl HttpPredictTransport {
    pub fn new(url: &str) -> Self {
        Self { url: url.to_string() }
    }
}

impl PredictTransport<GlooFile> for HttpPredictTransport {
    async fn send(&self, request: &AnalysisRequest<GlooFile>) -> Result<RawPrediction, ClientError> {
        let form_data = FormData::new().map_err(js_error)?;
        let file: &web_sys::File = request.payload().as_ref();
        form_data
            .append_with_blob_and_filename("file", file, request.filename())
            .map_err(js_error)?;

        let response = Request::post(&self.url)
            .body(form_data)
            .map_err(|e| ClientError::Request(e.to_string()))?
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        if !response.ok() {
            return Err(status_error(&response));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ClientError::Malformed(e.to_string()))?;
        RawPrediction::from_json(&body)
    }
}

pub struct HttpWebhookTransport;

impl WebhookTransport for HttpWebhookTransport {
    async fn post_json(&self, url: &str, payload: &WebhookPayload) -> Result<(), ClientError> {
        let response = Request::post(url)
            .json(payload)
            .map_err(|e| ClientError::Request(e.to_string()))?
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        if response.ok() {
            Ok(())
        } else {
            Err(status_error(&response))
        }
    }
}

/// Falls back to same-origin defaults when the host does not answer.
pub async fn fetch_settings() -> ClientSettings {
    async fn load() -> Result<ClientSettings, gloo_net::Error> {
        Request::get("/api/config").send().await?.json::<ClientSettings>().await
    }

    match load().await {
        Ok(settings) => {
            log::info!(
                "Prediction endpoint: {} (demo fallback: {})",
                settings.predict_url,
                settings.demo_fallback
            );
            settings
        }
        Err(err) => {
            error!(format!("Failed to load client settings: {:?}", err));
            ClientSettings::default()
        }
    }
}
