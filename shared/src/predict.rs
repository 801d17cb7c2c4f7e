use crate::error::ClientError;
use crate::model::{AnalysisRequest, PredictionResult, RawPrediction};

#[allow(async_fn_in_trait)]
pub trait PredictTransport<P> {
    /// Uploads the image as multipart field `file` and returns the decoded body.
    async fn send(&self, request: &AnalysisRequest<P>) -> Result<RawPrediction, ClientError>;
}

/// Source of uniform samples in `[0, 1)`.
pub trait Entropy {
    fn sample(&self) -> f64;
}

impl<F: Fn() -> f64> Entropy for F {
    fn sample(&self) -> f64 {
        self()
    }
}

pub struct PredictionClient<T, E> {
    transport: T,
    entropy: E,
    demo_fallback: bool,
}

impl<T, E: Entropy> PredictionClient<T, E> {
    pub fn new(transport: T, entropy: E) -> Self {
        Self {
            transport,
            entropy,
            demo_fallback: false,
        }
    }

    /// Opt in to replacing failed predictions with simulated ones.
    pub fn with_demo_fallback(mut self, enabled: bool) -> Self {
        self.demo_fallback = enabled;
        self
    }

    pub fn demo_fallback(&self) -> bool {
        self.demo_fallback
    }

    pub async fn analyze<P>(&self, request: &AnalysisRequest<P>) -> Result<PredictionResult, ClientError>
    where
        T: PredictTransport<P>,
    {
        log::info!("Sending {} to prediction endpoint", request.filename());
        let outcome = self
            .transport
            .send(request)
            .await
            .and_then(PredictionResult::from_raw);

        match outcome {
            Ok(result) => {
                log::info!(
                    "Prediction for {}: {} ({}%)",
                    request.filename(),
                    result.label(),
                    result.confidence()
                );
                Ok(result)
            }
            Err(e) if self.demo_fallback => {
                log::warn!("Prediction failed ({}), demo fallback returns a simulated result", e);
                Ok(PredictionResult::simulated(self.entropy.sample(), self.entropy.sample()))
            }
            Err(e) => {
                log::error!("Error during prediction call: {}", e);
                Err(e)
            }
        }
    }
}
