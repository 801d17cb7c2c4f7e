use super::super::{Model, Msg};
use shared::{Label, PredictionResult};
use yew::prelude::*;

pub fn render_results(model: &Model, ctx: &Context<Model>) -> Html {
    let Some(result) = model.workflow.result() else {
        return html! {};
    };
    let filename = model
        .workflow
        .request()
        .map_or_else(|| "Analyzed Image".to_string(), |request| request.filename().to_string());

    render_result(result, &filename, ctx.link().callback(|_: MouseEvent| Msg::SaveToWebhook))
}

fn render_result(result: &PredictionResult, filename: &str, on_save: Callback<MouseEvent>) -> Html {
    let label = result.label();
    let tone = match label {
        Label::Cancerous => "cancerous",
        Label::NonCancerous => "non-cancerous",
        Label::Uncertain => "uncertain",
    };
    let confidence = result.confidence();

    html! {
        <div class={classes!("results-container", tone)}>
            <div class="result-header">
                <h2 title={format!("Analysis results for: {}", filename)}>
                    <i class="fa-solid fa-check"></i>{" Analysis Result"}
                    <span class="analyzed-filename-display">{format!("({})", filename)}</span>
                </h2>
            </div>

            <div class="result-item">
                <p class="result-label">{"Diagnosis"}</p>
                <div class="diagnosis">{ label.headline() }</div>
            </div>

            <div class="confidence-meter">
                <div class="meter-label">{"Confidence:"}</div>
                <div class="meter">
                    <div class="meter-fill" style={format!("width: {}%", confidence)}></div>
                </div>
                <div class="meter-value">{format!("{}%", confidence)}</div>
            </div>

            {
                match result.processing_time_ms() {
                    Some(ms) => html! {
                        <div class="result-item">
                            <p class="result-label">{"Processing Time"}</p>
                            <div>{format!("{:.2} ms", ms)}</div>
                        </div>
                    },
                    None => html! {},
                }
            }

            <p class="advice">{ label.advice() }</p>

            if result.is_simulated() {
                <p class="demo-note">
                    <i class="fa-solid fa-flask"></i>
                    {" Demo result: the prediction service was unavailable. This result is not sent to the webhook."}
                </p>
            } else {
                <button class="save-btn" onclick={on_save}>
                    <i class="fa-solid fa-database"></i>{" Save to Webhook"}
                </button>
            }
        </div>
    }
}
