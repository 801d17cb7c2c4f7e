use super::super::{Model, Msg};
use yew::prelude::*;

pub fn render_preview(model: &Model, ctx: &Context<Model>) -> Html {
    let filename = model
        .workflow
        .request()
        .map(|request| request.filename().to_string())
        .unwrap_or_default();

    match &model.preview_url {
        Some(_) if model.preview_failed => html! {
            <div class="preview-placeholder">
                <i class="fa-solid fa-image"></i>
                <p>{ format!("Preview unavailable for {}", filename) }</p>
            </div>
        },
        Some(url) => html! {
            <div class="preview-frame">
                <img
                    id="image-preview"
                    src={url.to_string()}
                    alt={filename}
                    onerror={ctx.link().callback(|_: Event| Msg::PreviewFailed)}
                />
                <p class="preview-hint">{"Click to change image"}</p>
            </div>
        },
        None => html! {},
    }
}

pub fn render_analyze_button(model: &Model, ctx: &Context<Model>) -> Html {
    let analyzing = model.workflow.is_analyzing();
    let disabled = !model.workflow.can_analyze();

    html! {
        <div class="analyze-row">
            <button
                class="analyze-btn"
                disabled={disabled}
                onclick={ctx.link().callback(|_: MouseEvent| Msg::Analyze)}
            >
                {
                    if analyzing {
                        html! { <><i class="fa-solid fa-spinner fa-spin"></i>{" Analyzing..."}</> }
                    } else {
                        html! { <><i class="fa-solid fa-magnifying-glass"></i>{" Examine"}</> }
                    }
                }
            </button>
        </div>
    }
}
