use super::super::{Model, Msg};
use web_sys::HtmlInputElement;
use yew::prelude::*;

pub fn render_config_panel(model: &Model, ctx: &Context<Model>) -> Html {
    let link = ctx.link();
    let toggle_label = if model.show_config {
        "Hide Webhook Config"
    } else {
        "Webhook Config"
    };

    html! {
        <>
            <div class="config-toggle-row">
                <button class="link-btn" onclick={link.callback(|_: MouseEvent| Msg::ToggleConfig)}>
                    <i class="fa-solid fa-database"></i>{ format!(" {}", toggle_label) }
                </button>
            </div>
            {
                if model.show_config {
                    render_form(model, ctx)
                } else {
                    html! {}
                }
            }
        </>
    }
}

fn render_form(model: &Model, ctx: &Context<Model>) -> Html {
    let link = ctx.link();
    let handle_input = link.callback(|e: InputEvent| {
        let input: HtmlInputElement = e.target_unchecked_into();
        Msg::WebhookInput(input.value())
    });

    html! {
        <div class="config-panel">
            <h3>{"External Webhook Configuration"}</h3>
            <p class="subtitle">
                {"Enter a webhook URL to send analysis results to an external service (like Make, Zapier, etc.). Leave empty to disable."}
            </p>
            <div class="config-row">
                <input
                    type="text"
                    value={model.webhook_draft.clone()}
                    placeholder="https://hooks.zapier.com/hooks/catch/..."
                    oninput={handle_input}
                />
                <button class="analyze-btn" onclick={link.callback(|_: MouseEvent| Msg::SaveWebhookUrl)}>
                    {"Save"}
                </button>
            </div>
        </div>
    }
}
