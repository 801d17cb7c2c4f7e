use super::super::{Model, Msg};
use shared::NoticeLevel;
use yew::prelude::*;

fn icon(level: NoticeLevel) -> &'static str {
    match level {
        NoticeLevel::Info => "fa-solid fa-circle-info",
        NoticeLevel::Success => "fa-solid fa-circle-check",
        NoticeLevel::Warning => "fa-solid fa-triangle-exclamation",
        NoticeLevel::Error => "fa-solid fa-circle-exclamation",
    }
}

pub fn render_notifications(model: &Model, ctx: &Context<Model>) -> Html {
    if model.toasts.is_empty() {
        return html! {};
    }

    html! {
        <div class="toast-stack">
            { for model.toasts.iter().map(|toast| {
                let id = toast.id;
                html! {
                    <div
                        key={id.to_string()}
                        class={classes!("toast", toast.notice.level.as_ref().to_string())}
                        onclick={ctx.link().callback(move |_: MouseEvent| Msg::DismissNotice(id))}
                    >
                        <i class={icon(toast.notice.level)}></i>
                        <p>{ &toast.notice.message }</p>
                    </div>
                }
            })}
        </div>
    }
}
