use super::super::{Model, Msg};
use super::preview_area::render_preview;
use super::utils::{FILE_INPUT_ID, debounce, first_file, open_file_picker};
use shared::InputChannel;
use web_sys::{DragEvent, HtmlInputElement};
use yew::prelude::*;

pub fn render_upload_section(model: &Model, ctx: &Context<Model>) -> Html {
    let link = ctx.link();
    let disabled = model.workflow.is_analyzing();

    let handle_change = link.batch_callback(|e: Event| {
        let input: HtmlInputElement = e.target_unchecked_into();
        let file = input.files().as_ref().and_then(first_file);
        input.set_value("");
        file.map(|file| Msg::FileOffered(file, InputChannel::Picker))
    });

    let handle_drag_over = link.callback(|e: DragEvent| {
        e.prevent_default();
        Msg::SetDragging(true)
    });

    let handle_drag_leave = link.callback(|e: DragEvent| {
        e.prevent_default();
        Msg::SetDragging(false)
    });

    let handle_drop = link.callback(Msg::HandleDrop);
    let handle_click = debounce(300, open_file_picker);
    let drag_active = model.surface.drag_active();

    html! {
        <div class="upload-section">
            <input
                type="file"
                id={FILE_INPUT_ID}
                accept="image/*"
                style="display: none;"
                disabled={disabled}
                onchange={handle_change}
            />

            <div
                id="drop-zone"
                class={classes!("upload-area", drag_active.then_some("drag-over"), disabled.then_some("disabled"))}
                ondragenter={handle_drag_over.clone()}
                ondragover={handle_drag_over}
                ondragleave={handle_drag_leave}
                ondrop={handle_drop}
                onclick={handle_click}
            >
                {
                    if model.preview_url.is_some() {
                        render_preview(model, ctx)
                    } else {
                        render_placeholder(drag_active)
                    }
                }
            </div>
        </div>
    }
}

fn render_placeholder(drag_active: bool) -> Html {
    html! {
        <div class="upload-placeholder">
            {
                if drag_active {
                    html! {
                        <>
                            <i class="fa-solid fa-file-image"></i>
                            <p>{"Drop the image here"}</p>
                        </>
                    }
                } else {
                    html! {
                        <>
                            <i class="fa-solid fa-cloud-arrow-up"></i>
                            <p>{"Upload lung scan image"}</p>
                        </>
                    }
                }
            }
            <p>{"Drag and drop your image, or click to browse"}</p>
            <p class="file-types">{"Supports: JPG, PNG, JPEG"}</p>
        </div>
    }
}
