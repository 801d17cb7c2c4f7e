use yew::prelude::*;

pub fn render_header() -> Html {
    html! {
        <header class="app-header">
            <h1><i class="fa-solid fa-magnifying-glass"></i> {" Lung Scan Analyzer"}</h1>
            <p class="subtitle">{"Upload a lung scan image and the model will analyze it for potential signs of cancer."}</p>
        </header>
    }
}
