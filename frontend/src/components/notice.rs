use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct NoticeBannerProps {
    pub message: Option<String>,
    pub on_dismiss: Callback<()>,
}

/// Dismissible error banner
#[function_component(NoticeBanner)]
pub fn notice_banner(props: &NoticeBannerProps) -> Html {
    let Some(message) = &props.message else {
        return html! {};
    };
    let onclick = props.on_dismiss.reform(|_: MouseEvent| ());

    html! {
        <div class="notice error" role="alert">
            <span>{message}</span>
            <button type="button" class="notice-dismiss" aria-label="Dismiss" {onclick}>{"×"}</button>
        </div>
    }
}
