use web_sys::HtmlInputElement;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct SearchBoxProps {
    pub value: String,
    /// Typed text not yet confirmed by the server
    pub pending: bool,
    #[prop_or(AttrValue::from("Search..."))]
    pub placeholder: AttrValue,
    pub on_input: Callback<String>,
}

#[function_component(SearchBox)]
pub fn search_box(props: &SearchBoxProps) -> Html {
    let oninput = props
        .on_input
        .reform(|e: InputEvent| e.target_unchecked_into::<HtmlInputElement>().value());

    html! {
        <div class={classes!("search-box", props.pending.then_some("pending"))}>
            <input
                type="search"
                class="search-input"
                placeholder={props.placeholder.clone()}
                value={props.value.clone()}
                {oninput}
            />
            {if props.pending {
                html! { <span class="search-pending">{"Searching..."}</span> }
            } else {
                html! {}
            }}
        </div>
    }
}
