use web_sys::HtmlSelectElement;
use yew::prelude::*;

/// Configured page sizes plus the current one when the address bar asked
/// for a size outside the list
pub fn per_page_choices(options: &[u32], current: u32) -> Vec<u32> {
    let mut choices = options.to_vec();
    if !choices.contains(&current) {
        choices.push(current);
        choices.sort_unstable();
    }
    choices
}

#[derive(Properties, PartialEq)]
pub struct PerPageSelectProps {
    pub options: Vec<u32>,
    pub value: u32,
    pub on_change: Callback<u32>,
}

#[function_component(PerPageSelect)]
pub fn per_page_select(props: &PerPageSelectProps) -> Html {
    let onchange = {
        let on_change = props.on_change.clone();
        Callback::from(move |e: Event| {
            let select = e.target_unchecked_into::<HtmlSelectElement>();
            if let Ok(per_page) = select.value().parse::<u32>() {
                on_change.emit(per_page);
            }
        })
    };

    html! {
        <label class="per-page">
            <span>{"Per page"}</span>
            <select {onchange}>
                {for per_page_choices(&props.options, props.value).into_iter().map(|size| html! {
                    <option value={size.to_string()} selected={size == props.value}>{size}</option>
                })}
            </select>
        </label>
    }
}
