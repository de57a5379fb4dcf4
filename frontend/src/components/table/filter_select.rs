use web_sys::HtmlSelectElement;
use yew::prelude::*;

/// One entry of a [`FilterSelect`]
#[derive(Clone, Debug, PartialEq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

#[derive(Properties, PartialEq)]
pub struct FilterSelectProps {
    pub label: AttrValue,
    pub options: Vec<SelectOption>,
    /// Current value, empty for "all"
    pub value: String,
    pub on_change: Callback<String>,
}

/// Drop-down for a per-table filter. The leading "All" entry emits an empty
/// string, which clears the filter.
#[function_component(FilterSelect)]
pub fn filter_select(props: &FilterSelectProps) -> Html {
    let onchange = props
        .on_change
        .reform(|e: Event| e.target_unchecked_into::<HtmlSelectElement>().value());

    html! {
        <label class="filter-select">
            <span>{&props.label}</span>
            <select {onchange}>
                <option value="" selected={props.value.is_empty()}>{"All"}</option>
                {for props.options.iter().map(|option| html! {
                    <option value={option.value.clone()} selected={option.value == props.value}>
                        {&option.label}
                    </option>
                })}
            </select>
        </label>
    }
}
