use shared::{FilterOption, PublishStatus};
use yew::prelude::*;

use crate::components::table::SelectOption;

pub fn status_badge(status: PublishStatus) -> Html {
    html! { <span class={classes!("status-badge", status.as_str())}>{status.label()}</span> }
}

pub fn optional_text(value: Option<&str>) -> Html {
    match value {
        Some(text) if !text.is_empty() => html! { {text} },
        _ => html! { <span class="muted">{"-"}</span> },
    }
}

pub fn status_options() -> Vec<SelectOption> {
    PublishStatus::ALL
        .iter()
        .map(|status| SelectOption::new(status.as_str(), status.label()))
        .collect()
}

pub fn id_options(options: &[FilterOption]) -> Vec<SelectOption> {
    options
        .iter()
        .map(|option| SelectOption::new(option.id.to_string(), option.name.clone()))
        .collect()
}

/// Select value for an optional status filter
pub fn status_value(status: Option<PublishStatus>) -> String {
    status.map(|s| s.as_str().to_string()).unwrap_or_default()
}

pub fn id_value(id: Option<i64>) -> String {
    id.map(|id| id.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_select_values() {
        assert_eq!(status_value(Some(PublishStatus::Archived)), "archived");
        assert_eq!(status_value(None), "");
        assert_eq!(id_value(Some(4)), "4");
        assert_eq!(id_value(None), "");
    }

    #[wasm_bindgen_test]
    fn test_option_lists() {
        let statuses = status_options();
        assert_eq!(statuses.len(), 3);
        assert_eq!(statuses[0], SelectOption::new("draft", "Draft"));

        let roles = id_options(&[FilterOption { id: 2, name: "Editor".to_string() }]);
        assert_eq!(roles, vec![SelectOption::new("2", "Editor")]);
    }
}
