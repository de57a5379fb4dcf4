use yew::prelude::*;

pub fn selection_label(count: usize) -> String {
    match count {
        1 => "1 row selected".to_string(),
        n => format!("{} rows selected", n),
    }
}

#[derive(Properties, PartialEq)]
pub struct SelectionBarProps {
    pub count: usize,
    pub on_clear: Callback<()>,
}

#[function_component(SelectionBar)]
pub fn selection_bar(props: &SelectionBarProps) -> Html {
    if props.count == 0 {
        return html! {};
    }

    let onclick = props.on_clear.reform(|_: MouseEvent| ());

    html! {
        <div class="selection-bar">
            <span class="selection-count">{selection_label(props.count)}</span>
            <button type="button" class="btn btn-link" {onclick}>{"Clear selection"}</button>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_selection_label() {
        assert_eq!(selection_label(1), "1 row selected");
        assert_eq!(selection_label(12), "12 rows selected");
    }
}
