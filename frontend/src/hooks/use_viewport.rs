use gloo::events::EventListener;
use yew::prelude::*;

/// Viewport width below which tables switch to their compact columns
pub const NARROW_BREAKPOINT_PX: f64 = 768.0;

pub fn is_narrow(width: f64, breakpoint: f64) -> bool {
    width < breakpoint
}

fn viewport_width() -> Option<f64> {
    web_sys::window()?.inner_width().ok()?.as_f64()
}

/// Tracks whether the viewport is narrower than `breakpoint` pixels.
///
/// Only re-renders when the answer flips, not on every resize event.
#[hook]
pub fn use_viewport_is_narrow(breakpoint: f64) -> bool {
    let narrow = use_state_eq(|| viewport_width().is_some_and(|width| is_narrow(width, breakpoint)));

    {
        let narrow = narrow.clone();
        use_effect_with(breakpoint, move |breakpoint| {
            let breakpoint = *breakpoint;
            let listener = web_sys::window().map(|window| {
                EventListener::new(&window, "resize", move |_| {
                    if let Some(width) = viewport_width() {
                        narrow.set(is_narrow(width, breakpoint));
                    }
                })
            });

            move || drop(listener)
        });
    }

    *narrow
}
