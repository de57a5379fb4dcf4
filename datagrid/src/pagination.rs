//! # Pagination Link Resolver
//!
//! The server sends every page control it knows about. For large collections
//! that list grows without bound, so the bar only ever shows a window of
//! [`WINDOW_SIZE`] numbered controls around the active page, framed by the
//! previous/next controls.

use shared::PageLink;

/// Maximum number of numbered controls shown at once
pub const WINDOW_SIZE: usize = 5;

const WINDOW_LEAD: usize = 2;

/// Reduce a server link list to the visible window.
///
/// Never panics: a list without an active link shows the first window, and a
/// list without numbered links yields only the previous/next controls.
pub fn visible_links(links: &[PageLink]) -> Vec<PageLink> {
    let mut previous = None;
    let mut next = None;
    let mut numbered = Vec::with_capacity(links.len());

    for link in links {
        if link.is_previous() {
            previous = Some(link);
        } else if link.is_next() {
            next = Some(link);
        } else {
            numbered.push(link);
        }
    }

    let mut visible = Vec::with_capacity(WINDOW_SIZE + 2);
    visible.extend(previous.cloned());

    if !numbered.is_empty() {
        let (start, end) = window_bounds(numbered.len(), numbered.iter().position(|l| l.active));
        visible.extend(numbered[start..=end].iter().map(|link| (*link).clone()));
    }

    visible.extend(next.cloned());
    visible
}

/// Inclusive bounds of the window over `len` numbered links (`len > 0`)
fn window_bounds(len: usize, active: Option<usize>) -> (usize, usize) {
    let mut start = active.map_or(0, |index| index.saturating_sub(WINDOW_LEAD));
    let end = (len - 1).min(start + WINDOW_SIZE - 1);

    if len >= WINDOW_SIZE && end - start < WINDOW_SIZE - 1 {
        start = end.saturating_sub(WINDOW_SIZE - 1);
    }

    (start, end)
}
