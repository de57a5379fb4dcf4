//! Deterministic doubles for the injected platform seams

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};
use std::time::Duration;

use shared::{FilterModel, PageLink, PaginationEnvelope, TablePayload};

use crate::debounce::{Scheduler, TimerHandle};
use crate::gateway::{NavigationRequest, Navigator};
use crate::table::{Responder, TableRow};

type Task = Box<dyn FnOnce()>;

#[derive(Default)]
struct Clock {
    now: Duration,
    next_id: u64,
    timers: BTreeMap<u64, (Duration, Task)>,
}

/// Virtual clock. Timers only fire inside [`ManualScheduler::advance`].
#[derive(Clone, Default)]
pub struct ManualScheduler {
    clock: Rc<RefCell<Clock>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance_ms(&self, ms: u64) {
        self.advance(Duration::from_millis(ms));
    }

    /// Move time forward, running due tasks in deadline order. Tasks
    /// scheduled by a running task fire in the same call if they fall due.
    pub fn advance(&self, by: Duration) {
        let target = self.clock.borrow().now + by;

        loop {
            let due = {
                let mut clock = self.clock.borrow_mut();
                let next = clock
                    .timers
                    .iter()
                    .filter(|(_, (deadline, _))| *deadline <= target)
                    .min_by_key(|(id, (deadline, _))| (*deadline, **id))
                    .map(|(id, (deadline, _))| (*id, *deadline));

                match next {
                    Some((id, deadline)) => {
                        clock.now = deadline;
                        clock.timers.remove(&id).map(|(_, task)| task)
                    }
                    None => {
                        clock.now = target;
                        None
                    }
                }
            };

            match due {
                Some(task) => task(),
                None => break,
            }
        }
    }

    pub fn pending_timers(&self) -> usize {
        self.clock.borrow().timers.len()
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> TimerHandle {
        let mut clock = self.clock.borrow_mut();
        let id = clock.next_id;
        clock.next_id += 1;
        let deadline = clock.now + delay;
        clock.timers.insert(id, (deadline, task));

        let weak: Weak<RefCell<Clock>> = Rc::downgrade(&self.clock);
        TimerHandle::new(move || {
            if let Some(clock) = weak.upgrade() {
                // Bind before dropping so the task is not freed under the borrow
                let removed = clock.borrow_mut().timers.remove(&id);
                drop(removed);
            }
        })
    }
}

/// Captures every dispatched request together with its responder so a test
/// can complete them in any order.
pub struct RecordingNavigator<T: TableRow> {
    calls: Rc<RefCell<Vec<(NavigationRequest, Responder<T>)>>>,
}

impl<T: TableRow> Clone for RecordingNavigator<T> {
    fn clone(&self) -> Self {
        Self {
            calls: self.calls.clone(),
        }
    }
}

impl<T: TableRow> Default for RecordingNavigator<T> {
    fn default() -> Self {
        Self {
            calls: Rc::new(RefCell::new(Vec::new())),
        }
    }
}

impl<T: TableRow> RecordingNavigator<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.calls.borrow().len()
    }

    pub fn requests(&self) -> Vec<NavigationRequest> {
        self.calls.borrow().iter().map(|(request, _)| request.clone()).collect()
    }

    pub fn last_request(&self) -> Option<NavigationRequest> {
        self.calls.borrow().last().map(|(request, _)| request.clone())
    }

    pub fn take_last(&self) -> Option<(NavigationRequest, Responder<T>)> {
        self.calls.borrow_mut().pop()
    }

    pub fn take_all(&self) -> Vec<(NavigationRequest, Responder<T>)> {
        self.calls.borrow_mut().drain(..).collect()
    }
}

impl<T: TableRow> Navigator<T> for RecordingNavigator<T> {
    fn navigate(&self, request: NavigationRequest, responder: Responder<T>) {
        self.calls.borrow_mut().push((request, responder));
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TestRow {
    pub id: i64,
    pub name: String,
}

impl TestRow {
    pub fn new(id: i64, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
        }
    }
}

impl TableRow for TestRow {
    type Id = i64;

    fn row_id(&self) -> i64 {
        self.id
    }
}

/// A server answer for `filters` with `total` rows, echoing the filters back
pub fn payload_for(filters: &FilterModel, total: u64) -> TablePayload<TestRow> {
    let per_page = filters.per_page;
    let last_page = shared::last_page(total, per_page);
    let page = filters.page.min(last_page);
    let offset = u64::from(page - 1) * u64::from(per_page);
    let to = (offset + u64::from(per_page)).min(total);

    let rows = ((offset + 1)..=to)
        .map(|id| TestRow::new(id as i64, &format!("row {}", id)))
        .collect();

    // Links carry the full filter set, like the real server's
    let href = |n: u32| {
        let linked = FilterModel {
            page: n,
            ..filters.clone()
        };
        format!("/api/test?{}", linked.to_query_string())
    };
    let mut links = vec![PageLink::previous((page > 1).then(|| href(page - 1)))];
    links.extend((1..=last_page).map(|n| PageLink::page(n, Some(href(n)), n == page)));
    links.push(PageLink::next((page < last_page).then(|| href(page + 1))));

    let mut echoed = filters.clone();
    echoed.page = page;

    TablePayload {
        rows,
        pagination: PaginationEnvelope {
            links,
            per_page,
            total,
            from: if to > offset { offset + 1 } else { 0 },
            to,
            current_page: page,
        },
        filters: echoed,
    }
}
