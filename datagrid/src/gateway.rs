//! # Navigation Gateway
//!
//! The one path from a filter mutation to a network request. Mutators describe
//! what changed as a [`FilterPatch`]; the gateway merges it into the latest
//! requested filters, applies the page-reset rule, drops redundant changes and
//! stamps every request with a sequence number so late answers to superseded
//! requests can be recognised.

use std::collections::BTreeMap;

use shared::{encode_query, ExtraFilter, FilterModel, FilterValue, SortDirection, FIRST_PAGE, PAGE_KEY};

use crate::table::{Responder, TableRow};

/// The navigation primitive: fetch `request` and report through `responder`.
///
/// Failures are expected to reach the user through the implementor's own
/// notification channel; the table only learns that the request is over.
pub trait Navigator<T: TableRow> {
    fn navigate(&self, request: NavigationRequest, responder: Responder<T>);
}

/// The fields touched by one mutation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterPatch {
    pub search: Option<String>,
    pub sort_field: Option<String>,
    pub sort_direction: Option<SortDirection>,
    pub per_page: Option<u32>,
    pub page: Option<u32>,
    /// `FilterValue::Null` removes the key
    pub extra: BTreeMap<String, FilterValue>,
}

impl FilterPatch {
    pub fn search(text: impl Into<String>) -> Self {
        Self {
            search: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn sort(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            sort_field: Some(field.into()),
            sort_direction: Some(direction),
            ..Self::default()
        }
    }

    pub fn page(page: u32) -> Self {
        Self {
            page: Some(page),
            ..Self::default()
        }
    }

    pub fn per_page(per_page: u32) -> Self {
        Self {
            per_page: Some(per_page),
            ..Self::default()
        }
    }

    pub fn extra(filter: &impl ExtraFilter) -> Self {
        let mut patch = Self::default();
        patch.extra.insert(filter.key().to_string(), filter.value());
        patch
    }

    /// Only the page moves; every other field is kept as is
    pub fn is_page_only(&self) -> bool {
        self.page.is_some()
            && self.search.is_none()
            && self.sort_field.is_none()
            && self.sort_direction.is_none()
            && self.per_page.is_none()
            && self.extra.is_empty()
    }

    /// Merge into `base`. Any change other than a page-only one lands on the
    /// first page.
    pub fn apply_to(&self, base: &FilterModel) -> FilterModel {
        let mut merged = base.clone();

        if let Some(search) = &self.search {
            merged.search = search.clone();
        }
        if let Some(field) = &self.sort_field {
            merged.sort_field = field.clone();
        }
        if let Some(direction) = self.sort_direction {
            merged.sort_direction = direction;
        }
        if let Some(per_page) = self.per_page {
            merged.per_page = per_page;
        }
        for (key, value) in &self.extra {
            if value.is_null() {
                merged.extra.remove(key);
            } else {
                merged.set_extra(key, value.clone());
            }
        }

        merged.page = match self.page {
            Some(page) if self.is_page_only() => page,
            _ => FIRST_PAGE,
        };

        merged.sanitized()
    }
}

/// How a visit interacts with the browser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisitOptions {
    /// Keep the scroll position
    pub preserve_scroll: bool,
    /// Keep client-only state (the row selection) across the response
    pub preserve_state: bool,
    /// Push the new address onto the history stack
    pub record_history: bool,
}

impl VisitOptions {
    /// Every interactive table mutation
    pub fn table() -> Self {
        Self {
            preserve_scroll: true,
            preserve_state: true,
            record_history: true,
        }
    }

    /// First fetch of a mounted table; the address already matches
    pub fn initial_load() -> Self {
        Self {
            record_history: false,
            ..Self::table()
        }
    }

    /// Back/forward navigation
    pub fn history_restore() -> Self {
        Self {
            preserve_scroll: true,
            preserve_state: false,
            record_history: false,
        }
    }
}

/// One request produced by the gateway
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationRequest {
    pub seq: u64,
    pub url: String,
    /// Query parameters; empty when `url` is followed literally
    pub params: Vec<(String, String)>,
    pub options: VisitOptions,
    /// The filters this request asks for, as far as they are known
    pub filters: FilterModel,
}

impl NavigationRequest {
    /// The URL with its query string
    pub fn href(&self) -> String {
        if self.params.is_empty() {
            return self.url.clone();
        }
        let separator = if self.url.contains('?') { '&' } else { '?' };
        format!("{}{}{}", self.url, separator, encode_query(&self.params))
    }

    /// The query part of [`href`](Self::href), without the `?`
    pub fn query(&self) -> String {
        let href = self.href();
        href.split_once('?')
            .map(|(_, query)| query.to_string())
            .unwrap_or_default()
    }
}

/// Issues requests for one table
#[derive(Debug, Clone)]
pub struct NavigationGateway {
    base_url: String,
    last_seq: u64,
}

impl NavigationGateway {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            last_seq: 0,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sequence number of the most recent request
    pub fn latest_seq(&self) -> u64 {
        self.last_seq
    }

    pub fn is_latest(&self, seq: u64) -> bool {
        seq == self.last_seq
    }

    /// Merge `patch` into `current` and build the request for the result.
    ///
    /// `None` when the merge changes nothing.
    pub fn prepare(&mut self, current: &FilterModel, patch: &FilterPatch) -> Option<NavigationRequest> {
        let merged = patch.apply_to(current);
        if merged == *current {
            tracing::debug!(url = %self.base_url, "Filter change is redundant, no request");
            return None;
        }
        Some(self.visit(merged, VisitOptions::table()))
    }

    /// Request `filters` exactly as given
    pub fn visit(&mut self, filters: FilterModel, options: VisitOptions) -> NavigationRequest {
        let filters = filters.sanitized();
        let request = NavigationRequest {
            seq: self.next_seq(),
            url: self.base_url.clone(),
            params: filters.to_query_pairs(),
            options,
            filters,
        };
        tracing::debug!(seq = request.seq, href = %request.href(), "Dispatching table request");
        request
    }

    /// Follow a server-generated page link without re-serializing it.
    ///
    /// A link describes the state it was rendered for. When that state is
    /// no longer `current` (a change is still in flight), only its page
    /// number is kept and merged on top of `current` like any other page
    /// change, so the request never fetches something other than what it
    /// reports in [`NavigationRequest::filters`].
    pub fn follow(&mut self, url: &str, current: &FilterModel) -> Option<NavigationRequest> {
        let linked = FilterModel::from_query(url.split_once('?').map_or("", |(_, query)| query));

        if without_page(&linked) != without_page(current) {
            tracing::debug!(url, "Page link predates the requested filters, merging its page instead");
            return self.prepare(current, &FilterPatch::page(linked.page));
        }

        let request = NavigationRequest {
            seq: self.next_seq(),
            url: url.to_string(),
            params: Vec::new(),
            options: VisitOptions::table(),
            filters: FilterModel {
                page: linked.page,
                ..current.clone()
            },
        };
        tracing::debug!(seq = request.seq, href = %request.href(), "Following page link");
        Some(request)
    }

    fn next_seq(&mut self) -> u64 {
        self.last_seq += 1;
        self.last_seq
    }
}

/// Query pairs of `filters` apart from the page; extras compare by their
/// query text, so `role=3` parsed from a link matches a typed `3`
fn without_page(filters: &FilterModel) -> Vec<(String, String)> {
    filters
        .to_query_pairs()
        .into_iter()
        .filter(|(key, _)| key != PAGE_KEY)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::UserFilter;

    fn base() -> FilterModel {
        FilterModel {
            search: "ann".into(),
            sort_field: "email".into(),
            sort_direction: SortDirection::Desc,
            per_page: 25,
            page: 4,
            ..FilterModel::default()
        }
    }

    #[test]
    fn test_page_only_patch_keeps_everything_else() {
        let merged = FilterPatch::page(2).apply_to(&base());
        assert_eq!(merged, FilterModel { page: 2, ..base() });
    }

    #[test]
    fn test_other_changes_reset_page() {
        assert_eq!(FilterPatch::search("bob").apply_to(&base()).page, 1);
        assert_eq!(FilterPatch::sort("name", SortDirection::Asc).apply_to(&base()).page, 1);
        assert_eq!(FilterPatch::extra(&UserFilter::Role(Some(2))).apply_to(&base()).page, 1);

        let merged = FilterPatch::per_page(50).apply_to(&base());
        assert_eq!(merged.page, 1);
        assert_eq!(merged.per_page, 50);
        assert_eq!(merged.search, "ann");
    }

    #[test]
    fn test_page_with_other_fields_still_resets() {
        let patch = FilterPatch {
            page: Some(3),
            search: Some("x".into()),
            ..FilterPatch::default()
        };
        assert!(!patch.is_page_only());
        assert_eq!(patch.apply_to(&base()).page, 1);
    }

    #[test]
    fn test_null_extra_removes_key() {
        let with_role = FilterPatch::extra(&UserFilter::Role(Some(3))).apply_to(&base());
        assert_eq!(with_role.extra_value("role"), Some(&FilterValue::Integer(3)));

        let cleared = FilterPatch::extra(&UserFilter::Role(None)).apply_to(&with_role);
        assert!(cleared.extra.is_empty());
    }

    #[test]
    fn test_merged_model_is_sanitized() {
        assert_eq!(FilterPatch::per_page(0).apply_to(&base()).per_page, 10);
        assert_eq!(FilterPatch::sort("  ", SortDirection::Asc).apply_to(&base()).sort_field, "name");
    }

    #[test]
    fn test_prepare_builds_full_query() {
        let mut gateway = NavigationGateway::new("/api/users");
        let request = gateway
            .prepare(&FilterModel::default(), &FilterPatch::extra(&UserFilter::Role(Some(3))))
            .unwrap();

        assert_eq!(request.seq, 1);
        assert_eq!(request.options, VisitOptions::table());
        assert_eq!(
            request.href(),
            "/api/users?search=&sort_field=name&sort_direction=asc&per_page=10&page=1&role=3"
        );
        let parsed = FilterModel::from_query(&request.query());
        assert_eq!(parsed.extra_value("role").and_then(FilterValue::as_i64), Some(3));
        assert_eq!(parsed.per_page, request.filters.per_page);
    }

    #[test]
    fn test_redundant_change_is_suppressed() {
        let mut gateway = NavigationGateway::new("/api/users");
        let current = FilterModel::default();

        assert!(gateway.prepare(&current, &FilterPatch::page(1)).is_none());
        assert!(gateway.prepare(&current, &FilterPatch::search("")).is_none());
        assert!(gateway.prepare(&current, &FilterPatch::extra(&UserFilter::Role(None))).is_none());
        assert_eq!(gateway.latest_seq(), 0);
    }

    #[test]
    fn test_sequence_numbers_increase() {
        let mut gateway = NavigationGateway::new("/api/pages");
        let first = gateway.visit(FilterModel::default(), VisitOptions::initial_load());
        let second = gateway.follow("/api/pages?page=2", &FilterModel::default()).unwrap();

        assert!(second.seq > first.seq);
        assert!(gateway.is_latest(second.seq));
        assert!(!gateway.is_latest(first.seq));
    }

    #[test]
    fn test_follow_uses_link_literally() {
        let mut gateway = NavigationGateway::new("/api/users");
        let link = "/api/users?search=ann&sort_field=email&sort_direction=desc&per_page=25&page=5";
        let request = gateway.follow(link, &base()).unwrap();

        assert_eq!(request.href(), link);
        assert!(request.params.is_empty());
        assert_eq!(request.filters, FilterModel { page: 5, ..base() });
    }

    #[test]
    fn test_follow_stale_link_merges_its_page_onto_current() {
        let mut gateway = NavigationGateway::new("/api/users");
        let request = gateway.follow("/api/users?page=3", &base()).unwrap();

        assert_eq!(request.filters, FilterModel { page: 3, ..base() });
        assert_eq!(request.href(), format!("/api/users?{}", request.filters.to_query_string()));
        assert!(request.href().contains("sort_field=email"));
    }

    #[test]
    fn test_follow_matches_typed_extras_by_query_text() {
        let mut current = base();
        current.set_extra("role", FilterValue::Integer(3));
        let link = "/api/users?search=ann&sort_field=email&sort_direction=desc&per_page=25&role=3&page=2";

        let mut gateway = NavigationGateway::new("/api/users");
        let request = gateway.follow(link, &current).unwrap();

        assert!(request.params.is_empty());
        assert_eq!(request.filters.page, 2);
        assert_eq!(request.filters.extra_value("role"), Some(&FilterValue::Integer(3)));
    }

    #[test]
    fn test_follow_stale_link_to_current_page_is_redundant() {
        let mut gateway = NavigationGateway::new("/api/users");
        assert!(gateway.follow("/api/users?page=4", &base()).is_none());
    }

    #[test]
    fn test_visit_options() {
        assert!(!VisitOptions::initial_load().record_history);
        assert!(VisitOptions::initial_load().preserve_state);
        assert!(!VisitOptions::history_restore().preserve_state);
        assert!(VisitOptions::table().preserve_scroll);
    }
}
