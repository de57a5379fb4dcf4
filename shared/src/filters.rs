//! # Filter Model
//!
//! The view parameters of a remote collection (search text, sort, paging and
//! an open-ended bag of extra filters), together with the single defaulting
//! contract used wherever they are read: the address bar, the server's echo
//! and history state.
//!
//! `FilterModel::normalize` never fails. Missing fields get a fixed default,
//! known fields with the wrong type are coerced to that default, and every
//! other scalar key is carried through as an extra filter.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::PublishStatus;

pub const DEFAULT_SORT_FIELD: &str = "name";
pub const DEFAULT_PER_PAGE: u32 = 10;
pub const FIRST_PAGE: u32 = 1;

pub const SEARCH_KEY: &str = "search";
pub const SORT_FIELD_KEY: &str = "sort_field";
pub const SORT_DIRECTION_KEY: &str = "sort_direction";
pub const PER_PAGE_KEY: &str = "per_page";
pub const PAGE_KEY: &str = "page";

const RESERVED_KEYS: [&str; 5] = [
    SEARCH_KEY,
    SORT_FIELD_KEY,
    SORT_DIRECTION_KEY,
    PER_PAGE_KEY,
    PAGE_KEY,
];

/// Sort order of the active sort column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Parse a direction leniently ("ASC", " desc ")
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "asc" => Some(SortDirection::Asc),
            "desc" => Some(SortDirection::Desc),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A scalar (or null) value of an extra filter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl FilterValue {
    /// Convert a JSON value, dropping arrays and objects
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Null => Some(FilterValue::Null),
            Value::Bool(b) => Some(FilterValue::Bool(*b)),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Some(FilterValue::Integer(i)),
                None => n.as_f64().map(FilterValue::Float),
            },
            Value::String(s) => Some(FilterValue::Text(s.clone())),
            Value::Array(_) | Value::Object(_) => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FilterValue::Null)
    }

    /// Null and empty text both mean "no filter"
    pub fn is_blank(&self) -> bool {
        match self {
            FilterValue::Null => true,
            FilterValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Integer view of the value; text from the address bar is parsed
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FilterValue::Integer(i) => Some(*i),
            FilterValue::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FilterValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Rendering used in query strings. Null is omitted.
    pub fn to_query_value(&self) -> Option<String> {
        match self {
            FilterValue::Null => None,
            FilterValue::Bool(b) => Some(if *b { "1".to_string() } else { "0".to_string() }),
            FilterValue::Integer(i) => Some(i.to_string()),
            FilterValue::Float(f) => Some(f.to_string()),
            FilterValue::Text(s) => Some(s.clone()),
        }
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        FilterValue::Integer(value)
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        FilterValue::Bool(value)
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::Text(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::Text(value)
    }
}

impl<T: Into<FilterValue>> From<Option<T>> for FilterValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FilterValue::Null)
    }
}

/// The client's current view of a remote collection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterModel {
    pub search: String,
    pub sort_field: String,
    pub sort_direction: SortDirection,
    pub per_page: u32,
    pub page: u32,
    #[serde(flatten)]
    pub extra: BTreeMap<String, FilterValue>,
}

impl Default for FilterModel {
    fn default() -> Self {
        Self {
            search: String::new(),
            sort_field: DEFAULT_SORT_FIELD.to_string(),
            sort_direction: SortDirection::Asc,
            per_page: DEFAULT_PER_PAGE,
            page: FIRST_PAGE,
            extra: BTreeMap::new(),
        }
    }
}

impl FilterModel {
    /// Build a model from any partial JSON shape.
    ///
    /// Non-objects (including `null`) give the defaults. Known fields of the
    /// wrong type fall back to their default; numeric strings are accepted
    /// for `per_page` and `page`. Unknown scalar keys are kept as extras.
    pub fn normalize(partial: &Value) -> Self {
        let mut model = Self::default();
        let Some(fields) = partial.as_object() else {
            return model;
        };

        for (key, value) in fields {
            match key.as_str() {
                SEARCH_KEY => {
                    model.search = value.as_str().map(str::to_owned).unwrap_or_default();
                }
                SORT_FIELD_KEY => {
                    if let Some(field) = value.as_str().map(str::trim).filter(|f| !f.is_empty()) {
                        model.sort_field = field.to_string();
                    }
                }
                SORT_DIRECTION_KEY => {
                    model.sort_direction = value
                        .as_str()
                        .and_then(SortDirection::parse)
                        .unwrap_or_default();
                }
                PER_PAGE_KEY => model.per_page = positive_int(value).unwrap_or(DEFAULT_PER_PAGE),
                PAGE_KEY => model.page = positive_int(value).unwrap_or(FIRST_PAGE),
                _ => {
                    if let Some(extra) = FilterValue::from_json(value) {
                        model.extra.insert(key.clone(), extra);
                    }
                }
            }
        }

        model
    }

    /// Parse a URL query string (with or without the leading `?`)
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let fields: Map<String, Value> = url::form_urlencoded::parse(query.as_bytes())
            .map(|(key, value)| (key.into_owned(), Value::String(value.into_owned())))
            .collect();
        Self::normalize(&Value::Object(fields))
    }

    /// Re-apply the invariants to a model built in code
    pub fn sanitized(mut self) -> Self {
        if self.per_page == 0 {
            self.per_page = DEFAULT_PER_PAGE;
        }
        if self.page == 0 {
            self.page = FIRST_PAGE;
        }
        let trimmed = self.sort_field.trim();
        if trimmed.is_empty() {
            self.sort_field = DEFAULT_SORT_FIELD.to_string();
        } else if trimmed.len() != self.sort_field.len() {
            self.sort_field = trimmed.to_string();
        }
        self.extra.retain(|key, _| !RESERVED_KEYS.contains(&key.as_str()));
        self
    }

    /// Set an extra filter. Keys of the core fields are ignored.
    pub fn set_extra(&mut self, key: &str, value: FilterValue) {
        if RESERVED_KEYS.contains(&key) {
            return;
        }
        self.extra.insert(key.to_string(), value);
    }

    pub fn extra_value(&self, key: &str) -> Option<&FilterValue> {
        self.extra.get(key)
    }

    /// The full filter set as query parameters, core fields first
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            (SEARCH_KEY.to_string(), self.search.clone()),
            (SORT_FIELD_KEY.to_string(), self.sort_field.clone()),
            (SORT_DIRECTION_KEY.to_string(), self.sort_direction.to_string()),
            (PER_PAGE_KEY.to_string(), self.per_page.to_string()),
            (PAGE_KEY.to_string(), self.page.to_string()),
        ];
        pairs.extend(
            self.extra
                .iter()
                .filter_map(|(key, value)| value.to_query_value().map(|v| (key.clone(), v))),
        );
        pairs
    }

    pub fn to_query_string(&self) -> String {
        encode_query(&self.to_query_pairs())
    }
}

impl<'de> Deserialize<'de> for FilterModel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Value::deserialize(deserializer)?;
        Ok(FilterModel::normalize(&raw))
    }
}

/// Form-encode query pairs
pub fn encode_query(pairs: &[(String, String)]) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish()
}

fn positive_int(value: &Value) -> Option<u32> {
    let parsed = match value {
        Value::Number(n) => match n.as_u64() {
            Some(v) => Some(v),
            None => n
                .as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= 1.0 && *f <= u32::MAX as f64)
                .map(|f| f as u64),
        },
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    }?;

    u32::try_from(parsed).ok().filter(|v| *v > 0)
}

/// A typed extra filter owned by one table.
///
/// Each consumer declares the keys it understands as an enum, so a typo in a
/// key is a compile error while the wire format stays an open map.
pub trait ExtraFilter: Sized {
    fn key(&self) -> &'static str;

    fn value(&self) -> FilterValue;

    /// Decode one entry of the extra map; `None` when the entry is not ours
    /// or cannot be read.
    fn from_entry(key: &str, value: &FilterValue) -> Option<Self>;

    fn collect(filters: &FilterModel) -> Vec<Self> {
        filters
            .extra
            .iter()
            .filter_map(|(key, value)| Self::from_entry(key, value))
            .collect()
    }
}

const STATUS_KEY: &str = "status";
const CATEGORY_KEY: &str = "category";
const ROLE_KEY: &str = "role";

fn optional_id(value: &FilterValue) -> Option<Option<i64>> {
    if value.is_blank() {
        return Some(None);
    }
    value.as_i64().map(Some)
}

fn optional_status(value: &FilterValue) -> Option<Option<PublishStatus>> {
    if value.is_blank() {
        return Some(None);
    }
    value.as_str().and_then(|s| s.parse().ok()).map(Some)
}

fn status_value(status: &Option<PublishStatus>) -> FilterValue {
    (*status).map(|s| s.as_str()).into()
}

/// Extra filters of the pages table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageFilter {
    Status(Option<PublishStatus>),
}

impl ExtraFilter for PageFilter {
    fn key(&self) -> &'static str {
        match self {
            PageFilter::Status(_) => STATUS_KEY,
        }
    }

    fn value(&self) -> FilterValue {
        match self {
            PageFilter::Status(status) => status_value(status),
        }
    }

    fn from_entry(key: &str, value: &FilterValue) -> Option<Self> {
        match key {
            STATUS_KEY => optional_status(value).map(PageFilter::Status),
            _ => None,
        }
    }
}

/// Extra filters of the posts table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostFilter {
    Status(Option<PublishStatus>),
    Category(Option<i64>),
}

impl ExtraFilter for PostFilter {
    fn key(&self) -> &'static str {
        match self {
            PostFilter::Status(_) => STATUS_KEY,
            PostFilter::Category(_) => CATEGORY_KEY,
        }
    }

    fn value(&self) -> FilterValue {
        match self {
            PostFilter::Status(status) => status_value(status),
            PostFilter::Category(id) => (*id).into(),
        }
    }

    fn from_entry(key: &str, value: &FilterValue) -> Option<Self> {
        match key {
            STATUS_KEY => optional_status(value).map(PostFilter::Status),
            CATEGORY_KEY => optional_id(value).map(PostFilter::Category),
            _ => None,
        }
    }
}

/// Extra filters of the users table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserFilter {
    Role(Option<i64>),
}

impl ExtraFilter for UserFilter {
    fn key(&self) -> &'static str {
        match self {
            UserFilter::Role(_) => ROLE_KEY,
        }
    }

    fn value(&self) -> FilterValue {
        match self {
            UserFilter::Role(id) => (*id).into(),
        }
    }

    fn from_entry(key: &str, value: &FilterValue) -> Option<Self> {
        match key {
            ROLE_KEY => optional_id(value).map(UserFilter::Role),
            _ => None,
        }
    }
}
