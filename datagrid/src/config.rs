use crate::columns::ColumnSets;
use crate::debounce::DebounceConfig;

/// Page sizes offered by the page-size selector
pub const DEFAULT_PER_PAGE_OPTIONS: [u32; 4] = [10, 25, 50, 100];

/// Static configuration of one table
#[derive(Debug, Clone, PartialEq)]
pub struct TableConfig {
    /// Resource URL the filters are sent to (e.g. `http://host/api/users`)
    pub base_url: String,
    pub columns: ColumnSets,
    pub debounce: DebounceConfig,
    pub per_page_options: Vec<u32>,
}

impl TableConfig {
    pub fn new(base_url: impl Into<String>, columns: ColumnSets) -> Self {
        Self {
            base_url: base_url.into(),
            columns,
            debounce: DebounceConfig::default(),
            per_page_options: DEFAULT_PER_PAGE_OPTIONS.to_vec(),
        }
    }

    pub fn with_debounce(mut self, debounce: DebounceConfig) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn with_per_page_options(mut self, options: Vec<u32>) -> Self {
        self.per_page_options = options;
        self
    }
}
