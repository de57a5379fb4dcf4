//! # Responsive Column Selector
//!
//! Tables declare a full column set and, optionally, a compact one for narrow
//! viewports. The viewport observer lives in the UI layer; this module only
//! picks a set.

/// One column of a table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    /// Field name, also used as the sort field when sortable
    pub key: String,
    pub label: String,
    pub sortable: bool,
}

impl ColumnDef {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            sortable: false,
        }
    }

    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }
}

/// The column sets a table can switch between
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColumnSets {
    pub full: Vec<ColumnDef>,
    pub compact: Option<Vec<ColumnDef>>,
}

impl ColumnSets {
    pub fn new(full: Vec<ColumnDef>) -> Self {
        Self {
            full,
            compact: None,
        }
    }

    pub fn with_compact(mut self, compact: Vec<ColumnDef>) -> Self {
        self.compact = Some(compact);
        self
    }

    pub fn resolve(&self, viewport_is_narrow: bool) -> &[ColumnDef] {
        resolve_columns(&self.full, self.compact.as_deref(), viewport_is_narrow)
    }
}

/// The compact set, but only when there is one and the viewport is narrow
pub fn resolve_columns<'a, C>(
    full: &'a [C],
    compact: Option<&'a [C]>,
    viewport_is_narrow: bool,
) -> &'a [C] {
    match compact {
        Some(compact) if viewport_is_narrow => compact,
        _ => full,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sets() -> ColumnSets {
        ColumnSets::new(vec![
            ColumnDef::new("name", "Name").sortable(),
            ColumnDef::new("email", "Email").sortable(),
            ColumnDef::new("role", "Role"),
        ])
        .with_compact(vec![ColumnDef::new("name", "Name").sortable()])
    }

    #[test]
    fn test_compact_only_when_narrow() {
        let sets = sets();
        assert_eq!(sets.resolve(false).len(), 3);
        assert_eq!(sets.resolve(true).len(), 1);
        assert_eq!(sets.resolve(true)[0].key, "name");
    }

    #[test]
    fn test_full_when_no_compact_set() {
        let sets = ColumnSets::new(vec![ColumnDef::new("title", "Title")]);
        assert_eq!(sets.resolve(true), sets.full.as_slice());
        assert_eq!(sets.resolve(false), sets.full.as_slice());
    }

    #[test]
    fn test_resolve_columns_generic() {
        let full = ["a", "b", "c"];
        let compact = ["a"];
        assert_eq!(resolve_columns(&full, Some(&compact[..]), true), &["a"]);
        assert_eq!(resolve_columns(&full, Some(&compact[..]), false), &full);
        assert_eq!(resolve_columns(&full, None, true), &full);
    }

    #[test]
    fn test_column_builder() {
        let column = ColumnDef::new("title", "Title");
        assert!(!column.sortable);
        assert!(column.sortable().sortable);
    }
}
