///
/// Column Catalog
///
/// Column identity is fixed when a statement is prepared: the names and their
/// order never change across steps, only the values do. The catalog captures
/// them once and answers index/name lookups for the statement's lifetime.
///
/// Names need not be unique, and the engine may not supply one at all; such
/// columns are kept as "" so indices stay aligned with the engine's.
///

use std::collections::HashMap;

use crate::engine::StatementHandle;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnCatalog {
    names: Vec<String>,
    lookup: HashMap<String, usize>,
}

impl ColumnCatalog {
    pub fn from_handle<H: StatementHandle + ?Sized>(handle: &H) -> Self {
        Self::from_names(
            (0..handle.column_count()).map(|i| handle.column_name(i).unwrap_or_default()),
        )
    }

    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        let mut lookup = HashMap::with_capacity(names.len());
        for (index, name) in names.iter().enumerate() {
            // first occurrence wins for duplicated names
            lookup.entry(name.clone()).or_insert(index);
        }
        Self { names, lookup }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.lookup.get(name).copied()
    }

    pub fn name_of(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lookup.contains_key(name)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.names.iter().enumerate().map(|(i, n)| (i, n.as_str()))
    }
}
