use super::TableColumnMetadata;

/// Append-only, ordered list of column descriptors.
///
/// Indices are dense and assigned in insertion order. Name lookup is left to
/// the owner: join metadata resolves through its key store, a single table
/// through its own name index.
#[derive(Debug, Clone, Default)]
pub struct ColumnRegistry {
    columns: Vec<TableColumnMetadata>,
}

impl ColumnRegistry {
    pub fn with_capacity(capacity: usize) -> Self {
        ColumnRegistry {
            columns: Vec::with_capacity(capacity),
        }
    }

    /// Append a column and return its index.
    pub fn push(&mut self, column: TableColumnMetadata) -> usize {
        let index = self.columns.len();
        self.columns.push(column);
        index
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&TableColumnMetadata> {
        self.columns.get(index)
    }

    pub fn as_slice(&self) -> &[TableColumnMetadata] {
        &self.columns
    }
}
