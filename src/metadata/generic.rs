use std::collections::HashMap;

use super::{ColumnRegistry, ColumnType, MetadataError, RecordMetadata, TableColumnMetadata, NO_COLUMN};

/// Metadata of a single table: uniquely named columns in declaration order.
#[derive(Debug, Clone)]
pub struct GenericRecordMetadata {
    registry: ColumnRegistry,
    name_index: HashMap<String, usize>,
    timestamp_index: i32,
}

impl Default for GenericRecordMetadata {
    fn default() -> Self {
        GenericRecordMetadata {
            registry: ColumnRegistry::default(),
            name_index: HashMap::new(),
            timestamp_index: NO_COLUMN,
        }
    }
}

impl GenericRecordMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_columns<I, S>(columns: I) -> Result<Self, MetadataError>
    where
        I: IntoIterator<Item = (S, ColumnType)>,
        S: Into<String>,
    {
        let mut metadata = Self::new();
        for (name, column_type) in columns {
            metadata.add(TableColumnMetadata::new(name, column_type))?;
        }
        Ok(metadata)
    }

    pub fn add(&mut self, column: TableColumnMetadata) -> Result<usize, MetadataError> {
        if self.name_index.contains_key(column.name()) {
            return Err(MetadataError::DuplicateColumn {
                name: column.name().to_string(),
            });
        }
        let name = column.name().to_string();
        let index = self.registry.push(column);
        self.name_index.insert(name, index);
        Ok(index)
    }

    /// Designate `name` as the timestamp column.
    pub fn with_timestamp(mut self, name: &str) -> Result<Self, MetadataError> {
        let index = self
            .name_index
            .get(name)
            .copied()
            .ok_or_else(|| MetadataError::InvalidColumn {
                name: name.to_string(),
            })?;
        self.timestamp_index = index as i32;
        Ok(self)
    }
}

impl RecordMetadata for GenericRecordMetadata {
    fn columns(&self) -> &[TableColumnMetadata] {
        self.registry.as_slice()
    }

    fn timestamp_index(&self) -> i32 {
        self.timestamp_index
    }

    fn column_index_quiet(&self, name: &str) -> i32 {
        self.name_index
            .get(name)
            .map_or(NO_COLUMN, |&index| index as i32)
    }
}
