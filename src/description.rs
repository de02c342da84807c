//! YAML descriptions of a join
//!
//! A join description lists the joined tables in join order, each with its
//! alias, columns and optional timestamp column:
//!
//! ```yaml
//! tables:
//!   - alias: t
//!     timestamp: ts
//!     columns:
//!       - { name: sym, type: SYMBOL }
//!       - { name: ts, type: TIMESTAMP }
//!   - alias: q
//!     columns:
//!       - { name: sym, type: SYMBOL }
//!       - { name: bid, type: DOUBLE }
//! ```
//!
//! The merged metadata takes its timestamp from the first table, as the
//! leading table of a join orders its rows.

use log::debug;
use serde::Deserialize;
use thiserror::Error;

use crate::{
    config::JoinMetadataConfig,
    join::{JoinMetadataError, JoinRecordMetadata},
    metadata::{GenericRecordMetadata, MetadataError, RecordMetadata, TableColumnMetadata},
};

#[derive(Debug, Error)]
pub enum DescriptionError {
    #[error("Failed to read join description: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse join description: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid table `{alias}`: {source}")]
    Table {
        alias: String,
        source: MetadataError,
    },

    #[error(transparent)]
    Join(#[from] JoinMetadataError),
}

#[derive(Debug, Clone, Deserialize)]
pub struct TableDescription {
    pub alias: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    pub columns: Vec<TableColumnMetadata>,
}

impl TableDescription {
    pub fn to_metadata(&self) -> Result<GenericRecordMetadata, DescriptionError> {
        let table_error = |source| DescriptionError::Table {
            alias: self.alias.clone(),
            source,
        };

        let mut metadata = GenericRecordMetadata::new();
        for column in &self.columns {
            metadata.add(column.clone()).map_err(table_error)?;
        }
        match &self.timestamp {
            Some(timestamp) => metadata.with_timestamp(timestamp).map_err(table_error),
            None => Ok(metadata),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct JoinDescription {
    pub tables: Vec<TableDescription>,
}

impl JoinDescription {
    pub fn from_yaml_str(content: &str) -> Result<Self, DescriptionError> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn from_yaml_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, DescriptionError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    pub fn column_count(&self) -> usize {
        self.tables.iter().map(|table| table.columns.len()).sum()
    }

    /// Merge all tables into join metadata, in description order.
    pub fn build(&self, config: &JoinMetadataConfig) -> Result<JoinRecordMetadata, DescriptionError> {
        let mut joined = JoinRecordMetadata::new(config, self.column_count());

        for (position, table) in self.tables.iter().enumerate() {
            let metadata = table.to_metadata()?;
            let offset = joined.column_count() as i32;
            joined.copy_column_metadata_from(Some(table.alias.as_str()), &metadata)?;

            if position == 0 && metadata.timestamp_index() >= 0 {
                joined.set_timestamp_index(offset + metadata.timestamp_index());
            }
            debug!(
                "Merged table `{}`: {} columns",
                table.alias,
                metadata.column_count()
            );
        }
        Ok(joined)
    }
}
