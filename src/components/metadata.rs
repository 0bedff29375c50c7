use std::fmt;

use gdal::{Metadata as GdalMetadata, MetadataEntry as GdalMetadataEntry};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::errors::Result;

/// One key/value pair. Keys are not required to be unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataEntry {
    pub key: String,
    pub value: String,
}

/// Ordered key/value store carried between the read and write paths.
///
/// Insertion order is preserved for round-trip fidelity and duplicate keys
/// are retained; lookups return the first match. Dropping the dictionary
/// releases it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataDictionary(Vec<MetadataEntry>);

impl MetadataDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry at the tail. Duplicate keys are legal and kept.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.push(MetadataEntry {
            key: key.into(),
            value: value.into(),
        });
    }

    /// Value of the first entry with `key`, if any.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|entry| entry.key == key)
            .map(|entry| entry.value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &MetadataEntry> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for MetadataDictionary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "metadata:")?;
        write!(
            f,
            "{}",
            self.0
                .iter()
                .map(|entry| format!("\t{} = {}", entry.key, entry.value))
                .join("\n")
        )
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MetadataDictionary {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut dictionary = Self::new();
        for (key, value) in iter {
            dictionary.insert(key, value);
        }
        dictionary
    }
}

impl<'a> IntoIterator for &'a MetadataDictionary {
    type Item = &'a MetadataEntry;
    type IntoIter = std::slice::Iter<'a, MetadataEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Local processing timestamp for provenance entries.
pub fn timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Read default-domain metadata from an engine object, preserving the
/// encoded pair order.
pub fn read_dataset_metadata(dataset: &impl GdalMetadata) -> MetadataDictionary {
    GdalMetadata::metadata(dataset)
        .filter_map(|GdalMetadataEntry { domain, key, value }| {
            domain.eq("").then_some((key, value))
        })
        .collect()
}

/// Write every dictionary entry to an engine object, in order.
pub fn write_dataset_metadata(
    dataset: &mut impl GdalMetadata,
    metadata: &MetadataDictionary,
) -> Result<()> {
    for entry in metadata {
        dataset.set_metadata_item(&entry.key, &entry.value, "")?;
    }
    Ok(())
}
