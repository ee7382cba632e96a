// ============================================================
// PRODUCT ROW TYPES
// ============================================================
// Index-addressed CSV row data and the detected dialect

use serde::{Deserialize, Serialize};

/// One product row: an ordered sequence of field values, index-addressed.
///
/// Rows are padded on read so every target column index exists before
/// mutation; absent columns read as empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductRow(Vec<String>);

impl ProductRow {
    pub fn new(fields: Vec<String>) -> Self {
        Self(fields)
    }

    /// Pad with empty fields so `index` is addressable
    pub fn ensure_len(&mut self, index: usize) {
        if self.0.len() <= index {
            self.0.resize(index + 1, String::new());
        }
    }

    /// Field value at `index`, empty if the column is absent
    pub fn get(&self, index: usize) -> &str {
        self.0.get(index).map(String::as_str).unwrap_or("")
    }

    pub fn set(&mut self, index: usize, value: String) {
        self.ensure_len(index);
        self.0[index] = value;
    }

    /// Index of the column named `name`, appending it when missing
    pub fn get_or_add(&mut self, name: &str) -> usize {
        match self.0.iter().position(|field| field == name) {
            Some(index) => index,
            None => {
                self.0.push(name.to_string());
                self.0.len() - 1
            }
        }
    }

    /// True when every field is empty or whitespace
    pub fn is_blank(&self) -> bool {
        self.0.iter().all(|field| field.trim().is_empty())
    }

    pub fn fields(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// CSV dialect detected once per batch from a content sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dialect {
    pub delimiter: u8,
    pub quote: u8,
}

impl Default for Dialect {
    fn default() -> Self {
        // Most WooCommerce exports in the wild use semicolons
        Self {
            delimiter: b';',
            quote: b'"',
        }
    }
}
