//! Typed representation of the broker query API response.

use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

/// Response is the data structure for a broker query response.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Response {
    pub result_table: Option<ResultTable>,

    pub trace_info: HashMap<String, String>,

    pub exceptions: Vec<PinotException>,

    pub num_segments_processed: i32,

    pub num_servers_responded: i32,

    pub num_segments_queried: i32,

    pub num_servers_queried: i32,

    pub num_segments_matched: i32,

    pub num_consuming_segments_queried: i32,

    pub num_docs_scanned: i64,

    pub num_entries_scanned_in_filter: i64,

    pub num_entries_scanned_post_filter: i64,

    pub total_docs: i64,

    pub time_used_ms: i32,

    pub min_consuming_freshness_time_ms: i64,

    pub num_groups_limit_reached: bool,
}

/// A broker-reported query exception.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PinotException {
    pub message: String,

    pub error_code: i32,
}

/// Column names and data types of a result table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DataSchema {
    pub column_names: Vec<String>,

    pub column_data_types: Vec<String>,
}

/// Tabular query result: a schema plus rows of heterogeneous values.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResultTable {
    pub data_schema: DataSchema,

    pub rows: Vec<Vec<Value>>,
}

impl ResultTable {
    /// Number of rows in the result table
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns in the result table
    pub fn column_count(&self) -> usize {
        self.data_schema.column_names.len()
    }

    /// Column name for a column index
    pub fn column_name(&self, column_index: usize) -> Option<&str> {
        self.data_schema
            .column_names
            .get(column_index)
            .map(String::as_str)
    }

    /// Column data type for a column index
    pub fn column_data_type(&self, column_index: usize) -> Option<&str> {
        self.data_schema
            .column_data_types
            .get(column_index)
            .map(String::as_str)
    }

    /// Raw entry at a row and column index
    pub fn get(&self, row_index: usize, column_index: usize) -> Option<&Value> {
        self.rows.get(row_index)?.get(column_index)
    }

    /// String entry at a row and column index
    pub fn get_string(&self, row_index: usize, column_index: usize) -> Option<&str> {
        self.get(row_index, column_index)?.as_str()
    }

    /// Int entry at a row and column index
    pub fn get_int(&self, row_index: usize, column_index: usize) -> Option<i32> {
        let v = self.get(row_index, column_index)?.as_i64()?;
        i32::try_from(v).ok()
    }

    /// Long entry at a row and column index
    pub fn get_long(&self, row_index: usize, column_index: usize) -> Option<i64> {
        self.get(row_index, column_index)?.as_i64()
    }

    /// Float entry at a row and column index
    pub fn get_float(&self, row_index: usize, column_index: usize) -> Option<f32> {
        self.get_double(row_index, column_index).map(|v| v as f32)
    }

    /// Double entry at a row and column index
    pub fn get_double(&self, row_index: usize, column_index: usize) -> Option<f64> {
        self.get(row_index, column_index)?.as_f64()
    }
}
