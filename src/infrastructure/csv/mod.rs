// ============================================================
// CSV INFRASTRUCTURE
// ============================================================
// Dialect sniffing and row-level reading/writing for product exports

mod dialect;
mod row_io;

pub use dialect::sniff_dialect;
pub use row_io::{read_table, CsvTable, RowWriter};
