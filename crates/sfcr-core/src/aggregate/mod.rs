//! Multi-document aggregation: schema join, comparison table and statistics.

pub mod join;
pub mod stats;
pub mod table;

pub use join::{join, Joined};
pub use stats::{FieldStatistics, StatisticsTable};
pub use table::{scr_shares, ComparisonTable, ExportSheet, ExportView, ScrShare};
