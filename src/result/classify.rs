//! Classification of a single query result.

use super::QueryResultEntry;

/// Which kinds of data a result carries. Series and tables are independent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultShape {
    /// Nothing to emit. Not an error.
    Empty,
    Series,
    Tables,
    /// Both series and tables; each becomes its own frames.
    Mixed,
}

impl ResultShape {
    pub fn has_series(&self) -> bool {
        matches!(self, Self::Series | Self::Mixed)
    }

    pub fn has_tables(&self) -> bool {
        matches!(self, Self::Tables | Self::Mixed)
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// Inspects `entry` for non-empty series and tables.
///
/// An absent key and an empty list are the same thing here.
pub fn classify(entry: &QueryResultEntry) -> ResultShape {
    match (!entry.series.is_empty(), !entry.tables.is_empty()) {
        (false, false) => ResultShape::Empty,
        (true, false) => ResultShape::Series,
        (false, true) => ResultShape::Tables,
        (true, true) => ResultShape::Mixed,
    }
}
