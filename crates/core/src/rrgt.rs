//! RRGT ("Rabbit Race" grid) layout constants and the Dial slot type.
//!
//! A plan is one row of the grid: column 0 is the Start cell holding the
//! task itself, columns 1..=5 are free-text subtask cells, and the rabbit
//! marker sits on exactly one column.

use serde::{Deserialize, Serialize};

/// Highest column index of a freshly provisioned plan.
pub const DEFAULT_MAX_COLUMN_INDEX: i64 = 6;

/// Column index of the Start cell.
pub const START_COLUMN: i64 = 0;

/// Subtask cell columns provisioned with every new plan.
pub const SUBTASK_COLUMNS: std::ops::RangeInclusive<i64> = 1..=5;

/// Whether `column_index` is a valid cell for a plan with `max_column_index`.
pub fn column_in_range(column_index: i64, max_column_index: i64) -> bool {
    (START_COLUMN..=max_column_index).contains(&column_index)
}

/// Which side of the Dial a cell is pinned to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub enum DialSlot {
    Left,
    Right,
}

impl DialSlot {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl std::fmt::Display for DialSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DialSlot {
    type Err = crate::journey::UnknownJourneyValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            other => Err(crate::journey::UnknownJourneyValue(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_check_covers_start_and_max() {
        assert!(column_in_range(0, DEFAULT_MAX_COLUMN_INDEX));
        assert!(column_in_range(6, DEFAULT_MAX_COLUMN_INDEX));
        assert!(!column_in_range(-1, DEFAULT_MAX_COLUMN_INDEX));
        assert!(!column_in_range(7, DEFAULT_MAX_COLUMN_INDEX));
    }

    #[test]
    fn provisioned_subtask_columns_fit_default_grid() {
        for col in SUBTASK_COLUMNS {
            assert!(column_in_range(col, DEFAULT_MAX_COLUMN_INDEX));
        }
    }
}
