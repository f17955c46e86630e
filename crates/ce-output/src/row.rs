//! Plain data row types written by output backends.

/// Occupancy of one non-empty category after a rebuild.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PopulationRow {
    pub step:        u64,
    pub year:        i64,
    pub location:    u32,
    pub age_bracket: u32,
    pub risk_class:  u32,
    pub count:       u64,
}

/// One cell of a normalised mate-location frequency table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrequencyRow {
    pub step:       u64,
    pub year:       i64,
    pub source:     u32,
    pub target:     u32,
    /// Share of `source`'s matches that found a partner at `target`.
    pub proportion: f64,
    /// Total matches recorded for `source` over the period.
    pub matches:    u64,
}
