use thiserror::Error;

#[derive(Debug, Error)]
pub enum MixingError {
    #[error("mixing matrix is empty")]
    Empty,

    #[error("mixing matrix row {row} has {len} entries, expected {expected}")]
    NotSquare {
        row:      usize,
        len:      usize,
        expected: usize,
    },

    #[error("mixing matrix row {row}, column {col}: weight {value} is negative or not finite")]
    InvalidWeight {
        row:   usize,
        col:   usize,
        value: f64,
    },

    #[error("mixing matrix row {row} sums to zero: location {row} has no configured targets")]
    ZeroRow { row: usize },

    #[error("mixing matrix row {row} sums past the largest finite weight")]
    RowOverflow { row: usize },

    #[error("location {location} out of range (matrix size {size})")]
    LocationOutOfRange {
        location: usize,
        size:     usize,
    },

    #[error("replacement mixing matrix has size {got}, expected {expected}")]
    SizeChanged {
        expected: usize,
        got:      usize,
    },

    #[error("uniform draw {0} outside [0, 1]")]
    InvalidDraw(f64),

    #[error("occupancy vector has {got} entries, expected {expected}")]
    OccupancyMismatch {
        expected: usize,
        got:      usize,
    },

    #[error("mixing CSV parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type MixingResult<T> = Result<T, MixingError>;
