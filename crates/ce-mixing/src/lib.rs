//! `ce-mixing` — where does an agent look for a partner?
//!
//! # Crate layout
//!
//! | Module         | Contents                                                       |
//! |----------------|----------------------------------------------------------------|
//! | [`matrix`]     | `MixingMatrix` — validated L×L weights, row-cumulative         |
//! | [`frequency`]  | `FrequencyMatrix` (atomic counters), `FrequencyTable`          |
//! | [`model`]      | `MixingModel` — sampling, occupancy re-weighting, bookkeeping  |
//! | [`loader`]     | `load_mixing_csv`, `load_mixing_reader`                        |
//! | [`error`]      | `MixingError`, `MixingResult<T>`                               |
//!
//! # Sampling
//!
//! Row `i` of the matrix is `P(target | source = i)` stored as a cumulative
//! distribution.  Given a uniform draw `u`, the target is the first `j` with
//! `cdf[j] >= u` and non-zero probability:
//!
//! ```text
//! weights [0.2, 0.3, 0.5]  →  cdf [0.2, 0.5, 1.0]
//! u = 0.1 → 0      u = 0.4 → 1      u = 0.9 → 2
//! ```
//!
//! The frequency matrix records which (source, target) pairs were actually
//! matched.  It is diagnostic only and never feeds back into sampling.

pub mod error;
pub mod frequency;
pub mod loader;
pub mod matrix;
pub mod model;


pub use error::{MixingError, MixingResult};
pub use frequency::{FrequencyMatrix, FrequencyTable};
pub use loader::{load_mixing_csv, load_mixing_reader};
pub use matrix::MixingMatrix;
pub use model::MixingModel;
