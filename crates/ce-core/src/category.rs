//! Category keys and the compound-index mapping.
//!
//! A person is filed under a (location, age bracket, risk class) triple.  The
//! [`CompoundIndexer`] flattens that triple into one dense bucket id:
//!
//! ```text
//! id = age_bracket + A·location + (A·L)·risk_class
//! ```
//!
//! where `L`, `A` and `S` are the configured number of locations, age
//! brackets and risk classes.  The map is a bijection onto `[0, A·L·S)`, so
//! bucket storage is one flat `Vec` with no gaps.

use std::fmt;

use crate::{CoreError, CoreResult};

// ── Dimension ─────────────────────────────────────────────────────────────────

/// One axis of the category key space.  Used in error messages.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Dimension {
    Location,
    AgeBracket,
    RiskClass,
}

impl Dimension {
    pub fn as_str(self) -> &'static str {
        match self {
            Dimension::Location   => "location",
            Dimension::AgeBracket => "age bracket",
            Dimension::RiskClass  => "risk class",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Dimensions ────────────────────────────────────────────────────────────────

/// Validated sizes of the three category axes.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Dimensions {
    locations:    usize,
    age_brackets: usize,
    risk_classes: usize,
}

impl Dimensions {
    /// Validate and build.  Every size must be non-zero and the bucket count
    /// `L·A·S` must fit in a `usize`.
    pub fn new(locations: usize, age_brackets: usize, risk_classes: usize) -> CoreResult<Self> {
        for (dim, size) in [
            (Dimension::Location, locations),
            (Dimension::AgeBracket, age_brackets),
            (Dimension::RiskClass, risk_classes),
        ] {
            if size == 0 {
                return Err(CoreError::Config(format!("number of {dim} categories must be > 0")));
            }
        }
        locations
            .checked_mul(age_brackets)
            .and_then(|n| n.checked_mul(risk_classes))
            .ok_or_else(|| {
                CoreError::Config(format!(
                    "{locations} × {age_brackets} × {risk_classes} buckets overflows usize"
                ))
            })?;
        Ok(Self { locations, age_brackets, risk_classes })
    }

    #[inline]
    pub fn locations(&self) -> usize {
        self.locations
    }

    #[inline]
    pub fn age_brackets(&self) -> usize {
        self.age_brackets
    }

    #[inline]
    pub fn risk_classes(&self) -> usize {
        self.risk_classes
    }

    /// Total number of compound categories, `L·A·S`.
    #[inline]
    pub fn bucket_count(&self) -> usize {
        self.locations * self.age_brackets * self.risk_classes
    }

    /// Size of one axis.
    pub fn size_of(&self, dim: Dimension) -> usize {
        match dim {
            Dimension::Location   => self.locations,
            Dimension::AgeBracket => self.age_brackets,
            Dimension::RiskClass  => self.risk_classes,
        }
    }
}

// ── CategoryKey ───────────────────────────────────────────────────────────────

/// A (location, age bracket, risk class) triple.
///
/// Construction does not validate; range checks happen in
/// [`CompoundIndexer::compound_index`] against a concrete [`Dimensions`].
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CategoryKey {
    pub location:    usize,
    pub age_bracket: usize,
    pub risk_class:  usize,
}

impl CategoryKey {
    #[inline]
    pub const fn new(location: usize, age_bracket: usize, risk_class: usize) -> Self {
        Self { location, age_bracket, risk_class }
    }
}

impl fmt::Display for CategoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(loc {}, age {}, risk {})", self.location, self.age_bracket, self.risk_class)
    }
}

// ── CompoundIndexer ───────────────────────────────────────────────────────────

/// Pure mapping between [`CategoryKey`]s and flat bucket ids.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct CompoundIndexer {
    dims: Dimensions,
}

impl CompoundIndexer {
    pub fn new(dims: Dimensions) -> Self {
        Self { dims }
    }

    #[inline]
    pub fn dimensions(&self) -> Dimensions {
        self.dims
    }

    #[inline]
    pub fn bucket_count(&self) -> usize {
        self.dims.bucket_count()
    }

    /// Reject any key component outside its configured range.
    pub fn check(&self, key: CategoryKey) -> CoreResult<()> {
        for (dim, value) in [
            (Dimension::Location, key.location),
            (Dimension::AgeBracket, key.age_bracket),
            (Dimension::RiskClass, key.risk_class),
        ] {
            let size = self.dims.size_of(dim);
            if value >= size {
                return Err(CoreError::KeyOutOfRange { dimension: dim, value, size });
            }
        }
        Ok(())
    }

    /// Flatten `key` into its bucket id.
    #[inline]
    pub fn compound_index(&self, key: CategoryKey) -> CoreResult<usize> {
        self.check(key)?;
        let a = self.dims.age_brackets;
        let l = self.dims.locations;
        Ok(key.age_bracket + a * key.location + (a * l) * key.risk_class)
    }

    /// Inverse of [`compound_index`](Self::compound_index).
    pub fn decode(&self, index: usize) -> CoreResult<CategoryKey> {
        let bucket_count = self.bucket_count();
        if index >= bucket_count {
            return Err(CoreError::CompoundOutOfRange { index, bucket_count });
        }
        let a = self.dims.age_brackets;
        let al = a * self.dims.locations;
        Ok(CategoryKey {
            location:    (index % al) / a,
            age_bracket: index % a,
            risk_class:  index / al,
        })
    }

    /// Every valid key in ascending compound-id order.
    pub fn keys(&self) -> impl Iterator<Item = CategoryKey> + '_ {
        (0..self.bucket_count()).map(move |i| {
            let a = self.dims.age_brackets;
            let al = a * self.dims.locations;
            CategoryKey::new((i % al) / a, i % a, i / al)
        })
    }
}
