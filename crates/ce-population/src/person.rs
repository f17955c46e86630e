//! Per-person attributes read by the categorical rebuild.

/// Biological sex of a person.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Sex {
    #[default]
    Female,
    Male,
}

impl Sex {
    /// Human-readable label, useful for CSV column values.
    pub fn as_str(self) -> &'static str {
        match self {
            Sex::Female => "female",
            Sex::Male   => "male",
        }
    }
}

impl std::fmt::Display for Sex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One person, as pushed into or read out of a [`PersonStore`][crate::PersonStore].
#[derive(Copy, Clone, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Person {
    /// Age in years.  Continuous; the environment derives the age bracket.
    pub age:        f32,
    pub sex:        Sex,
    /// Categorical location id in `[0, L)`.
    pub location:   usize,
    /// Socio-behavioural risk class in `[0, S)`.
    pub risk_class: usize,
    /// `true` while the person is in a regular partnership.
    pub partnered:  bool,
}
