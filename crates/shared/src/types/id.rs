//! Typed IDs for the dataset's dimension tables.
//!
//! The production dataset keys every dimension with a plain integer. Wrapping
//! them keeps a `RegionId` from being passed where a `YearId` is expected.

use serde::{Deserialize, Serialize};

/// Macro to generate typed ID wrappers.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i32);

        impl $name {
            /// Creates an ID from a raw primary key.
            #[must_use]
            pub const fn new(raw: i32) -> Self {
                Self(raw)
            }

            /// Returns the raw primary key.
            #[must_use]
            pub const fn into_inner(self) -> i32 {
                self.0
            }
        }

        impl From<i32> for $name {
            fn from(raw: i32) -> Self {
                Self(raw)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.parse()?))
            }
        }
    };
}

typed_id!(RegionId, "Primary key of a region (`UF.id_sigla`).");
typed_id!(YearId, "Primary key of a reference year (`ANO.id_ano`).");
typed_id!(
    ClassId,
    "Primary key of a substance class (`CLASSE_SUBSTANCIA.id_classe`)."
);
typed_id!(
    SubstanceId,
    "Primary key of a mineral substance (`SUBSTANCIA_MINERAL.id_substancia`)."
);

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
