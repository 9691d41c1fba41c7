//! Cities in which tasks can be offered.

use super::ParseCityError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// City in which a task is carried out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum City {
    /// Almaty.
    Almaty,
    /// Astana.
    Astana,
    /// Shymkent.
    Shymkent,
    /// Karaganda.
    Karaganda,
    /// Aktobe.
    Aktobe,
    /// Taraz.
    Taraz,
    /// Pavlodar.
    Pavlodar,
    /// Oskemen.
    Oskemen,
    /// Semey.
    Semey,
    /// Kostanay.
    Kostanay,
    /// Kyzylorda.
    Kyzylorda,
    /// Atyrau.
    Atyrau,
    /// Oral.
    Oral,
    /// Petropavl.
    Petropavl,
    /// Turkistan.
    Turkistan,
}

impl City {
    /// Every supported city, in declaration order.
    pub const ALL: [Self; 15] = [
        Self::Almaty,
        Self::Astana,
        Self::Shymkent,
        Self::Karaganda,
        Self::Aktobe,
        Self::Taraz,
        Self::Pavlodar,
        Self::Oskemen,
        Self::Semey,
        Self::Kostanay,
        Self::Kyzylorda,
        Self::Atyrau,
        Self::Oral,
        Self::Petropavl,
        Self::Turkistan,
    ];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Almaty => "almaty",
            Self::Astana => "astana",
            Self::Shymkent => "shymkent",
            Self::Karaganda => "karaganda",
            Self::Aktobe => "aktobe",
            Self::Taraz => "taraz",
            Self::Pavlodar => "pavlodar",
            Self::Oskemen => "oskemen",
            Self::Semey => "semey",
            Self::Kostanay => "kostanay",
            Self::Kyzylorda => "kyzylorda",
            Self::Atyrau => "atyrau",
            Self::Oral => "oral",
            Self::Petropavl => "petropavl",
            Self::Turkistan => "turkistan",
        }
    }
}

impl fmt::Display for City {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl TryFrom<&str> for City {
    type Error = ParseCityError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|city| city.as_str() == normalized)
            .ok_or_else(|| ParseCityError(value.to_owned()))
    }
}
