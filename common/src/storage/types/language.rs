use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Languages the examples index is partitioned by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    CSharp,
    Cxx,
    Java,
    Python,
}

impl Language {
    pub const ALL: [Self; 4] = [Self::CSharp, Self::Cxx, Self::Java, Self::Python];

    /// Key used for this language inside the index document.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CSharp => "CSharp",
            Self::Cxx => "Cxx",
            Self::Java => "Java",
            Self::Python => "Python",
        }
    }

    pub fn supported_list() -> String {
        Self::ALL
            .iter()
            .map(|language| language.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = AppError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let needle = raw.trim();
        Self::ALL
            .into_iter()
            .find(|language| language.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| AppError::UnsupportedLanguage {
                requested: raw.to_string(),
                supported: Self::supported_list(),
            })
    }
}
