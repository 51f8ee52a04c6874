use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// One of the two independent card catalogs served by the REST API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Backend {
    #[serde(rename = "mysql", alias = "relational")]
    Relational,
    #[serde(rename = "mongodb", alias = "document")]
    Document,
}

impl Backend {
    pub const ALL: [Backend; 2] = [Backend::Relational, Backend::Document];

    /// Literal path segment under `/api/`.
    pub fn path_segment(self) -> &'static str {
        match self {
            Backend::Relational => "mysql",
            Backend::Document => "mongodb",
        }
    }

    /// Index into per-backend arrays.
    pub fn index(self) -> usize {
        match self {
            Backend::Relational => 0,
            Backend::Document => 1,
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path_segment())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownBackend(pub String);

impl fmt::Display for UnknownBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown backend `{}` (expected mysql or mongodb)", self.0)
    }
}

impl std::error::Error for UnknownBackend {}

impl FromStr for Backend {
    type Err = UnknownBackend;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mysql" | "relational" => Ok(Backend::Relational),
            "mongodb" | "mongo" | "document" => Ok(Backend::Document),
            _ => Err(UnknownBackend(s.to_string())),
        }
    }
}
