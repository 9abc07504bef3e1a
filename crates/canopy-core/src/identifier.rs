//! Interned identifiers for graph nodes, definitions and canvas contexts.
//!
//! Every element of a diagram is addressed by a string uuid. The explorer
//! compares and hashes these ids constantly (projection lookups, diff guards,
//! scope checks), so they are interned once and passed around as a `Copy`
//! symbol.

use std::{
    fmt,
    sync::{Mutex, MutexGuard, OnceLock},
};

use serde::{Deserialize, Deserializer};
use string_interner::{DefaultStringInterner, DefaultSymbol};

/// Global string interner backing every [`Id`].
static INTERNER: OnceLock<Mutex<DefaultStringInterner>> = OnceLock::new();

fn interner() -> MutexGuard<'static, DefaultStringInterner> {
    INTERNER
        .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Interned string identifier.
///
/// # Examples
///
/// ```
/// use canopy_core::identifier::Id;
///
/// let task = Id::new("task-1");
/// let same: Id = "task-1".into();
///
/// assert_eq!(task, same);
/// assert_eq!(task, "task-1");
/// assert_eq!(task.to_string(), "task-1");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id(DefaultSymbol);

impl Id {
    /// Creates an `Id` from a string slice, interning it on first use.
    pub fn new(name: &str) -> Self {
        Self(interner().get_or_intern(name))
    }

    /// Returns an owned copy of the identifier text.
    pub fn as_string(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = interner().resolve(self.0).map(str::to_owned);
        match text {
            Some(text) => f.write_str(&text),
            None => write!(f, "<unknown id {:?}>", self.0),
        }
    }
}

impl std::str::FromStr for Id {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for Id {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Id {
    fn from(name: String) -> Self {
        Self::new(&name)
    }
}

impl PartialEq<str> for Id {
    /// Allows direct comparison with string slices: `id == "task-1"`
    fn eq(&self, other: &str) -> bool {
        interner().resolve(self.0) == Some(other)
    }
}

impl PartialEq<&str> for Id {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl<'de> Deserialize<'de> for Id {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        Ok(Self::new(&name))
    }
}
