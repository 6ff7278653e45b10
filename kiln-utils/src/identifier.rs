//! Namespaced identifiers (`namespace:path`) naming blocks and items.

use std::{
    borrow::Cow,
    fmt::{self, Display},
    str::FromStr,
};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Why a string could not be parsed into an [`Identifier`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    /// The string did not contain exactly one `:` separator.
    #[error("invalid identifier `{0}`: expected `namespace:path`")]
    Shape(String),
    /// The namespace was empty or contained a disallowed character.
    #[error("invalid namespace `{0}`")]
    Namespace(String),
    /// The path was empty or contained a disallowed character.
    #[error("invalid path `{0}`")]
    Path(String),
}

/// A namespaced name such as `example:ruby_block`.
///
/// Both halves are validated on construction through [`FromStr`]; the
/// `const` constructors are meant for compile-time tables and are trusted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identifier {
    /// The owning namespace, `minecraft` for vanilla content.
    pub namespace: Cow<'static, str>,
    /// The path inside the namespace.
    pub path: Cow<'static, str>,
}

impl Identifier {
    /// The namespace used by vanilla content.
    pub const VANILLA_NAMESPACE: &'static str = "minecraft";

    /// Creates an identifier in the vanilla namespace from static parts.
    #[must_use]
    pub const fn vanilla_static(path: &'static str) -> Self {
        Self {
            namespace: Cow::Borrowed(Self::VANILLA_NAMESPACE),
            path: Cow::Borrowed(path),
        }
    }

    /// Validates and builds an identifier from separate parts.
    pub fn new(
        namespace: impl Into<Cow<'static, str>>,
        path: impl Into<Cow<'static, str>>,
    ) -> Result<Self, IdentifierError> {
        let namespace = namespace.into();
        let path = path.into();
        if !Self::validate_namespace(&namespace) {
            return Err(IdentifierError::Namespace(namespace.into_owned()));
        }
        if !Self::validate_path(&path) {
            return Err(IdentifierError::Path(path.into_owned()));
        }
        Ok(Self { namespace, path })
    }

    /// Whether `c` may appear in a namespace.
    #[must_use]
    pub fn valid_namespace_char(c: char) -> bool {
        matches!(c, '_' | '-' | '.') || c.is_ascii_lowercase() || c.is_ascii_digit()
    }

    /// Whether `c` may appear in a path. Paths also allow `/`.
    #[must_use]
    pub fn valid_path_char(c: char) -> bool {
        Self::valid_namespace_char(c) || c == '/'
    }

    /// Returns true when `namespace` is non-empty and only uses allowed characters.
    #[must_use]
    pub fn validate_namespace(namespace: &str) -> bool {
        !namespace.is_empty() && namespace.chars().all(Self::valid_namespace_char)
    }

    /// Returns true when `path` is non-empty and only uses allowed characters.
    #[must_use]
    pub fn validate_path(path: &str) -> bool {
        !path.is_empty() && path.chars().all(Self::valid_path_char)
    }

    /// Whether this identifier belongs to the vanilla namespace.
    #[must_use]
    pub fn is_vanilla(&self) -> bool {
        self.namespace == Self::VANILLA_NAMESPACE
    }
}

impl Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.path)
    }
}

impl FromStr for Identifier {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((namespace, path)) = s.split_once(':') else {
            return Err(IdentifierError::Shape(s.to_owned()));
        };
        if path.contains(':') {
            return Err(IdentifierError::Shape(s.to_owned()));
        }
        Self::new(namespace.to_owned(), path.to_owned())
    }
}

impl Serialize for Identifier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Identifier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_displays() {
        let id: Identifier = "example:ruby_block".parse().unwrap();
        assert_eq!(id.namespace, "example");
        assert_eq!(id.path, "ruby_block");
        assert_eq!(id.to_string(), "example:ruby_block");
        assert!(!id.is_vanilla());
    }

    #[test]
    fn paths_may_contain_slashes() {
        let id: Identifier = "example:tools/ruby_pickaxe".parse().unwrap();
        assert_eq!(id.path, "tools/ruby_pickaxe");
    }

    #[test]
    fn rejects_malformed() {
        assert_eq!(
            "ruby_block".parse::<Identifier>(),
            Err(IdentifierError::Shape("ruby_block".to_owned()))
        );
        assert!(matches!(
            "a:b:c".parse::<Identifier>(),
            Err(IdentifierError::Shape(_))
        ));
        assert!(matches!(
            "Example:ruby".parse::<Identifier>(),
            Err(IdentifierError::Namespace(_))
        ));
        assert!(matches!(
            "ex/ample:ruby".parse::<Identifier>(),
            Err(IdentifierError::Namespace(_))
        ));
        assert!(matches!(
            "example:".parse::<Identifier>(),
            Err(IdentifierError::Path(_))
        ));
        assert!(matches!(
            "example:Ruby Block".parse::<Identifier>(),
            Err(IdentifierError::Path(_))
        ));
    }

    #[test]
    fn serde_uses_the_string_form() {
        let id = Identifier::vanilla_static("stone");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"minecraft:stone\"");
        let back: Identifier = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
        assert!(serde_json::from_str::<Identifier>("\"not an id\"").is_err());
    }
}
