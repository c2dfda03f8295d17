//! # Path Addresses
//!
//! A [`Path`] locates one node inside a document: a sequence of object
//! member names and sequence indexes, starting at the root.
//!
//! ```text
//! $                 the whole document
//! client            member "client" of the root object
//! sites[0].name     member "name" of the first site
//! ["odd key"][2]    quoted member, then index 2
//! ```
//!
//! Paths are computed fresh on every render and compared structurally.
//! The text form above is used by the CLI; `sites.0.name` is accepted as
//! a shorthand for `sites[0].name`.

use crate::EditorError;
use std::fmt;
use std::str::FromStr;

/// One step of a path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathKey {
    /// Object member
    Field(String),

    /// Sequence position
    Index(usize),
}

impl From<&str> for PathKey {
    fn from(name: &str) -> Self {
        PathKey::Field(name.to_string())
    }
}

impl From<String> for PathKey {
    fn from(name: String) -> Self {
        PathKey::Field(name)
    }
}

impl From<usize> for PathKey {
    fn from(index: usize) -> Self {
        PathKey::Index(index)
    }
}

/// Ordered key sequence from the document root
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Path(Vec<PathKey>);

impl Path {
    /// The empty path (whole document)
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> &[PathKey] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// New path extended by one key; `self` is left as is
    pub fn child(&self, key: impl Into<PathKey>) -> Path {
        let mut keys = Vec::with_capacity(self.0.len() + 1);
        keys.extend_from_slice(&self.0);
        keys.push(key.into());
        Path(keys)
    }

    pub fn last(&self) -> Option<&PathKey> {
        self.0.last()
    }

    /// Name of the closest enclosing object member, skipping indexes.
    /// `sites[0]` and `sites` both give `sites`.
    pub fn field_hint(&self) -> Option<&str> {
        self.0.iter().rev().find_map(|key| match key {
            PathKey::Field(name) => Some(name.as_str()),
            PathKey::Index(_) => None,
        })
    }

    /// True when `self` is `other` or lies beneath it
    pub fn starts_with(&self, other: &Path) -> bool {
        self.0.starts_with(&other.0)
    }
}

impl<K: Into<PathKey>> FromIterator<K> for Path {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        Path(iter.into_iter().map(Into::into).collect())
    }
}

fn is_bare_field(name: &str) -> bool {
    !name.is_empty()
        && !name.bytes().all(|b| b.is_ascii_digit())
        && name
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("$");
        }

        for (i, key) in self.0.iter().enumerate() {
            match key {
                PathKey::Index(index) => write!(f, "[{}]", index)?,
                PathKey::Field(name) if is_bare_field(name) => {
                    if i > 0 {
                        f.write_str(".")?;
                    }
                    f.write_str(name)?;
                }
                PathKey::Field(name) => {
                    // serde_json string escaping gives an unambiguous quoted form
                    let quoted = serde_json::to_string(name).map_err(|_| fmt::Error)?;
                    write!(f, "[{}]", quoted)?;
                }
            }
        }

        Ok(())
    }
}

impl FromStr for Path {
    type Err = EditorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| EditorError::InvalidPath {
            path: s.to_string(),
            reason: reason.to_string(),
        };

        let mut rest = s.trim();
        if let Some(stripped) = rest.strip_prefix('$') {
            rest = stripped;
        }

        let mut keys = Vec::new();
        while !rest.is_empty() {
            if let Some(after) = rest.strip_prefix('[') {
                let close = if after.starts_with('"') {
                    // Quoted member: find the closing quote that is not escaped
                    let mut escaped = false;
                    let end = after[1..]
                        .char_indices()
                        .find(|&(_, c)| {
                            let done = c == '"' && !escaped;
                            escaped = c == '\\' && !escaped;
                            done
                        })
                        .map(|(i, _)| i + 2)
                        .ok_or_else(|| invalid("unterminated quoted key"))?;
                    let name: String = serde_json::from_str(&after[..end])
                        .map_err(|_| invalid("bad quoted key"))?;
                    keys.push(PathKey::Field(name));
                    end
                } else {
                    let end = after.find(']').ok_or_else(|| invalid("missing ']'"))?;
                    let index = after[..end]
                        .trim()
                        .parse::<usize>()
                        .map_err(|_| invalid("index must be a non-negative integer"))?;
                    keys.push(PathKey::Index(index));
                    end
                };

                rest = after[close..]
                    .strip_prefix(']')
                    .ok_or_else(|| invalid("missing ']'"))?;
                continue;
            }

            let segment = rest.strip_prefix('.').unwrap_or(rest);
            let end = segment.find(['.', '[']).unwrap_or(segment.len());
            let name = &segment[..end];
            if name.is_empty() {
                return Err(invalid("empty segment"));
            }

            keys.push(match name.parse::<usize>() {
                Ok(index) if name.bytes().all(|b| b.is_ascii_digit()) => PathKey::Index(index),
                _ => PathKey::Field(name.to_string()),
            });
            rest = &segment[end..];
        }

        Ok(Path(keys))
    }
}
