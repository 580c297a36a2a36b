//! JSON Pointer (RFC 6901) paths.
//!
//! A [`Pointer`] is an ordered list of reference tokens addressing a location
//! inside a JSON document. Serialized on its own it renders as a JSON
//! Reference object, `{"$ref": "#/components/schemas/foo"}`, so it can be
//! embedded directly into document fields that link to a registered schema.

use std::fmt;

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ParseError;

/// An immutable JSON Pointer path.
///
/// The empty pointer addresses the document root and renders as `""`.
/// Two pointers are equal iff their segment sequences are equal element-wise.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Pointer {
    segments: Vec<String>,
}

impl Pointer {
    /// The root pointer (no segments).
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse an RFC 6901 path, with or without a leading `#` fragment marker.
    ///
    /// Reference tokens are unescaped (`~1` becomes `/`, `~0` becomes `~`).
    ///
    /// # Errors
    ///
    /// Returns `ParseError` when the path is non-empty but not rooted at `/`,
    /// contains an empty reference token, or has a dangling `~` escape.
    pub fn parse(path: &str) -> Result<Self, ParseError> {
        let rest = path.strip_prefix('#').unwrap_or(path);
        if rest.is_empty() {
            return Ok(Self::root());
        }

        let Some(rest) = rest.strip_prefix('/') else {
            return Err(ParseError::NotRooted {
                path: path.to_string(),
            });
        };

        let mut segments = Vec::new();
        let mut offset = path.len() - rest.len();
        for token in rest.split('/') {
            if token.is_empty() {
                return Err(ParseError::EmptySegment {
                    path: path.to_string(),
                });
            }
            segments.push(unescape(token, offset, path)?);
            offset += token.len() + 1;
        }

        Ok(Self { segments })
    }

    /// Build a pointer from already-split segments. Segments must be
    /// non-empty; no other validation is applied.
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        debug_assert!(segments.iter().all(|s| !s.is_empty()));
        Self { segments }
    }

    /// Ordered reference tokens, outermost first.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// The final reference token, if any.
    pub fn last(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// The pointer with the final token removed. The root is its own parent.
    pub fn parent(&self) -> Pointer {
        match self.segments.split_last() {
            Some((_, init)) => Pointer {
                segments: init.to_vec(),
            },
            None => Pointer::root(),
        }
    }

    /// A new pointer extended by one reference token.
    pub fn child(&self, segment: impl Into<String>) -> Pointer {
        let segment = segment.into();
        debug_assert!(!segment.is_empty());
        let mut segments = self.segments.clone();
        segments.push(segment);
        Pointer { segments }
    }

    /// The canonical `#`-prefixed JSON Reference string.
    pub fn as_reference(&self) -> String {
        format!("#{}", self)
    }
}

impl fmt::Display for Pointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            write!(f, "/{}", escape(segment))?;
        }
        Ok(())
    }
}

impl Serialize for Pointer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry("$ref", &self.as_reference())?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for Pointer {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RefVisitor;

        impl<'de> Visitor<'de> for RefVisitor {
            type Value = Pointer;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a JSON Reference object {\"$ref\": \"#/...\"}")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Pointer, A::Error> {
                let mut pointer = None;
                while let Some(key) = map.next_key::<String>()? {
                    if key == "$ref" {
                        let path: String = map.next_value()?;
                        pointer = Some(Pointer::parse(&path).map_err(de::Error::custom)?);
                    } else {
                        let _: de::IgnoredAny = map.next_value()?;
                    }
                }
                pointer.ok_or_else(|| de::Error::missing_field("$ref"))
            }
        }

        deserializer.deserialize_map(RefVisitor)
    }
}

fn escape(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}

fn unescape(token: &str, base: usize, path: &str) -> Result<String, ParseError> {
    let mut out = String::with_capacity(token.len());
    let mut chars = token.char_indices();
    while let Some((i, c)) = chars.next() {
        if c != '~' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some((_, '0')) => out.push('~'),
            Some((_, '1')) => out.push('/'),
            _ => {
                return Err(ParseError::InvalidEscape {
                    path: path.to_string(),
                    offset: base + i,
                })
            }
        }
    }
    Ok(out)
}
