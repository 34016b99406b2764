//! Paths locating validation results inside nested values.
//!
//! A [`JsonPath`] is empty at the schema root and grows by one
//! [`PathSegment`] per nesting level: an object property name or an array
//! index.

use std::fmt::{self, Display};

use serde::{Serialize, Serializer};

/// One step from a value into a child.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Property name of an object.
    Field(String),
    /// Position in an array.
    Index(usize),
}

impl PathSegment {
    /// Property-name segment.
    pub fn field(name: impl Into<String>) -> Self {
        PathSegment::Field(name.into())
    }

    /// Array-position segment.
    pub fn index(position: usize) -> Self {
        PathSegment::Index(position)
    }

    /// The segment as reported to consumers: positions become decimal
    /// strings.
    pub fn as_segment_string(&self) -> String {
        self.to_string()
    }
}

impl Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Field(name) => f.write_str(name),
            PathSegment::Index(position) => write!(f, "{position}"),
        }
    }
}

/// Location of a value below the validated root.
///
/// Paths are values: extending one yields a new path and leaves the parent
/// untouched, so sibling fields can branch off a shared prefix.
///
/// # Example
///
/// ```rust
/// use preflight::JsonPath;
///
/// let path = JsonPath::root()
///     .push_field("users")
///     .push_index(0)
///     .push_field("email");
///
/// assert_eq!(path.to_string(), "users[0].email");
/// assert_eq!(path.to_dotted(), "users.0.email");
/// assert_eq!(path.to_segments(), vec!["users", "0", "email"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct JsonPath {
    segments: Vec<PathSegment>,
}

impl JsonPath {
    /// The path of the validated value itself.
    pub fn root() -> Self {
        Self::default()
    }

    /// A one-segment path naming a top-level property.
    pub fn from_field(name: impl Into<String>) -> Self {
        Self::root().push_field(name)
    }

    /// This path extended by a property name.
    pub fn push_field(&self, name: impl Into<String>) -> Self {
        self.extended(PathSegment::Field(name.into()))
    }

    /// This path extended by an array position.
    pub fn push_index(&self, index: usize) -> Self {
        self.extended(PathSegment::Index(index))
    }

    fn extended(&self, segment: PathSegment) -> Self {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.extend_from_slice(&self.segments);
        segments.push(segment);
        Self { segments }
    }

    /// True for the root path.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Nesting depth.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Same as [`is_root`](Self::is_root).
    pub fn is_empty(&self) -> bool {
        self.is_root()
    }

    /// Walks the segments from the root down.
    pub fn segments(&self) -> impl Iterator<Item = &PathSegment> {
        self.segments.iter()
    }

    /// Segments in reported form, e.g. `["items", "0", "name"]`.
    pub fn to_segments(&self) -> Vec<String> {
        self.segments.iter().map(ToString::to_string).collect()
    }

    /// Dot-joined form (`items.0.name`), the key format form libraries
    /// use for nested fields.
    pub fn to_dotted(&self) -> String {
        self.to_segments().join(".")
    }

    /// The innermost segment.
    pub fn last(&self) -> Option<&PathSegment> {
        self.segments.last()
    }
}

impl<S: Into<String>> FromIterator<S> for JsonPath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            segments: iter.into_iter().map(PathSegment::field).collect(),
        }
    }
}

/// Renders `users[0].email`: properties dot-separated, positions bracketed.
impl Display for JsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for segment in &self.segments {
            match segment {
                PathSegment::Index(position) => write!(f, "[{position}]")?,
                PathSegment::Field(name) if first => f.write_str(name)?,
                PathSegment::Field(name) => write!(f, ".{name}")?,
            }
            first = false;
        }
        Ok(())
    }
}

impl Serialize for JsonPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.segments.iter().map(ToString::to_string))
    }
}
