//! Dynamically-typed metadata values.
//!
//! Frontmatter blocks, plugin-written keys and derived indexes all store
//! their data as [`Value`] — a closed tagged union over the shapes YAML
//! and JSON documents can produce. Metadata maps preserve insertion order
//! and keep keys unique; re-inserting a key overwrites its value in place.

use indexmap::IndexMap;

/// Ordered string-keyed map of metadata values.
///
/// Insertion order is significant: it drives serialization order and the
/// order derived indexes are reported in.
pub type Metadata = IndexMap<String, Value>;

// ============================================================================
// Value
// ============================================================================

/// A single metadata value.
///
/// The numeric arm is split into `Int`/`Float` the way `toml::Value`
/// splits Integer/Float; everything else maps one-to-one onto the YAML
/// and JSON data models.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Bool(bool),
    Int(i64),
    Float(f64),
    List(Vec<Value>),
    Map(Metadata),
}

impl Value {
    /// Borrow as a string, if this is a `String`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Read as a bool, if this is a `Bool`.
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Read as an integer, if this is an `Int`.
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Read as a float. `Int` values coerce.
    pub const fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Int(n) => Some(*n as f64),
            _ => None,
        }
    }

    /// Borrow as a list, if this is a `List`.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Borrow as a map, if this is a `Map`.
    pub const fn as_map(&self) -> Option<&Metadata> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Mutably borrow as a map, if this is a `Map`.
    pub fn as_map_mut(&mut self) -> Option<&mut Metadata> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }
}

// ============================================================================
// Literal conversions
// ============================================================================

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::List(items)
    }
}

impl From<Metadata> for Value {
    fn from(map: Metadata) -> Self {
        Self::Map(map)
    }
}

// ============================================================================
// YAML / JSON conversions
// ============================================================================

impl From<serde_yaml::Value> for Value {
    fn from(value: serde_yaml::Value) -> Self {
        use serde_yaml::Value as Yaml;
        match value {
            // Frontmatter values are text-ish; null becomes an empty string
            Yaml::Null => Self::String(String::new()),
            Yaml::Bool(b) => Self::Bool(b),
            Yaml::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Self::Int(i)
                } else {
                    Self::Float(n.as_f64().unwrap_or(0.0))
                }
            }
            Yaml::String(s) => Self::String(s),
            Yaml::Sequence(items) => Self::List(items.into_iter().map(Self::from).collect()),
            Yaml::Mapping(mapping) => {
                let mut map = Metadata::new();
                for (key, value) in mapping {
                    if let Some(key) = yaml_key_to_string(&key) {
                        map.insert(key, Self::from(value));
                    }
                }
                Self::Map(map)
            }
            Yaml::Tagged(tagged) => Self::from(tagged.value),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value as Json;
        match value {
            Json::Null => Self::String(String::new()),
            Json::Bool(b) => Self::Bool(b),
            Json::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Self::Int(i)
                } else {
                    Self::Float(n.as_f64().unwrap_or(0.0))
                }
            }
            Json::String(s) => Self::String(s),
            Json::Array(items) => Self::List(items.into_iter().map(Self::from).collect()),
            Json::Object(object) => {
                let mut map = Metadata::new();
                for (key, value) in object {
                    map.insert(key, Self::from(value));
                }
                Self::Map(map)
            }
        }
    }
}

/// Convert a scalar YAML mapping key to a string key.
///
/// Structured keys (sequences, mappings) have no string form and are
/// rejected by returning `None`.
pub(crate) fn yaml_key_to_string(key: &serde_yaml::Value) -> Option<String> {
    use serde_yaml::Value as Yaml;
    match key {
        Yaml::String(s) => Some(s.clone()),
        Yaml::Bool(b) => Some(b.to_string()),
        Yaml::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

// ============================================================================
// Tests
// ============================================================================
