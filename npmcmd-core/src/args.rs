use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Keys a yargs-style argv object uses for parser bookkeeping rather than
/// real flags. They are dropped before rendering.
const RESERVED_KEYS: [&str; 2] = ["$0", "_"];

/// Value attached to a flag name: a single string or a list of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlagValue {
    Scalar(String),
    List(Vec<String>),
}

impl From<&str> for FlagValue {
    fn from(s: &str) -> Self {
        FlagValue::Scalar(s.to_string())
    }
}

impl From<String> for FlagValue {
    fn from(s: String) -> Self {
        FlagValue::Scalar(s)
    }
}

impl From<Vec<String>> for FlagValue {
    fn from(values: Vec<String>) -> Self {
        FlagValue::List(values)
    }
}

impl From<Vec<&str>> for FlagValue {
    fn from(values: Vec<&str>) -> Self {
        FlagValue::List(values.into_iter().map(String::from).collect())
    }
}

/// Insertion-ordered map of flag name to value.
///
/// Backed by a `Vec` so iteration and rendering follow insertion order
/// exactly; no sorting is ever applied. Deserialises from a JSON object
/// (e.g. a parsed yargs argv) preserving the object's key order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagMap {
    entries: Vec<(String, FlagValue)>,
}

impl FlagMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a flag, keeping insertion order. A repeated key is appended,
    /// not merged; it renders once per occurrence.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FlagValue>) -> &mut Self {
        self.entries.push((key.into(), value.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Renders the map into passthrough tokens, one rendered entry per key.
    ///
    /// An empty-string scalar renders `--key`, a non-empty scalar renders
    /// `--key value`, and a list renders one such token per element joined
    /// by spaces. The reserved yargs keys `$0` and `_` are filtered out.
    pub fn render(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|(key, _)| !RESERVED_KEYS.contains(&key.as_str()))
            .map(|(key, value)| match value {
                FlagValue::Scalar(v) => render_flag(key, v),
                FlagValue::List(values) => values
                    .iter()
                    .map(|v| render_flag(key, v))
                    .collect::<Vec<_>>()
                    .join(" "),
            })
            .collect()
    }
}

fn render_flag(key: &str, value: &str) -> String {
    if value.is_empty() {
        format!("--{}", key)
    } else {
        format!("--{} {}", key, value)
    }
}

impl<K: Into<String>, V: Into<FlagValue>> FromIterator<(K, V)> for FlagMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl Serialize for FlagMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for FlagMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FlagMapVisitor;

        impl<'de> Visitor<'de> for FlagMapVisitor {
            type Value = FlagMap;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of flag names to strings or string lists")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<FlagMap, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((key, value)) = access.next_entry::<String, FlagValue>()? {
                    entries.push((key, value));
                }
                Ok(FlagMap { entries })
            }
        }

        deserializer.deserialize_map(FlagMapVisitor)
    }
}

/// Source for a builder's passthrough argument list: a flag map to render,
/// or the disabled signal which clears the list regardless of prior state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgSource {
    Flags(FlagMap),
    Disabled,
}

impl From<FlagMap> for ArgSource {
    fn from(flags: FlagMap) -> Self {
        ArgSource::Flags(flags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_preserves_insertion_order() {
        let mut flags = FlagMap::new();
        flags
            .insert("registry", "https://example.org")
            .insert("no-save", "")
            .insert("loglevel", "silent");

        assert_eq!(
            flags.render(),
            vec![
                "--registry https://example.org",
                "--no-save",
                "--loglevel silent",
            ]
        );
    }

    #[test]
    fn test_render_filters_reserved_keys() {
        let mut flags = FlagMap::new();
        flags
            .insert("$0", "index.js")
            .insert("force", "")
            .insert("_", vec!["leftover", "positional"]);

        assert_eq!(flags.render(), vec!["--force"]);
    }

    #[test]
    fn test_render_empty_scalar_is_bare_flag() {
        let mut flags = FlagMap::new();
        flags.insert("no-save", "");
        assert_eq!(flags.render(), vec!["--no-save"]);
    }

    #[test]
    fn test_render_list_value_one_token_per_element() {
        let mut flags = FlagMap::new();
        flags.insert("workspace", vec!["pkg-a", "pkg-b"]);
        assert_eq!(flags.render(), vec!["--workspace pkg-a --workspace pkg-b"]);
    }

    #[test]
    fn test_render_list_with_empty_element() {
        let mut flags = FlagMap::new();
        flags.insert("tag", vec!["beta", ""]);
        assert_eq!(flags.render(), vec!["--tag beta --tag"]);
    }

    #[test]
    fn test_render_empty_map() {
        assert!(FlagMap::new().render().is_empty());
    }

    #[test]
    fn test_deserialize_yargs_argv_object() {
        let json = r#"{
            "$0": "scripts/deploy.js",
            "_": ["deploy"],
            "env": "production",
            "verbose": "",
            "only": ["api", "web"]
        }"#;
        let flags: FlagMap = serde_json::from_str(json).unwrap();
        assert_eq!(flags.len(), 5);
        assert_eq!(
            flags.render(),
            vec!["--env production", "--verbose", "--only api --only web"]
        );
    }

    #[test]
    fn test_serialize_round_trip_keeps_order() {
        let flags: FlagMap = [
            ("zeta", FlagValue::from("1")),
            ("alpha", FlagValue::from("")),
        ]
        .into_iter()
        .collect();

        let json = serde_json::to_string(&flags).unwrap();
        let back: FlagMap = serde_json::from_str(&json).unwrap();
        assert_eq!(back, flags);
        assert_eq!(back.render(), vec!["--zeta 1", "--alpha"]);
    }

    #[test]
    fn test_arg_source_from_flag_map() {
        let mut flags = FlagMap::new();
        flags.insert("force", "");
        let source: ArgSource = flags.clone().into();
        assert_eq!(source, ArgSource::Flags(flags));
    }
}
