use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One value name or several.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    fn into_vec(self) -> Vec<String> {
        match self {
            OneOrMany::One(value) => vec![value],
            OneOrMany::Many(values) => values,
        }
    }
}

impl From<&str> for OneOrMany {
    fn from(value: &str) -> Self {
        OneOrMany::One(value.to_string())
    }
}

impl From<String> for OneOrMany {
    fn from(value: String) -> Self {
        OneOrMany::One(value)
    }
}

impl From<Vec<String>> for OneOrMany {
    fn from(values: Vec<String>) -> Self {
        OneOrMany::Many(values)
    }
}

impl From<Vec<&str>> for OneOrMany {
    fn from(values: Vec<&str>) -> Self {
        OneOrMany::Many(values.into_iter().map(str::to_string).collect())
    }
}

/// Caller-facing interest selection.
///
/// `Text` uses the compact `Category:Value,Other:A:B` syntax; `Map` keys a
/// category title to one or more value names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InterestSpec {
    Text(String),
    Map(BTreeMap<String, OneOrMany>),
}

impl InterestSpec {
    /// Canonical key → value-names form every resolution works from.
    pub fn normalize(&self) -> BTreeMap<String, Vec<String>> {
        match self {
            InterestSpec::Text(text) => parse_text(text),
            InterestSpec::Map(map) => map
                .iter()
                .map(|(key, values)| (key.clone(), values.clone().into_vec()))
                .collect(),
        }
    }
}

impl From<&str> for InterestSpec {
    fn from(text: &str) -> Self {
        InterestSpec::Text(text.to_string())
    }
}

impl From<String> for InterestSpec {
    fn from(text: String) -> Self {
        InterestSpec::Text(text)
    }
}

impl<K, V> FromIterator<(K, V)> for InterestSpec
where
    K: Into<String>,
    V: Into<OneOrMany>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        InterestSpec::Map(
            iter.into_iter()
                .map(|(key, values)| (key.into(), values.into()))
                .collect(),
        )
    }
}

/// Parse `key1:value1,key2:value2a:value2b`.
///
/// A bare key maps to `[""]`; a repeated key appends to the values already seen.
fn parse_text(text: &str) -> BTreeMap<String, Vec<String>> {
    let mut parsed: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for entry in text.split(',').map(str::trim).filter(|entry| !entry.is_empty()) {
        let mut parts = entry.split(':').map(str::trim);
        let key = parts.next().unwrap_or_default().to_string();
        let mut values: Vec<String> = parts.map(str::to_string).collect();
        if values.is_empty() {
            values.push(String::new());
        }

        parsed.entry(key).or_default().extend(values);
    }

    parsed
}
