use std::{collections::HashMap, fmt};

use serde::{
    de::{MapAccess, Visitor},
    Deserialize, Deserializer,
};

use crate::error::AppError;

use super::language::Language;

/// Parsed cross-reference index: class name -> language -> example id -> display name.
///
/// The whole shape is validated while deserialising, so a document that loads
/// successfully never fails a lookup with anything other than a missing key.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct IndexDocument {
    classes: HashMap<String, HashMap<String, ExampleEntries>>,
}

/// Examples of one (class, language) pair in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExampleEntries(Vec<(String, String)>);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lookup {
    pub total: usize,
    pub entries: Vec<String>,
}

impl IndexDocument {
    pub fn load(raw: &[u8]) -> Result<Self, AppError> {
        serde_json::from_slice(raw).map_err(|err| AppError::MalformedIndex(err.to_string()))
    }

    /// Display names for the pair, or `None` when either key is absent.
    pub fn lookup(&self, class_name: &str, language: Language) -> Option<Lookup> {
        let entries = self.classes.get(class_name)?.get(language.as_str())?;
        let names: Vec<String> = entries.display_names().map(str::to_string).collect();

        Some(Lookup {
            total: names.len(),
            entries: names,
        })
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    pub fn languages_for(&self, class_name: &str) -> Vec<&str> {
        let mut languages: Vec<&str> = self
            .classes
            .get(class_name)
            .map(|by_language| by_language.keys().map(String::as_str).collect())
            .unwrap_or_default();
        languages.sort_unstable();
        languages
    }
}

impl ExampleEntries {
    pub fn display_names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(_, name)| name.as_str())
    }
}

struct ExampleEntriesVisitor;

impl<'de> Visitor<'de> for ExampleEntriesVisitor {
    type Value = ExampleEntries;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map of example ids to display names")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut entries: Vec<(String, String)> = Vec::with_capacity(map.size_hint().unwrap_or(0));
        let mut positions: HashMap<String, usize> = HashMap::new();

        while let Some((id, name)) = map.next_entry::<String, String>()? {
            // A repeated id keeps its first position and takes the last value.
            match positions.get(&id).and_then(|&index| entries.get_mut(index)) {
                Some(existing) => existing.1 = name,
                None => {
                    positions.insert(id.clone(), entries.len());
                    entries.push((id, name));
                }
            }
        }

        Ok(ExampleEntries(entries))
    }
}

impl<'de> Deserialize<'de> for ExampleEntries {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(ExampleEntriesVisitor)
    }
}
