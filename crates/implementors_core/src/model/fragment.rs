//! Shard fragment data model.
//!
//! # Responsibility
//! - Define the package-to-implementors payload carried by one shard.
//! - Own the JSON wire shape `{"<crate>": ["<markup>", ...], ...}`.
//!
//! # Invariants
//! - Implementor order inside a fragment is preserved end to end.
//! - Fragment order inside a payload follows source key order.
//! - Implementor markup is opaque payload and is never parsed.
//! - One payload holds at most one fragment per crate name (last write wins).

use log::warn;
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{self, Display, Formatter};

/// Pre-rendered, link-bearing description of one implementing type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Implementor(String);

impl Implementor {
    pub fn new(markup: impl Into<String>) -> Self {
        Self(markup.into())
    }

    /// Returns the raw markup exactly as emitted.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Implementor {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Implementor {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Display for Implementor {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One package's contribution to a trait's implementor list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    /// Package identifier, unique within one loading session.
    pub crate_name: String,
    /// Display-only implementor descriptions in emission order.
    pub implementors: Vec<Implementor>,
}

impl Fragment {
    pub fn new<I, T>(crate_name: impl Into<String>, implementors: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Implementor>,
    {
        Self {
            crate_name: crate_name.into(),
            implementors: implementors.into_iter().map(Into::into).collect(),
        }
    }
}

/// Ordered crate-to-implementors mapping registered by one emitter at once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShardPayload {
    fragments: Vec<Fragment>,
}

impl ShardPayload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps a single fragment.
    pub fn single(fragment: Fragment) -> Self {
        Self {
            fragments: vec![fragment],
        }
    }

    /// Adds one fragment, replacing an earlier one with the same crate name.
    ///
    /// A replaced fragment keeps its original position, matching how a
    /// duplicated key behaves in an object literal. Returns the replaced
    /// implementor list.
    pub fn push(&mut self, fragment: Fragment) -> Option<Vec<Implementor>> {
        match self
            .fragments
            .iter_mut()
            .find(|existing| existing.crate_name == fragment.crate_name)
        {
            Some(existing) => {
                warn!(
                    "event=payload_duplicate_crate module=fragment status=overwritten crate={}",
                    fragment.crate_name
                );
                Some(std::mem::replace(
                    &mut existing.implementors,
                    fragment.implementors,
                ))
            }
            None => {
                self.fragments.push(fragment);
                None
            }
        }
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    pub fn into_fragments(self) -> Vec<Fragment> {
        self.fragments
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Returns crate names in payload order.
    pub fn crate_names(&self) -> impl Iterator<Item = &str> {
        self.fragments
            .iter()
            .map(|fragment| fragment.crate_name.as_str())
    }

    /// Builds a payload from decoded wire entries.
    ///
    /// Returns the index of the first entry whose crate name is blank.
    pub(crate) fn from_entries(entries: WireEntries) -> Result<Self, usize> {
        let mut payload = Self::new();
        for (position, (crate_name, implementors)) in entries.0.into_iter().enumerate() {
            if crate_name.trim().is_empty() {
                return Err(position);
            }
            payload.push(Fragment {
                crate_name,
                implementors,
            });
        }
        Ok(payload)
    }
}

impl From<Fragment> for ShardPayload {
    fn from(value: Fragment) -> Self {
        Self::single(value)
    }
}

impl FromIterator<Fragment> for ShardPayload {
    fn from_iter<I: IntoIterator<Item = Fragment>>(iter: I) -> Self {
        let mut payload = Self::new();
        for fragment in iter {
            payload.push(fragment);
        }
        payload
    }
}

impl IntoIterator for ShardPayload {
    type Item = Fragment;
    type IntoIter = std::vec::IntoIter<Fragment>;

    fn into_iter(self) -> Self::IntoIter {
        self.fragments.into_iter()
    }
}

impl Serialize for ShardPayload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fragments.len()))?;
        for fragment in &self.fragments {
            map.serialize_entry(&fragment.crate_name, &fragment.implementors)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ShardPayload {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = WireEntries::deserialize(deserializer)?;
        Self::from_entries(entries).map_err(|position| {
            de::Error::custom(format!(
                "shard crate name at position {position} must not be empty"
            ))
        })
    }
}

/// Raw object entries in source order, before crate-name validation.
pub(crate) struct WireEntries(Vec<(String, Vec<Implementor>)>);

impl<'de> Deserialize<'de> for WireEntries {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(WireEntriesVisitor)
    }
}

struct WireEntriesVisitor;

impl<'de> Visitor<'de> for WireEntriesVisitor {
    type Value = WireEntries;

    fn expecting(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("an object mapping crate names to implementor lists")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some(entry) = access.next_entry::<String, Vec<Implementor>>()? {
            entries.push(entry);
        }
        Ok(WireEntries(entries))
    }
}
