//! Selection sets: named subsets of an armature's bones.
mod errors;

pub use errors::StoreError;

use crate::naming;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::convert::TryFrom;
use std::slice;

/// The name a new selection set gets when the caller doesn't give one.
pub const DEFAULT_SET_NAME: &str = "NewSelectionSet";

/// A collection whose entries are identified by unique names.
///
/// Name uniquification only needs `keys()`, so anything that can list its
/// names can hand out fresh ones with `unique_name()`.
pub trait NamedEntryStore {
    type Entry;

    /// Stores an empty entry under a unique name derived from `name` and
    /// returns the name it was stored under.
    fn add(&mut self, name: &str) -> &str;

    fn remove(&mut self, name: &str) -> Result<Self::Entry, StoreError>;

    fn find(&self, name: &str) -> Option<usize>;

    fn keys(&self) -> Box<dyn Iterator<Item = &str> + '_>;

    fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    fn unique_name(&self, name: &str) -> String {
        naming::uniquify(name, self.keys())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionSet {
    name: String,
    #[serde(default)]
    bone_ids: Vec<String>,
}

impl SelectionSet {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            bone_ids: vec![],
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bone_ids(&self) -> &[String] {
        &self.bone_ids
    }

    pub fn contains_bone(&self, id: &str) -> bool {
        self.bone_ids.iter().any(|b| b == id)
    }

    /// Adds a bone unless it is already a member. Returns `true` if added.
    pub fn add_bone<S: AsRef<str>>(&mut self, id: S) -> bool {
        let id = id.as_ref();

        if self.contains_bone(id) {
            return false;
        }
        self.bone_ids.push(id.to_string());
        true
    }
}

/// An ordered collection of selection sets with one active entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSelectionSets")]
pub struct SelectionSets {
    sets: Vec<SelectionSet>,
    active: usize,
    #[serde(skip)]
    default_name: String,
}

#[derive(Deserialize)]
struct RawSelectionSets {
    #[serde(default)]
    sets: Vec<SelectionSet>,
    #[serde(default)]
    active: usize,
}

impl TryFrom<RawSelectionSets> for SelectionSets {
    type Error = StoreError;

    fn try_from(raw: RawSelectionSets) -> Result<Self, Self::Error> {
        let mut seen = HashSet::new();

        for set in &raw.sets {
            if !seen.insert(set.name.as_str()) {
                return Err(StoreError::DuplicateName(set.name.clone()));
            }
        }

        let mut sets = Self {
            sets: raw.sets,
            active: raw.active,
            ..Self::default()
        };
        sets.clamp_active();
        Ok(sets)
    }
}

impl Default for SelectionSets {
    fn default() -> Self {
        Self {
            sets: vec![],
            active: 0,
            default_name: DEFAULT_SET_NAME.to_string(),
        }
    }
}

impl SelectionSets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default_name<S: Into<String>>(mut self, name: S) -> Self {
        self.set_default_name(name);
        self
    }

    pub fn default_name(&self) -> &str {
        &self.default_name
    }

    pub fn set_default_name<S: Into<String>>(&mut self, name: S) {
        self.default_name = name.into();
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, SelectionSet> {
        self.sets.iter()
    }

    pub fn get(&self, name: &str) -> Option<&SelectionSet> {
        self.find(name).map(|i| &self.sets[i])
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active(&self) -> Option<&SelectionSet> {
        self.sets.get(self.active)
    }

    pub fn set_active(&mut self, index: usize) -> Result<(), StoreError> {
        self.check_index(index)?;
        self.active = index;
        Ok(())
    }

    /// Creates a selection set holding `bones`.
    ///
    /// An empty `input` falls back to the default name. The name is made
    /// unique among the existing sets and every bone is added once.
    pub fn create<I, S>(&mut self, input: &str, bones: I) -> &SelectionSet
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let name = if input.is_empty() {
            self.default_name.clone()
        } else {
            input.to_string()
        };

        self.add(&name);

        let index = self.sets.len() - 1;
        let set = &mut self.sets[index];
        for bone in bones {
            set.add_bone(bone);
        }

        debug!("[store] {} bones in {}", set.bone_ids.len(), set.name);
        set
    }

    /// Removes the set named `input`, or the active set if `input` is empty.
    pub fn delete(&mut self, input: &str) -> Result<SelectionSet, StoreError> {
        if input.is_empty() {
            self.remove_active()
        } else {
            self.remove_named(input)
        }
    }

    pub fn remove_named(&mut self, name: &str) -> Result<SelectionSet, StoreError> {
        let index = self
            .find(name)
            .ok_or_else(|| StoreError::NotFound(name.to_string()))?;
        let removed = self.sets.remove(index);

        self.clamp_active();
        info!("[store] removed {}", removed.name);
        Ok(removed)
    }

    /// Removes the active set. The last remaining set becomes active.
    pub fn remove_active(&mut self) -> Result<SelectionSet, StoreError> {
        if self.sets.is_empty() {
            return Err(StoreError::Empty);
        }

        let removed = self.sets.remove(self.active);
        self.active = self.sets.len().saturating_sub(1);

        info!("[store] removed active {}", removed.name);
        Ok(removed)
    }

    /// Renames the set at `index`, keeping names unique among the other sets.
    pub fn rename(&mut self, index: usize, new_name: &str) -> Result<&str, StoreError> {
        self.check_index(index)?;

        if self.sets[index].name != new_name {
            let others = self
                .sets
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != index)
                .map(|(_, s)| s.name.as_str());
            let unique = naming::uniquify(new_name, others);

            info!("[store] rename {} -> {}", self.sets[index].name, unique);
            self.sets[index].name = unique;
        }

        Ok(&self.sets[index].name)
    }

    fn check_index(&self, index: usize) -> Result<(), StoreError> {
        if index < self.sets.len() {
            Ok(())
        } else {
            Err(StoreError::IndexOutOfRange {
                index,
                len: self.sets.len(),
            })
        }
    }

    fn clamp_active(&mut self) {
        if self.active >= self.sets.len() {
            self.active = self.sets.len().saturating_sub(1);
        }
    }
}

impl NamedEntryStore for SelectionSets {
    type Entry = SelectionSet;

    fn add(&mut self, name: &str) -> &str {
        let name = self.unique_name(name);

        info!("[store] created {}", name);
        self.sets.push(SelectionSet::new(name));
        &self.sets[self.sets.len() - 1].name
    }

    fn remove(&mut self, name: &str) -> Result<SelectionSet, StoreError> {
        self.remove_named(name)
    }

    fn find(&self, name: &str) -> Option<usize> {
        self.sets.iter().position(|s| s.name == name)
    }

    fn keys(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        Box::new(self.sets.iter().map(|s| s.name.as_str()))
    }
}

impl<'a> IntoIterator for &'a SelectionSets {
    type Item = &'a SelectionSet;
    type IntoIter = slice::Iter<'a, SelectionSet>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
