use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TagId(Uuid);

impl TagId {
    fn fresh() -> Self {
        Self(Uuid::new_v4())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagDraftEntry {
    pub id: TagId,
    pub value: String,
}

impl TagDraftEntry {
    fn new(value: impl Into<String>) -> Self {
        Self {
            id: TagId::fresh(),
            value: value.into(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagEditor {
    entries: Vec<TagDraftEntry>,
}

impl Default for TagEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl TagEditor {
    pub fn new() -> Self {
        Self {
            entries: vec![TagDraftEntry::new("")],
        }
    }

    /// One entry per existing tag plus a trailing empty slot.
    pub fn seeded<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut entries: Vec<TagDraftEntry> = tags.into_iter().map(TagDraftEntry::new).collect();
        entries.push(TagDraftEntry::new(""));
        Self { entries }
    }

    pub fn entries(&self) -> &[TagDraftEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `false` when `index` is out of range.
    pub fn set_value(&mut self, index: usize, value: impl Into<String>) -> bool {
        match self.entries.get_mut(index) {
            Some(entry) => {
                entry.value = value.into();
                true
            }
            None => false,
        }
    }

    pub fn can_add_tag(&self) -> bool {
        self.entries.last().is_some_and(|entry| !entry.is_blank())
    }

    /// Appends a new empty slot; a no-op while the last slot is still blank.
    pub fn add_tag(&mut self) -> bool {
        if !self.can_add_tag() {
            return false;
        }
        self.entries.push(TagDraftEntry::new(""));
        true
    }

    pub fn shows_delete(&self) -> bool {
        self.entries.len() > 1
    }

    /// Removes the entry at `index`. Deleting the only entry leaves a single fresh empty one.
    pub fn delete_tag(&mut self, index: usize) -> bool {
        if index >= self.entries.len() {
            return false;
        }
        if self.entries.len() > 1 {
            self.entries.remove(index);
        } else {
            self.entries = vec![TagDraftEntry::new("")];
        }
        true
    }

    /// Non-blank values, trimmed, in order. Duplicates are kept.
    pub fn committed(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|entry| entry.value.trim())
            .filter(|value| !value.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
#[path = "tests/tags_tests.rs"]
mod tests;
