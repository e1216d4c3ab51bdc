use alloc::string::String;
use alloc::vec::Vec;

/// A named subdivision of a group, e.g. one disc of an album.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Section<R> {
    pub label: String,
    pub records: Vec<R>,
}

impl<R> Section<R> {
    pub fn new(label: impl Into<String>, records: Vec<R>) -> Self {
        Self {
            label: label.into(),
            records,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GroupBody<R> {
    Records(Vec<R>),
    /// Pre-split sections (album grouping).
    Sections(Vec<Section<R>>),
}

/// An ordered collection of records with a stable identity and an optional header.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Group<K, R> {
    pub id: K,
    pub header: Option<String>,
    pub body: GroupBody<R>,
}

impl<K, R> Group<K, R> {
    pub fn new(id: K, records: Vec<R>) -> Self {
        Self {
            id,
            header: None,
            body: GroupBody::Records(records),
        }
    }

    pub fn with_sections(id: K, sections: Vec<Section<R>>) -> Self {
        Self {
            id,
            header: None,
            body: GroupBody::Sections(sections),
        }
    }

    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(header.into());
        self
    }

    /// The header label, if present and non-empty.
    pub fn header_label(&self) -> Option<&str> {
        self.header.as_deref().filter(|label| !label.is_empty())
    }

    pub fn record_count(&self) -> usize {
        match &self.body {
            GroupBody::Records(records) => records.len(),
            GroupBody::Sections(sections) => sections.iter().map(|s| s.records.len()).sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.record_count() == 0
    }

    pub fn section(&self, section: usize) -> Option<&Section<R>> {
        match &self.body {
            GroupBody::Records(_) => None,
            GroupBody::Sections(sections) => sections.get(section),
        }
    }

    /// The record list a layout item points into.
    pub fn records_in(&self, section: Option<usize>) -> &[R] {
        match (&self.body, section) {
            (GroupBody::Records(records), None) => records,
            (GroupBody::Sections(sections), Some(i)) => {
                sections.get(i).map(|s| s.records.as_slice()).unwrap_or(&[])
            }
            _ => &[],
        }
    }
}

/// Splits an ordered record list into consecutive sections.
///
/// A new section starts whenever `section_of` changes between neighbours, so album tracks must
/// already be ordered by disc then track number. `label_of` receives the section key of the
/// first record of each run.
pub fn split_sections<R, D: PartialEq>(
    records: impl IntoIterator<Item = R>,
    mut section_of: impl FnMut(&R) -> D,
    mut label_of: impl FnMut(&D) -> String,
) -> Vec<Section<R>> {
    let mut out: Vec<Section<R>> = Vec::new();
    let mut current: Option<D> = None;
    for record in records {
        let key = section_of(&record);
        match out.last_mut() {
            Some(section) if current.as_ref() == Some(&key) => section.records.push(record),
            _ => {
                out.push(Section::new(label_of(&key), alloc::vec![record]));
                current = Some(key);
            }
        }
    }
    out
}

/// The jump-bar bucket a name sorts under: its uppercased first letter, or `'#'`.
pub fn initial_of(name: &str) -> char {
    match name.trim_start().chars().next() {
        Some(c) if c.is_alphabetic() => c.to_uppercase().next().unwrap_or(c),
        _ => '#',
    }
}

/// Buckets records into A–Z groups keyed by [`initial_of`] their name.
///
/// Records must already be sorted by name; buckets keep that order and get the initial as their
/// header. Non-alphabetic names land in a `'#'` bucket.
pub fn group_by_initial<R>(
    records: impl IntoIterator<Item = R>,
    mut name_of: impl FnMut(&R) -> &str,
) -> Vec<Group<char, R>> {
    let mut out: Vec<Group<char, R>> = Vec::new();
    for record in records {
        let initial = initial_of(name_of(&record));
        if let Some(group) = out.iter_mut().find(|g| g.id == initial) {
            if let GroupBody::Records(records) = &mut group.body {
                records.push(record);
                continue;
            }
        }
        let mut header = String::new();
        header.push(initial);
        out.push(Group::new(initial, alloc::vec![record]).with_header(header));
    }
    out
}
