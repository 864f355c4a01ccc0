use smallvec::SmallVec;

/// One timed caption block.
///
/// `start` and `end` are seconds from the beginning of playback, both inclusive. For illustration
/// captions `text` is an asset reference instead of spoken words.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CaptionEntry {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

impl CaptionEntry {
    pub fn contains(&self, time_secs: f64) -> bool {
        time_secs >= self.start && time_secs <= self.end
    }

    pub fn has_started(&self, time_secs: f64) -> bool {
        time_secs >= self.start
    }

    /// Stacked sub-lines of a multi-line caption.
    pub fn lines(&self) -> SmallVec<[&str; 4]> {
        self.text.split('\n').collect()
    }
}

/// Ordered captions in file order. Never re-sorted.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct CaptionSet {
    entries: Vec<CaptionEntry>,
}

impl CaptionSet {
    pub fn new(entries: Vec<CaptionEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[CaptionEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&CaptionEntry> {
        self.entries.get(idx)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CaptionEntry> {
        self.entries.iter()
    }

    /// Index of the most recently started entry.
    ///
    /// Scans in file order and stops at the first entry that has not started yet.
    pub fn last_started(&self, time_secs: f64) -> Option<usize> {
        let mut last = None;
        for (i, e) in self.entries.iter().enumerate() {
            if !e.has_started(time_secs) {
                break;
            }
            last = Some(i);
        }
        last
    }

    /// First entry whose `[start, end]` window contains `time_secs`.
    pub fn first_containing(&self, time_secs: f64) -> Option<(usize, &CaptionEntry)> {
        self.entries
            .iter()
            .enumerate()
            .find(|(_, e)| e.contains(time_secs))
    }

    pub fn into_entries(self) -> Vec<CaptionEntry> {
        self.entries
    }
}

impl<'a> IntoIterator for &'a CaptionSet {
    type Item = &'a CaptionEntry;
    type IntoIter = std::slice::Iter<'a, CaptionEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
