use crate::domain::error::StubError;
use crate::domain::mapping::{RequestPattern, StubMapping};
use crate::domain::matcher::RequestMatcher;
use crate::domain::request::RecordedRequest;
use std::cmp::Reverse;
use std::collections::VecDeque;
use uuid::Uuid;

struct Entry {
    mapping: StubMapping,
    matcher: RequestMatcher,
    seq: u64,
}

impl Entry {
    fn id(&self) -> Option<Uuid> {
        self.mapping.id
    }
}

/// In-memory stub store and request journal.
///
/// Selection among several matching mappings: lowest priority first, then the
/// most recently registered one.
pub struct StubRegistry {
    entries: Vec<Entry>,
    next_seq: u64,
    journal: VecDeque<RecordedRequest>,
    journal_limit: Option<usize>,
}

impl StubRegistry {
    pub fn new() -> Self {
        Self::with_journal_limit(None)
    }

    pub fn with_journal_limit(journal_limit: Option<usize>) -> Self {
        Self {
            entries: Vec::new(),
            next_seq: 0,
            journal: VecDeque::new(),
            journal_limit,
        }
    }

    /// Validate and store a mapping, assigning an id if it has none. A mapping
    /// with an existing id replaces the stored one.
    pub fn register(&mut self, mut mapping: StubMapping) -> Result<StubMapping, StubError> {
        let matcher = RequestMatcher::compile(&mapping.request)?;
        mapping.response.validate()?;
        let id = *mapping.id.get_or_insert_with(Uuid::new_v4);
        let seq = self.next_seq;
        self.next_seq += 1;

        let entry = Entry {
            mapping: mapping.clone(),
            matcher,
            seq,
        };
        match self.entries.iter_mut().find(|e| e.id() == Some(id)) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
        Ok(mapping)
    }

    pub fn remove(&mut self, id: Uuid) -> Option<StubMapping> {
        let pos = self.entries.iter().position(|e| e.id() == Some(id))?;
        Some(self.entries.remove(pos).mapping)
    }

    pub fn get(&self, id: Uuid) -> Option<&StubMapping> {
        self.entries
            .iter()
            .find(|e| e.id() == Some(id))
            .map(|e| &e.mapping)
    }

    /// Drop every mapping and the journal.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.journal.clear();
    }

    pub fn reset_journal(&mut self) {
        self.journal.clear();
    }

    pub fn find_match(&self, req: &RecordedRequest) -> Option<&StubMapping> {
        self.entries
            .iter()
            .filter(|e| e.matcher.matches(req))
            .min_by_key(|e| (e.mapping.effective_priority(), Reverse(e.seq)))
            .map(|e| &e.mapping)
    }

    pub fn record(&mut self, req: RecordedRequest) {
        if self.journal_limit == Some(0) {
            return;
        }
        self.journal.push_back(req);
        if let Some(limit) = self.journal_limit {
            while self.journal.len() > limit {
                self.journal.pop_front();
            }
        }
    }

    /// Mappings newest first.
    pub fn mappings(&self) -> Vec<StubMapping> {
        let mut entries: Vec<&Entry> = self.entries.iter().collect();
        entries.sort_by_key(|e| Reverse(e.seq));
        entries.into_iter().map(|e| e.mapping.clone()).collect()
    }

    /// Journal in arrival order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.journal.iter().cloned().collect()
    }

    pub fn count_matching(&self, pattern: &RequestPattern) -> Result<usize, StubError> {
        let matcher = RequestMatcher::compile(pattern)?;
        Ok(self.journal.iter().filter(|r| matcher.matches(r)).count())
    }

    pub fn mapping_count(&self) -> usize {
        self.entries.len()
    }

    pub fn request_count(&self) -> usize {
        self.journal.len()
    }
}

impl Default for StubRegistry {
    fn default() -> Self {
        Self::new()
    }
}
