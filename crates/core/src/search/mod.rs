//! Field-weighted inverted index over saved items.
//!
//! The index is a derived, disposable structure rebuilt from the store
//! snapshot after every successful sync; it is never authoritative.
//! `build` takes the items as a parameter so the index stays decoupled
//! from any particular storage medium.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::Error;
use crate::item::SavedItem;

const TITLE_BOOST: f64 = 3.0;
const CONTENT_BOOST: f64 = 2.0;
const SUBREDDIT_BOOST: f64 = 1.5;
const AUTHOR_BOOST: f64 = 1.0;

/// Inverted index mapping tokens to the documents containing them,
/// with per-document accumulated facet weights.
#[derive(Debug, Default)]
pub struct SearchIndex {
    /// token -> (document id -> summed facet weight)
    postings: HashMap<String, HashMap<String, f64>>,
    documents: HashMap<String, SavedItem>,
    built: bool,
}

impl SearchIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the index from a snapshot of items, replacing any prior
    /// contents. Building from an empty snapshot is valid: subsequent
    /// searches return no matches rather than an error.
    pub fn build(&mut self, items: &[SavedItem]) {
        self.postings.clear();
        self.documents.clear();

        for item in items {
            self.index_facet(&item.id, &item.title, TITLE_BOOST);
            self.index_facet(&item.id, &item.content, CONTENT_BOOST);
            self.index_facet(&item.id, &item.subreddit, SUBREDDIT_BOOST);
            // Prefixed community form is kept as one literal token so the
            // facet survives tokenization; queries strip their own prefix.
            self.index_token(&item.id, format!("r/{}", item.subreddit.to_lowercase()), SUBREDDIT_BOOST);
            self.index_facet(&item.id, &item.author, AUTHOR_BOOST);

            self.documents.insert(item.id.clone(), item.clone());
        }

        self.built = true;
        tracing::debug!(documents = self.documents.len(), "search index built");
    }

    /// Search for items matching the query, best match first.
    ///
    /// A leading `r/` is stripped so a query meant as a subreddit filter
    /// matches the unprefixed facet too. Results are ordered by score
    /// descending, then `created_at` descending, then `id` ascending.
    ///
    /// # Errors
    ///
    /// Returns `Error::IndexNotBuilt` if called before any `build`, so
    /// callers can tell "no index yet" from "zero matches".
    pub fn search(&self, query: &str) -> Result<Vec<SavedItem>, Error> {
        if !self.built {
            return Err(Error::IndexNotBuilt);
        }

        let query = query.trim();
        let query = query.strip_prefix("r/").unwrap_or(query);

        let mut scores: HashMap<&str, f64> = HashMap::new();
        for token in tokenize(query) {
            if let Some(docs) = self.postings.get(&token) {
                for (id, weight) in docs {
                    *scores.entry(id.as_str()).or_insert(0.0) += weight;
                }
            }
        }

        let mut matches: Vec<(f64, &SavedItem)> = scores
            .into_iter()
            .filter_map(|(id, score)| self.documents.get(id).map(|item| (score, item)))
            .collect();

        matches.sort_by(|(score_a, item_a), (score_b, item_b)| {
            score_b
                .partial_cmp(score_a)
                .unwrap_or(Ordering::Equal)
                .then_with(|| item_b.created_at.cmp(&item_a.created_at))
                .then_with(|| item_a.id.cmp(&item_b.id))
        });

        Ok(matches.into_iter().map(|(_, item)| item.clone()).collect())
    }

    /// Number of indexed documents, for diagnostics.
    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    /// Whether any build has completed.
    pub fn is_built(&self) -> bool {
        self.built
    }

    fn index_facet(&mut self, id: &str, text: &str, weight: f64) {
        for token in tokenize(text) {
            self.index_token(id, token, weight);
        }
    }

    fn index_token(&mut self, id: &str, token: String, weight: f64) {
        if token.is_empty() {
            return;
        }
        *self
            .postings
            .entry(token)
            .or_default()
            .entry(id.to_string())
            .or_insert(0.0) += weight;
    }
}

fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::ItemKind;
    use chrono::{TimeZone, Utc};

    fn make_item(id: &str, title: &str, subreddit: &str, author: &str, created_ms: i64) -> SavedItem {
        SavedItem {
            id: id.to_string(),
            title: title.to_string(),
            subreddit: subreddit.to_string(),
            url: format!("https://reddit.com/{id}"),
            author: author.to_string(),
            kind: if title.is_empty() { ItemKind::Comment } else { ItemKind::Post },
            content: String::new(),
            score: 0,
            thumbnail: String::new(),
            created_at: Utc.timestamp_millis_opt(created_ms).unwrap(),
            saved_at: Utc.timestamp_millis_opt(created_ms).unwrap(),
        }
    }

    #[test]
    fn test_search_before_build_fails() {
        let index = SearchIndex::new();
        assert!(matches!(index.search("anything"), Err(Error::IndexNotBuilt)));
    }

    #[test]
    fn test_build_empty_then_search_returns_empty() {
        let mut index = SearchIndex::new();
        index.build(&[]);
        assert_eq!(index.search("anything").unwrap(), Vec::<SavedItem>::new());
        assert_eq!(index.document_count(), 0);
    }

    #[test]
    fn test_prefix_agnostic_subreddit_match() {
        let mut index = SearchIndex::new();
        index.build(&[make_item("a", "some title", "foo", "alice", 1_000)]);

        let bare = index.search("foo").unwrap();
        let prefixed = index.search("r/foo").unwrap();
        assert_eq!(bare.len(), 1);
        assert_eq!(prefixed.len(), 1);
        assert_eq!(bare[0].id, prefixed[0].id);
    }

    #[test]
    fn test_title_match_outranks_author_match() {
        let mut index = SearchIndex::new();
        index.build(&[
            make_item("by_author", "unrelated", "misc", "tokio", 5_000),
            make_item("by_title", "all about tokio", "misc", "alice", 1_000),
        ]);

        let results = index.search("tokio").unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].id, "by_title");
        assert_eq!(results[1].id, "by_author");
    }

    #[test]
    fn test_tied_scores_break_by_created_at_desc() {
        let mut index = SearchIndex::new();
        index.build(&[
            make_item("older", "rust news", "misc", "alice", 1_000),
            make_item("newer", "rust news", "misc", "alice", 2_000),
        ]);

        let results = index.search("rust").unwrap();
        assert_eq!(results[0].id, "newer");
        assert_eq!(results[1].id, "older");
    }

    #[test]
    fn test_multi_token_query_accumulates_score() {
        let mut index = SearchIndex::new();
        index.build(&[
            make_item("both", "async rust", "misc", "alice", 1_000),
            make_item("one", "async cooking", "misc", "alice", 2_000),
        ]);

        let results = index.search("async rust").unwrap();
        assert_eq!(results[0].id, "both");
    }

    #[test]
    fn test_no_match_returns_empty() {
        let mut index = SearchIndex::new();
        index.build(&[make_item("a", "title", "sub", "alice", 1_000)]);
        assert!(index.search("zzzzz").unwrap().is_empty());
    }

    #[test]
    fn test_rebuild_replaces_contents() {
        let mut index = SearchIndex::new();
        index.build(&[make_item("a", "rust", "sub", "alice", 1_000)]);
        index.build(&[make_item("b", "tokio", "sub", "alice", 1_000)]);

        assert_eq!(index.document_count(), 1);
        assert!(index.search("rust").unwrap().is_empty());
        assert_eq!(index.search("tokio").unwrap().len(), 1);
    }
}
