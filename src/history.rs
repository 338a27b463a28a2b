use serde::{Deserialize, Serialize};

pub const MAX_HISTORY_ITEMS: usize = 10;

/// Recent search queries, newest first and free of duplicates.
///
/// Serializes as a plain JSON array so clients can keep it in local storage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchHistory {
    entries: Vec<String>,
}

impl SearchHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a query. Blank queries are ignored; a repeated query moves to the front.
    pub fn add(&mut self, query: &str) {
        let query = query.trim();
        if query.is_empty() {
            return;
        }
        self.entries.retain(|entry| entry != query);
        self.entries.insert(0, query.to_string());
        self.entries.truncate(MAX_HISTORY_ITEMS);
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Restores a history from its stored JSON form; anything unreadable yields an empty history.
    pub fn from_json(raw: &str) -> Self {
        match serde_json::from_str::<Vec<String>>(raw) {
            Ok(stored) => {
                // Replay oldest first so the stored order and limits are re-applied.
                let mut history = Self::new();
                for query in stored.iter().rev() {
                    history.add(query);
                }
                history
            }
            Err(e) => {
                tracing::warn!("Discarding unreadable search history: {}", e);
                Self::new()
            }
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.entries).unwrap_or_else(|_| "[]".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newest_first_without_duplicates() {
        let mut history = SearchHistory::new();
        history.add("化工");
        history.add("GDP");
        history.add("  化工 ");
        assert_eq!(history.entries(), ["化工", "GDP"]);
    }

    #[test]
    fn blank_queries_are_ignored() {
        let mut history = SearchHistory::new();
        history.add("   ");
        history.add("");
        assert!(history.entries().is_empty());
    }

    #[test]
    fn keeps_only_the_ten_most_recent() {
        let mut history = SearchHistory::new();
        for i in 0..15 {
            history.add(&format!("query {}", i));
        }
        assert_eq!(history.entries().len(), MAX_HISTORY_ITEMS);
        assert_eq!(history.entries()[0], "query 14");
        assert_eq!(history.entries()[9], "query 5");
    }

    #[test]
    fn clear_empties_the_history() {
        let mut history = SearchHistory::new();
        history.add("美联储");
        history.clear();
        assert!(history.entries().is_empty());
    }

    #[test]
    fn json_round_trip_and_corrupt_input() {
        let mut history = SearchHistory::new();
        history.add("a");
        history.add("b");
        assert_eq!(history.to_json(), r#"["b","a"]"#);
        assert_eq!(SearchHistory::from_json(&history.to_json()), history);
        assert!(SearchHistory::from_json("{not json").entries().is_empty());
    }
}
