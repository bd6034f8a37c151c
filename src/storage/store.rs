//! SQLite-backed index store
//!
//! The store is opened once at startup, populated by the indexer, and then
//! serves reads for the process lifetime. All write methods take `&mut self`
//! so no writes can be issued once the store is shared with read-serving
//! components.

use crate::storage::schema::{initialize_schema, FTS_SCHEMA_SQL};
use crate::storage::{PageRecord, PageSummary, SearchHit, SearchMode};
use crate::{DocdexError, Result};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// Persistent page index with an optional accelerated search structure
pub struct IndexStore {
    conn: Connection,
    mode: SearchMode,
    ready: bool,
}

impl IndexStore {
    /// Opens or creates the index database at the given path.
    ///
    /// FTS5 availability is probed exactly once here; an engine without
    /// full-text support degrades to substring search and is never treated
    /// as an error.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        Self::from_connection(conn)
    }

    /// Creates an in-memory store, used by tests and throwaway indexes
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        initialize_schema(&conn)?;

        let mode = match conn.execute_batch(FTS_SCHEMA_SQL) {
            Ok(()) => {
                tracing::info!("FTS5 full-text search enabled");
                SearchMode::Accelerated
            }
            Err(e) => {
                tracing::warn!("FTS5 not available, degrading to substring search: {}", e);
                SearchMode::Degraded
            }
        };

        let mut store = Self {
            conn,
            mode,
            ready: false,
        };

        // An already-populated index left by a previous process is
        // immediately servable.
        if store.page_count()? > 0 {
            store.ready = true;
        }

        Ok(store)
    }

    /// Which search strategy this store serves
    pub fn mode(&self) -> SearchMode {
        self.mode
    }

    /// Fails with `IndexUnavailable` until an index build has completed
    /// (or an existing populated index was opened)
    pub fn ensure_ready(&self) -> Result<()> {
        if self.ready {
            Ok(())
        } else {
            Err(DocdexError::IndexUnavailable)
        }
    }

    /// Marks the store as servable; called by the indexer once population
    /// has run to completion
    pub(crate) fn mark_ready(&mut self) {
        self.ready = true;
    }

    // ===== Population (indexer-phase writes) =====

    /// Inserts or replaces one page record, stamping `indexed_at` with the
    /// current time
    pub fn upsert_page(
        &mut self,
        path: &str,
        title: &str,
        content: &str,
        size_bytes: u64,
    ) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT OR REPLACE INTO pages (path, title, content, size_bytes, indexed_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![path, title, content, size_bytes as i64, now],
        )?;
        Ok(())
    }

    /// Drops all page records and the derived search structure's contents
    pub fn clear(&mut self) -> Result<()> {
        if self.mode == SearchMode::Accelerated {
            self.conn
                .execute("INSERT INTO pages_fts(pages_fts) VALUES('delete-all')", [])?;
        }
        self.conn.execute("DELETE FROM pages", [])?;
        Ok(())
    }

    /// Rebuilds the derived full-text structure from the page table.
    ///
    /// A no-op in degraded mode; the absence of the accelerated structure
    /// is not an error.
    pub fn rebuild_search_index(&mut self) -> Result<()> {
        match self.mode {
            SearchMode::Accelerated => {
                self.conn
                    .execute("INSERT INTO pages_fts(pages_fts) VALUES('rebuild')", [])?;
                tracing::debug!("rebuilt FTS5 index");
            }
            SearchMode::Degraded => {
                tracing::debug!("no accelerated index to rebuild");
            }
        }
        Ok(())
    }

    // ===== Reads =====

    /// Total number of page records
    pub fn page_count(&self) -> Result<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM pages", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    /// Fetches a page record by its root-relative path
    pub fn get_page(&self, path: &str) -> Result<Option<PageRecord>> {
        let record = self
            .conn
            .query_row(
                "SELECT path, title, content, size_bytes, indexed_at
                 FROM pages WHERE path = ?1",
                params![path],
                |row| {
                    Ok(PageRecord {
                        path: row.get(0)?,
                        title: row.get(1)?,
                        content: row.get(2)?,
                        size_bytes: row.get::<_, i64>(3)? as u64,
                        indexed_at: row.get(4)?,
                    })
                },
            )
            .optional()?;

        Ok(record)
    }

    /// Whether a page with this path has been indexed
    pub fn contains_path(&self, path: &str) -> Result<bool> {
        let found: Option<i64> = self
            .conn
            .query_row(
                "SELECT 1 FROM pages WHERE path = ?1",
                params![path],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    /// Lists pages ordered by path, optionally filtered by a glob pattern
    pub fn list(&self, pattern: Option<&str>, limit: usize) -> Result<Vec<PageSummary>> {
        let map_row = |row: &rusqlite::Row<'_>| {
            Ok(PageSummary {
                path: row.get(0)?,
                title: row.get(1)?,
            })
        };

        let summaries = match pattern {
            Some(glob) => {
                let mut stmt = self.conn.prepare(
                    "SELECT path, title FROM pages WHERE path GLOB ?1 ORDER BY path LIMIT ?2",
                )?;
                let rows = stmt.query_map(params![glob, limit as i64], map_row)?;
                rows.collect::<std::result::Result<Vec<_>, _>>()?
            }
            None => {
                let mut stmt = self
                    .conn
                    .prepare("SELECT path, title FROM pages ORDER BY path LIMIT ?1")?;
                let rows = stmt.query_map(params![limit as i64], map_row)?;
                rows.collect::<std::result::Result<Vec<_>, _>>()?
            }
        };

        Ok(summaries)
    }

    /// Ranked FTS5 search over title and content; lower scores are better
    pub(crate) fn search_ranked(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>> {
        let match_query = fts_match_query(query);
        if match_query.is_empty() {
            return Ok(Vec::new());
        }

        let mut stmt = self.conn.prepare(
            "SELECT p.path, p.title,
                    snippet(pages_fts, 1, '<mark>', '</mark>', '...', 64) AS snippet,
                    bm25(pages_fts) AS score
             FROM pages_fts
             JOIN pages p ON pages_fts.rowid = p.id
             WHERE pages_fts MATCH ?1
             ORDER BY score
             LIMIT ?2",
        )?;

        let rows = stmt.query_map(params![match_query, limit as i64], |row| {
            Ok(SearchHit {
                path: row.get(0)?,
                title: row.get(1)?,
                snippet: row.get(2)?,
                score: row.get(3)?,
            })
        })?;

        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// Substring-containment fallback search; unranked, ordered by path.
    ///
    /// The snippet is a fixed-length window of content starting shortly
    /// before the first match, or the content prefix when the match was in
    /// the title only.
    pub(crate) fn search_scan(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>> {
        let needle = query.trim();

        let mut stmt = self.conn.prepare(
            "SELECT path, title,
                    substr(content, max(1, instr(lower(content), lower(?1)) - 50), 150) AS snippet
             FROM pages
             WHERE instr(lower(title), lower(?1)) > 0
                OR instr(lower(content), lower(?1)) > 0
             ORDER BY path
             LIMIT ?2",
        )?;

        let rows = stmt.query_map(params![needle, limit as i64], |row| {
            Ok(SearchHit {
                path: row.get(0)?,
                title: row.get(1)?,
                snippet: row.get(2)?,
                score: 0.0,
            })
        })?;

        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }
}

/// Builds an FTS5 MATCH expression from free-form query text.
///
/// Every whitespace-separated term is double-quoted so punctuation in the
/// user's query cannot be misread as MATCH syntax; the terms combine with
/// FTS5's implicit AND. Terms with no word characters at all are dropped,
/// since a phrase with zero tokens is a MATCH syntax error.
fn fts_match_query(query: &str) -> String {
    query
        .split_whitespace()
        .filter(|term| term.chars().any(char::is_alphanumeric))
        .map(|term| format!("\"{}\"", term.replace('"', "\"\"")))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn populated_store() -> IndexStore {
        let mut store = IndexStore::open_in_memory().unwrap();
        store
            .upsert_page(
                "C/cspice/spkpos_c.html",
                "spkpos_c",
                "Return the position of a target body relative to an observing \
                 body using ephemeris data",
                512,
            )
            .unwrap();
        store
            .upsert_page(
                "ug/time.html",
                "Time Required Reading",
                "Documentation about ephemeris time and other time systems",
                256,
            )
            .unwrap();
        store
            .upsert_page(
                "ug/kernel.html",
                "Kernel Required Reading",
                "Information about kernel files and loading them",
                128,
            )
            .unwrap();
        store.rebuild_search_index().unwrap();
        store.mark_ready();
        store
    }

    #[test]
    fn test_open_in_memory_enables_fts() {
        let store = IndexStore::open_in_memory().unwrap();
        assert_eq!(store.mode(), SearchMode::Accelerated);
    }

    #[test]
    fn test_upsert_and_get_page() {
        let store = populated_store();
        let page = store.get_page("ug/time.html").unwrap().unwrap();
        assert_eq!(page.title, "Time Required Reading");
        assert_eq!(page.size_bytes, 256);
        assert!(!page.indexed_at.is_empty());
    }

    #[test]
    fn test_get_missing_page() {
        let store = populated_store();
        assert!(store.get_page("nope.html").unwrap().is_none());
    }

    #[test]
    fn test_upsert_replaces_existing_path() {
        let mut store = populated_store();
        store
            .upsert_page("ug/time.html", "Updated", "new content", 99)
            .unwrap();

        assert_eq!(store.page_count().unwrap(), 3);
        let page = store.get_page("ug/time.html").unwrap().unwrap();
        assert_eq!(page.title, "Updated");
    }

    #[test]
    fn test_contains_path() {
        let store = populated_store();
        assert!(store.contains_path("ug/kernel.html").unwrap());
        assert!(!store.contains_path("ug/missing.html").unwrap());
    }

    #[test]
    fn test_clear_empties_store() {
        let mut store = populated_store();
        store.clear().unwrap();
        assert_eq!(store.page_count().unwrap(), 0);
    }

    #[test]
    fn test_list_orders_by_path() {
        let store = populated_store();
        let pages = store.list(None, 50).unwrap();
        let paths: Vec<_> = pages.iter().map(|p| p.path.as_str()).collect();
        assert_eq!(
            paths,
            vec!["C/cspice/spkpos_c.html", "ug/kernel.html", "ug/time.html"]
        );
    }

    #[test]
    fn test_list_glob_filter() {
        let store = populated_store();
        let pages = store.list(Some("ug/*.html"), 50).unwrap();
        assert_eq!(pages.len(), 2);
        assert!(pages.iter().all(|p| p.path.starts_with("ug/")));
    }

    #[test]
    fn test_list_respects_limit() {
        let store = populated_store();
        let pages = store.list(None, 2).unwrap();
        assert_eq!(pages.len(), 2);
    }

    #[test]
    fn test_ranked_search_orders_ascending_by_score() {
        let store = populated_store();
        let hits = store.search_ranked("ephemeris", 10).unwrap();
        assert!(!hits.is_empty());
        for pair in hits.windows(2) {
            assert!(pair[0].score <= pair[1].score);
        }
    }

    #[test]
    fn test_ranked_search_special_characters_do_not_error() {
        let store = populated_store();
        let hits = store.search_ranked("ephemeris\" OR (", 10).unwrap();
        // Quoting turns the punctuation into literal terms; no match is fine,
        // a MATCH syntax error is not.
        assert!(hits.len() <= 3);
    }

    #[test]
    fn test_scan_search_is_case_insensitive() {
        let store = populated_store();
        let hits = store.search_scan("EPHEMERIS", 10).unwrap();
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn test_scan_search_matches_title_only() {
        let store = populated_store();
        let hits = store.search_scan("spkpos", 10).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].path, "C/cspice/spkpos_c.html");
        assert_eq!(hits[0].score, 0.0);
    }

    #[test]
    fn test_scan_snippet_prefix_when_match_in_title() {
        let store = populated_store();
        let hits = store.search_scan("Required Reading", 10).unwrap();
        // "Required Reading" appears only in titles, so the snippet falls
        // back to the content prefix.
        assert!(hits
            .iter()
            .all(|h| !h.snippet.is_empty() && h.snippet.len() <= 150));
    }

    #[test]
    fn test_degraded_results_are_subset_of_ranked() {
        let store = populated_store();

        let ranked: Vec<String> = store
            .search_ranked("ephemeris", 5)
            .unwrap()
            .into_iter()
            .map(|h| h.path)
            .collect();
        let scanned: Vec<String> = store
            .search_scan("ephemeris", 5)
            .unwrap()
            .into_iter()
            .map(|h| h.path)
            .collect();

        assert!(!ranked.is_empty());
        assert!(!scanned.is_empty());
        // Every literal-substring match must also be findable by the
        // accelerated path; the accelerated path may find more.
        for path in &scanned {
            assert!(ranked.contains(path), "{path} missing from ranked results");
        }
    }

    #[test]
    fn test_ensure_ready_gates_until_marked() {
        let store = IndexStore::open_in_memory().unwrap();
        assert!(matches!(
            store.ensure_ready(),
            Err(DocdexError::IndexUnavailable)
        ));
    }

    #[test]
    fn test_reopened_populated_store_is_ready() {
        let dir = tempfile::TempDir::new().unwrap();
        let db_path = dir.path().join("index.db");

        {
            let mut store = IndexStore::open(&db_path).unwrap();
            store.upsert_page("a.html", "A", "alpha", 1).unwrap();
            store.rebuild_search_index().unwrap();
        }

        let store = IndexStore::open(&db_path).unwrap();
        assert!(store.ensure_ready().is_ok());
        assert_eq!(store.page_count().unwrap(), 1);
    }

    #[test]
    fn test_fts_match_query_quotes_terms() {
        assert_eq!(fts_match_query("ephemeris time"), "\"ephemeris\" \"time\"");
        assert_eq!(fts_match_query("a\"b"), "\"a\"\"b\"");
    }
}
