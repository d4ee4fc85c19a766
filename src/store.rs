use crate::error::{QuarterError, Result};
use crate::model::{AnalysisSummary, CommitRecord, QuarterRange, StoredAnalysis, SCHEMA_VERSION};
use chrono::{DateTime, Local, TimeZone, Utc};
use log::debug;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::BTreeMap;
use std::path::Path;

pub const DEFAULT_DB_PATH: &str = ".gquarter/results.db";

pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let db_path = db_path.as_ref();
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        debug!("Opening results database at {}", db_path.display());
        let conn = Connection::open(db_path)?;
        let mut store = Self { conn };
        store.initialize()?;
        Ok(store)
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let mut store = Self { conn };
        store.initialize()?;
        Ok(store)
    }

    fn initialize(&mut self) -> Result<()> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS analysis_results (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_name TEXT NOT NULL,
                quarter TEXT NOT NULL,
                total_commits INTEGER NOT NULL,
                total_files INTEGER NOT NULL,
                lines_added INTEGER NOT NULL,
                lines_deleted INTEGER NOT NULL,
                commits_by_date TEXT NOT NULL,
                range_start TEXT NOT NULL,
                range_end TEXT NOT NULL,
                created_at INTEGER NOT NULL
            );
            CREATE TABLE IF NOT EXISTS commit_records (
                analysis_id INTEGER NOT NULL,
                seq INTEGER NOT NULL,
                hash TEXT NOT NULL,
                author_name TEXT NOT NULL,
                author_email TEXT NOT NULL,
                timestamp INTEGER NOT NULL,
                message TEXT NOT NULL,
                files_changed INTEGER NOT NULL,
                insertions INTEGER NOT NULL,
                deletions INTEGER NOT NULL,
                PRIMARY KEY (analysis_id, seq),
                FOREIGN KEY (analysis_id) REFERENCES analysis_results(id)
            );
            CREATE INDEX IF NOT EXISTS idx_results_user ON analysis_results(user_name, quarter);
            ",
        )?;
        self.check_schema_version()?;
        Ok(())
    }

    fn check_schema_version(&mut self) -> Result<()> {
        let user_version: i64 = self
            .conn
            .query_row("PRAGMA user_version;", [], |row| row.get(0))?;

        if user_version == 0 {
            let set_stmt = format!("PRAGMA user_version = {SCHEMA_VERSION};");
            self.conn.execute_batch(&set_stmt)?;
        } else if user_version != SCHEMA_VERSION as i64 {
            return Err(QuarterError::Store(format!(
                "Schema version mismatch: expected {}, found {}",
                SCHEMA_VERSION, user_version
            )));
        }

        Ok(())
    }

    /// Persist a summary with all of its commit records; returns the new id.
    pub fn save(
        &mut self,
        user: &str,
        quarter: &str,
        range: &QuarterRange,
        summary: &AnalysisSummary,
    ) -> Result<i64> {
        let tx = self.conn.transaction()?;

        tx.execute(
            "INSERT INTO analysis_results
                (user_name, quarter, total_commits, total_files, lines_added, lines_deleted, commits_by_date, range_start, range_end, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                user,
                quarter,
                summary.total_commits as i64,
                summary.total_files as i64,
                summary.lines_added as i64,
                summary.lines_deleted as i64,
                serde_json::to_string(&summary.commits_by_date)?,
                range.start,
                range.end,
                Utc::now().timestamp_millis()
            ],
        )?;
        let id = tx.last_insert_rowid();

        {
            let mut insert_commit_stmt = tx.prepare(
                "INSERT INTO commit_records
                    (analysis_id, seq, hash, author_name, author_email, timestamp, message, files_changed, insertions, deletions)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )?;
            for (seq, c) in summary.commits.iter().enumerate() {
                insert_commit_stmt.execute(params![
                    id,
                    seq as i64,
                    c.hash,
                    c.author_name,
                    c.author_email,
                    c.timestamp.timestamp(),
                    c.message,
                    c.files_changed,
                    c.insertions,
                    c.deletions
                ])?;
            }
        }

        tx.commit()?;
        debug!("Stored analysis {id} with {} commit(s)", summary.commits.len());
        Ok(id)
    }

    pub fn find_by_user(&self, user: &str) -> Result<Vec<StoredAnalysis>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_name, quarter, created_at, total_commits, total_files, lines_added, lines_deleted, commits_by_date, range_start, range_end
             FROM analysis_results WHERE user_name = ? ORDER BY id DESC",
        )?;
        let rows = stmt.query_map(params![user], header_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    pub fn find_by_user_and_quarter(&self, user: &str, quarter: &str) -> Result<Vec<StoredAnalysis>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_name, quarter, created_at, total_commits, total_files, lines_added, lines_deleted, commits_by_date, range_start, range_end
             FROM analysis_results WHERE user_name = ? AND quarter = ? ORDER BY id DESC",
        )?;
        let rows = stmt.query_map(params![user, quarter], header_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Load a stored analysis header and its summary with commit records.
    pub fn load(&self, id: i64) -> Result<Option<(StoredAnalysis, AnalysisSummary)>> {
        let header = self
            .conn
            .query_row(
                "SELECT id, user_name, quarter, created_at, total_commits, total_files, lines_added, lines_deleted, commits_by_date, range_start, range_end
                 FROM analysis_results WHERE id = ?",
                params![id],
                header_from_row,
            )
            .optional()?;

        let Some(header) = header else {
            return Ok(None);
        };

        let mut stmt = self.conn.prepare(
            "SELECT hash, author_name, author_email, timestamp, message, files_changed, insertions, deletions
             FROM commit_records WHERE analysis_id = ? ORDER BY seq",
        )?;
        let commits = stmt
            .query_map(params![id], record_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let summary = AnalysisSummary {
            total_commits: header.total_commits,
            total_files: header.total_files,
            lines_added: header.lines_added,
            lines_deleted: header.lines_deleted,
            commits_by_date: header.commits_by_date.clone(),
            commits,
        };
        Ok(Some((header, summary)))
    }
}

fn header_from_row(row: &Row<'_>) -> rusqlite::Result<StoredAnalysis> {
    let created_ms: i64 = row.get(3)?;
    let created_at = Utc.timestamp_millis_opt(created_ms).single().ok_or_else(|| {
        rusqlite::Error::InvalidColumnType(3, "created_at".to_string(), rusqlite::types::Type::Integer)
    })?;

    let by_date_json: String = row.get(8)?;
    let commits_by_date: BTreeMap<String, u64> = serde_json::from_str(&by_date_json).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(8, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(StoredAnalysis {
        id: row.get(0)?,
        user: row.get(1)?,
        quarter: row.get(2)?,
        created_at,
        total_commits: row.get::<_, i64>(4)? as u64,
        total_files: row.get::<_, i64>(5)? as u64,
        lines_added: row.get::<_, i64>(6)? as u64,
        lines_deleted: row.get::<_, i64>(7)? as u64,
        commits_by_date,
        range: QuarterRange::new(row.get(9)?, row.get(10)?),
    })
}

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<CommitRecord> {
    let ts: i64 = row.get(3)?;
    let timestamp: DateTime<Local> = Local.timestamp_opt(ts, 0).single().ok_or_else(|| {
        rusqlite::Error::InvalidColumnType(3, "timestamp".to_string(), rusqlite::types::Type::Integer)
    })?;

    Ok(CommitRecord {
        hash: row.get(0)?,
        author_name: row.get(1)?,
        author_email: row.get(2)?,
        timestamp,
        message: row.get(4)?,
        files_changed: row.get(5)?,
        insertions: row.get(6)?,
        deletions: row.get(7)?,
    })
}
