//! SQL text inspection
//!
//! The engine treats a `DROP TABLE` anywhere in a job's SQL as a
//! destructive signal: datasets the job writes are re-styled as dropped
//! rather than actively produced. Detection is a plain case-insensitive
//! substring check, matching how upstream schedulers tag these jobs.

/// Whether the query text contains a `drop table` statement, ignoring case.
pub fn is_drop_table(query: &str) -> bool {
    query.to_lowercase().contains("drop table")
}
