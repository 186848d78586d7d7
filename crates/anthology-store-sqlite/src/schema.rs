//! SQL schema for the Anthology SQLite store.
//!
//! Executed once per pool, on its first connection. Column names follow the
//! dataset's original layout (`poetID`, `poemID`, `parentID`, `createdAt`).

/// Settings applied to every pooled connection.
pub const CONNECTION_PRAGMAS: &str = "
PRAGMA foreign_keys = ON;
PRAGMA busy_timeout = 5000;
";

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS poet (
    id      INTEGER PRIMARY KEY AUTOINCREMENT,
    name    TEXT NOT NULL UNIQUE,
    dynasty TEXT NOT NULL DEFAULT ''
);

CREATE TABLE IF NOT EXISTS poem (
    id      INTEGER PRIMARY KEY AUTOINCREMENT,
    title   TEXT NOT NULL,
    content TEXT NOT NULL,
    poetID  INTEGER NOT NULL REFERENCES poet(id)
);

-- Endpoints are poet names; no foreign key, no symmetry or uniqueness.
CREATE TABLE IF NOT EXISTS poet_relationship (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    poetA_name TEXT NOT NULL,
    poetB_name TEXT NOT NULL,
    relation   TEXT NOT NULL DEFAULT '',
    value      REAL NOT NULL DEFAULT 1
);

-- Comments are append-only.
CREATE TABLE IF NOT EXISTS comment (
    id        INTEGER PRIMARY KEY AUTOINCREMENT,
    poemID    INTEGER NOT NULL REFERENCES poem(id),
    content   TEXT NOT NULL,
    username  TEXT NOT NULL,
    createdAt TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
    parentID  INTEGER REFERENCES comment(id)
);

CREATE INDEX IF NOT EXISTS poem_poet_idx     ON poem(poetID);
CREATE INDEX IF NOT EXISTS comment_poem_idx  ON comment(poemID, createdAt);

PRAGMA user_version = 1;
";
