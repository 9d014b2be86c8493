//! SQL schema for the Terrarium SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- AUTOINCREMENT so a deleted row's id is never handed out again.
CREATE TABLE IF NOT EXISTS users (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    email         TEXT NOT NULL UNIQUE,   -- trimmed, lower-cased
    password_hash TEXT NOT NULL,          -- argon2 PHC string
    name          TEXT NOT NULL,
    created_at    TEXT NOT NULL           -- ISO 8601 UTC
);

-- Readings are strictly append-only.
-- No UPDATE or DELETE is ever issued against this table.
CREATE TABLE IF NOT EXISTS readings (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    subject     TEXT NOT NULL,
    owner_id    INTEGER REFERENCES users(id),
    temperature REAL NOT NULL,
    timestamp   TEXT NOT NULL,            -- as reported by the sensor
    received_at TEXT NOT NULL             -- ISO 8601 UTC; server-assigned
);

CREATE INDEX IF NOT EXISTS readings_owner_subject_idx
    ON readings(owner_id, subject, id);
CREATE INDEX IF NOT EXISTS readings_subject_idx
    ON readings(subject, id);

PRAGMA user_version = 1;
";
