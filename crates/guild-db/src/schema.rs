//! SQL schema definitions.

/// Complete schema for guild v1 database.
pub const SCHEMA_V1: &str = r#"
-- ============================================================
-- Settings
-- ============================================================

CREATE TABLE IF NOT EXISTS settings (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);

-- ============================================================
-- Membership
-- ============================================================

CREATE TABLE IF NOT EXISTS members (
    account TEXT PRIMARY KEY,
    election_rank INTEGER NOT NULL DEFAULT 0 CHECK (election_rank BETWEEN 0 AND 255),
    joined_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_members_rank ON members(election_rank);

-- ============================================================
-- Pools & Distributions
-- ============================================================

CREATE TABLE IF NOT EXISTS pools (
    name TEXT PRIMARY KEY,
    monthly_distribution_pct INTEGER NOT NULL
        CHECK (monthly_distribution_pct BETWEEN 0 AND 100)
);

-- One row per period, keyed by its start slot. `value` is the JSON record.
CREATE TABLE IF NOT EXISTS distributions (
    distribution_time INTEGER PRIMARY KEY,
    kind TEXT NOT NULL CHECK (kind IN ('next', 'election', 'current')),
    value TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS distribution_points (
    distribution_time INTEGER NOT NULL,
    rank INTEGER NOT NULL,
    PRIMARY KEY (distribution_time, rank)
);

-- ============================================================
-- Ledger
-- ============================================================

CREATE TABLE IF NOT EXISTS accounts (
    scope TEXT NOT NULL,
    owner TEXT NOT NULL,
    balance INTEGER NOT NULL CHECK (balance > 0),
    PRIMARY KEY (scope, owner)
);
"#;
