//! V001: Initial schema.
//! entities, poll_criteria, comparisons, contributor_ratings,
//! individual_scores, user_scalings, entity_criteria_scores, entity_total_scores.

pub const MIGRATION_SQL: &str = r#"
-- Ranked entities. The uid is the public identifier carried by trigger events.
CREATE TABLE IF NOT EXISTS entities (
    id INTEGER PRIMARY KEY,
    uid TEXT NOT NULL UNIQUE
) STRICT;

-- Criteria scored in each poll, in display order.
CREATE TABLE IF NOT EXISTS poll_criteria (
    poll TEXT NOT NULL,
    criterion TEXT NOT NULL,
    rank INTEGER NOT NULL DEFAULT 0,
    PRIMARY KEY (poll, criterion)
) STRICT;

-- One row per (contributor, unordered entity pair, criterion).
CREATE TABLE IF NOT EXISTS comparisons (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    poll TEXT NOT NULL,
    user_id INTEGER NOT NULL,
    entity_a INTEGER NOT NULL REFERENCES entities(id),
    entity_b INTEGER NOT NULL REFERENCES entities(id),
    criterion TEXT NOT NULL,
    score REAL NOT NULL,
    weight REAL NOT NULL DEFAULT 1.0,
    CHECK (entity_a <> entity_b)
) STRICT;

CREATE UNIQUE INDEX IF NOT EXISTS idx_comparisons_pair
    ON comparisons(poll, user_id, criterion, min(entity_a, entity_b), max(entity_a, entity_b));
CREATE INDEX IF NOT EXISTS idx_comparisons_criterion
    ON comparisons(poll, criterion, user_id);

-- Visibility and trust flags of a contributor's rating of an entity.
CREATE TABLE IF NOT EXISTS contributor_ratings (
    poll TEXT NOT NULL,
    user_id INTEGER NOT NULL,
    entity_id INTEGER NOT NULL REFERENCES entities(id),
    is_public INTEGER NOT NULL DEFAULT 0,
    is_trusted INTEGER NOT NULL DEFAULT 0,
    is_supertrusted INTEGER NOT NULL DEFAULT 0,
    PRIMARY KEY (poll, user_id, entity_id)
) STRICT;

-- Raw individual scores written by the online estimator and the batch aggregator.
CREATE TABLE IF NOT EXISTS individual_scores (
    poll TEXT NOT NULL,
    user_id INTEGER NOT NULL,
    entity_id INTEGER NOT NULL REFERENCES entities(id),
    criterion TEXT NOT NULL,
    raw_score REAL NOT NULL,
    raw_uncertainty REAL NOT NULL,
    PRIMARY KEY (poll, user_id, entity_id, criterion)
) STRICT;

CREATE INDEX IF NOT EXISTS idx_individual_scores_entity
    ON individual_scores(poll, criterion, entity_id);

-- Per-contributor scalings, read-only to the online engine.
CREATE TABLE IF NOT EXISTS user_scalings (
    poll TEXT NOT NULL,
    user_id INTEGER NOT NULL,
    criterion TEXT NOT NULL,
    scale REAL NOT NULL DEFAULT 1.0,
    scale_uncertainty REAL NOT NULL DEFAULT 0.0,
    translation REAL NOT NULL DEFAULT 0.0,
    translation_uncertainty REAL NOT NULL DEFAULT 0.0,
    PRIMARY KEY (poll, user_id, criterion)
) STRICT;

-- Published global score per (entity, criterion, mode).
CREATE TABLE IF NOT EXISTS entity_criteria_scores (
    poll TEXT NOT NULL,
    entity_id INTEGER NOT NULL REFERENCES entities(id),
    criterion TEXT NOT NULL,
    score_mode TEXT NOT NULL,
    score REAL NOT NULL,
    uncertainty REAL NOT NULL,
    deviation REAL NOT NULL,
    PRIMARY KEY (poll, entity_id, criterion, score_mode)
) STRICT;

CREATE INDEX IF NOT EXISTS idx_entity_criteria_scores_mode
    ON entity_criteria_scores(poll, criterion, score_mode);

-- Published total per entity.
CREATE TABLE IF NOT EXISTS entity_total_scores (
    poll TEXT NOT NULL,
    entity_id INTEGER NOT NULL REFERENCES entities(id),
    total_score REAL NOT NULL,
    PRIMARY KEY (poll, entity_id)
) STRICT;
"#;
