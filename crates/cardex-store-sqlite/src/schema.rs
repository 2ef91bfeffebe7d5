//! SQL schema for the Cardex SQLite store.

/// Connection-level settings, applied once when the store is opened.
pub const PRAGMAS: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;
";

/// Table DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const TABLES: &str = "
CREATE TABLE IF NOT EXISTS sets (
    set_id    INTEGER PRIMARY KEY,
    code      TEXT NOT NULL,       -- not unique; lookups take the lowest set_id
    set_name  TEXT NOT NULL,
    set_type  TEXT NOT NULL,
    block     TEXT
);

CREATE TABLE IF NOT EXISTS cards (
    id                      INTEGER PRIMARY KEY,
    name                    TEXT NOT NULL,
    mana_cost               TEXT,
    cmc                     TEXT,            -- number as printed by the source
    type_line               TEXT,
    oracle_text             TEXT,
    rarity                  TEXT,
    set_name                TEXT,
    set_type                TEXT,            -- copied from sets; NULL if unresolved
    set_id                  INTEGER REFERENCES sets(set_id),
    image_uri_normal        TEXT,
    image_uri_large         TEXT,
    image_uri_art_crop      TEXT,
    card_faces              TEXT,            -- JSON array of faces, or NULL
    face_oracle_text        TEXT,            -- copies of card_faces[0]
    face_image_uri_normal   TEXT,
    face_image_uri_large    TEXT,
    face_image_uri_art_crop TEXT,
    color_identity          TEXT NOT NULL DEFAULT '[]'  -- JSON array of symbols
);

CREATE INDEX IF NOT EXISTS sets_code_idx  ON sets(code);
CREATE INDEX IF NOT EXISTS cards_name_idx ON cards(name);
";

/// Drops both tables; cards first so the foreign key never dangles.
pub const DROP_TABLES: &str = "
DROP TABLE IF EXISTS cards;
DROP TABLE IF EXISTS sets;
";
