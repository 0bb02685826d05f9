//! Migration v1: Initial schema

// No uniqueness on (chat_id, message_id): the scheduler prevents double
// scheduling, removal deletes every matching row.
pub(super) const SQL: &str = "
CREATE TABLE IF NOT EXISTS pending_deletions (
    chat_id INTEGER NOT NULL,
    message_id INTEGER NOT NULL,
    registered_at REAL NOT NULL
);
";
