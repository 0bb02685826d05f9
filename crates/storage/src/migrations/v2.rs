//! Migration v2: index for point lookups and removals

pub(super) const SQL: &str = "
CREATE INDEX IF NOT EXISTS idx_pending_deletions_key
    ON pending_deletions(chat_id, message_id);
";
