use async_trait::async_trait;
use replydesk_core::Turn;

/// Conversation persistence, partition-scoped by client identifier.
///
/// Every operation catches store failures at this boundary: implementations
/// log the error and return `false` or an empty collection instead of
/// propagating. Callers treat the store as best-effort.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Whether the client's partition exists.
    async fn partition_exists(&self, client: &str) -> bool;

    /// Create the client's partition with its header row. A no-op returning
    /// `true` when the partition already exists; never duplicates the header.
    async fn create_partition(&self, client: &str) -> bool;

    /// All partition names, in store order.
    async fn list_partitions(&self) -> Vec<String>;

    /// All turns in the partition, oldest first. The header row is skipped,
    /// short rows degrade to empty fields, rows without a user message are
    /// dropped.
    async fn load_turns(&self, client: &str) -> Vec<Turn>;

    /// Append one turn as a new row. Returns whether the write succeeded.
    async fn append_turn(&self, client: &str, turn: &Turn) -> bool;

    /// Overwrite the reply columns of the most recent row whose turn id
    /// matches. Returns `false` when no row matches, so the caller can fall
    /// back to an append.
    async fn update_turn(&self, client: &str, turn: &Turn) -> bool;
}
