//! Unified conversation store backend with enum dispatch.

use async_trait::async_trait;
use replydesk_core::Turn;

use crate::error::StoreError;
use crate::memory::MemoryStore;
use crate::sheets::SheetsClient;
use crate::sheets_store::SheetsStore;
use crate::store::ConversationStore;

macro_rules! dispatch {
    ($self:expr, $method:ident ( $($arg:expr),* $(,)? )) => {
        match $self {
            StoreBackend::Sheets(s) => <SheetsStore as ConversationStore>::$method(s, $($arg),*).await,
            StoreBackend::Memory(s) => <MemoryStore as ConversationStore>::$method(s, $($arg),*).await,
        }
    };
}

#[derive(Debug)]
pub enum StoreBackend {
    Sheets(SheetsStore),
    Memory(MemoryStore),
}

impl StoreBackend {
    /// Spreadsheet-backed store for the given token and spreadsheet id.
    pub fn new_sheets(
        token: String,
        spreadsheet_id: String,
        base_url: String,
    ) -> Result<Self, StoreError> {
        let client = SheetsClient::new(token, spreadsheet_id, base_url)?;
        Ok(Self::Sheets(SheetsStore::new(client)))
    }

    /// In-process store for offline use and tests.
    pub fn new_memory() -> Self {
        Self::Memory(MemoryStore::new())
    }
}

#[async_trait]
impl ConversationStore for StoreBackend {
    async fn partition_exists(&self, client: &str) -> bool {
        dispatch!(self, partition_exists(client))
    }

    async fn create_partition(&self, client: &str) -> bool {
        dispatch!(self, create_partition(client))
    }

    async fn list_partitions(&self) -> Vec<String> {
        dispatch!(self, list_partitions())
    }

    async fn load_turns(&self, client: &str) -> Vec<Turn> {
        dispatch!(self, load_turns(client))
    }

    async fn append_turn(&self, client: &str, turn: &Turn) -> bool {
        dispatch!(self, append_turn(client, turn))
    }

    async fn update_turn(&self, client: &str, turn: &Turn) -> bool {
        dispatch!(self, update_turn(client, turn))
    }
}
