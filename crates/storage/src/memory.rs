//! In-process conversation store.
//!
//! Holds the same row-level representation as the spreadsheet backend, so
//! header handling and positional mapping behave identically. Serves as the
//! offline backend when no spreadsheet is configured and as the test double.

use std::collections::BTreeMap;

use async_trait::async_trait;
use replydesk_core::Turn;
use tokio::sync::RwLock;

use crate::rows::{
    COL_REPLY_ONE, COL_SUMMARY, COL_TURN_ID, HEADER_ROW, reply_columns, rows_to_turns, turn_to_row,
};
use crate::store::ConversationStore;

#[derive(Debug, Default)]
pub struct MemoryStore {
    partitions: RwLock<BTreeMap<String, Vec<Vec<String>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn header() -> Vec<String> {
        HEADER_ROW.iter().map(|s| s.to_string()).collect()
    }
}

#[async_trait]
impl ConversationStore for MemoryStore {
    async fn partition_exists(&self, client: &str) -> bool {
        self.partitions.read().await.contains_key(client)
    }

    async fn create_partition(&self, client: &str) -> bool {
        self.partitions
            .write()
            .await
            .entry(client.to_owned())
            .or_insert_with(|| vec![Self::header()]);
        true
    }

    async fn list_partitions(&self) -> Vec<String> {
        self.partitions.read().await.keys().cloned().collect()
    }

    async fn load_turns(&self, client: &str) -> Vec<Turn> {
        match self.partitions.read().await.get(client) {
            Some(rows) => rows_to_turns(rows),
            None => Vec::new(),
        }
    }

    async fn append_turn(&self, client: &str, turn: &Turn) -> bool {
        let mut partitions = self.partitions.write().await;
        let rows = partitions
            .entry(client.to_owned())
            .or_insert_with(|| vec![Self::header()]);
        rows.push(turn_to_row(turn));
        true
    }

    async fn update_turn(&self, client: &str, turn: &Turn) -> bool {
        if turn.id.is_empty() {
            return false;
        }
        let mut partitions = self.partitions.write().await;
        let Some(rows) = partitions.get_mut(client) else {
            return false;
        };
        let Some(idx) = rows
            .iter()
            .rposition(|row| row.get(COL_TURN_ID).is_some_and(|id| id == &turn.id))
        else {
            return false;
        };
        let row = &mut rows[idx];
        // Pad short rows so the reply columns land at their positions.
        while row.len() < HEADER_ROW.len() {
            row.push(String::new());
        }
        row.splice(COL_REPLY_ONE..=COL_SUMMARY, reply_columns(turn));
        true
    }
}
