//! Spreadsheet-backed implementation of the conversation store.

use std::time::Duration;

use async_trait::async_trait;
use replydesk_core::Turn;
use tracing::{debug, warn};

use crate::rows::{COL_TURN_ID, HEADER_ROW, TURN_SPAN, reply_columns, rows_to_turns, turn_to_row};
use crate::sheets::SheetsClient;
use crate::store::ConversationStore;

const APPEND_ATTEMPTS: u32 = 3;
const APPEND_RETRY_DELAY: Duration = Duration::from_secs(5);

/// One sheet tab per client; one row per turn. All failures are logged and
/// degraded to `false`/empty at this boundary.
#[derive(Debug)]
pub struct SheetsStore {
    sheets: SheetsClient,
    append_retry_delay: Duration,
}

impl SheetsStore {
    pub fn new(sheets: SheetsClient) -> Self {
        Self { sheets, append_retry_delay: APPEND_RETRY_DELAY }
    }

    /// Shorten the pause between append attempts. Tests use this to avoid
    /// real waits.
    #[must_use]
    pub fn with_append_retry_delay(mut self, delay: Duration) -> Self {
        self.append_retry_delay = delay;
        self
    }

    fn data_range(client: &str) -> String {
        format!("{client}!{TURN_SPAN}")
    }
}

#[async_trait]
impl ConversationStore for SheetsStore {
    async fn partition_exists(&self, client: &str) -> bool {
        match self.sheets.sheet_titles().await {
            Ok(titles) => titles.iter().any(|t| t == client),
            Err(e) => {
                warn!(client, error = %e, "partition existence check failed");
                false
            },
        }
    }

    async fn create_partition(&self, client: &str) -> bool {
        if self.partition_exists(client).await {
            debug!(client, "partition already exists");
            return true;
        }
        if let Err(e) = self.sheets.add_sheet(client).await {
            warn!(client, error = %e, "failed to create partition");
            // A concurrent creator may have won the race.
            return self.partition_exists(client).await;
        }
        let header: Vec<String> = HEADER_ROW.iter().map(|s| s.to_string()).collect();
        match self.sheets.update_values(&format!("{client}!A1:H1"), &[header]).await {
            Ok(()) => true,
            Err(e) => {
                warn!(client, error = %e, "failed to write header row");
                false
            },
        }
    }

    async fn list_partitions(&self) -> Vec<String> {
        match self.sheets.sheet_titles().await {
            Ok(titles) => titles,
            Err(e) => {
                warn!(error = %e, "failed to list partitions");
                Vec::new()
            },
        }
    }

    async fn load_turns(&self, client: &str) -> Vec<Turn> {
        match self.sheets.get_values(&Self::data_range(client)).await {
            Ok(rows) => rows_to_turns(&rows),
            Err(e) => {
                warn!(client, error = %e, "failed to load turns");
                Vec::new()
            },
        }
    }

    async fn append_turn(&self, client: &str, turn: &Turn) -> bool {
        let row = turn_to_row(turn);
        let range = Self::data_range(client);
        for attempt in 1..=APPEND_ATTEMPTS {
            match self.sheets.append_values(&range, std::slice::from_ref(&row)).await {
                Ok(()) => return true,
                Err(e) if e.is_transient() && attempt < APPEND_ATTEMPTS => {
                    warn!(client, attempt, error = %e, "append failed, retrying");
                    tokio::time::sleep(self.append_retry_delay).await;
                },
                Err(e) => {
                    warn!(client, attempt, error = %e, "append failed");
                    return false;
                },
            }
        }
        false
    }

    async fn update_turn(&self, client: &str, turn: &Turn) -> bool {
        if turn.id.is_empty() {
            debug!(client, "turn has no id, cannot update in place");
            return false;
        }
        let rows = match self.sheets.get_values(&Self::data_range(client)).await {
            Ok(rows) => rows,
            Err(e) => {
                warn!(client, error = %e, "failed to read rows for update");
                return false;
            },
        };
        // Most recent matching row wins; rows are 1-based in A1 notation.
        let Some(idx) = rows
            .iter()
            .rposition(|row| row.get(COL_TURN_ID).is_some_and(|id| id == &turn.id))
        else {
            debug!(client, turn_id = %turn.id, "no row matches turn id");
            return false;
        };
        let row_number = idx + 1;
        let range = format!("{client}!D{row_number}:G{row_number}");
        match self.sheets.update_values(&range, &[reply_columns(turn)]).await {
            Ok(()) => true,
            Err(e) => {
                warn!(client, turn_id = %turn.id, error = %e, "failed to update turn row");
                false
            },
        }
    }
}
