//! Positional mapping between turns and spreadsheet rows.

use replydesk_core::Turn;
use tracing::debug;

/// Fixed header row written when a partition is created. Column order is the
/// persisted row layout; `Turn ID` is the correlation key used by updates.
pub const HEADER_ROW: [&str; 8] = [
    "Timestamp",
    "Client",
    "Message",
    "Reply 1",
    "Reply 2",
    "Final Reply",
    "Summary",
    "Turn ID",
];

/// Column span read and appended for turn rows.
pub(crate) const TURN_SPAN: &str = "A:H";

const COL_TIMESTAMP: usize = 0;
const COL_CLIENT: usize = 1;
const COL_MESSAGE: usize = 2;
pub(crate) const COL_REPLY_ONE: usize = 3;
const COL_REPLY_TWO: usize = 4;
const COL_FINAL: usize = 5;
pub(crate) const COL_SUMMARY: usize = 6;
pub(crate) const COL_TURN_ID: usize = 7;

pub fn turn_to_row(turn: &Turn) -> Vec<String> {
    vec![
        turn.timestamp.clone(),
        turn.client.clone(),
        turn.message.clone(),
        turn.reply_primary.clone(),
        turn.reply_secondary.clone(),
        turn.final_reply.clone(),
        turn.summary.clone(),
        turn.id.clone(),
    ]
}

/// The four reply columns (`Reply 1` through `Summary`) as a row fragment,
/// used when updating an existing turn in place.
pub(crate) fn reply_columns(turn: &Turn) -> Vec<String> {
    vec![
        turn.reply_primary.clone(),
        turn.reply_secondary.clone(),
        turn.final_reply.clone(),
        turn.summary.clone(),
    ]
}

/// Map one row back to a turn. Short rows degrade to empty fields; rows
/// without a user message carry no turn and yield `None`.
pub fn turn_from_row(row: &[String]) -> Option<Turn> {
    let message = cell(row, COL_MESSAGE);
    if message.is_empty() {
        return None;
    }
    Some(Turn {
        id: cell(row, COL_TURN_ID),
        timestamp: cell(row, COL_TIMESTAMP),
        client: cell(row, COL_CLIENT),
        message,
        reply_primary: cell(row, COL_REPLY_ONE),
        reply_secondary: cell(row, COL_REPLY_TWO),
        final_reply: cell(row, COL_FINAL),
        summary: cell(row, COL_SUMMARY),
    })
}

pub(crate) fn is_header_row(row: &[String]) -> bool {
    row.first().is_some_and(|c| c == HEADER_ROW[COL_TIMESTAMP])
}

/// Shared row-to-turn mapping for whole-partition reads: skips the header
/// row and any rows that do not carry a turn.
pub(crate) fn rows_to_turns(rows: &[Vec<String>]) -> Vec<Turn> {
    let mut turns = Vec::with_capacity(rows.len());
    for (idx, row) in rows.iter().enumerate() {
        if idx == 0 && is_header_row(row) {
            continue;
        }
        match turn_from_row(row) {
            Some(turn) => turns.push(turn),
            None => debug!(row = idx + 1, "skipping row without a user message"),
        }
    }
    turns
}

fn cell(row: &[String], idx: usize) -> String {
    row.get(idx).cloned().unwrap_or_default()
}
