//! Prompt and message-list construction from stored history.
//!
//! Two views of the same context: a flat prompt string for display and
//! debugging, and the role-tagged message list the providers consume. Any
//! history cap is caller policy; these builders render whatever slice they
//! are handed, oldest first.

use replydesk_core::{ChatMessage, Turn};

/// Render the flat prompt: persona text, prior turns, current message.
///
/// With no history the output is exactly the persona text followed by the
/// current-turn marker line. A turn contributes an assistant line only when
/// it carries a reply.
pub fn render_prompt(persona_text: &str, turns: &[Turn], message: &str) -> String {
    let mut prompt = String::from(persona_text);
    for turn in turns {
        prompt.push_str("\n\nUser: ");
        prompt.push_str(&turn.message);
        if let Some(reply) = turn.assistant_text() {
            prompt.push_str("\nAssistant: ");
            prompt.push_str(reply);
        }
    }
    prompt.push_str("\n\nCurrent message: ");
    prompt.push_str(message);
    prompt
}

/// Role-tagged twin of [`render_prompt`]. The persona travels separately as
/// the system prompt, so the list starts with the oldest stored turn and
/// always ends with the current message as a `user` entry.
pub fn build_messages(turns: &[Turn], message: &str) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(turns.len() * 2 + 1);
    for turn in turns {
        messages.push(ChatMessage::user(&turn.message));
        if let Some(reply) = turn.assistant_text() {
            messages.push(ChatMessage::assistant(reply));
        }
    }
    messages.push(ChatMessage::user(message));
    messages
}

#[cfg(test)]
mod tests {
    use replydesk_core::Role;

    use super::*;

    fn turn(message: &str, final_reply: &str, primary: &str) -> Turn {
        let mut turn = Turn::new("Jane", message);
        turn.final_reply = final_reply.to_owned();
        turn.reply_primary = primary.to_owned();
        turn
    }

    #[test]
    fn test_empty_history_is_persona_plus_current_message() {
        let prompt = render_prompt("You are a consultant.", &[], "Hi");
        assert_eq!(prompt, "You are a consultant.\n\nCurrent message: Hi");
    }

    #[test]
    fn test_prompt_lists_turns_oldest_first() {
        let turns = vec![
            turn("First question", "First answer", ""),
            turn("Second question", "Second answer", ""),
        ];
        let prompt = render_prompt("Persona.", &turns, "Third question");
        assert_eq!(
            prompt,
            "Persona.\
             \n\nUser: First question\nAssistant: First answer\
             \n\nUser: Second question\nAssistant: Second answer\
             \n\nCurrent message: Third question"
        );
    }

    #[test]
    fn test_prompt_falls_back_to_primary_reply() {
        let turns = vec![turn("Question", "", "Draft answer")];
        let prompt = render_prompt("P.", &turns, "Next");
        assert!(prompt.contains("Assistant: Draft answer"));
    }

    #[test]
    fn test_unanswered_turn_has_no_assistant_line() {
        let turns = vec![turn("Pending question", "", "")];
        let prompt = render_prompt("P.", &turns, "Next");
        assert!(prompt.contains("User: Pending question"));
        assert!(!prompt.contains("Assistant:"));
    }

    #[test]
    fn test_messages_mirror_prompt_structure() {
        let turns = vec![turn("Question", "Answer", ""), turn("Unanswered", "", "")];
        let messages = build_messages(&turns, "Current");

        let roles: Vec<Role> = messages.iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![Role::User, Role::Assistant, Role::User, Role::User]
        );
        assert_eq!(messages[0].content, "Question");
        assert_eq!(messages[1].content, "Answer");
        assert_eq!(messages[3].content, "Current");
    }
}
