use anyhow::Result;
use replydesk_llm::ProviderKind;
use replydesk_service::{ChatService, ChatSession, TurnOutcome};
use std::io::Write as _;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use crate::build_service;

const HELP: &str = "Commands: /retry, /save <1|2|text>, /model <openai|claude>, \
                    /persona <file|doc> <path-or-id>, /clear, /quit";

pub(crate) async fn run(client: Option<String>, provider: ProviderKind) -> Result<()> {
    let service = build_service().await?;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let client = match client {
        Some(name) => name,
        None => prompt_line(&mut lines, "Client name: ").await?.unwrap_or_default(),
    };
    let client = client.trim().to_owned();
    if client.is_empty() {
        anyhow::bail!("client name must not be empty");
    }

    let (mut session, greeting) = service.start_session(&client, provider).await;
    println!("{}", greeting.text);
    println!("{HELP}");

    // The last drafted turn is what /retry regenerates and /save finalizes.
    let mut last: Option<TurnOutcome> = None;
    loop {
        let prompt = format!("{client}> ");
        let Some(line) = prompt_line(&mut lines, &prompt).await? else {
            break;
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if let Some(rest) = input.strip_prefix('/') {
            let (command, arg) = split_command(rest);
            if matches!(command, "quit" | "exit") {
                break;
            }
            run_command(&service, &mut session, &mut last, command, arg).await;
        } else {
            let outcome = service.send_message(&session, input).await;
            print_replies(&outcome);
            last = Some(outcome);
        }
    }
    Ok(())
}

async fn run_command(
    service: &ChatService,
    session: &mut ChatSession,
    last: &mut Option<TurnOutcome>,
    command: &str,
    arg: &str,
) {
    match command {
        "retry" => match service.retry_last(session).await {
            Some(outcome) => {
                print_replies(&outcome);
                *last = Some(outcome);
            },
            None => println!("Nothing to retry yet."),
        },
        "save" => save_last(service, session, last.as_ref(), arg).await,
        "model" => match arg.parse::<ProviderKind>() {
            Ok(kind) => {
                session.set_provider(kind);
                println!("Provider switched to {}.", kind.as_str());
            },
            Err(e) => println!("{e}"),
        },
        "persona" => switch_persona(service, session, arg).await,
        "clear" => {
            // Front-end reset only; stored turns are never deleted.
            *last = None;
            print!("\x1b[2J\x1b[1;1H");
            println!("Transcript cleared; stored history is untouched.");
        },
        "help" => println!("{HELP}"),
        other => println!("Unknown command: /{other}. {HELP}"),
    }
}

async fn save_last(
    service: &ChatService,
    session: &ChatSession,
    last: Option<&TurnOutcome>,
    arg: &str,
) {
    let Some(outcome) = last else {
        println!("Nothing to save yet.");
        return;
    };
    let text = match arg {
        "" => {
            println!("Usage: /save <1|2> or /save <edited reply>");
            return;
        },
        "1" => outcome.turn.reply_primary.clone(),
        "2" => outcome.turn.reply_secondary.clone(),
        edited => edited.to_owned(),
    };
    if text.is_empty() {
        println!("That reply is empty.");
        return;
    }
    match service.save_reply(session, Some(&outcome.turn.id), &text).await {
        Ok(saved) => {
            let verb = if saved.receipt.created { "created" } else { "updated" };
            println!("Saved to {} ({verb}).", saved.receipt.url);
        },
        Err(e) => println!("Save failed: {e}"),
    }
}

async fn switch_persona(service: &ChatService, session: &mut ChatSession, arg: &str) {
    let (source, reference) = split_command(arg);
    if reference.is_empty() {
        println!("Usage: /persona <file|doc> <path-or-id>");
        return;
    }
    let loaded = match source {
        "file" => service.load_persona_file(reference),
        "doc" => service.load_persona_doc(reference).await,
        _ => {
            println!("Usage: /persona <file|doc> <path-or-id>");
            return;
        },
    };
    match loaded {
        Ok(persona) => {
            println!("Persona switched to {}.", persona.name);
            session.set_persona(persona);
        },
        Err(e) => println!("Persona load failed: {e}"),
    }
}

fn print_replies(outcome: &TurnOutcome) {
    println!("Reply 1: {}", outcome.turn.reply_primary);
    if !outcome.turn.reply_secondary.is_empty() {
        println!("Reply 2: {}", outcome.turn.reply_secondary);
    }
}

fn split_command(input: &str) -> (&str, &str) {
    match input.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (input, ""),
    }
}

async fn prompt_line(lines: &mut Lines<BufReader<Stdin>>, prompt: &str) -> Result<Option<String>> {
    print!("{prompt}");
    std::io::stdout().flush()?;
    Ok(lines.next_line().await?)
}
