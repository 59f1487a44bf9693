use anyhow::Result;
use careerai::prelude::*;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

const HELP: &str = "\
Commands:
  /new              start a new conversation
  /list             list conversations
  /select <n>       switch to conversation n
  /rename <title>   rename the active conversation
  /delete           delete the active conversation
  /retry <id>       retry a failed message
  /quit             exit
Anything else is sent to the coach.";

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    println!("CareerAI Coach");
    println!("==============\n");

    let user_id = std::env::var("CAREERAI_USER").unwrap_or_else(|_| "demo-user".to_string());
    let mut builder = CoachBuilder::new().user_id(&user_id);
    if let Ok(uri) = std::env::var("MONGODB_URI") {
        let database =
            std::env::var("MONGODB_DATABASE").unwrap_or_else(|_| "careerai".to_string());
        println!("Using MongoDB database '{}'", database);
        builder = builder.mongodb(uri, database);
    } else {
        println!("Using in-memory store (set MONGODB_URI to persist)");
    }

    let (coach, mut events) = builder.build().await?;
    println!("Signed in as {}\n", user_id);

    // Notices come from the event channel, like toasts in a UI
    let sessions = coach.list_sessions().await.unwrap_or_default();
    if sessions.is_empty() {
        coach.create_session().await?;
    }
    print_notices(&mut events);
    print_history(&coach).await;
    println!("{}\n", HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print_prompt();
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();

        match line.split_once(' ').unwrap_or((line, "")) {
            ("/quit", _) => break,
            ("/help", _) => println!("{}", HELP),
            ("/new", _) => {
                if coach.create_session().await.is_ok() {
                    println!("Started a new conversation");
                }
            }
            ("/list", _) => list_sessions(&coach).await,
            ("/select", arg) => {
                let state = coach.snapshot().await;
                let picked = arg
                    .trim()
                    .parse::<usize>()
                    .ok()
                    .and_then(|n| state.sessions.get(n.wrapping_sub(1)));
                match picked {
                    Some(session) => {
                        if coach.select_session(&session.id).await.is_ok() {
                            print_history(&coach).await;
                        }
                    }
                    None => println!("No such conversation; see /list"),
                }
            }
            ("/rename", title) => match coach.snapshot().await.active_session_id {
                Some(id) => {
                    if let Ok(session) = coach.rename_session(&id, title).await {
                        println!("Renamed to '{}'", session.title);
                    }
                }
                None => println!("No active conversation"),
            },
            ("/delete", _) => match coach.snapshot().await.active_session_id {
                Some(id) => {
                    if coach.delete_session(&id).await.is_ok() {
                        println!("Deleted; use /list and /select to continue");
                    }
                }
                None => println!("No active conversation"),
            },
            ("/retry", arg) => match arg.trim().parse::<u64>() {
                Ok(local_id) => report(coach.retry(local_id).await),
                Err(_) => println!("Usage: /retry <id>"),
            },
            _ => {
                let before = coach.snapshot().await.messages.len();
                let outcome = coach.send_turn(line).await;
                if outcome == SendOutcome::Sent {
                    let state = coach.snapshot().await;
                    for message in state.messages.iter().skip(before) {
                        if message.role == MessageRole::Assistant {
                            println!("\ncoach> {}\n", message.content);
                        }
                    }
                } else {
                    if outcome == SendOutcome::Failed {
                        print_history(&coach).await;
                    }
                    report(outcome);
                }
            }
        }
        print_notices(&mut events);
    }

    println!("Goodbye!");
    Ok(())
}

fn print_prompt() {
    use std::io::Write;
    print!("you> ");
    let _ = std::io::stdout().flush();
}

fn report(outcome: SendOutcome) {
    match outcome {
        SendOutcome::Sent => println!("Delivered"),
        SendOutcome::Empty => {}
        SendOutcome::NoSession => println!("No active conversation; use /new"),
        SendOutcome::Busy => println!("Still sending the previous message"),
        SendOutcome::Failed => println!("Delivery failed; /retry <id> from the history"),
        SendOutcome::NothingToRetry => println!("Nothing to retry for that id"),
    }
}

fn print_notices(events: &mut mpsc::Receiver<CoachEvent>) {
    while let Ok(event) = events.try_recv() {
        if let CoachEvent::Notice {
            level,
            title,
            description,
        } = event
        {
            let marker = match level {
                NoticeLevel::Destructive => "!",
                NoticeLevel::Info => "i",
            };
            println!("[{}] {}: {}", marker, title, description);
        }
    }
}

async fn list_sessions(coach: &SessionManager) {
    if coach.list_sessions().await.is_err() {
        return;
    }
    let state = coach.snapshot().await;
    for (n, session) in state.sessions.iter().enumerate() {
        let marker = if state.is_active(&session.id) { "*" } else { " " };
        println!(
            "{} {}. {} (updated {})",
            marker,
            n + 1,
            session.title,
            session.updated_at.format("%Y-%m-%d %H:%M")
        );
    }
}

async fn print_history(coach: &SessionManager) {
    let state = coach.snapshot().await;
    if let Some(session) = state.active_session() {
        println!("-- {} --", session.title);
    }
    for message in &state.messages {
        let status = match &message.status {
            DeliveryStatus::Confirmed(_) => String::new(),
            DeliveryStatus::Pending => " (sending)".to_string(),
            DeliveryStatus::Failed(reason) => {
                format!(" (failed: {}; /retry {})", reason, message.local_id)
            }
        };
        println!("{}> {}{}", message.role, message.content, status);
    }
}
