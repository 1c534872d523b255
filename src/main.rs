use std::time::Duration;

use anyhow::Context;
use console::Term;
use dialoguer::{theme::ColorfulTheme, BasicHistory, Input};
use indicatif::ProgressBar;
use tokio::runtime::Runtime;
use tracing_subscriber::EnvFilter;

use songlap::commands::{self, CommandAction, SlashCompletion};
use songlap::groq::{ChatClient, ClientConfig};
use songlap::render::{self, StreamPrinter};
use songlap::session::{ChatSession, TurnOutcome, FALLBACK_NOTICE};

fn main() -> anyhow::Result<()> {
    init_tracing();

    let rt = Runtime::new().context("starting async runtime")?;
    let client = ChatClient::new(ClientConfig::from_env()).context("building HTTP client")?;
    let mut session = ChatSession::new(client);

    render::print_banner();

    let mut history = BasicHistory::new().max_entries(99).no_duplicates(false);
    let completion = SlashCompletion;
    let mut code_blocks: Vec<String> = Vec::new();

    loop {
        let input = match Input::<String>::with_theme(&ColorfulTheme::default())
            .with_prompt("you")
            .completion_with(&completion)
            .history_with(&mut history)
            .interact_text()
        {
            Ok(input) => input,
            // Closed stdin ends the chat the same way /exit does.
            Err(_) => break,
        };

        let text = if commands::is_command(input.trim()) {
            if input.trim() == "/paste" {
                match paste_flow() {
                    Some(text) => text,
                    None => continue,
                }
            } else {
                match commands::handle_command(input.trim(), &code_blocks) {
                    CommandAction::Exit => break,
                    CommandAction::NewChat => {
                        session.reset();
                        code_blocks.clear();
                        let _ = Term::stdout().clear_screen();
                        render::print_banner();
                        continue;
                    }
                    CommandAction::Handled => continue,
                }
            }
        } else {
            input
        };

        // Whitespace-only input never starts an exchange.
        if text.trim().is_empty() {
            continue;
        }

        run_turn(&rt, &mut session, &text, &mut code_blocks);
    }

    Ok(())
}

/// One exchange: typing indicator until the first fragment, streamed plain
/// text while the reply grows, then either a markdown repaint or, on
/// failure, the fallback notice with any partial output erased.
fn run_turn(rt: &Runtime, session: &mut ChatSession, text: &str, code_blocks: &mut Vec<String>) {
    let mut indicator = Some(typing_indicator());
    let mut printer = StreamPrinter::new();

    let outcome = rt.block_on(session.submit(text, |full| {
        if let Some(spinner) = indicator.take() {
            spinner.finish_and_clear();
            render::print_assistant_label();
        }
        printer.update(full);
    }));

    if let Some(spinner) = indicator.take() {
        spinner.finish_and_clear();
    }

    match outcome {
        TurnOutcome::Completed(reply) => {
            printer.finish(&reply);
            code_blocks.extend(render::extract_code_blocks(&reply));
        }
        TurnOutcome::Failed(_) => {
            printer.clear();
            render::print_fallback(FALLBACK_NOTICE);
        }
    }
    println!();
}

/// /paste: seed a message from the clipboard, then let the user extend it.
fn paste_flow() -> Option<String> {
    let pasted = commands::read_clipboard()?;
    println!("\n{pasted}");
    let details = Input::<String>::with_theme(&ColorfulTheme::default())
        .with_prompt("Add additional details")
        .allow_empty(true)
        .interact_text()
        .unwrap_or_default();
    if details.trim().is_empty() {
        Some(pasted)
    } else {
        Some(format!("{pasted}\n{details}"))
    }
}

fn typing_indicator() -> ProgressBar {
    let spinner = ProgressBar::new_spinner().with_message("typing…");
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("songlap=warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
