use clipboard::{ClipboardContext, ClipboardProvider};
use console::{style, Term};
use dialoguer::{theme::ColorfulTheme, Completion, Select};

/// Prompt commands with their /help blurbs. Order is the /help order.
pub const COMMANDS: &[(&str, &str)] = &[
    ("/new", "start a new conversation"),
    ("/clear", "clear the screen"),
    ("/copy", "copy one code block from this session"),
    ("/copy_all", "copy every collected code block"),
    ("/paste", "compose a message from the clipboard"),
    ("/help", "show this list"),
    ("/exit", "leave the chat"),
];

/// What the prompt loop should do after a command ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandAction {
    /// Command did its work; prompt again.
    Handled,
    /// Reset the conversation.
    NewChat,
    /// End the program.
    Exit,
}

/// A slash followed by a single word is a command; anything with a space is
/// chat text, so code like `/etc/hosts is broken` still reaches the model.
pub fn is_command(input: &str) -> bool {
    match input.strip_prefix('/') {
        Some(rest) => !rest.contains(' '),
        None => false,
    }
}

/// Dispatch one command. `/paste` is not handled here: it needs the prompt
/// loop to turn clipboard text into a submission.
pub fn handle_command(cmd: &str, code_blocks: &[String]) -> CommandAction {
    match cmd {
        "/exit" => CommandAction::Exit,
        "/new" => CommandAction::NewChat,
        "/clear" => {
            let _ = Term::stdout().clear_screen();
            CommandAction::Handled
        }
        "/help" => {
            print_help();
            CommandAction::Handled
        }
        "/copy" => {
            copy_one(code_blocks);
            CommandAction::Handled
        }
        "/copy_all" => {
            copy_all(code_blocks);
            CommandAction::Handled
        }
        _ => {
            println!("Unknown command: {cmd} (try /help)");
            CommandAction::Handled
        }
    }
}

/// Clipboard contents for the /paste flow; None when the clipboard is
/// unavailable or empty.
pub fn read_clipboard() -> Option<String> {
    let context: Result<ClipboardContext, _> = ClipboardProvider::new();
    match context.and_then(|mut clipboard| clipboard.get_contents()) {
        Ok(content) if content.trim().is_empty() => {
            println!("Clipboard is empty.");
            None
        }
        Ok(content) => Some(content),
        Err(err) => {
            eprintln!("Failed to read clipboard: {err}");
            None
        }
    }
}

fn print_help() {
    println!();
    for (name, blurb) in COMMANDS {
        println!("  {} {}", style(format!("{name:<10}")).cyan(), blurb);
    }
    println!();
}

fn copy_one(code_blocks: &[String]) {
    if code_blocks.is_empty() {
        println!("No code blocks to copy.");
        return;
    }
    let labels: Vec<String> = code_blocks
        .iter()
        .enumerate()
        .map(|(index, block)| {
            let first_line: String = block.lines().next().unwrap_or("").chars().take(48).collect();
            format!("#{} {}", index + 1, first_line)
        })
        .collect();
    let picked = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Select code block to copy")
        .items(&labels)
        .default(0)
        .interact();
    match picked {
        Ok(selection) => copy_to_clipboard(&code_blocks[selection], "Code block copied to clipboard"),
        Err(err) => eprintln!("Selection cancelled: {err}"),
    }
}

fn copy_all(code_blocks: &[String]) {
    if code_blocks.is_empty() {
        println!("No code blocks to copy.");
        return;
    }
    copy_to_clipboard(
        &code_blocks.join("\n\n"),
        "All code blocks copied to clipboard",
    );
}

fn copy_to_clipboard(content: &str, done: &str) {
    let context: Result<ClipboardContext, _> = ClipboardProvider::new();
    match context.and_then(|mut clipboard| clipboard.set_contents(content.to_string())) {
        Ok(()) => println!("{done}"),
        Err(err) => eprintln!("Clipboard unavailable: {err}"),
    }
}

/// Tab completion over the command set: completes only when the prefix is
/// unambiguous.
pub struct SlashCompletion;

impl Completion for SlashCompletion {
    fn get(&self, input: &str) -> Option<String> {
        if !input.starts_with('/') {
            return None;
        }
        let matches: Vec<&str> = COMMANDS
            .iter()
            .map(|(name, _)| *name)
            .filter(|name| name.starts_with(input))
            .collect();
        match matches.as_slice() {
            [only] => Some((*only).to_string()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{handle_command, is_command, CommandAction, SlashCompletion};
    use dialoguer::Completion;

    #[test]
    fn slash_word_is_a_command() {
        assert!(is_command("/exit"));
        assert!(is_command("/anything"));
        assert!(!is_command("hello"));
        assert!(!is_command("/paste this please"));
        assert!(!is_command(""));
    }

    #[test]
    fn dispatch_maps_to_loop_actions() {
        assert_eq!(handle_command("/exit", &[]), CommandAction::Exit);
        assert_eq!(handle_command("/new", &[]), CommandAction::NewChat);
        assert_eq!(handle_command("/bogus", &[]), CommandAction::Handled);
    }

    #[test]
    fn completion_fires_only_on_unambiguous_prefixes() {
        let completion = SlashCompletion;
        assert_eq!(completion.get("/ex"), Some("/exit".to_string()));
        assert_eq!(completion.get("/h"), Some("/help".to_string()));
        // /copy is a prefix of /copy_all, so neither completes.
        assert_eq!(completion.get("/copy"), None);
        assert_eq!(completion.get("/c"), None);
        assert_eq!(completion.get("nope"), None);
    }
}
