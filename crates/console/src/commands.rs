#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlashCommand {
    Help,
    Status,
    Dump,
    Quit,
    Unknown(String),
}

pub const HELP_LINES: [(&str, &str); 4] = [
    ("/help", "list console commands"),
    ("/status", "system header, status and panels"),
    ("/dump", "conversation log as JSON"),
    ("/quit", "close the channel and exit"),
];

pub fn parse_slash_command(input: &str) -> Option<SlashCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let command = trimmed
        .split_whitespace()
        .next()
        .unwrap_or(trimmed)
        .to_ascii_lowercase();

    let parsed = match command.as_str() {
        "/help" => SlashCommand::Help,
        "/status" => SlashCommand::Status,
        "/dump" => SlashCommand::Dump,
        "/quit" | "/exit" => SlashCommand::Quit,
        _ => SlashCommand::Unknown(command),
    };

    Some(parsed)
}
