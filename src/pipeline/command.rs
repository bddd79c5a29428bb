/// Inbound chat commands the bot understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Search,
    Unknown(String),
}

impl Command {
    /// Parse `/start`, `/search` and their `/cmd@botname` forms.
    /// Arguments after the command word are ignored.
    pub fn parse(text: &str) -> Self {
        let word = text.split_whitespace().next().unwrap_or_default();
        let name = word
            .strip_prefix('/')
            .map(|cmd| cmd.split('@').next().unwrap_or_default());

        match name {
            Some("start") | Some("help") => Command::Start,
            Some("search") => Command::Search,
            _ => Command::Unknown(text.to_string()),
        }
    }
}
