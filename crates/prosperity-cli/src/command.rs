//! Player command parsing.
//!
//! One line of terminal input becomes one [`Command`]. Which commands are
//! meaningful depends on the phase; the read loop decides that; parsing
//! only recognizes the shape. List positions are typed 1-based and
//! stored 0-based.

/// A parsed line of player input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Start a new campaign from the start screen.
    NewGame,
    /// Resume the saved campaign from the start screen.
    LoadGame,
    /// Advance past the intro.
    Continue,
    /// Select or deselect the clause at this position.
    ToggleClause(usize),
    /// Sign the assembled clauses as a decree.
    Decree,
    /// Send the quick reply at this position.
    Reply(usize),
    /// Send a free-text order.
    Say(String),
    /// Let the day pass without acting.
    Observe,
    /// Write the current state to the save slot.
    Save,
    /// Show the full turn history.
    History,
    /// Show the command list.
    Help,
    /// Leave the program.
    Quit,
    /// Anything else, with the reason it was not understood.
    Unknown(String),
}

impl Command {
    /// Parse one input line.
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let (verb, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(verb, rest)| (verb, rest.trim()));

        match verb.to_ascii_lowercase().as_str() {
            "" | "continue" | "skip" => Self::Continue,
            "new" => Self::NewGame,
            "load" => Self::LoadGame,
            "clause" | "c" => position(rest).map_or_else(
                || Self::Unknown(format!("`{line}`: expected a clause number")),
                Self::ToggleClause,
            ),
            "decree" | "sign" => Self::Decree,
            "reply" | "r" => position(rest).map_or_else(
                || Self::Unknown(format!("`{line}`: expected a reply number")),
                Self::Reply,
            ),
            "say" if !rest.is_empty() => Self::Say(rest.to_owned()),
            "say" => Self::Unknown("`say` needs the text of your order".to_owned()),
            "observe" | "wait" => Self::Observe,
            "save" => Self::Save,
            "history" => Self::History,
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            _ => Self::Unknown(format!("unknown command `{verb}`")),
        }
    }
}

/// A 1-based list position typed by the player, as a 0-based index.
fn position(text: &str) -> Option<usize> {
    text.parse::<usize>().ok()?.checked_sub(1)
}

/// Commands accepted on the start screen.
pub const START_HELP: &str = "new | load | quit";

/// Commands accepted in the turn loop.
pub const PLAYING_HELP: &str = "\
clause N    select or deselect clause N (up to 3)
decree      sign the selected clauses
reply N     send quick reply N
say TEXT    issue a free-text order
observe     let the day pass in silence
save        archive the current state
history     show the full log
quit        leave";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_list_positions_one_based() {
        assert_eq!(Command::parse("clause 1"), Command::ToggleClause(0));
        assert_eq!(Command::parse("c 3"), Command::ToggleClause(2));
        assert_eq!(Command::parse("  reply 2 "), Command::Reply(1));
    }

    #[test]
    fn zero_and_garbage_positions_are_unknown() {
        assert!(matches!(Command::parse("clause 0"), Command::Unknown(_)));
        assert!(matches!(Command::parse("reply two"), Command::Unknown(_)));
        assert!(matches!(Command::parse("clause"), Command::Unknown(_)));
    }

    #[test]
    fn say_keeps_the_whole_order() {
        assert_eq!(
            Command::parse("say 立即 开放 粮仓"),
            Command::Say("立即 开放 粮仓".to_owned())
        );
        assert!(matches!(Command::parse("say   "), Command::Unknown(_)));
    }

    #[test]
    fn verbs_are_case_insensitive() {
        assert_eq!(Command::parse("OBSERVE"), Command::Observe);
        assert_eq!(Command::parse("Decree"), Command::Decree);
        assert_eq!(Command::parse("Q"), Command::Quit);
    }

    #[test]
    fn empty_line_continues() {
        assert_eq!(Command::parse(""), Command::Continue);
        assert_eq!(Command::parse("skip"), Command::Continue);
    }
}
