use feed_core::{FeedType, KeywordKind, ParseNameError};

/// Lines scrolled by `down`/`up` without a count.
const DEFAULT_STEP: i64 = 10;

pub const HELP: &str = "\
commands:
  down [n] | up [n]             scroll the visible feed
  kept | discarded              switch feed
  + <words> | - <words>         add a positive or negative keyword
  rm +|- <words>                remove a keyword
  preview kept|discarded <words>
  pdown [n] | pup [n] | close   scroll or close the preview
  dismiss                       acknowledge a notice
  restart | help | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Scroll(i64),
    Show(FeedType),
    AddKeyword { kind: KeywordKind, keyword: String },
    RemoveKeyword { kind: KeywordKind, keyword: String },
    Preview { feed: FeedType, keyword: String },
    ScrollPreview(i64),
    ClosePreview,
    Dismiss,
    Restart,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("unknown command '{0}' (try 'help')")]
    Unknown(String),
    #[error("'{0}' needs a keyword")]
    MissingKeyword(&'static str),
    #[error("invalid count '{0}'")]
    Count(String),
    #[error(transparent)]
    Name(#[from] ParseNameError),
}

/// Parses one input line. Blank lines yield `None`.
pub fn parse_command(line: &str) -> Result<Option<Command>, InputError> {
    let line = line.trim();
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };

    let command = match head {
        "" => return Ok(None),
        "down" | "d" => Command::Scroll(count(rest)?),
        "up" | "u" => Command::Scroll(-count(rest)?),
        "pdown" => Command::ScrollPreview(count(rest)?),
        "pup" => Command::ScrollPreview(-count(rest)?),
        "kept" | "discarded" => Command::Show(head.parse()?),
        "+" | "-" => Command::AddKeyword {
            kind: head.parse()?,
            keyword: keyword(rest, "add")?,
        },
        "rm" => {
            let (kind, words) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
            Command::RemoveKeyword {
                kind: kind.parse()?,
                keyword: keyword(words, "rm")?,
            }
        }
        "preview" => {
            let (feed, words) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
            Command::Preview {
                feed: feed.parse()?,
                keyword: keyword(words, "preview")?,
            }
        }
        "close" => Command::ClosePreview,
        "dismiss" | "ok" => Command::Dismiss,
        "restart" => Command::Restart,
        "help" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        other => return Err(InputError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}

fn count(rest: &str) -> Result<i64, InputError> {
    if rest.is_empty() {
        return Ok(DEFAULT_STEP);
    }
    match rest.parse::<u32>() {
        Ok(lines) if lines > 0 => Ok(i64::from(lines)),
        _ => Err(InputError::Count(rest.to_string())),
    }
}

fn keyword(words: &str, command: &'static str) -> Result<String, InputError> {
    let words = words.trim();
    if words.is_empty() {
        Err(InputError::MissingKeyword(command))
    } else {
        Ok(words.to_string())
    }
}

#[cfg(test)]
mod tests {
    use feed_core::{FeedType, KeywordKind};

    use super::{parse_command, Command, InputError};

    #[test]
    fn scrolling_defaults_to_ten_lines() {
        assert_eq!(parse_command("down"), Ok(Some(Command::Scroll(10))));
        assert_eq!(parse_command(" up 3 "), Ok(Some(Command::Scroll(-3))));
        assert_eq!(parse_command("pup 4"), Ok(Some(Command::ScrollPreview(-4))));
        assert_eq!(
            parse_command("down lots"),
            Err(InputError::Count("lots".to_string()))
        );
    }

    #[test]
    fn counts_must_be_positive_and_bounded() {
        assert_eq!(
            parse_command("up -9223372036854775808"),
            Err(InputError::Count("-9223372036854775808".to_string()))
        );
        assert_eq!(
            parse_command("down 0"),
            Err(InputError::Count("0".to_string()))
        );
        assert_eq!(
            parse_command("pdown 99999999999"),
            Err(InputError::Count("99999999999".to_string()))
        );
        assert_eq!(
            parse_command("up 4294967295"),
            Ok(Some(Command::Scroll(-4_294_967_295)))
        );
    }

    #[test]
    fn keyword_commands_keep_inner_spaces() {
        assert_eq!(
            parse_command("+ rust   lang"),
            Ok(Some(Command::AddKeyword {
                kind: KeywordKind::Positive,
                keyword: "rust   lang".to_string()
            }))
        );
        assert_eq!(
            parse_command("rm - spam"),
            Ok(Some(Command::RemoveKeyword {
                kind: KeywordKind::Negative,
                keyword: "spam".to_string()
            }))
        );
        assert_eq!(
            parse_command("preview discarded cats"),
            Ok(Some(Command::Preview {
                feed: FeedType::Discarded,
                keyword: "cats".to_string()
            }))
        );
        assert_eq!(parse_command("-"), Err(InputError::MissingKeyword("add")));
    }

    #[test]
    fn blank_and_unknown_lines() {
        assert_eq!(parse_command("   "), Ok(None));
        assert_eq!(parse_command("kept"), Ok(Some(Command::Show(FeedType::Kept))));
        assert_eq!(
            parse_command("jump"),
            Err(InputError::Unknown("jump".to_string()))
        );
        assert!(matches!(
            parse_command("preview maybe cats"),
            Err(InputError::Name(_))
        ));
    }
}
