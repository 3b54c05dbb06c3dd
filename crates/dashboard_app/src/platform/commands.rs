use dashboard_core::{CreateItemRequest, ItemStatus, Msg, StatusFilter};

pub const HELP: &str = "\
commands:
  search <text>                      filter by title or description (blank clears)
  status <all|active|inactive|pending>
  page <n> | next | prev
  clear                              clear the search
  clear-all                          clear search and status
  add <title> | <description> | <status>
  cancel                             discard the create form errors
  show <id> | close                  open or close the item details
  dismiss                            hide the error message
  retry                              reload the current page
  help | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Dispatch(Msg),
    Help,
    Quit,
    Nothing,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("unknown command {0:?}; type `help` for the list")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error("{0:?} is not a page number")]
    BadPage(String),
    #[error("unknown status {0:?}; use all, active, inactive or pending")]
    BadStatus(String),
}

/// Turns one input line into a command. `current_page` anchors `next`/`prev`.
pub fn parse(line: &str, current_page: u32) -> Result<Command, CommandError> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let msg = match word.to_ascii_lowercase().as_str() {
        "" => return Ok(Command::Nothing),
        "help" | "?" => return Ok(Command::Help),
        "quit" | "exit" | "q" => return Ok(Command::Quit),
        "search" if rest.is_empty() => Msg::SearchCleared,
        "search" => Msg::SearchInputChanged(rest.to_string()),
        "status" => Msg::StatusFilterChanged(parse_status(rest)?),
        "page" => Msg::PageRequested(parse_page(rest)?),
        "next" => Msg::PageRequested(current_page.saturating_add(1)),
        "prev" => Msg::PageRequested(current_page.saturating_sub(1)),
        "clear" => Msg::SearchCleared,
        "clear-all" => Msg::FiltersCleared,
        "add" => Msg::CreateSubmitted(parse_create(rest)),
        "cancel" => Msg::CreateFormClosed,
        "show" if rest.is_empty() => return Err(CommandError::Usage("show <id>")),
        "show" => Msg::DetailsRequested(rest.to_string()),
        "close" => Msg::ItemSelected(None),
        "dismiss" => Msg::ErrorDismissed,
        "retry" | "refresh" => Msg::FetchRequested,
        _ => return Err(CommandError::Unknown(word.to_string())),
    };
    Ok(Command::Dispatch(msg))
}

fn parse_status(raw: &str) -> Result<StatusFilter, CommandError> {
    match raw.to_ascii_lowercase().as_str() {
        "" => Err(CommandError::Usage("status <all|active|inactive|pending>")),
        "all" => Ok(StatusFilter::All),
        other => other
            .parse::<ItemStatus>()
            .map(StatusFilter::Only)
            .map_err(|()| CommandError::BadStatus(raw.to_string())),
    }
}

fn parse_page(raw: &str) -> Result<u32, CommandError> {
    if raw.is_empty() {
        return Err(CommandError::Usage("page <n>"));
    }
    raw.parse()
        .map_err(|_| CommandError::BadPage(raw.to_string()))
}

/// `title | description | status`; absent parts stay absent so validation
/// can name them.
fn parse_create(rest: &str) -> CreateItemRequest {
    let mut parts = rest.splitn(3, '|').map(|part| part.trim().to_string());
    let mut next = || parts.next().filter(|part| !part.is_empty());
    CreateItemRequest {
        title: next(),
        description: next(),
        status: next(),
    }
}
