use crate::error::CardexError;
use cardex_schema::{Backend, CardId};

pub const HELP: &str = "\
commands:
  tab <mysql|mongodb>        switch active tab
  load [backend]             reload a grid (active tab by default)
  cards [backend]            list the cards currently shown
  filter <key>=<value> ...   set filters on the active tab and apply
  search <text>              set search text and apply after the debounce
  clear                      clear filters of the active tab (no reload)
  new                        open the create form on the active tab
  edit <id>                  open the edit form for a shown card
  set <field>=<value> ...    edit form fields
  submit                     submit the form
  close                      close the form
  delete <id>                delete a card (asks first)
  state                      print UI state
  help                       this text
  quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Tab(Backend),
    Load(Option<Backend>),
    Cards(Option<Backend>),
    Filter(Vec<(String, String)>),
    Search(String),
    Clear,
    New,
    Edit(CardId),
    Set(Vec<(String, String)>),
    Submit,
    Close,
    Delete(CardId),
    State,
    Help,
    Quit,
}

impl Command {
    /// `Ok(None)` for blank lines.
    pub fn parse(line: &str) -> Result<Option<Self>, CardexError> {
        let line = line.trim();
        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(w, r)| (w, r.trim()));

        let command = match word.to_ascii_lowercase().as_str() {
            "" => return Ok(None),
            "tab" => Command::Tab(parse_backend(rest)?),
            "load" | "reload" => Command::Load(optional_backend(rest)?),
            "cards" | "ls" => Command::Cards(optional_backend(rest)?),
            "filter" => Command::Filter(parse_assignments(rest)?),
            "search" => Command::Search(rest.to_string()),
            "clear" => Command::Clear,
            "new" | "add" => Command::New,
            "edit" => Command::Edit(parse_id(rest)?),
            "set" => Command::Set(parse_assignments(rest)?),
            "submit" | "save" => Command::Submit,
            "close" | "cancel" => Command::Close,
            "delete" | "rm" => Command::Delete(parse_id(rest)?),
            "state" => Command::State,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => {
                return Err(CardexError::Validation(format!(
                    "unknown command `{other}` (try `help`)"
                )));
            }
        };
        Ok(Some(command))
    }
}

fn parse_backend(raw: &str) -> Result<Backend, CardexError> {
    raw.parse::<Backend>()
        .map_err(|e| CardexError::Validation(e.to_string()))
}

fn optional_backend(raw: &str) -> Result<Option<Backend>, CardexError> {
    if raw.is_empty() {
        Ok(None)
    } else {
        parse_backend(raw).map(Some)
    }
}

fn parse_id(raw: &str) -> Result<CardId, CardexError> {
    CardId::new(raw).ok_or_else(|| CardexError::Validation("a card id is required".to_string()))
}

/// `key=value` pairs separated by whitespace; values may be double-quoted to
/// contain spaces, and `key=` clears.
fn parse_assignments(raw: &str) -> Result<Vec<(String, String)>, CardexError> {
    let mut pairs = Vec::new();
    let mut chars = raw.chars().peekable();

    loop {
        while chars.next_if(|c| c.is_whitespace()).is_some() {}
        if chars.peek().is_none() {
            break;
        }

        let key: String = std::iter::from_fn(|| chars.next_if(|c| *c != '=' && !c.is_whitespace()))
            .collect();
        if chars.next_if_eq(&'=').is_none() {
            return Err(CardexError::Validation(format!(
                "expected `{key}=<value>`"
            )));
        }

        let value: String = if chars.next_if_eq(&'"').is_some() {
            let value: String = std::iter::from_fn(|| chars.next_if(|c| *c != '"')).collect();
            if chars.next_if_eq(&'"').is_none() {
                return Err(CardexError::Validation(format!(
                    "unterminated quote in `{key}`"
                )));
            }
            value
        } else {
            std::iter::from_fn(|| chars.next_if(|c| !c.is_whitespace())).collect()
        };
        pairs.push((key, value));
    }

    if pairs.is_empty() {
        return Err(CardexError::Validation(
            "expected at least one key=value".to_string(),
        ));
    }
    Ok(pairs)
}
