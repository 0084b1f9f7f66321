//! Line commands for driving session trees, and their JSON responses.
//!
//! One command per line:
//!
//! - `insert <key>` / `delete <key>` / `search <key>`
//! - `tree`: render the current session's tree shape
//! - `traverse`: list the current session's keys in order
//! - `reset`: replace the current session's tree with an empty one
//! - `use <session>`: switch the current session
//!
//! Keys must parse as signed 64-bit integers. Duplicate inserts and deletes of
//! missing keys are reported as unsuccessful responses, not errors.

use serde::Serialize;

use crate::btree::{BTreeError, Key, NodeSnapshot};
use crate::session_registry::{RegistryError, SessionRegistry, validate_session_id};
use crate::time::TimeSource;

/// A parsed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Insert(Key),
    Delete(Key),
    Search(Key),
    Tree,
    Traverse,
    Reset,
    Use(String),
}

/// Error returned when a command line cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// The line was blank.
    Empty,
    /// The verb is not a known command.
    UnknownCommand(String),
    /// A key-taking command was given no key.
    MissingKey,
    /// The key is not an integer.
    InvalidKey(String),
    /// `use` was given no session id.
    MissingSession,
    /// Extra arguments after a complete command.
    TrailingInput(String),
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "Empty command"),
            Self::UnknownCommand(verb) => write!(f, "Unknown command: {verb}"),
            Self::MissingKey => write!(f, "No key provided"),
            Self::InvalidKey(_) => write!(f, "Invalid key format"),
            Self::MissingSession => write!(f, "No session id provided"),
            Self::TrailingInput(rest) => write!(f, "Unexpected input: {rest}"),
        }
    }
}

impl std::error::Error for CommandError {}

impl std::str::FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut parts = line.split_whitespace();
        let verb = parts.next().ok_or(CommandError::Empty)?;

        let command = match verb.to_ascii_lowercase().as_str() {
            "insert" => Self::Insert(parse_key(parts.next())?),
            "delete" => Self::Delete(parse_key(parts.next())?),
            "search" => Self::Search(parse_key(parts.next())?),
            "tree" => Self::Tree,
            "traverse" => Self::Traverse,
            "reset" => Self::Reset,
            "use" => Self::Use(
                parts
                    .next()
                    .ok_or(CommandError::MissingSession)?
                    .to_string(),
            ),
            _ => return Err(CommandError::UnknownCommand(verb.to_string())),
        };

        let rest: Vec<&str> = parts.collect();
        if !rest.is_empty() {
            return Err(CommandError::TrailingInput(rest.join(" ")));
        }
        Ok(command)
    }
}

fn parse_key(token: Option<&str>) -> Result<Key, CommandError> {
    let token = token.ok_or(CommandError::MissingKey)?;
    token
        .parse::<Key>()
        .map_err(|_| CommandError::InvalidKey(token.to_string()))
}

/// Response to one command, rendered as a single JSON object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Response {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub found: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tree: Option<NodeSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keys: Option<Vec<Key>>,
}

impl Response {
    fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            found: None,
            tree: None,
            keys: None,
        }
    }

    /// An unsuccessful response carrying `message`.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            ..Self::ok(message)
        }
    }

    fn with_tree(mut self, tree: NodeSnapshot) -> Self {
        self.tree = Some(tree);
        self
    }

    /// Render as a single line of JSON.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            format!(r#"{{"success":false,"message":"failed to render response: {e}"}}"#)
        })
    }
}

/// Executes commands against a registry on behalf of one client.
pub struct CommandSession<'a, T: TimeSource> {
    registry: &'a SessionRegistry<T>,
    session_id: String,
}

impl<'a, T: TimeSource> CommandSession<'a, T> {
    #[must_use]
    pub fn new(registry: &'a SessionRegistry<T>, session_id: impl Into<String>) -> Self {
        Self {
            registry,
            session_id: session_id.into(),
        }
    }

    #[must_use]
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Parse and execute one line.
    pub fn handle_line(&mut self, line: &str) -> Response {
        match line.parse::<Command>() {
            Ok(command) => self.execute(command),
            Err(e) => {
                tracing::warn!(line, error = %e, "rejected command");
                Response::failure(e.to_string())
            }
        }
    }

    /// Execute one parsed command.
    pub fn execute(&mut self, command: Command) -> Response {
        match self.try_execute(command) {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(session_id = self.session_id.as_str(), error = %e, "command failed");
                Response::failure(e.to_string())
            }
        }
    }

    fn try_execute(&mut self, command: Command) -> Result<Response, RegistryError> {
        let registry = self.registry;
        let session_id = self.session_id.as_str();

        let response = match command {
            Command::Insert(key) => registry.with_tree(session_id, |tree| {
                match tree.insert(key) {
                    Ok(()) => Response::ok(format!("Key {key} inserted successfully"))
                        .with_tree(tree.snapshot()),
                    Err(BTreeError::DuplicateKey(_)) => Response::failure("Key already exists"),
                    Err(e) => Response::failure(e.to_string()),
                }
            })?,
            Command::Delete(key) => registry.with_tree(session_id, |tree| {
                if tree.delete(key) {
                    Response::ok(format!("Key {key} deleted successfully"))
                        .with_tree(tree.snapshot())
                } else {
                    Response::failure("Key not found")
                }
            })?,
            Command::Search(key) => {
                let found = registry.with_tree(session_id, |tree| tree.search(key))?;
                let verdict = if found { "found" } else { "not found" };
                Response {
                    found: Some(found),
                    ..Response::ok(format!("Key {key} {verdict}"))
                }
            }
            Command::Tree => {
                let snapshot = registry.with_tree(session_id, |tree| tree.snapshot())?;
                Response {
                    message: None,
                    ..Response::ok("").with_tree(snapshot)
                }
            }
            Command::Traverse => {
                let keys = registry.with_tree(session_id, |tree| tree.traverse())?;
                Response {
                    message: None,
                    keys: Some(keys),
                    ..Response::ok("")
                }
            }
            Command::Reset => {
                registry.reset(session_id)?;
                Response::ok("Tree reset successfully").with_tree(NodeSnapshot::empty())
            }
            Command::Use(next) => {
                validate_session_id(&next)?;
                let message = format!("Using session {next}");
                self.session_id = next;
                Response::ok(message)
            }
        };
        Ok(response)
    }
}
