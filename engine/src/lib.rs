// Life of a command:
// 1. A line comes in on stdin
// 2. Parse / validate it into a `Command` (keys must be integers)
// 3. Look up the session's tree in the registry, creating it on first use
// 4. Run search / insert / delete / traverse / snapshot against the tree
//    while holding that session's lock
// 5. Render the response (and the tree's shape) as one line of JSON
//
// System components:
//  - B-tree engine
//  - Session registry
//  - Command driver

pub mod btree;
pub mod command;
pub mod config;
pub mod session_registry;
pub mod time;


pub use btree::{BTree, BTreeError, Key, MinDegree, NodeSnapshot};
pub use command::{Command, CommandSession, Response};
pub use config::EngineConfig;
pub use session_registry::{DEFAULT_SESSION_ID, SessionRegistry};
