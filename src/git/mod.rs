pub mod classify;
pub mod identity;
pub mod runner;

pub use classify::{
    classify, classify_or_unknown, classify_preferring, is_network_error, truncate, user_message, ErrorKind,
    RAW_MESSAGE_LIMIT,
};
pub use identity::{load_secrets, resolve_identity, Identity, IdentitySource};
pub use runner::{CommandOutput, CommandRunner, GitCli, TIMEOUT_MESSAGE};
