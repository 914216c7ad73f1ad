use serde::Serialize;

/// Stable categories for backend failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorKind {
    Timeout,
    NotInstalled,
    NotARepository,
    OutsideRepository,
    Network,
    Conflict,
    Permission,
    PushRejected,
    /// Not a failure: the requested state already holds.
    NothingToCommit,
    Unclassified,
}

/// Ordered `(substring, kind)` table. Matching is case-insensitive and the
/// first matching row wins.
pub const PATTERNS: &[(&str, ErrorKind)] = &[
    ("command timed out", ErrorKind::Timeout),
    ("not found. please install", ErrorKind::NotInstalled),
    ("not a git repository", ErrorKind::NotARepository),
    // HTTPS refusals also say "unable to access"
    ("returned error: 401", ErrorKind::Permission),
    ("returned error: 403", ErrorKind::Permission),
    ("permission to ", ErrorKind::Permission),
    ("could not resolve host", ErrorKind::Network),
    ("network", ErrorKind::Network),
    ("connection refused", ErrorKind::Network),
    ("timeout", ErrorKind::Network),
    ("unable to access", ErrorKind::Network),
    ("failed to connect", ErrorKind::Network),
    ("conflict", ErrorKind::Conflict),
    ("permission denied", ErrorKind::Permission),
    ("authentication failed", ErrorKind::Permission),
    ("rejected", ErrorKind::PushRejected),
    ("non-fast-forward", ErrorKind::PushRejected),
    ("nothing to commit", ErrorKind::NothingToCommit),
];

/// Length bound for raw backend text embedded in operation messages.
pub const RAW_MESSAGE_LIMIT: usize = 100;

/// Length bound for [`user_message`] fallbacks.
pub const USER_MESSAGE_LIMIT: usize = 150;

/// Classify raw backend output. Returns `None` when no pattern matches.
pub fn classify(text: &str) -> Option<ErrorKind> {
    let lower = text.to_lowercase();
    PATTERNS
        .iter()
        .find(|(pattern, _)| lower.contains(pattern))
        .map(|(_, kind)| *kind)
}

/// Like [`classify`], but rows of kind `first` are tried before the rest of
/// the table.
pub fn classify_preferring(text: &str, first: ErrorKind) -> Option<ErrorKind> {
    let lower = text.to_lowercase();
    let preferred = PATTERNS
        .iter()
        .any(|(pattern, kind)| *kind == first && lower.contains(pattern));
    if preferred {
        Some(first)
    } else {
        classify(text)
    }
}

/// Like [`classify`], falling back to [`ErrorKind::Unclassified`].
pub fn classify_or_unknown(text: &str) -> ErrorKind {
    classify(text).unwrap_or(ErrorKind::Unclassified)
}

pub fn is_network_error(text: &str) -> bool {
    classify(text) == Some(ErrorKind::Network)
}

/// First `max` characters of `text`, never splitting a character.
pub fn truncate(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Short, jargon-free sentence describing a backend failure.
pub fn user_message(raw: &str) -> String {
    match classify(raw) {
        Some(ErrorKind::Network) => {
            "Cannot reach the remote repository. Check your internet connection. Changes are saved locally.".to_string()
        }
        Some(ErrorKind::Conflict) => {
            "Someone else modified this file. Pull their changes first, then try again.".to_string()
        }
        Some(ErrorKind::Permission) => {
            "You don't have permission to push to this repository. Contact your admin.".to_string()
        }
        Some(ErrorKind::NotARepository) => {
            "This directory is not a git repository. Initialize git first.".to_string()
        }
        _ => {
            let cut = truncate(raw, USER_MESSAGE_LIMIT);
            if cut.len() < raw.len() {
                format!("{}...", cut)
            } else {
                cut.to_string()
            }
        }
    }
}
