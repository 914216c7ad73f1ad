//! Scripted [`CommandRunner`] used by the unit tests.

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::config::Settings;
use crate::git::{CommandOutput, CommandRunner};
use crate::repo::RepositoryHandle;

struct Rule {
    prefix: String,
    output: CommandOutput,
    remaining: Option<usize>,
}

/// Answers commands by matching the space-joined argument line against
/// registered prefixes. Rules are checked in registration order; a rule
/// registered with a count stops matching once used up. Unmatched commands
/// fail.
#[derive(Default)]
pub(crate) struct MockRunner {
    rules: Mutex<Vec<Rule>>,
    calls: Mutex<Vec<String>>,
}

impl MockRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// A runner that answers the working-tree probe positively.
    pub fn repository() -> Self {
        Self::new().on("rev-parse --is-inside-work-tree", "true\n")
    }

    pub fn respond(self, prefix: &str, output: CommandOutput, times: Option<usize>) -> Self {
        self.rules.lock().unwrap().push(Rule {
            prefix: prefix.to_string(),
            output,
            remaining: times,
        });
        self
    }

    pub fn on(self, prefix: &str, stdout: &str) -> Self {
        self.respond(prefix, CommandOutput::ok(stdout), None)
    }

    pub fn on_once(self, prefix: &str, stdout: &str) -> Self {
        self.respond(prefix, CommandOutput::ok(stdout), Some(1))
    }

    pub fn fail(self, prefix: &str, stderr: &str) -> Self {
        self.respond(prefix, CommandOutput::failed(stderr), None)
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.calls()
            .iter()
            .filter(|line| line.starts_with(prefix))
            .count()
    }

    /// Open a handle on `root` driven by this runner.
    pub fn open(self, root: &Path) -> (RepositoryHandle, Arc<MockRunner>) {
        self.open_with(root, Settings::default())
    }

    pub fn open_with(self, root: &Path, settings: Settings) -> (RepositoryHandle, Arc<MockRunner>) {
        let runner = Arc::new(self);
        let handle = RepositoryHandle::with_runner(root, settings, Box::new(runner.clone()));
        (handle, runner)
    }
}

impl CommandRunner for MockRunner {
    fn execute(&self, args: &[&str], _timeout: Duration) -> CommandOutput {
        let line = args.join(" ");
        self.calls.lock().unwrap().push(line.clone());

        let mut rules = self.rules.lock().unwrap();
        for rule in rules.iter_mut() {
            if !line.starts_with(&rule.prefix) || rule.remaining == Some(0) {
                continue;
            }
            if let Some(n) = rule.remaining.as_mut() {
                *n -= 1;
            }
            return rule.output.clone();
        }
        CommandOutput::failed(format!("unexpected command: {}", line))
    }
}
