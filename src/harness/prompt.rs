use std::io::BufRead;

/// Blocks between run phases until the operator is ready to continue.
///
/// The backend does not matter to the run controller: the only contract is
/// "blocks, then returns".
pub trait UserPrompt: Send + Sync {
    fn wait(&self);
}

/// Waits for the operator to press ENTER on stdin.
#[derive(Debug, Default)]
pub struct StdinPrompt;

impl UserPrompt for StdinPrompt {
    fn wait(&self) {
        let mut line = String::new();
        // EOF (e.g. stdin closed) counts as "continue": blocking forever in
        // a non-interactive shell would be worse than skipping the pause.
        let _ = std::io::stdin().lock().read_line(&mut line);
    }
}

/// Returns immediately. Used by tests and unattended runs.
#[derive(Debug, Default)]
pub struct NoopPrompt;

impl UserPrompt for NoopPrompt {
    fn wait(&self) {}
}
