//! Shared test helpers for saykit-core integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use saykit_core::{CommandExecutor, CommandOutput, ExecOptions, Result, SayError};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use tokio::time::Instant;

pub const CATALOG: &str = "\
Alex                en_US    # Most people recognize me by my voice.
Alex (German)       de_DE    # Hallo, ich heiße Alex.
Amelie              fr_CA    # Bonjour, je m'appelle Amelie.
Sandy (French (Canada)) fr_CA    # Bonjour! Je m'appelle Sandy.
Sandy (French (France)) fr_FR    # Bonjour, je m'appelle Sandy.
";

// =============================================================================
// Scripted Executor
// =============================================================================

#[derive(Clone, Debug)]
pub struct Call {
    pub program: String,
    pub args: Vec<String>,
    pub at: Instant,
}

enum Reply {
    Output(CommandOutput),
    IoError(String),
}

/// Executor that replays queued replies per program and records every call.
/// Programs with an empty queue get a successful empty output.
#[derive(Default)]
pub struct ScriptedExecutor {
    calls: Mutex<Vec<Call>>,
    replies: Mutex<HashMap<String, VecDeque<Reply>>>,
}

impl ScriptedExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(&self, program: &str, output: CommandOutput) -> &Self {
        self.replies
            .lock()
            .unwrap()
            .entry(program.to_string())
            .or_default()
            .push_back(Reply::Output(output));
        self
    }

    pub fn reply_io_error(&self, program: &str, message: &str) -> &Self {
        self.replies
            .lock()
            .unwrap()
            .entry(program.to_string())
            .or_default()
            .push_back(Reply::IoError(message.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, program: &str) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| c.program == program)
            .collect()
    }
}

#[async_trait]
impl CommandExecutor for ScriptedExecutor {
    async fn run(
        &self,
        program: &str,
        args: &[String],
        _opts: &ExecOptions,
    ) -> Result<CommandOutput> {
        self.calls.lock().unwrap().push(Call {
            program: program.to_string(),
            args: args.to_vec(),
            at: Instant::now(),
        });
        let reply = self
            .replies
            .lock()
            .unwrap()
            .get_mut(program)
            .and_then(|q| q.pop_front());
        match reply {
            Some(Reply::Output(out)) => Ok(out),
            Some(Reply::IoError(msg)) => Err(SayError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                msg,
            ))),
            None => Ok(CommandOutput::ok("")),
        }
    }
}
