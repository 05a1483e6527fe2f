//! Translation of `SpeechOptions` into a `say` argument vector.
//!
//! Flags are always emitted in the same order, whatever order the options
//! were set in:
//! `-v "<voice>"`, `-r <rate>`, `--quality=<n>`, `-o <file>`, `-n <target>`,
//! `-a <device>`, `--file-format=<fmt>`, then the positional input.

use crate::options::SpeechOptions;
use serde::Serialize;
use std::path::PathBuf;

/// What `say` should read: literal text, or a file via `-f`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SpeechInput {
    Text(String),
    File(PathBuf),
}

impl SpeechInput {
    /// Trailing positional tokens for this input.
    pub fn tokens(&self) -> Vec<String> {
        match self {
            SpeechInput::Text(text) => vec![text.clone()],
            SpeechInput::File(path) => vec!["-f".to_string(), path.display().to_string()],
        }
    }
}

impl From<&str> for SpeechInput {
    fn from(text: &str) -> Self {
        SpeechInput::Text(text.to_string())
    }
}

impl From<String> for SpeechInput {
    fn from(text: String) -> Self {
        SpeechInput::Text(text)
    }
}

/// Program, argument vector and a display string for one invocation.
///
/// `command` is for logs and humans; it is never handed to a shell.
/// `args` carries the voice wrapped in double quotes. No shell sits between
/// us and the child process, so `exec_args` holds the same tokens with the
/// voice bare; that is what actually gets spawned.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct InvocationDescriptor {
    pub program: String,
    pub args: Vec<String>,
    pub command: String,
    #[serde(skip)]
    pub exec_args: Vec<String>,
}

impl InvocationDescriptor {
    /// Descriptor for a utility call where display and exec tokens match.
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        let exec_args = args.clone();
        Self::with_exec_args(program, args, exec_args)
    }

    fn with_exec_args(
        program: impl Into<String>,
        args: Vec<String>,
        exec_args: Vec<String>,
    ) -> Self {
        let program = program.into();
        let command = render_command(&program, &args);
        Self {
            program,
            args,
            command,
            exec_args,
        }
    }
}

/// Build the option tokens for `opts`, followed by `trailing` unchanged.
pub fn build_args(opts: &SpeechOptions, trailing: &[String]) -> Vec<String> {
    translate(opts, trailing, true)
}

fn translate(opts: &SpeechOptions, trailing: &[String], quote_voice: bool) -> Vec<String> {
    let mut args = Vec::with_capacity(trailing.len() + 10);

    if let Some(voice) = &opts.voice {
        args.push("-v".to_string());
        if quote_voice {
            args.push(format!("\"{}\"", voice));
        } else {
            args.push(voice.clone());
        }
    }
    if let Some(rate) = opts.rate {
        args.push("-r".to_string());
        args.push(rate.to_string());
    }
    // Some(0) is a real setting and is emitted.
    if let Some(quality) = opts.quality {
        args.push(format!("--quality={}", quality));
    }
    if let Some(path) = &opts.output_file {
        args.push("-o".to_string());
        args.push(path.display().to_string());
    }
    if let Some(network) = &opts.network {
        args.push("-n".to_string());
        args.push(network.to_string());
    }
    if let Some(device) = &opts.audio_device {
        args.push("-a".to_string());
        args.push(device.clone());
    }
    if let Some(format) = &opts.file_format {
        args.push(format!("--file-format={}", format));
    }

    args.extend(trailing.iter().cloned());
    args
}

/// Build a full descriptor for `program` with `opts` and `input`.
pub fn describe(program: &str, opts: &SpeechOptions, input: &SpeechInput) -> InvocationDescriptor {
    let trailing = input.tokens();
    InvocationDescriptor::with_exec_args(
        program,
        translate(opts, &trailing, true),
        translate(opts, &trailing, false),
    )
}

fn render_command(program: &str, args: &[String]) -> String {
    let mut parts = Vec::with_capacity(args.len() + 1);
    parts.push(program);
    parts.extend(args.iter().map(String::as_str));
    parts.join(" ")
}
