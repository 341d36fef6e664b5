//! Best-effort clipboard export.
//!
//! Pipes text into whichever platform copy command is installed. Callers
//! treat every failure as a notice, never as a sync failure.

use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;

#[async_trait]
pub trait Clipboard: Send + Sync {
    async fn write_text(&self, text: &str) -> Result<(), String>;
}

/// Copy commands in order of preference, with their arguments.
const COPY_COMMANDS: &[(&str, &[&str])] = &[
    ("pbcopy", &[]),
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
    ("xsel", &["--clipboard", "--input"]),
    ("clip.exe", &[]),
    ("clip", &[]),
];

pub struct SystemClipboard {
    command: Option<(PathBuf, Vec<String>)>,
}

impl SystemClipboard {
    /// Pick the first copy command found on PATH.
    pub fn detect() -> Self {
        let command = COPY_COMMANDS.iter().find_map(|(program, args)| {
            which::which(program)
                .ok()
                .map(|path| (path, args.iter().map(|a| a.to_string()).collect()))
        });

        match &command {
            Some((path, _)) => log::debug!("[CLIPBOARD] Using {}", path.display()),
            None => log::debug!("[CLIPBOARD] No copy command found on PATH"),
        }

        Self { command }
    }

    pub fn with_command(program: impl Into<PathBuf>, args: &[&str]) -> Self {
        Self {
            command: Some((program.into(), args.iter().map(|a| a.to_string()).collect())),
        }
    }
}

#[async_trait]
impl Clipboard for SystemClipboard {
    async fn write_text(&self, text: &str) -> Result<(), String> {
        let (program, args) = self
            .command
            .as_ref()
            .ok_or_else(|| "no clipboard command available".to_string())?;

        let mut child = tokio::process::Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| format!("failed to start {}: {}", program.display(), e))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(text.as_bytes())
                .await
                .map_err(|e| format!("failed to write to {}: {}", program.display(), e))?;
        }

        let status = child
            .wait()
            .await
            .map_err(|e| format!("{} did not finish: {}", program.display(), e))?;

        if status.success() {
            Ok(())
        } else {
            Err(format!("{} exited with {}", program.display(), status))
        }
    }
}
