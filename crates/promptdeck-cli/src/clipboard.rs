//! System clipboard
//!
//! Pipes text into the platform's clipboard command:
//! - macOS: `pbcopy`
//! - Linux: `xclip`, falling back to `xsel`
//! - Windows: `clip`

use std::io::Write;
use std::process::{Command, Stdio};

use promptdeck::{Clipboard, DomainError};

/// A clipboard program and its arguments
type ClipboardCommand = (&'static str, &'static [&'static str]);

#[cfg(target_os = "macos")]
const COMMANDS: &[ClipboardCommand] = &[("pbcopy", &[])];

#[cfg(target_os = "linux")]
const COMMANDS: &[ClipboardCommand] = &[
    ("xclip", &["-selection", "clipboard"]),
    ("xsel", &["--clipboard", "--input"]),
];

#[cfg(target_os = "windows")]
const COMMANDS: &[ClipboardCommand] = &[("clip", &[])];

#[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
const COMMANDS: &[ClipboardCommand] = &[];

/// Clipboard backed by platform commands
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

impl SystemClipboard {
    pub fn new() -> Self {
        Self
    }
}

/// Run `program` with `text` on stdin
fn pipe_to(program: &str, args: &[&str], text: &str) -> Result<(), DomainError> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| DomainError::ClipboardDenied(format!("failed to spawn {program}: {e}")))?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(text.as_bytes())
            .map_err(|e| DomainError::ClipboardDenied(format!("{program}: {e}")))?;
    }

    let status = child
        .wait()
        .map_err(|e| DomainError::ClipboardDenied(format!("{program}: {e}")))?;
    if status.success() {
        Ok(())
    } else {
        Err(DomainError::ClipboardDenied(format!(
            "{program} exited with {status}"
        )))
    }
}

impl Clipboard for SystemClipboard {
    fn write_text(&self, text: &str) -> Result<(), DomainError> {
        let mut last_error =
            DomainError::ClipboardDenied("clipboard not supported on this platform".to_string());

        for (program, args) in COMMANDS {
            match pipe_to(program, args, text) {
                Ok(()) => return Ok(()),
                Err(e) => {
                    tracing::debug!("Clipboard command {program} failed: {e}");
                    last_error = e;
                }
            }
        }

        Err(last_error)
    }
}
