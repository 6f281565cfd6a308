// Host synthesizer backend: eSpeak / eSpeak-NG or macOS `say`, driven as a
// child process.

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use super::{SpeechBackend, VoiceSettings};
use crate::error::SpeechError;

/// eSpeak's default speaking rate in words per minute; `say` uses a similar baseline.
const BASE_WPM: f32 = 175.0;

/// Command-line dialect of a synthesizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// `espeak` / `espeak-ng`: `-v voice -s wpm -p pitch -a amplitude`.
    ESpeak,
    /// macOS `say`: `-v voice -r wpm`; pitch and volume are not exposed.
    Say,
}

/// Speech backend that spawns a synthesizer process per utterance.
///
/// Text is written to the child's stdin. The child is killed if the
/// utterance is dropped before it finishes.
#[derive(Debug, Clone)]
pub struct CommandSpeaker {
    command: String,
    dialect: Dialect,
}

impl CommandSpeaker {
    /// Find an installed synthesizer, preferring espeak-ng over espeak over say.
    pub fn detect() -> Option<Self> {
        ["espeak-ng", "espeak", "say"]
            .into_iter()
            .find(|binary| which::which(binary).is_ok())
            .map(Self::with_command)
    }

    /// Use a specific binary; the dialect is inferred from its file name.
    pub fn with_command(command: impl Into<String>) -> Self {
        let command = command.into();
        let dialect = dialect_for(&command);
        CommandSpeaker { command, dialect }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Arguments for one utterance; the text itself goes through stdin.
    pub fn build_args(&self, voice: &VoiceSettings) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(name) = &voice.voice {
            args.push("-v".to_string());
            args.push(name.clone());
        }
        let wpm = (BASE_WPM * voice.rate).round().clamp(80.0, 500.0) as u32;
        match self.dialect {
            Dialect::ESpeak => {
                let pitch = (50.0 * voice.pitch).round().clamp(0.0, 99.0) as u32;
                let amplitude = (100.0 * voice.volume).round().clamp(0.0, 200.0) as u32;
                args.extend([
                    "-s".to_string(),
                    wpm.to_string(),
                    "-p".to_string(),
                    pitch.to_string(),
                    "-a".to_string(),
                    amplitude.to_string(),
                ]);
            }
            Dialect::Say => {
                args.extend(["-r".to_string(), wpm.to_string()]);
            }
        }
        args
    }
}

fn dialect_for(command: &str) -> Dialect {
    let stem = Path::new(command)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(command);
    if stem == "say" {
        Dialect::Say
    } else {
        Dialect::ESpeak
    }
}

#[async_trait]
impl SpeechBackend for CommandSpeaker {
    async fn speak(&self, text: &str, voice: &VoiceSettings) -> Result<(), SpeechError> {
        let args = self.build_args(voice);
        debug!("Speaking via {} {:?}: {}", self.command, args, text);

        let mut child = tokio::process::Command::new(&self.command)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| SpeechError::SpawnFailed {
                command: self.command.clone(),
                source: e,
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(text.as_bytes())
                .await
                .map_err(|e| SpeechError::Io {
                    command: self.command.clone(),
                    source: e,
                })?;
            // Closing stdin signals end of text.
            drop(stdin);
        }

        let output = child.wait_with_output().await.map_err(|e| SpeechError::Io {
            command: self.command.clone(),
            source: e,
        })?;

        if output.status.success() {
            Ok(())
        } else {
            Err(SpeechError::ProcessFailed {
                command: self.command.clone(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }

    fn name(&self) -> &str {
        &self.command
    }
}
