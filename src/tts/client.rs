//! Speech synthesis client.

use std::{
    fmt,
    io::{Read, Write},
};

use super::{
    build_config_message, build_ssml_message, process_message, websocket_connect, AudioMetadata,
    ProcessedMessage, WebSocketStream,
};
use crate::{config::Config, error::Result};

/// The narrow capability the console loop depends on: hand over a rendered
/// SSML document, get back the reported outcome.
pub trait Synthesizer {
    fn speak_ssml(&mut self, ssml: &str) -> Result<SynthesisOutcome>;
}

/// Synchronous client over the service websocket.
pub struct AzureSpeechClient<T: Read + Write>(WebSocketStream<T>);

/// Connects to the endpoint selected by `config`.
pub fn connect(config: &Config) -> Result<AzureSpeechClient<std::net::TcpStream>> {
    Ok(AzureSpeechClient(websocket_connect(config)?))
}

impl<T: Read + Write> AzureSpeechClient<T> {
    /// Closes the websocket. Dropping the client also releases the
    /// connection, but going through `close` surfaces shutdown errors.
    pub fn close(mut self) -> Result<()> {
        match self.0.close(None) {
            Ok(()) | Err(tungstenite::Error::ConnectionClosed) => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

impl<T: Read + Write> Synthesizer for AzureSpeechClient<T> {
    /// Submits one SSML document and drains the response until the service
    /// reports the end of the turn.
    fn speak_ssml(&mut self, ssml: &str) -> Result<SynthesisOutcome> {
        self.0.send(build_config_message())?;
        self.0.send(build_ssml_message(ssml))?;

        let mut audio_bytes = Vec::new();
        let mut audio_metadata = Vec::new();
        let mut turn_start = false;
        let mut response = false;
        let mut turn_end = false;
        loop {
            if turn_end {
                break;
            }

            let message = self.0.read()?;
            let message = process_message(message, &mut turn_start, &mut response, &mut turn_end)?;
            if let Some(message) = message {
                match message {
                    ProcessedMessage::AudioBytes(payload) => {
                        audio_bytes.push(payload);
                    }
                    ProcessedMessage::AudioMetadata(metadata) => {
                        audio_metadata.extend(metadata);
                    }
                }
            }
        }

        let audio_bytes: Vec<u8> = audio_bytes
            .iter()
            .flat_map(|(bytes, index)| &bytes[*index..])
            .copied()
            .collect();

        let reason = if audio_bytes.is_empty() {
            ResultReason::Canceled
        } else {
            ResultReason::SynthesizingAudioCompleted
        };
        Ok(SynthesisOutcome {
            reason,
            audio_bytes,
            audio_metadata,
        })
    }
}

/// Reported outcome of one synthesis call.
#[derive(Debug)]
pub struct SynthesisOutcome {
    pub reason: ResultReason,
    pub audio_bytes: Vec<u8>,
    pub audio_metadata: Vec<AudioMetadata>,
}

/// Reason code attached to a completed call, mirroring what the service
/// reports. Failures never carry a reason, they surface as errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultReason {
    SynthesizingAudioCompleted,
    Canceled,
}

impl fmt::Display for ResultReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultReason::SynthesizingAudioCompleted => write!(f, "SynthesizingAudioCompleted"),
            ResultReason::Canceled => write!(f, "Canceled"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reason_display_matches_service_names() {
        assert_eq!(
            ResultReason::SynthesizingAudioCompleted.to_string(),
            "SynthesizingAudioCompleted"
        );
        assert_eq!(ResultReason::Canceled.to_string(), "Canceled");
    }
}
