//! Speech service client: websocket request building, wire framing and
//! response processing.

pub mod client;

use crate::{
    config::Config,
    constants,
    error::{ConfigError, Error, Result},
};

pub type WebSocketStream<T> = tungstenite::WebSocket<tungstenite::stream::MaybeTlsStream<T>>;

pub fn websocket_connect(config: &Config) -> Result<WebSocketStream<std::net::TcpStream>> {
    let request = build_websocket_request(config)?;
    let (websocket, _) = tungstenite::connect(request)?;
    Ok(websocket)
}

/// Builds the websocket upgrade request for either connection mode. Hosted
/// subscriptions go to the regional endpoint and authenticate with the
/// subscription key header; private endpoints use the configured URI with the
/// http(s) scheme mapped onto ws(s).
fn build_websocket_request(config: &Config) -> Result<tungstenite::handshake::client::Request> {
    use tungstenite::client::IntoClientRequest;

    let connection_id = uuid::Uuid::new_v4().simple().to_string();
    match config {
        Config::Azure {
            subscription_key,
            location,
        } => {
            let url = format!(
                "wss://{}{}{}?X-ConnectionId={}",
                location,
                constants::SUBSCRIPTION_HOST_SUFFIX,
                constants::WEBSOCKET_PATH,
                connection_id,
            );
            let mut request = url.into_client_request()?;
            request.headers_mut().insert(
                constants::SUBSCRIPTION_KEY_HEADER,
                subscription_key
                    .parse()
                    .map_err(|err| tungstenite::Error::from(http::Error::from(err)))?,
            );
            Ok(request)
        }
        Config::Aks { endpoint } => {
            let scheme = match endpoint.scheme_str() {
                Some("http" | "ws") => "ws",
                _ => "wss",
            };
            let authority = endpoint
                .authority()
                .ok_or_else(|| Error::Config(ConfigError::EndpointMissingHost(endpoint.clone())))?;
            let url = format!(
                "{}://{}{}{}?X-ConnectionId={}",
                scheme,
                authority,
                endpoint.path().trim_end_matches('/'),
                constants::WEBSOCKET_PATH,
                connection_id,
            );
            Ok(url.into_client_request()?)
        }
    }
}

fn build_config_message() -> tungstenite::Message {
    static SPEECH_CONFIG_HEAD: &str = r#"{"context":{"synthesis":{"audio":{"metadataoptions":{"sentenceBoundaryEnabled":"false","wordBoundaryEnabled":"true"},"outputFormat":""#;
    static SPEECH_CONFIG_TAIL: &str = r#""}}}}"#;
    let speech_config_message = format!(
        "X-Timestamp:{}\r\nContent-Type:application/json; charset=utf-8\r\nPath:speech.config\r\n\r\n{}{}{}",
        chrono::Local::now().to_rfc2822(),
        SPEECH_CONFIG_HEAD,
        constants::AUDIO_FORMAT,
        SPEECH_CONFIG_TAIL
    );
    tungstenite::Message::Text(speech_config_message)
}

fn build_ssml_message(ssml: &str) -> tungstenite::Message {
    let ssml_message = format!(
        "X-RequestId:{}\r\nContent-Type:application/ssml+xml\r\nX-Timestamp:{}\r\nPath:ssml\r\n\r\n{}",
        uuid::Uuid::new_v4().simple(),
        chrono::Local::now().to_rfc2822(),
        ssml,
    );
    tungstenite::Message::Text(ssml_message)
}

/// Word boundary and related metadata attached to the synthesized audio.
#[derive(Debug)]
pub struct AudioMetadata {
    pub metadata_type: Option<String>,
    pub offset: u64,
    pub duration: u64,
    pub text: Option<String>,
}

impl AudioMetadata {
    fn from_str(text: &str) -> Result<Vec<Self>> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        if let Some(items) = value["Metadata"].as_array() {
            let mut audio_metadata = Vec::new();
            for item in items {
                audio_metadata.push(AudioMetadata {
                    metadata_type: item["Type"].as_str().map(|x| x.to_owned()),
                    offset: item["Data"]["Offset"].as_u64().unwrap_or(0),
                    duration: item["Data"]["Duration"].as_u64().unwrap_or(0),
                    text: item["Data"]["text"]["Text"].as_str().map(|x| x.to_owned()),
                });
            }
            Ok(audio_metadata)
        } else {
            Err(Error::UnexpectedMessage(format!(
                "unexpected json text: {}",
                text
            )))
        }
    }
}

enum ProcessedMessage {
    AudioBytes((Vec<u8>, usize)),
    AudioMetadata(Vec<AudioMetadata>),
}

fn process_message(
    message: tungstenite::Message,
    turn_start: &mut bool,
    response: &mut bool,
    turn_end: &mut bool,
) -> Result<Option<ProcessedMessage>> {
    match message {
        tungstenite::Message::Text(text) => {
            if text.contains("audio.metadata") {
                if let Some(index) = text.find("\r\n\r\n") {
                    let metadata = AudioMetadata::from_str(&text[index + 4..])?;
                    Ok(Some(ProcessedMessage::AudioMetadata(metadata)))
                } else {
                    Ok(None)
                }
            } else if text.contains("turn.start") {
                *turn_start = true;
                Ok(None)
            } else if text.contains("response") {
                *response = true;
                Ok(None)
            } else if text.contains("turn.end") {
                *turn_end = true;
                Ok(None)
            } else {
                Err(Error::UnexpectedMessage(format!(
                    "unexpected text message: {}",
                    text
                )))
            }
        }
        tungstenite::Message::Binary(bytes) => {
            if (*turn_start || *response) && bytes.len() >= 2 {
                // Audio frames start with a big-endian header length. The
                // declared length must fit inside the frame, otherwise the
                // payload slice would be out of bounds.
                let header_len = u16::from_be_bytes([bytes[0], bytes[1]]) as usize;
                if header_len + 2 > bytes.len() {
                    return Err(Error::UnexpectedMessage(format!(
                        "binary frame of {} bytes declares a {} byte header",
                        bytes.len(),
                        header_len
                    )));
                }
                Ok(Some(ProcessedMessage::AudioBytes((bytes, header_len + 2))))
            } else {
                Ok(None)
            }
        }
        tungstenite::Message::Close(_) => {
            *turn_end = true;
            Ok(None)
        }
        _ => Err(Error::UnexpectedMessage(format!(
            "unexpected message: {}",
            message
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscription_request_targets_regional_host() {
        let config = Config::Azure {
            subscription_key: "K".to_string(),
            location: "westeurope".to_string(),
        };
        let request = build_websocket_request(&config).unwrap();
        assert_eq!(
            request.uri().host(),
            Some("westeurope.tts.speech.microsoft.com")
        );
        assert_eq!(request.uri().path(), "/cognitiveservices/websocket/v1");
        assert_eq!(
            request.headers().get("Ocp-Apim-Subscription-Key").unwrap(),
            "K"
        );
    }

    #[test]
    fn endpoint_request_maps_https_to_wss() {
        let config = Config::Aks {
            endpoint: "https://tts.internal:5000".parse().unwrap(),
        };
        let request = build_websocket_request(&config).unwrap();
        assert_eq!(request.uri().scheme_str(), Some("wss"));
        assert_eq!(request.uri().host(), Some("tts.internal"));
        assert_eq!(request.uri().port_u16(), Some(5000));
        assert_eq!(request.uri().path(), "/cognitiveservices/websocket/v1");
        assert!(request.headers().get("Ocp-Apim-Subscription-Key").is_none());
    }

    #[test]
    fn endpoint_request_keeps_plain_ws_scheme() {
        let config = Config::Aks {
            endpoint: "http://localhost:5000".parse().unwrap(),
        };
        let request = build_websocket_request(&config).unwrap();
        assert_eq!(request.uri().scheme_str(), Some("ws"));
    }

    #[test]
    fn endpoint_request_preserves_path_prefix() {
        let config = Config::Aks {
            endpoint: "https://tts.internal/speech/".parse().unwrap(),
        };
        let request = build_websocket_request(&config).unwrap();
        assert_eq!(
            request.uri().path(),
            "/speech/cognitiveservices/websocket/v1"
        );
    }

    #[test]
    fn ssml_message_carries_path_and_body() {
        let message = build_ssml_message("<speak>hi</speak>");
        match message {
            tungstenite::Message::Text(text) => {
                assert!(text.contains("Path:ssml"));
                assert!(text.contains("Content-Type:application/ssml+xml"));
                assert!(text.ends_with("<speak>hi</speak>"));
            }
            other => panic!("unexpected message: {}", other),
        }
    }

    #[test]
    fn config_message_requests_audio_format() {
        match build_config_message() {
            tungstenite::Message::Text(text) => {
                assert!(text.contains("Path:speech.config"));
                assert!(text.contains("riff-24khz-16bit-mono-pcm"));
            }
            other => panic!("unexpected message: {}", other),
        }
    }

    #[test]
    fn turn_markers_flip_state_flags() {
        let mut turn_start = false;
        let mut response = false;
        let mut turn_end = false;
        let message = tungstenite::Message::Text("Path:turn.start\r\n\r\n{}".to_string());
        assert!(process_message(message, &mut turn_start, &mut response, &mut turn_end)
            .unwrap()
            .is_none());
        assert!(turn_start);

        let message = tungstenite::Message::Text("Path:turn.end\r\n\r\n{}".to_string());
        process_message(message, &mut turn_start, &mut response, &mut turn_end).unwrap();
        assert!(turn_end);
    }

    #[test]
    fn audio_frames_outside_a_turn_are_dropped() {
        let mut turn_start = false;
        let mut response = false;
        let mut turn_end = false;
        let message = tungstenite::Message::Binary(vec![0, 2, 1, 2, 0xAA]);
        let processed =
            process_message(message, &mut turn_start, &mut response, &mut turn_end).unwrap();
        assert!(processed.is_none());
    }

    #[test]
    fn audio_frames_skip_the_binary_header() {
        let mut turn_start = true;
        let mut response = false;
        let mut turn_end = false;
        let message = tungstenite::Message::Binary(vec![0, 2, 1, 2, 0xAA, 0xBB]);
        match process_message(message, &mut turn_start, &mut response, &mut turn_end).unwrap() {
            Some(ProcessedMessage::AudioBytes((bytes, index))) => {
                assert_eq!(index, 4);
                assert_eq!(&bytes[index..], &[0xAA, 0xBB]);
            }
            _ => panic!("expected audio bytes"),
        }
    }

    #[test]
    fn truncated_audio_frame_is_an_error() {
        let mut turn_start = true;
        let mut response = false;
        let mut turn_end = false;
        // Declares a 65535 byte header but carries a single payload byte.
        let message = tungstenite::Message::Binary(vec![0xFF, 0xFF, 0x01]);
        let result = process_message(message, &mut turn_start, &mut response, &mut turn_end);
        assert!(matches!(result, Err(Error::UnexpectedMessage(_))));
    }

    #[test]
    fn header_only_audio_frame_has_empty_payload() {
        let mut turn_start = true;
        let mut response = false;
        let mut turn_end = false;
        let message = tungstenite::Message::Binary(vec![0, 2, 1, 2]);
        match process_message(message, &mut turn_start, &mut response, &mut turn_end).unwrap() {
            Some(ProcessedMessage::AudioBytes((bytes, index))) => {
                assert_eq!(index, bytes.len());
                assert!(bytes[index..].is_empty());
            }
            _ => panic!("expected audio bytes"),
        }
    }

    #[test]
    fn metadata_frames_parse_word_boundaries() {
        let mut turn_start = true;
        let mut response = false;
        let mut turn_end = false;
        let body = r#"{"Metadata":[{"Type":"WordBoundary","Data":{"Offset":1000,"Duration":5000,"text":{"Text":"hello"}}}]}"#;
        let message =
            tungstenite::Message::Text(format!("Path:audio.metadata\r\n\r\n{}", body));
        match process_message(message, &mut turn_start, &mut response, &mut turn_end).unwrap() {
            Some(ProcessedMessage::AudioMetadata(metadata)) => {
                assert_eq!(metadata.len(), 1);
                assert_eq!(metadata[0].metadata_type.as_deref(), Some("WordBoundary"));
                assert_eq!(metadata[0].offset, 1000);
                assert_eq!(metadata[0].text.as_deref(), Some("hello"));
            }
            _ => panic!("expected metadata"),
        }
    }
}
