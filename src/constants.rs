pub const SSML_VERSION: &str = "1.0";

pub const LANGUAGE: &str = "en-us";

pub const VOICE_NAME: &str = "en-us-guyneural";

/// Typing this line at the prompt ends the session.
pub const EXIT_COMMAND: &str = "quit";

pub const PROMPT: &str = "Write a message: ";

/// Default output format requested from the service. The console never decodes
/// the audio, so any non-streaming format works here.
pub const AUDIO_FORMAT: &str = "riff-24khz-16bit-mono-pcm";

/// Host suffix of the hosted subscription endpoints, prefixed by the location,
/// e.g. `westeurope.tts.speech.microsoft.com`.
pub const SUBSCRIPTION_HOST_SUFFIX: &str = ".tts.speech.microsoft.com";

/// Websocket path of the synthesis endpoint, shared by hosted and private
/// deployments.
pub const WEBSOCKET_PATH: &str = "/cognitiveservices/websocket/v1";

pub const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";
