//! Interactive console for the Azure speech synthesis service.
//!
//! The binary reads a properties file, connects to the service either through
//! a hosted subscription (`app.mode=AZURE`) or a privately deployed endpoint
//! (`app.mode=AKS`), and then speaks every message typed at the prompt until
//! the user enters `quit`.
//!
//! # Properties file
//! ```properties
//! # Hosted subscription
//! app.mode=AZURE
//! subs.key=0123456789abcdef
//! location=westeurope
//! ```
//! ```properties
//! # Private endpoint
//! app.mode=AKS
//! aks.tts.uri=https://tts.my-cluster.internal:5000
//! ```
//!
//! # Library use
//! The pieces are usable on their own: [`config::Config`] resolves the
//! connection mode, [`ssml::render_message`] renders the request document and
//! [`tts::client`] speaks it. The console loop only depends on the
//! [`tts::client::Synthesizer`] trait, so it can be driven without a network
//! connection:
//! ```no_run
//! use azure_tts_console::{config::Config, console, tts::client};
//! use std::{io, path::Path};
//!
//! fn main() -> azure_tts_console::error::Result<()> {
//!     let config = Config::load(Path::new("tts.properties"))?;
//!     let mut speech = client::connect(&config)?;
//!     console::run(&mut speech, io::stdin().lock(), io::stdout())?;
//!     speech.close()
//! }
//! ```

mod constants;

pub mod config;
pub mod console;
pub mod error;
pub mod ssml;
pub mod tts;
