//! Interactive synthesis loop.

use std::io::{BufRead, Write};

use crate::{constants, error::Result, ssml, tts::client::Synthesizer};

/// Prompts for messages and speaks each one until the user types
/// [`quit`](constants::EXIT_COMMAND) or input ends.
///
/// Every iteration prints the rendered SSML and the reported outcome. The
/// first synthesis or I/O error propagates to the caller and ends the
/// session; nothing is retried.
pub fn run<S, R, W>(synthesizer: &mut S, mut input: R, mut output: W) -> Result<()>
where
    S: Synthesizer,
    R: BufRead,
    W: Write,
{
    let mut line = String::new();
    loop {
        writeln!(output, "{}", constants::PROMPT)?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            // EOF counts as a clean exit.
            break;
        }
        let text = line.trim_end_matches(['\r', '\n']);
        if text == constants::EXIT_COMMAND {
            break;
        }

        let message = ssml::render_message(text);
        writeln!(output, "{}", message)?;

        let outcome = synthesizer.speak_ssml(&message)?;
        writeln!(output, "Result: {}", outcome.reason)?;
    }
    Ok(())
}
