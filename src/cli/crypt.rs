//! Encrypt/decrypt commands

use std::io::{Read, Write};

use crate::codec::Codec;
use crate::error::{CodecError, CodecResult};

/// Encrypt `text` (or all of `input` when absent) and print the envelope
pub fn handle_encrypt(
    codec: &Codec,
    text: Option<String>,
    input: &mut impl Read,
    out: &mut impl Write,
) -> CodecResult<()> {
    let plaintext = match text {
        Some(text) => text,
        None => read_input(input)?,
    };

    let envelope = codec.encrypt(&plaintext)?;
    writeln!(out, "{}", envelope)?;
    Ok(())
}

/// Decrypt `envelope` (or all of `input` when absent) and print the plaintext
pub fn handle_decrypt(
    codec: &Codec,
    envelope: Option<String>,
    input: &mut impl Read,
    out: &mut impl Write,
) -> CodecResult<()> {
    let envelope = match envelope {
        Some(envelope) => envelope,
        None => read_input(input)?,
    };

    let plaintext = codec.decrypt(&envelope)?;
    writeln!(out, "{}", plaintext)?;
    Ok(())
}

/// Read piped input, dropping the single trailing newline `echo` adds
fn read_input(input: &mut impl Read) -> CodecResult<String> {
    let mut buffer = String::new();
    input
        .read_to_string(&mut buffer)
        .map_err(|e| CodecError::Io(format!("Failed to read input: {}", e)))?;

    if buffer.ends_with('\n') {
        buffer.pop();
        if buffer.ends_with('\r') {
            buffer.pop();
        }
    }
    Ok(buffer)
}
