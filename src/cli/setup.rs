//! Settings commands: `init` and `config`

use std::io::Write;

use crate::config::settings::DEFAULT_SALT;
use crate::config::{CodecPaths, CodecSettings};
use crate::crypto::KdfParams;
use crate::error::{CodecError, CodecResult};

/// Write a settings file with a fresh random salt
pub fn handle_init(paths: &CodecPaths, force: bool, out: &mut impl Write) -> CodecResult<()> {
    if paths.is_initialized() && !force {
        return Err(CodecError::Config(format!(
            "{} already exists; pass --force to replace it (existing envelopes will no longer decrypt)",
            paths.settings_file().display()
        )));
    }

    let settings = CodecSettings::with_random_salt();
    settings.save(paths)?;

    writeln!(out, "Wrote {}", paths.settings_file().display())?;
    writeln!(out, "A random salt was generated. Keep this file with your data;")?;
    writeln!(out, "envelopes cannot be decrypted without the same salt.")?;
    Ok(())
}

/// Show the resolved settings without revealing the salt or secret
pub fn handle_config(
    paths: &CodecPaths,
    settings: &CodecSettings,
    out: &mut impl Write,
) -> CodecResult<()> {
    writeln!(out, "aead-codec Configuration")?;
    writeln!(out, "========================")?;
    writeln!(out, "Settings file: {}", paths.settings_file().display())?;
    writeln!(out, "  (exists: {})", paths.is_initialized())?;
    writeln!(out)?;
    writeln!(out, "Algorithm: {}", settings.algorithm)?;
    writeln!(out, "Encoding:  {}", settings.encoding)?;

    if settings.uses_default_salt() {
        writeln!(
            out,
            "Salt:      built-in default \"{}\" (WEAK: run 'aead-codec init' or set SALT)",
            DEFAULT_SALT
        )?;
    } else {
        writeln!(
            out,
            "Salt:      [REDACTED {} bytes]",
            settings.effective_salt().len()
        )?;
    }

    match settings.kdf {
        KdfParams::Scrypt { log_n, r, p } => {
            writeln!(out, "KDF:       scrypt (N = 2^{}, r = {}, p = {})", log_n, r, p)?;
        }
        KdfParams::Argon2id {
            memory_cost,
            time_cost,
            parallelism,
        } => {
            writeln!(
                out,
                "KDF:       argon2id ({} KiB, {} iterations, {} lanes)",
                memory_cost, time_cost, parallelism
            )?;
        }
    }
    Ok(())
}
