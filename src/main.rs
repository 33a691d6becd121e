use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use aead_codec::cli::{handle_config, handle_decrypt, handle_encrypt, handle_init};
use aead_codec::codec::Codec;
use aead_codec::config::{secret_from_value, CodecPaths, CodecSettings, SECRET_ENV};
use aead_codec::crypto::SecretString;
use aead_codec::error::CodecError;
use aead_codec::logging::init_tracing;

#[derive(Parser)]
#[command(
    name = "aead-codec",
    author = "Kaylee Beyene",
    version,
    about = "Passphrase-keyed AES-256-GCM envelope encryption",
    long_about = "aead-codec derives a key from a secret and salt, then turns text into \
                  tamper-evident nonce:tag:ciphertext envelopes and back."
)]
struct Cli {
    /// Settings file (defaults to AEAD_CODEC_CONFIG or ~/.config/aead-codec/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Secret passphrase
    #[arg(long, global = true, env = SECRET_ENV, hide_env_values = true)]
    secret: Option<String>,

    /// Prompt for the secret (takes precedence over --secret and SECRET_KEY)
    #[arg(long, global = true)]
    prompt: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encrypt text into an envelope (reads stdin when TEXT is omitted)
    #[command(alias = "enc")]
    Encrypt {
        /// Plaintext to encrypt
        text: Option<String>,
    },

    /// Decrypt an envelope (reads stdin when ENVELOPE is omitted)
    #[command(alias = "dec")]
    Decrypt {
        /// Envelope in nonce:tag:ciphertext form
        envelope: Option<String>,
    },

    /// Write a settings file with a freshly generated salt
    Init {
        /// Replace an existing settings file
        #[arg(long)]
        force: bool,
    },

    /// Show current configuration
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.log_json);

    // The settings file is optional for encrypt/decrypt, so an unresolvable
    // config directory only matters to init and config.
    let paths = match &cli.config {
        Some(path) => Ok(CodecPaths::with_settings_file(path)),
        None => CodecPaths::new(),
    };

    let mut stdout = std::io::stdout().lock();

    match cli.command {
        Commands::Init { force } => {
            handle_init(&paths?, force, &mut stdout)?;
        }
        Commands::Config => {
            let paths = paths?;
            let settings = load_settings(&paths)?;
            handle_config(&paths, &settings, &mut stdout)?;
        }
        Commands::Encrypt { text } => {
            let codec = build_codec(paths, cli.secret, cli.prompt)?;
            handle_encrypt(&codec, text, &mut std::io::stdin().lock(), &mut stdout)?;
        }
        Commands::Decrypt { envelope } => {
            let codec = build_codec(paths, cli.secret, cli.prompt)?;
            handle_decrypt(&codec, envelope, &mut std::io::stdin().lock(), &mut stdout)?;
        }
    }

    Ok(())
}

fn load_settings(paths: &CodecPaths) -> Result<CodecSettings> {
    let mut settings = CodecSettings::load_or_default(paths)
        .with_context(|| format!("loading {}", paths.settings_file().display()))?;
    settings.apply_env()?;
    Ok(settings)
}

/// Settings, secret and key derivation; any failure here stops the process
fn build_codec(
    paths: Result<CodecPaths, CodecError>,
    secret: Option<String>,
    prompt: bool,
) -> Result<Codec> {
    let settings = match paths {
        Ok(paths) => load_settings(&paths)?,
        Err(err) => {
            tracing::info!(reason = %err, "No settings file location; using defaults and environment");
            CodecSettings::from_env()?
        }
    };

    let secret = if prompt {
        let entered = rpassword::prompt_password("Secret: ").context("reading secret")?;
        SecretString::new(entered)
    } else {
        secret_from_value(secret)?
    };
    if secret.is_empty() {
        anyhow::bail!("secret is empty");
    }

    Ok(Codec::new(&secret, &settings)?)
}
