//! `credtool` — credential envelope maintenance CLI.
//!
//! Single-shot transforms over stdin/stdout:
//!
//! - `credtool encrypt` — JSON credential blob on stdin → envelope JSON on stdout
//! - `credtool decrypt` — envelope JSON on stdin → credential blob on stdout
//! - `credtool rekey` — envelope JSON on stdin → envelope re-encrypted under
//!   the replacement key
//!
//! Keys are sourced from `CREDENTIALS_SECRET_KEY` and, for `rekey`,
//! `CREDENTIALS_SECRET_KEY_NEXT`. Logs go to stderr; stdout carries only the
//! transform output.

mod config;
mod telemetry;

use std::io::Read;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use credential_codec::{Envelope, EnvelopeCipher};
use tracing::info;

use config::Config;

#[derive(Debug, Parser)]
#[command(
    name = "credtool",
    version,
    about = "Encrypt, decrypt, and rekey credential envelopes",
    long_about = "Single-shot credential envelope transforms over stdin/stdout. \
                  Keys are read from CREDENTIALS_SECRET_KEY (and, for rekey, \
                  CREDENTIALS_SECRET_KEY_NEXT), never from arguments."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Encrypt a JSON credential blob from stdin into envelope JSON
    Encrypt,

    /// Decrypt envelope JSON from stdin back to the credential blob
    Decrypt,

    /// Re-encrypt an envelope from stdin under the replacement key
    Rekey,
}

fn main() -> Result<()> {
    // -----------------------------------------------------------------------
    // 1. CLI parsing — before config and stdin, so a bad invocation or
    //    `--help` never blocks waiting for input.
    // -----------------------------------------------------------------------
    let cli = Cli::parse();

    // -----------------------------------------------------------------------
    // 2. Configuration
    // -----------------------------------------------------------------------
    let cfg = Config::from_env().map_err(|e| {
        // Telemetry is not yet up; write to stderr directly.
        eprintln!("ERROR: configuration invalid: {e}");
        e
    })?;

    // -----------------------------------------------------------------------
    // 3. Telemetry
    // -----------------------------------------------------------------------
    telemetry::init(&cfg.log_level)?;

    // -----------------------------------------------------------------------
    // 4. Cipher construction + dispatch. Stdin is read only once the
    //    subcommand is validated and every required key has been loaded.
    // -----------------------------------------------------------------------
    let cipher = EnvelopeCipher::new(&cfg.credentials_secret_key)
        .context("CREDENTIALS_SECRET_KEY is not a 64-character hex string")?;

    let output = match cli.command {
        Commands::Encrypt => encrypt(&cipher, &read_stdin()?)?,
        Commands::Decrypt => decrypt(&cipher, &read_stdin()?)?,
        Commands::Rekey => {
            let next = EnvelopeCipher::new(cfg.next_key()?)
                .context("CREDENTIALS_SECRET_KEY_NEXT is not a 64-character hex string")?;
            rekey(&cipher, &next, &read_stdin()?)?
        }
    };

    println!("{output}");
    Ok(())
}

fn read_stdin() -> Result<String> {
    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .context("failed to read stdin")?;
    if input.trim().is_empty() {
        anyhow::bail!("expected input on stdin");
    }
    Ok(input)
}

/// Encrypt a JSON credential blob into envelope JSON.
fn encrypt(cipher: &EnvelopeCipher, input: &str) -> Result<String> {
    let plaintext: serde_json::Value =
        serde_json::from_str(input).context("stdin is not a valid JSON credential blob")?;

    let envelope = cipher.encrypt(&plaintext)?;
    info!(version = envelope.version, "credential blob encrypted");

    serde_json::to_string(&envelope).context("failed to serialise envelope")
}

/// Decrypt envelope JSON back to the credential blob.
fn decrypt(cipher: &EnvelopeCipher, input: &str) -> Result<String> {
    let envelope = Envelope::from_json_str(input)?;

    let plaintext = cipher.decrypt(&envelope)?;
    info!("credential envelope decrypted");

    serde_json::to_string(&plaintext).context("failed to serialise credential blob")
}

/// Decrypt with the current key and re-encrypt under the replacement key.
fn rekey(current: &EnvelopeCipher, next: &EnvelopeCipher, input: &str) -> Result<String> {
    let envelope = Envelope::from_json_str(input)?;

    let plaintext = current.decrypt(&envelope)?;
    let reissued = next.encrypt(&plaintext)?;
    info!(version = reissued.version, "credential envelope rekeyed");

    serde_json::to_string(&reissued).context("failed to serialise envelope")
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    const KEY_A: &str = "2b7e151628aed2a6abf7158809cf4f3c762e7160f38b4da56a784d9045190cfe";
    const KEY_B: &str = "603deb1015ca71be2b73aef0857d77811f352c073b6108d72d9810a30914dff4";

    #[test]
    fn unknown_subcommand_is_rejected_at_parse_time() {
        // Dispatch must fail before any stdin read.
        let err = Cli::try_parse_from(["credtool", "bogus"]).unwrap_err();
        assert!(err.to_string().contains("Usage"));
    }

    #[test]
    fn missing_subcommand_shows_usage() {
        let err = Cli::try_parse_from(["credtool"]).unwrap_err();
        assert!(err.to_string().contains("Usage"));
    }

    #[test]
    fn help_flag_is_generated() {
        let err = Cli::try_parse_from(["credtool", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn all_subcommands_parse() {
        assert!(matches!(
            Cli::try_parse_from(["credtool", "encrypt"]).unwrap().command,
            Commands::Encrypt
        ));
        assert!(matches!(
            Cli::try_parse_from(["credtool", "decrypt"]).unwrap().command,
            Commands::Decrypt
        ));
        assert!(matches!(
            Cli::try_parse_from(["credtool", "rekey"]).unwrap().command,
            Commands::Rekey
        ));
    }

    #[test]
    fn encrypt_then_decrypt_through_cli_helpers() {
        let cipher = EnvelopeCipher::new(KEY_A).unwrap();
        let blob = r#"{"loom_app_id": "bc5a7eb1-98c9-429d-9b61-eebbca314682"}"#;

        let envelope_json = encrypt(&cipher, blob).unwrap();
        let decrypted = decrypt(&cipher, &envelope_json).unwrap();

        let expected: serde_json::Value = serde_json::from_str(blob).unwrap();
        let actual: serde_json::Value = serde_json::from_str(&decrypted).unwrap();
        assert_eq!(actual, expected);
    }

    #[test]
    fn encrypt_rejects_non_json_input() {
        let cipher = EnvelopeCipher::new(KEY_A).unwrap();
        assert!(encrypt(&cipher, "not json").is_err());
    }

    #[test]
    fn decrypt_rejects_envelope_missing_fields() {
        let cipher = EnvelopeCipher::new(KEY_A).unwrap();
        assert!(decrypt(&cipher, r#"{"data": "00", "version": 1}"#).is_err());
    }

    #[test]
    fn rekey_moves_envelope_to_the_new_key() {
        let current = EnvelopeCipher::new(KEY_A).unwrap();
        let next = EnvelopeCipher::new(KEY_B).unwrap();
        let blob = json!({"api_key": "sk_live_abc123"});

        let envelope_json = serde_json::to_string(&current.encrypt(&blob).unwrap()).unwrap();
        let reissued_json = rekey(&current, &next, &envelope_json).unwrap();

        let reissued = Envelope::from_json_str(&reissued_json).unwrap();
        assert_eq!(next.decrypt(&reissued).unwrap(), blob);
        // The old key can no longer open it.
        assert!(current.decrypt(&reissued).is_err());
    }
}
