#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for collection address verification.
//!
//! Verifies an address against saved Nominatim results (`verify`) or a
//! live lookup (`lookup`), and exposes the postcode and country checks on
//! their own. `verify` and `lookup` print the verification result as JSON
//! and exit with status 2 when the address is blocked.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use itad_address::{
    AddressInput, AddressVerifier, MatchThresholds, VerificationResult, country, postcode,
};
use itad_geocoder::{CandidateSource as _, GeocoderConfig, NominatimSource, nominatim};

/// Exit status for an address that must not be submitted.
const BLOCKED_EXIT_CODE: u8 = 2;

/// Verify collection addresses.
#[derive(Parser)]
#[command(name = "itad_address")]
#[command(about = "Verify collection addresses against geocoder results")]
struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Verify an address against saved Nominatim `jsonv2` results.
    Verify {
        #[command(flatten)]
        address: AddressArgs,

        /// Path to a Nominatim JSON response (`addressdetails=1`).
        #[arg(long)]
        candidates: PathBuf,

        /// Match threshold overrides (TOML).
        #[arg(long)]
        thresholds: Option<PathBuf>,
    },

    /// Look the postcode up on Nominatim and verify the address.
    Lookup {
        #[command(flatten)]
        address: AddressArgs,

        /// Geocoder service configuration (TOML). Defaults to the public
        /// Nominatim instance.
        #[arg(long)]
        service: Option<PathBuf>,

        /// Match threshold overrides (TOML).
        #[arg(long)]
        thresholds: Option<PathBuf>,
    },

    /// Check a postcode's format.
    Postcode {
        /// Postcode to check.
        postcode: String,

        /// Country the postcode should belong to.
        #[arg(long)]
        country: Option<String>,
    },

    /// Resolve free-form country text to its ISO code.
    Country {
        /// Country name or code, in any supported language.
        text: String,
    },
}

/// Address fields as entered on the collection form.
#[derive(Args)]
struct AddressArgs {
    /// Postal code.
    #[arg(long)]
    postcode: String,

    /// Country name or code. Without it any supported postcode format is
    /// accepted.
    #[arg(long, default_value = "")]
    country: String,

    /// Street line, including the house number.
    #[arg(long, default_value = "")]
    street: String,

    /// City, town or village.
    #[arg(long, default_value = "")]
    city: String,

    /// County, region or state.
    #[arg(long, default_value = "")]
    county: String,
}

impl From<AddressArgs> for AddressInput {
    fn from(args: AddressArgs) -> Self {
        Self {
            street: args.street,
            city: args.city,
            county: args.county,
            postcode: args.postcode,
            country: args.country,
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Verify {
            address,
            candidates,
            thresholds,
        } => cmd_verify(&address.into(), &candidates, thresholds.as_deref()),
        Commands::Lookup {
            address,
            service,
            thresholds,
        } => cmd_lookup(&address.into(), service.as_deref(), thresholds.as_deref()).await,
        Commands::Postcode { postcode, country } => {
            Ok(cmd_postcode(&postcode, country.as_deref()))
        }
        Commands::Country { text } => Ok(cmd_country(&text)),
    }
}

fn load_verifier(
    thresholds: Option<&Path>,
) -> Result<AddressVerifier, Box<dyn std::error::Error>> {
    let thresholds = match thresholds {
        Some(path) => {
            log::info!("Loading match thresholds from {}", path.display());
            MatchThresholds::load(path)?
        }
        None => MatchThresholds::default(),
    };
    Ok(AddressVerifier::new(thresholds))
}

/// Prints `result` as JSON and maps `blocked` to the exit status.
fn report(result: &VerificationResult) -> Result<ExitCode, Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(result)?);

    if result.blocked {
        log::info!("Address blocked");
        Ok(ExitCode::from(BLOCKED_EXIT_CODE))
    } else {
        if result.has_warnings() {
            log::info!("Address accepted with warnings");
        }
        Ok(ExitCode::SUCCESS)
    }
}

fn cmd_verify(
    address: &AddressInput,
    candidates_path: &Path,
    thresholds: Option<&Path>,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let verifier = load_verifier(thresholds)?;

    let body: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(candidates_path)?)?;
    let candidates = nominatim::parse_response(&body)?;
    log::info!(
        "Loaded {} candidate(s) from {}",
        candidates.len(),
        candidates_path.display()
    );

    report(&verifier.verify(address, &candidates))
}

async fn cmd_lookup(
    address: &AddressInput,
    service: Option<&Path>,
    thresholds: Option<&Path>,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let verifier = load_verifier(thresholds)?;

    let country = Some(address.country.as_str()).filter(|c| !c.trim().is_empty());
    if !postcode::is_valid_postcode(&address.postcode, country) {
        return report(&verifier.verify(address, &[]));
    }

    let config = match service {
        Some(path) => GeocoderConfig::load(path)?,
        None => GeocoderConfig::embedded(),
    };
    let source = NominatimSource::new(config)?;
    log::info!(
        "Looking up {:?} on {}",
        address.postcode,
        source.config().name
    );

    match source.candidates(&address.postcode).await {
        Ok(candidates) => report(&verifier.verify(address, &candidates)),
        Err(e) => {
            log::warn!("Lookup failed: {e}");
            println!("Geocoder unavailable ({e}); address not verified, submission allowed");
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn cmd_postcode(text: &str, country: Option<&str>) -> ExitCode {
    let valid = postcode::is_valid_postcode(text, country);
    let formats: Vec<String> = postcode::matching_countries(text)
        .iter()
        .map(ToString::to_string)
        .collect();

    println!("{}", if valid { "valid" } else { "invalid" });
    if !formats.is_empty() {
        println!("Matches the format of: {}", formats.join(", "));
    }

    if valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn cmd_country(text: &str) -> ExitCode {
    match country::normalize_country(text) {
        Some(code) => {
            println!("{code} ({})", code.english_name());
            ExitCode::SUCCESS
        }
        None => {
            println!("unrecognized");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn country_flag_is_optional() {
        let cli = Cli::try_parse_from(["itad_address", "lookup", "--postcode", "77120"]).unwrap();
        let Commands::Lookup { address, .. } = cli.command else {
            panic!("expected lookup");
        };

        let input = AddressInput::from(address);
        assert_eq!(input.country, "");
        assert!(postcode::is_valid_postcode(&input.postcode, None));
    }

    #[test]
    fn address_flags_map_to_input() {
        let cli = Cli::try_parse_from([
            "itad_address",
            "verify",
            "--postcode",
            "75002",
            "--country",
            "France",
            "--city",
            "Paris",
            "--candidates",
            "paris.json",
        ])
        .unwrap();
        let Commands::Verify {
            address,
            candidates,
            thresholds,
        } = cli.command
        else {
            panic!("expected verify");
        };

        let input = AddressInput::from(address);
        assert_eq!(input.country, "France");
        assert_eq!(input.city, "Paris");
        assert_eq!(input.street, "");
        assert_eq!(candidates, PathBuf::from("paris.json"));
        assert!(thresholds.is_none());
    }
}
