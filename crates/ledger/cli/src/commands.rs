//! Command handlers

use anyhow::{Context, Result};
use fantom_ledger::{
    AppConfig, DerivationPath, Policy, policy_for_get_address, policy_for_get_public_key,
};
use tracing::info;

use crate::utils::display::{key_value_box, policy_verdict, section_title, success, warning};
use crate::utils::{self, ConnectionArgs, DerivationArgs};

/// Show the application version
pub fn version_command(connection: &ConnectionArgs, config: AppConfig) -> Result<()> {
    let mut app = utils::connect(connection, config)?;
    let info = app
        .get_version()
        .context("Failed to read the application version")?;

    let build = if info.is_development() {
        "development"
    } else {
        "release"
    };

    println!(
        "{}",
        key_value_box(
            "Fantom application",
            &[
                ("Version", format!("v{}", info.version)),
                ("Build", build.to_string()),
            ],
        )
    );

    Ok(())
}

/// Derive an address, optionally confirming it on the device
pub fn address_command(
    connection: &ConnectionArgs,
    config: AppConfig,
    derivation: &DerivationArgs,
    display: bool,
) -> Result<()> {
    let path = derivation.parse_derivation_path()?;
    let mut app = utils::connect(connection, config)?;

    if display {
        info!("Confirm the address on the device");
    }

    let response = app
        .get_address(&path, display)
        .with_context(|| format!("Failed to derive the address for {path}"))?;

    let mut items = vec![("Path", path.to_string())];
    if !response.public_key.is_empty() {
        items.push(("Public key", response.public_key_hex()));
    }
    items.push(("Address", response.to_string()));

    println!("{}", key_value_box("Address", &items));
    if display {
        println!("{}", success("Address confirmed on the device"));
    }

    Ok(())
}

/// Derive the public key and chain code
pub fn public_key_command(
    connection: &ConnectionArgs,
    config: AppConfig,
    derivation: &DerivationArgs,
) -> Result<()> {
    let path = derivation.parse_derivation_path()?;
    let mut app = utils::connect(connection, config)?;

    let key = app
        .get_public_key(&path)
        .with_context(|| format!("Failed to derive the public key for {path}"))?;

    println!(
        "{}",
        key_value_box(
            "Public key",
            &[
                ("Path", path.to_string()),
                ("Public key", key.public_key_hex()),
                ("Chain code", key.chain_code_hex()),
            ],
        )
    );

    Ok(())
}

/// Encode a path and show what the device would make of it
pub fn encode_path_command(path: &str) -> Result<()> {
    let path = DerivationPath::parse(path).with_context(|| format!("Invalid derivation path {path:?}"))?;

    let encoded = path.encode();
    let wire = encoded
        .to_wire()
        .with_context(|| format!("{path} cannot be sent to the device"))?;

    println!(
        "{}",
        key_value_box(
            "Derivation path",
            &[
                ("Path", path.to_string()),
                ("Segments", encoded.segment_count().to_string()),
                ("Encoded", hex::encode(&*encoded)),
                ("Payload", hex::encode(&wire)),
            ],
        )
    );

    println!("{}", section_title("Device policy"));
    print_verdict("GET_ADDRESS", policy_for_get_address(&path));
    print_verdict("GET_PUBLIC_KEY", policy_for_get_public_key(&path));

    Ok(())
}

fn print_verdict(instruction: &str, policy: Policy) {
    println!("  {instruction}: {}", policy_verdict(policy));
    if let Policy::Deny(reason) = policy {
        println!("  {}", warning(&format!("The device will refuse {instruction}: {reason}")));
    }
}
