// Decode a raw codeplug memory dump and print the configuration as JSON.
//
// Usage: plugdump [-v] <dump.bin> [base-address-hex]
//
// The dump is laid into the codec's decode regions starting at the given
// base address (default 0). Bytes outside modeled regions are ignored.

use anyhow::{bail, Context as _};
use codeplug_rs::codeplug::{Codeplug, ErrorStack};
use codeplug_rs::config::Config;
use codeplug_rs::drivers::d868uv::D868uvCodeplug;
use std::fs;

fn main() -> anyhow::Result<()> {
    let mut args: Vec<String> = std::env::args().skip(1).collect();

    let verbose = args.iter().any(|a| a == "-v");
    args.retain(|a| a != "-v");

    let filter = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    if args.is_empty() || args.len() > 2 {
        bail!("usage: plugdump [-v] <dump.bin> [base-address-hex]");
    }

    let path = &args[0];
    let base = match args.get(1) {
        Some(s) => u32::from_str_radix(s.trim_start_matches("0x"), 16)
            .with_context(|| format!("invalid base address: {}", s))?,
        None => 0,
    };

    let data = fs::read(path).with_context(|| format!("failed to read {}", path))?;
    tracing::info!(bytes = data.len(), base = format_args!("{:#010x}", base), "loaded dump");

    let mut plug = D868uvCodeplug::new();
    plug.allocate_for_decoding()?;
    let copied = plug.image_mut().write_in(base, &data);
    tracing::debug!(copied, "bytes laid into modeled regions");

    let mut config = Config::new();
    let mut err = ErrorStack::new();
    plug.decode(&mut config, &mut err)?;

    if !err.is_empty() {
        eprintln!("{} problem(s) while decoding:", err.len());
        eprint!("{}", err);
    }

    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}
