//! DMG core - command-line host
//!
//! Loads and validates a cartridge image and reports what the loader made
//! of it. A rejected image is a fatal error (exit code 1).

use anyhow::{Context, Result};
use clap::Parser;
use dmgcore::cart::{calculate_checksum, Cartridge, ROM_BANK_SIZE, RAM_BANK_SIZE};
use dmgcore::logger::init_logger;
use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about = "Game Boy (DMG) cartridge loader.", long_about = None)]
struct Args {
    #[arg(name = "ROM_PATH")]
    rom_path: PathBuf,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    log_level: log::LevelFilter,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(args.log_level).context("Failed to install logger")?;

    let rom = fs::read(&args.rom_path)
        .with_context(|| format!("Failed to read ROM {}", args.rom_path.display()))?;
    let rom_len = rom.len();
    let checksum_ok = rom.len() > 0x14D && calculate_checksum(&rom) == rom[0x14D];

    let cart = Cartridge::from_bytes(rom)
        .with_context(|| format!("Failed to load ROM {}", args.rom_path.display()))?;
    let header = &cart.header;

    println!("Title:      {}", header.title);
    println!("Type:       {} (0x{:02X})", header.cart_type_name(), header.cart_type);
    println!("Controller: {}", cart.mbc().name());
    println!(
        "ROM:        {} KB, {} banks",
        rom_len / 1024,
        rom_len / ROM_BANK_SIZE
    );
    println!(
        "RAM:        {} KB, {} banks",
        header.ram_size_bytes() / 1024,
        header.ram_size_bytes().div_ceil(RAM_BANK_SIZE)
    );
    println!("Battery:    {}", if header.has_battery() { "yes" } else { "no" });
    println!("Checksum:   {}", if checksum_ok { "ok" } else { "MISMATCH" });

    Ok(())
}
