use abacus_log::LogFormat;
use abacus_math::Dec;
use abacus_types::{
    registry, seal, AccAddress, Coins, ConfigFile, ConsAddress, DecCoins, Role, ValAddress,
};
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "abacus",
    about = "Inspect coins, decimals and addresses",
    version,
    author
)]
struct Cli {
    #[arg(
        long,
        global = true,
        value_name = "LEVEL",
        default_value = "warn",
        help = "Log filter (trace, debug, info, warn, error or a directive)"
    )]
    log_level: String,

    #[arg(
        long,
        global = true,
        value_name = "FORMAT",
        default_value = "json",
        help = "Log format (json, plain)"
    )]
    log_format: LogFormat,

    #[arg(long, global = true, value_name = "FILE", help = "Configuration file path")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Coin list utilities")]
    Coins {
        #[command(subcommand)]
        command: CoinsCommands,
    },

    #[command(about = "Apply a decimal operation")]
    Dec {
        #[arg(value_name = "VALUE", allow_hyphen_values = true, help = "Decimal value")]
        value: String,

        #[arg(long, value_enum, default_value = "show", help = "Operation to apply")]
        op: DecOp,
    },

    #[command(about = "Show an address in every encoding")]
    Addr {
        #[arg(value_name = "ADDRESS", help = "Hex or Bech32 address")]
        address: String,
    },

    #[command(about = "Configuration management")]
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    #[command(about = "Display version information")]
    Version,
}

#[derive(Subcommand)]
enum CoinsCommands {
    #[command(about = "Parse coins and print the canonical form")]
    Normalize {
        #[arg(value_name = "COINS", help = "Comma separated coins, e.g. 10uatom,5uosmo")]
        coins: String,

        #[arg(long, help = "Print JSON instead of text")]
        json: bool,

        #[arg(long, help = "Parse as decimal coins")]
        dec: bool,
    },

    #[command(about = "Add two coin lists")]
    Add {
        #[arg(value_name = "A")]
        a: String,
        #[arg(value_name = "B")]
        b: String,
    },

    #[command(about = "Subtract coin list B from A")]
    Sub {
        #[arg(value_name = "A")]
        a: String,
        #[arg(value_name = "B")]
        b: String,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    #[command(about = "Show the effective configuration")]
    Show,

    #[command(about = "Validate a configuration file")]
    Validate {
        #[arg(value_name = "FILE", help = "Configuration file path")]
        file: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum DecOp {
    Show,
    Round,
    Truncate,
    Ceil,
    Sqrt,
    Sortable,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(&cli.log_level, cli.log_format)?;

    match cli.command {
        Commands::Version => version_command(),
        Commands::Config {
            command: ConfigCommands::Validate { file },
        } => validate_config(&file),
        command => {
            load_config(cli.config)?;
            match command {
                Commands::Coins { command } => coins_command(command),
                Commands::Dec { value, op } => dec_command(&value, op),
                Commands::Addr { address } => addr_command(&address),
                Commands::Config { .. } => show_config(),
                Commands::Version => version_command(),
            }
        }
    }
}

fn setup_logging(level: &str, format: LogFormat) -> Result<()> {
    abacus_log::init_tracing_with_level(level, format)
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {e}"))
}

/// Apply the config file, if any, then seal before any command runs
fn load_config(path: Option<PathBuf>) -> Result<()> {
    let file = match path {
        Some(path) => ConfigFile::load_from_file(&path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ConfigFile::load().context("loading default config")?,
    };
    registry().apply_file(&file)?;
    let config = seal();
    tracing::debug!(
        account_prefix = config.account_addr_prefix(),
        "configuration ready"
    );
    Ok(())
}

fn version_command() -> Result<()> {
    println!("abacus {}", env!("CARGO_PKG_VERSION"));
    println!("build: {}", env!("CARGO_PKG_NAME"));
    Ok(())
}

fn coins_command(command: CoinsCommands) -> Result<()> {
    match command {
        CoinsCommands::Normalize { coins, json, dec } => {
            if dec {
                let coins: DecCoins = coins.parse()?;
                if json {
                    println!("{}", serde_json::to_string(&coins)?);
                } else {
                    println!("{coins}");
                }
            } else {
                let coins: Coins = coins.parse()?;
                if json {
                    println!("{}", serde_json::to_string(&coins)?);
                } else {
                    println!("{coins}");
                }
            }
        }
        CoinsCommands::Add { a, b } => {
            let a: Coins = a.parse()?;
            let b: Coins = b.parse()?;
            println!("{}", a.add(&b)?);
        }
        CoinsCommands::Sub { a, b } => {
            let a: Coins = a.parse()?;
            let b: Coins = b.parse()?;
            println!("{}", a.sub(&b)?);
        }
    }
    Ok(())
}

fn dec_command(value: &str, op: DecOp) -> Result<()> {
    let d: Dec = value.parse()?;
    match op {
        DecOp::Show => println!("{d}"),
        DecOp::Round => println!("{}", d.round_int()?),
        DecOp::Truncate => println!("{}", d.truncate_int()?),
        DecOp::Ceil => println!("{}", d.ceil_int()?),
        DecOp::Sqrt => println!("{}", d.approx_sqrt()?),
        DecOp::Sortable => {
            if !d.valid_sortable() {
                bail!("{d} is outside the sortable range");
            }
            println!("{}", String::from_utf8_lossy(&d.sortable_bytes()));
        }
    }
    Ok(())
}

fn addr_command(input: &str) -> Result<()> {
    let acc = match AccAddress::from_hex(input) {
        Ok(acc) => acc,
        Err(_) => AccAddress::from_bech32(input)
            .or_else(|_| ValAddress::from_bech32(input).map(|a| a.cast()))
            .or_else(|_| ConsAddress::from_bech32(input).map(|a| a.cast()))
            .with_context(|| format!("{input} is neither hex nor a known bech32 address"))?,
    };

    println!("hex: {acc:X}");
    println!("account: {acc}");
    println!("validator: {}", acc.cast::<abacus_types::ValidatorRole>());
    println!("consensus: {}", acc.cast::<abacus_types::ConsensusRole>());
    Ok(())
}

fn show_config() -> Result<()> {
    let config = registry().get();
    for role in Role::ALL {
        println!(
            "{}: {} / {}",
            role.name(),
            config.addr_prefix(role),
            config.pub_prefix(role)
        );
    }
    println!("coin_denom_regex: {}", config.coin_denom_regex());
    Ok(())
}

fn validate_config(path: &Path) -> Result<()> {
    ConfigFile::load_from_file(path)
        .with_context(|| format!("validating config {}", path.display()))?;
    println!("{} is valid", path.display());
    Ok(())
}
