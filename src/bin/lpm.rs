//! Command line front end: load a route file and run longest-prefix-match lookups against it.

use std::fs;
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use lpm_trie::{parse_cidr, AddressFamily, Lpm};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "lpm")]
#[command(about = "Longest-prefix-match lookups in a route file", long_about = None)]
struct Cli {
    /// Route file with one `CIDR VALUE` pair per line. Lines starting with `#` are ignored.
    #[arg(short, long)]
    routes: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the value of the longest matching route for each address, or `-` if none matches
    Lookup {
        #[arg(required = true)]
        addrs: Vec<IpAddr>,
    },
    /// Validate the route file and report the number of routes per family
    Check,
    /// Print all routes in lexicographic order
    Dump,
}

/// Routes of a file, and the number of lines that were rejected.
struct Routes {
    table: Lpm<String>,
    rejected: usize,
}

fn load(path: &Path) -> Result<Routes, Box<dyn std::error::Error>> {
    let content = fs::read_to_string(path)?;
    let mut table = Lpm::new();
    let mut rejected = 0;

    for (i, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let lineno = i + 1;
        let Some((cidr, value)) = line.split_once(char::is_whitespace) else {
            tracing::warn!(lineno, line, "missing value");
            rejected += 1;
            continue;
        };
        let cidr = match parse_cidr(cidr) {
            Ok(cidr) => cidr,
            Err(e) => {
                tracing::warn!(lineno, error = %e, "skipping route");
                rejected += 1;
                continue;
            }
        };
        if let Some(old) = table.insert_cidr(cidr, value.trim().to_string())? {
            tracing::debug!(lineno, %cidr, old = %old, "route replaced");
        }
    }

    tracing::info!(
        path = %path.display(),
        ipv4 = table.ipv4().len(),
        ipv6 = table.ipv6().len(),
        rejected,
        "routes loaded"
    );
    Ok(Routes { table, rejected })
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lpm=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let Routes { table, rejected } = load(&cli.routes)?;

    match cli.command {
        Commands::Lookup { addrs } => {
            for addr in addrs {
                match table.lookup_addr(addr) {
                    Some(value) => println!("{addr} {value}"),
                    None => println!("{addr} -"),
                }
            }
        }
        Commands::Check => {
            println!("{:?}: {} routes", AddressFamily::Ipv4, table.ipv4().len());
            println!("{:?}: {} routes", AddressFamily::Ipv6, table.ipv6().len());
            if rejected > 0 {
                println!("{rejected} invalid lines");
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Dump => {
            for (cidr, value) in table.iter() {
                println!("{cidr} {value}");
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
