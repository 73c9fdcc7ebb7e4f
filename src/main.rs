//! Hashcash CLI
//!
//! A thin wrapper around the library's `mint` and `check` calls.
//!
//! # Commands
//!
//! - `mint` - Mint a stamp for a resource
//! - `check` - Verify a stamp against a policy
//! - `benchmark` - Measure digest and search throughput

use std::sync::atomic::AtomicBool;
use std::time::Instant;

use clap::{Parser, Subcommand};

use hashcash::digest::{DigestProvider, Sha256Digest};
use hashcash::stamp::DATE_FORMAT;
use hashcash::{hex_digits, mint, mint_parallel, salt, solve, verify, MintOptions};

#[derive(Parser)]
#[command(name = "hashcash")]
#[command(version = "0.1.0")]
#[command(about = "Mint and verify hashcash proof-of-work stamps")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Mint a stamp bound to a resource
    Mint {
        /// Resource to bind the stamp to (e.g. an email address)
        resource: String,

        /// Difficulty in bits of required leading zeros
        #[arg(short, long, default_value = "20")]
        bits: u32,

        /// Extension string embedded verbatim in the stamp
        #[arg(short, long, default_value = "")]
        ext: String,

        /// Length of the random salt
        #[arg(long, default_value = "16")]
        salt_length: usize,

        /// Timestamp with seconds precision instead of date-only
        #[arg(long)]
        timestamps: bool,

        /// Number of worker threads (0 = all CPU cores)
        #[arg(short, long, default_value = "1")]
        threads: usize,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Verify a stamp against a policy
    Check {
        /// The stamp text to verify
        stamp: String,

        /// Expected resource; omit to accept any
        #[arg(short, long)]
        resource: Option<String>,

        /// Required difficulty in bits
        #[arg(short, long, default_value = "20")]
        bits: u32,

        /// Acceptance window in seconds
        #[arg(short, long)]
        expiration: Option<i64>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Measure digest and search throughput
    Benchmark {
        /// Number of digests to compute
        #[arg(short, long, default_value = "200000")]
        count: u64,

        /// Difficulty of the timed search
        #[arg(short, long, default_value = "16")]
        bits: u32,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Mint {
            resource,
            bits,
            ext,
            salt_length,
            timestamps,
            threads,
            json,
        } => {
            let options = MintOptions {
                bits,
                ext,
                salt_length,
                stamp_seconds: timestamps,
            };
            cmd_mint(&resource, &options, threads, json)
        }
        Commands::Check {
            stamp,
            resource,
            bits,
            expiration,
            json,
        } => cmd_check(&stamp, resource.as_deref(), bits, expiration, json),
        Commands::Benchmark { count, bits } => cmd_benchmark(count, bits),
    };

    match result {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

fn cmd_mint(
    resource: &str,
    options: &MintOptions,
    threads: usize,
    json: bool,
) -> anyhow::Result<i32> {
    let threads = if threads == 0 { num_cpus::get() } else { threads };

    let start = Instant::now();
    let stamp = if threads > 1 {
        mint_parallel(resource, options, threads)?
    } else {
        mint(resource, options)?
    };
    log::info!(
        "minted {} bits in {:.2}s",
        options.bits,
        start.elapsed().as_secs_f64()
    );

    if json {
        println!(
            "{}",
            serde_json::json!({ "stamp": stamp, "bits": options.bits })
        );
    } else {
        println!("{stamp}");
    }
    Ok(0)
}

fn cmd_check(
    stamp: &str,
    resource: Option<&str>,
    bits: u32,
    expiration: Option<i64>,
    json: bool,
) -> anyhow::Result<i32> {
    let verdict = verify(stamp, resource, bits, expiration)?;

    if json {
        println!(
            "{}",
            serde_json::json!({ "valid": verdict.is_valid(), "verdict": verdict })
        );
    } else if verdict.is_valid() {
        println!("valid");
    } else {
        println!("invalid ({verdict})");
    }

    Ok(if verdict.is_valid() { 0 } else { 1 })
}

fn cmd_benchmark(count: u64, bits: u32) -> anyhow::Result<i32> {
    let digest = Sha256Digest;

    println!("Running benchmark with {count} digests...");
    let start = Instant::now();
    for counter in 0..count {
        let _ = digest.hex_digest(&format!("1:20:040922:benchmark::MMXXVIbench:{counter:X}"))?;
    }
    let elapsed = start.elapsed();
    let rate = count as f64 / elapsed.as_secs_f64();

    println!("\nResults:");
    println!("  Digests:  {count}");
    println!("  Time:     {:.2}s", elapsed.as_secs_f64());
    println!("  Rate:     {rate:.0} digests/s");

    let now = chrono::Local::now().naive_local();
    let challenge = format!(
        "1:{bits}:{}:benchmark::{}",
        now.format(DATE_FORMAT),
        salt(16)
    );
    println!("\nTimed search at {bits} bits...");
    let cancel = AtomicBool::new(false);
    let start = Instant::now();
    let solution = solve(&digest, &challenge, hex_digits(bits), 0, 1, None, &cancel)?;
    println!(
        "  Solved in {:.2}s after {} digests (counter {:X})",
        start.elapsed().as_secs_f64(),
        solution.attempts,
        solution.counter
    );

    Ok(0)
}
