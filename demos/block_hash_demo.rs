//! # Block Hash Demo
//!
//! Hashes the Groestlcoin genesis header with the double Grøstl pipeline.
//!
//! ## Run
//!
//! ```bash
//! RUST_LOG=debug cargo run --example block_hash_demo
//! ```

use tracing_subscriber::EnvFilter;
use wallet_native::crypto::{hash, DoubleGroestl};

const GENESIS_HEADER: &str = "700000000000000000000000000000000000000000000000000000000000000000000000bb2866aaca46c4428ad08b57bc9d1493abaf64724b6c3052a7c8f958df68e93ced3d2b53ffff0f1e835b0300";

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Wallet Native: Block Hash Demo ===\n");

    // Step 1: Explain the construction
    println!("Step 1: The double Grøstl construction");
    println!();
    println!("  ┌─────────────────────────────────────────────────────────────┐");
    println!("  │                   DOUBLE HASH                               │");
    println!("  ├─────────────────────────────────────────────────────────────┤");
    println!("  │                                                             │");
    println!("  │    header ──► Grøstl-512 ──► 64 bytes                       │");
    println!("  │                                 │                           │");
    println!("  │                                 ▼                           │");
    println!("  │                           Grøstl-512 ──► 64 bytes           │");
    println!("  │                                             │               │");
    println!("  │                                             ▼               │");
    println!("  │                                  first 32 bytes = block id  │");
    println!("  │                                                             │");
    println!("  └─────────────────────────────────────────────────────────────┘");
    println!();

    // Step 2: Hash the genesis header
    println!("Step 2: Hashing the genesis header...");
    let header = hex::decode(GENESIS_HEADER).expect("valid hex");
    let digest = hash(&header);

    println!("  Header length:        {} bytes", header.len());
    println!("  Digest (internal):    {}", digest.to_hex());
    println!("  Block id (display):   {}", digest);
    println!("  Leading zero bits:    {}", digest.leading_zero_bits());
    println!();

    // Step 3: Incremental hashing of header fields
    println!("Step 3: Hashing field by field...");
    let (version, rest) = header.split_at(4);
    let (prev_block, rest) = rest.split_at(32);
    let (merkle_root, tail) = rest.split_at(32);

    let streamed = DoubleGroestl::new()
        .chain(version)
        .chain(prev_block)
        .chain(merkle_root)
        .chain(tail)
        .finalize();

    println!("  Streamed block id:    {}", streamed);
    println!("  Matches one-shot:     {}", streamed == digest);
    println!();

    // Step 4: Empty input
    println!("Step 4: Hashing empty input...");
    println!("  hash(\"\"):             {}", hash(&[]).to_hex());
    println!();

    println!("=== Demo Complete ===");
}
