//! # Key Derivation Demo
//!
//! Derives a wallet encryption key with scrypt and shows how failures are
//! classified.
//!
//! ## Run
//!
//! ```bash
//! RUST_LOG=debug cargo run --example key_derivation_demo
//! ```

use tracing_subscriber::EnvFilter;
use wallet_native::crypto::{derive_key, generate_salt, KdfParams};
use wallet_native::{AdapterConfig, WalletNative};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Wallet Native: Key Derivation Demo ===\n");

    // Step 1: Install a configuration
    println!("Step 1: Initializing with a 64 MiB derivation ceiling...");
    let config = AdapterConfig {
        max_kdf_memory_bytes: 64 << 20,
        ..AdapterConfig::default()
    };
    WalletNative::initialize(config).expect("first initialization");
    println!("  Ceiling: {} bytes", WalletNative::config().max_kdf_memory_bytes);
    println!();

    // Step 2: Derive with the wallet parameters
    println!("Step 2: Deriving a wallet key...");
    let params = KdfParams::wallet_default();
    let salt = generate_salt();
    println!("  N = {}, r = {}, p = {}, dkLen = {}", params.n, params.r, params.p, params.dk_len);
    println!("  Memory cost: {:?} bytes", params.memory_cost());
    println!("  Salt: {}", hex::encode(salt));

    let key = derive_key(b"correct horse battery staple", &salt, &params)
        .expect("wallet parameters are valid");
    println!("  Key:  {}", hex::encode(key.as_bytes()));
    println!("  Debug output never shows key bytes: {:?}", key);
    println!();

    // Step 3: Off the async runtime
    println!("Step 3: Deriving on the blocking pool...");
    let background = wallet_native::worker::derive_blocking(
        b"correct horse battery staple".to_vec(),
        salt.to_vec(),
        params,
    )
    .await
    .expect("wallet parameters are valid");
    println!("  Same key: {}", background == key);
    println!();

    // Step 4: Failure classification
    println!("Step 4: Classified failures...");
    let cases = [
        ("N = 3", KdfParams::new(3, 8, 1, 32)),
        ("r = 0", KdfParams::new(4096, 0, 1, 32)),
        ("N = 2^20, r = 8 (over ceiling)", KdfParams::new(1 << 20, 8, 1, 32)),
    ];
    for (label, params) in cases {
        match derive_key(b"pw", &salt, &params) {
            Ok(_) => println!("  {:<32} ok", label),
            Err(e) => println!(
                "  {:<32} [{}] {} -> {}",
                label,
                e.code(),
                e,
                e.host_exception_class()
            ),
        }
    }
    println!();

    println!("=== Demo Complete ===");
}
