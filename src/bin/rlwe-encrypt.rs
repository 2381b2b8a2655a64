//! rlwe-encrypt: encryption throughput and noise demo
//!
//! Generates a key pair for one of the default parameter sets, encrypts zero
//! repeatedly across a pool of encryptors and reports the worst decryption
//! noise together with the throughput.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use eyre::{Result, WrapErr};
use rayon::prelude::*;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use bfv_rlwe::math::Domain;
use bfv_rlwe::{
    default_params, Ciphertext, Decryptor, Encryptor, KeyGenerator, Parameters, Plaintext,
};

#[derive(Parser)]
#[command(name = "rlwe-encrypt")]
#[command(about = "Encrypt zero repeatedly and report noise and throughput")]
#[command(version)]
struct Args {
    /// Index into the default parameter table (0 = N 4096 .. 3 = N 32768)
    #[arg(long, default_value = "0")]
    preset: usize,

    /// Encrypt under the public key instead of the secret key
    #[arg(long)]
    public: bool,

    /// Produce coefficient-domain ciphertexts
    #[arg(long)]
    coeff: bool,

    /// Number of ciphertexts
    #[arg(long, default_value = "64")]
    count: usize,

    /// Write the binary parameter encoding to this file
    #[arg(long)]
    params_out: Option<PathBuf>,
}

fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    let presets = default_params();
    let literal = presets.get(args.preset).cloned().ok_or_else(|| {
        eyre::eyre!(
            "Invalid preset: {}. Must be below {}",
            args.preset,
            presets.len()
        )
    })?;
    let params = Parameters::new(literal).wrap_err("Invalid default parameters")?;

    info!("RLWE encryption demo");
    info!("Ring degree: {}", params.n());
    info!("Q moduli: {}, P moduli: {}", params.q().len(), params.p().len());
    info!(
        "Key: {}, domain: {}",
        if args.public { "public" } else { "secret" },
        if args.coeff { "coefficient" } else { "NTT" }
    );

    if let Some(path) = &args.params_out {
        fs::write(path, params.to_bytes())
            .with_context(|| format!("Failed to write parameters to {}", path.display()))?;
        info!("Wrote parameter encoding to {}", path.display());
    }

    let keygen_start = Instant::now();
    let (sk, pk) = KeyGenerator::new(&params).gen_key_pair();
    info!("Key generation: {:.2?}", keygen_start.elapsed());

    let encryptor = if args.public {
        Encryptor::new(&params, &pk)
    } else {
        Encryptor::new(&params, &sk)
    };

    let level = params.max_level_q();
    let domain = if args.coeff { Domain::Coeff } else { Domain::Ntt };
    let pt = Plaintext::new(&params, level);

    let start = Instant::now();
    let ciphertexts: Vec<Ciphertext> = (0..args.count)
        .into_par_iter()
        .map_init(
            || encryptor.shallow_copy(),
            |enc, _| {
                let mut ct = Ciphertext::new(&params, level, domain);
                enc.encrypt(&pt, &mut ct);
                ct
            },
        )
        .collect();
    let elapsed = start.elapsed();

    let ring_q = params.ring_q();
    let max_noise = ciphertexts
        .par_iter()
        .map_init(
            || Decryptor::new(&params, &sk),
            |dec, ct| ring_q.linf_norm_lvl(level, &dec.decrypt_new(ct).value),
        )
        .max()
        .unwrap_or(0);

    info!(
        "Encrypted {} ciphertexts in {:.2?} ({:.1} ct/s)",
        args.count,
        elapsed,
        args.count as f64 / elapsed.as_secs_f64()
    );
    info!(
        "Max noise: {} ({:.1} bits)",
        max_noise,
        (max_noise.max(1) as f64).log2()
    );

    Ok(())
}
