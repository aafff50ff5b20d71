//! Multi-Scalar Multiplication (MSM) using Pippenger's Algorithm
//!
//! Computes Σ scalar_i · base_i over affine bases, the shape every key in
//! this crate stores its group elements in.

use ark_ec::CurveGroup;
use ark_ff::{BigInteger, PrimeField};
use rayon::prelude::*;

/// Multi-scalar multiplication: Σ scalars[i] · bases[i]
///
/// Panics if the slices differ in length; callers check shapes against
/// their keys first.
pub fn msm<G: CurveGroup>(bases: &[G::Affine], scalars: &[G::ScalarField]) -> G {
    assert_eq!(bases.len(), scalars.len(), "MSM: bases and scalars length mismatch");

    const NAIVE_THRESHOLD: usize = 32;
    const PARALLEL_THRESHOLD: usize = 256;

    let n = bases.len();
    if n == 0 {
        G::zero()
    } else if n < NAIVE_THRESHOLD {
        msm_naive(bases, scalars)
    } else if n < PARALLEL_THRESHOLD {
        msm_pippenger_sequential(bases, scalars)
    } else {
        msm_pippenger_parallel(bases, scalars)
    }
}

/// `[s_i · base]` for every scalar, normalized to affine
pub fn fixed_base_mul<G: CurveGroup>(base: G, scalars: &[G::ScalarField]) -> Vec<G::Affine> {
    let points: Vec<G> = scalars.par_iter().map(|s| base * *s).collect();
    G::normalize_batch(&points)
}

fn msm_naive<G: CurveGroup>(bases: &[G::Affine], scalars: &[G::ScalarField]) -> G {
    bases
        .iter()
        .zip(scalars.iter())
        .map(|(p, s)| *p * s)
        .fold(G::zero(), |acc, p| acc + p)
}

/// Pippenger's bucket method, windows from most significant down
fn msm_pippenger_sequential<G: CurveGroup>(bases: &[G::Affine], scalars: &[G::ScalarField]) -> G {
    let c = optimal_window_size(bases.len());
    let num_buckets = 1usize << c;
    let scalar_bits = G::ScalarField::MODULUS_BIT_SIZE as usize;
    let num_windows = (scalar_bits + c - 1) / c;
    let scalars_le: Vec<Vec<u8>> = scalars.iter().map(|s| s.into_bigint().to_bytes_le()).collect();

    let mut result = G::zero();
    for window_idx in (0..num_windows).rev() {
        for _ in 0..c {
            result = result.double();
        }
        let mut buckets = vec![G::zero(); num_buckets];
        for (base, bytes) in bases.iter().zip(scalars_le.iter()) {
            let bucket_idx = extract_window_bits(bytes, window_idx, c);
            if bucket_idx > 0 {
                buckets[bucket_idx] += *base;
            }
        }
        result += combine_buckets(&buckets);
    }
    result
}

/// Same windows, with bucket accumulation split across rayon workers
fn msm_pippenger_parallel<G: CurveGroup>(bases: &[G::Affine], scalars: &[G::ScalarField]) -> G {
    const CHUNK_SIZE: usize = 256;

    let c = optimal_window_size(bases.len());
    let num_buckets = 1usize << c;
    let scalar_bits = G::ScalarField::MODULUS_BIT_SIZE as usize;
    let num_windows = (scalar_bits + c - 1) / c;
    let scalars_le: Vec<Vec<u8>> = scalars.par_iter().map(|s| s.into_bigint().to_bytes_le()).collect();

    let mut result = G::zero();
    for window_idx in (0..num_windows).rev() {
        for _ in 0..c {
            result = result.double();
        }
        let buckets = bases
            .par_chunks(CHUNK_SIZE)
            .zip(scalars_le.par_chunks(CHUNK_SIZE))
            .map(|(base_chunk, scalar_chunk)| {
                let mut local = vec![G::zero(); num_buckets];
                for (base, bytes) in base_chunk.iter().zip(scalar_chunk.iter()) {
                    let bucket_idx = extract_window_bits(bytes, window_idx, c);
                    if bucket_idx > 0 {
                        local[bucket_idx] += *base;
                    }
                }
                local
            })
            .reduce(
                || vec![G::zero(); num_buckets],
                |mut acc, local| {
                    for (a, l) in acc.iter_mut().zip(local) {
                        *a += l;
                    }
                    acc
                },
            );
        result += combine_buckets(&buckets);
    }
    result
}

/// Extract c bits (little-endian) starting at window_idx · c
fn extract_window_bits(scalar_le: &[u8], window_idx: usize, c: usize) -> usize {
    let start_bit = window_idx * c;
    let mut result = 0usize;
    for i in 0..c {
        let bit_pos = start_bit + i;
        let byte_idx = bit_pos / 8;
        if byte_idx < scalar_le.len() {
            let bit = (scalar_le[byte_idx] >> (bit_pos % 8)) & 1;
            result |= (bit as usize) << i;
        }
    }
    result
}

/// Σ i · buckets[i] via running sums
fn combine_buckets<G: CurveGroup>(buckets: &[G]) -> G {
    let mut running_sum = G::zero();
    let mut result = G::zero();
    for bucket in buckets.iter().skip(1).rev() {
        running_sum += *bucket;
        result += running_sum;
    }
    result
}

/// Window size c ≈ log2(n), capped at 8
fn optimal_window_size(n: usize) -> usize {
    match n {
        0..=31 => 1,
        32..=127 => 2,
        128..=511 => 3,
        512..=2047 => 4,
        2048..=8191 => 5,
        8192..=32767 => 6,
        32768..=131071 => 7,
        _ => 8,
    }
}
