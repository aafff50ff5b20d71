use ark_std::test_rng;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use nizk_pipeline::circuit::{Circuit, CircuitBuilder, CircuitDefinition};
use nizk_pipeline::field::{Bn254, Bn254Fr as Fr, PrimeField};
use nizk_pipeline::srs::{SrsProvider, UnsafeSrsProvider};
use nizk_pipeline::witness::{generate, Assignment, Witness};
use nizk_pipeline::{Groth16, Plonk, ProofSystem, Result};

/// `y == x^(n+1)` as a chain of n multiplications
struct PowerChain {
    n: usize,
}

impl<F: PrimeField> Circuit<F> for PowerChain {
    fn define(&self, api: &mut CircuitBuilder<F>) -> Result<()> {
        let x = api.private_input("x")?;
        let y = api.public_input("y")?;
        let mut acc = x;
        for _ in 0..self.n {
            acc = api.mul(acc, x);
        }
        api.assert_equal(y, acc);
        Ok(())
    }
}

fn chain(n: usize) -> (CircuitDefinition<Fr>, Witness<Fr>) {
    let circuit = PowerChain { n };
    let def = CircuitDefinition::from_circuit(&circuit).unwrap();
    let x = Fr::from(3u64);
    let mut y = x;
    for _ in 0..n {
        y *= x;
    }
    let mut assignment = Assignment::new();
    assignment.set("x", x);
    assignment.set("y", y);
    let witness = generate(&def, &assignment).unwrap();
    (def, witness)
}

fn bench_backend<S: ProofSystem<Bn254>>(c: &mut Criterion) {
    let mut group = c.benchmark_group(S::NAME);
    for log_size in [6usize, 8, 10] {
        let n = 1 << log_size;
        let (def, witness) = chain(n);
        let mut rng = test_rng();
        let cs = S::compile(&def).unwrap();
        let srs = S::srs_size(&cs).map(|(degree, size)| {
            SrsProvider::<Bn254>::provide(&UnsafeSrsProvider, degree, size, &mut rng).unwrap()
        });
        let (pk, vk) = S::setup(&cs, srs.as_ref(), &mut rng).unwrap();
        let proof = S::prove(&pk, &witness, &mut rng).unwrap();
        let public = witness.public();

        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::new("setup", n), &n, |b, _| {
            b.iter(|| {
                let mut rng = test_rng();
                black_box(S::setup(black_box(&cs), srs.as_ref(), &mut rng).unwrap())
            });
        });
        group.bench_with_input(BenchmarkId::new("prove", n), &n, |b, _| {
            b.iter(|| {
                let mut rng = test_rng();
                black_box(S::prove(black_box(&pk), black_box(&witness), &mut rng).unwrap())
            });
        });
        group.bench_with_input(BenchmarkId::new("verify", n), &n, |b, _| {
            b.iter(|| black_box(S::verify(&vk, black_box(&public), black_box(&proof)).unwrap()));
        });
    }
    group.finish();
}

fn bench_groth16(c: &mut Criterion) {
    bench_backend::<Groth16<Bn254>>(c);
}

fn bench_plonk(c: &mut Criterion) {
    bench_backend::<Plonk<Bn254>>(c);
}

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(10);
    targets = bench_groth16, bench_plonk
}
criterion_main!(benches);
