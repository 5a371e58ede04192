use criterion::{black_box, criterion_group, criterion_main, Criterion};

use xbridge_codec::{CurrencyValueMap, ReserveTransfer, TransferDestination, WireCodec};
use xbridge_types::CurrencyId;

fn sample_batch(n: usize) -> Vec<ReserveTransfer> {
    (0..n)
        .map(|i| {
            let mut values = CurrencyValueMap::new();
            values.add(CurrencyId::new([1; 20]), 100_000_000 + i as u64).unwrap();
            values.add(CurrencyId::new([2; 20]), 5_000).unwrap();
            ReserveTransfer::new(
                values,
                CurrencyId::new([2; 20]),
                2_000_000,
                TransferDestination::eth(CurrencyId::new([3; 20])),
                CurrencyId::new([2; 20]),
            )
        })
        .collect()
}

fn encode_batch_bench(c: &mut Criterion) {
    let codec = WireCodec::default();
    let batch = sample_batch(64);

    c.bench_function("encode_64_transfers", |b| {
        b.iter(|| codec.encode_all(black_box(&batch)))
    });
}

fn decode_batch_bench(c: &mut Criterion) {
    let codec = WireCodec::default();
    let bytes = codec.encode_all(&sample_batch(64)).unwrap();

    c.bench_function("decode_64_transfers", |b| {
        b.iter(|| codec.decode(black_box(&bytes), 64))
    });
}

criterion_group!(benches, encode_batch_bench, decode_batch_bench);
criterion_main!(benches);
