use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::{rngs::StdRng, Rng, SeedableRng};

use sgff::{
    codec::nucleotide, CompressedSequence, Container, Header, HistoryNode, Payload, Sequence,
    Trace,
};

// A plasmid-sized file with packed DNA, notes and a history chain
fn create_test_container(bases: usize, nodes: u32) -> Container {
    let mut rng = StdRng::seed_from_u64(42);
    let symbols: String = (0..bases)
        .map(|_| b"ACGT"[rng.random_range(0..4)] as char)
        .collect();

    let mut container = Container::new(Header::new(1, 16, 16));
    container
        .set_sequence(0, Sequence::new(symbols.clone()))
        .unwrap();
    container.append(6, Payload::Text("<Notes><Type>Synthetic</Type></Notes>".into()));
    container.append(18, Payload::Trace(Trace::with_bases(&symbols[..bases.min(800)])));
    for index in 0..nodes {
        container.push_history_node(HistoryNode::compressed(
            index,
            CompressedSequence::from_symbols(&symbols),
        ));
    }
    container
}

fn bench_io(c: &mut Criterion) {
    let mut group = c.benchmark_group("io");
    let container = create_test_container(1_000_000, 16);
    let bytes = container.to_bytes().unwrap();

    group.bench_function("write", |b| {
        b.iter(|| black_box(container.to_bytes().unwrap()));
    });

    group.bench_function("read", |b| {
        b.iter(|| {
            let parsed = sgff::read(bytes.as_slice()).unwrap();
            assert_eq!(parsed.history().nodes.len(), 16);
            black_box(parsed)
        });
    });

    group.finish();
}

fn bench_nucleotide(c: &mut Criterion) {
    let mut group = c.benchmark_group("nucleotide");
    let mut rng = StdRng::seed_from_u64(7);
    let symbols: String = (0..1_000_000)
        .map(|_| b"GATC"[rng.random_range(0..4)] as char)
        .collect();
    let packed = nucleotide::pack(&symbols);

    group.bench_function("pack", |b| {
        b.iter(|| black_box(nucleotide::pack(&symbols)));
    });
    group.bench_function("unpack", |b| {
        b.iter(|| black_box(nucleotide::unpack(&packed, symbols.len())));
    });

    group.finish();
}

criterion_group!(benches, bench_io, bench_nucleotide);
criterion_main!(benches);
