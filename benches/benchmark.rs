use criterion::{criterion_group, criterion_main, Criterion};
use wln::{read, write, ReadOptions, WriteOptions};

fn benchmark_wln_round_trip(c: &mut Criterion) {
    let wln_strings = vec![
        "QY",       // simple molecule
        "L6J",      // benzene
        "L6TJ",     // cyclohexane
        "T6OJ",     // tetrahydropyran
        "L66J",     // naphthalene skeleton
        "VH3",      // aldehyde with a propyl tail
        "WNR",      // nitrobenzene
        "QH &ZH",   // ionic components
        "1",        // methane
        "100",      // long alkyl chain
    ];

    c.bench_function("read_wln", |b| {
        b.iter(|| {
            for wln in &wln_strings {
                read(wln, ReadOptions::new()).unwrap();
            }
        });
    });

    c.bench_function("read_and_write_wln", |b| {
        b.iter(|| {
            for wln in &wln_strings {
                let mol = read(wln, ReadOptions::new()).unwrap();
                write(&mol, WriteOptions::new()).unwrap();
            }
        });
    });
}

criterion_group!(benches, benchmark_wln_round_trip);
criterion_main!(benches);
