use criterion::{black_box, criterion_group, criterion_main, Criterion};
use filterop::*;

fn bench_validate_compile_render(c: &mut Criterion) {
    let table = filter_op_table();
    let emitter = SourceEmitter::default();

    c.bench_function("validate", |b| {
        b.iter(|| {
            let _ = validate(black_box(&table), Strictness::Strict);
        })
    });
    c.bench_function("compile", |b| {
        b.iter(|| {
            let _ = DefaultCompiler::compile(black_box(&table));
        })
    });
    let registry = generate(&table, Strictness::Strict).unwrap();
    c.bench_function("render", |b| {
        b.iter(|| {
            let _ = emitter.render(black_box(&registry));
        })
    });
}

criterion_group!(benches, bench_validate_compile_render);
criterion_main!(benches);
