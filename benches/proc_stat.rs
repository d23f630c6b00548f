use criterion::{black_box, criterion_group, criterion_main, Criterion};
use procsnap::parse_process_record;

const TAIL: &str = "S 1 42 42 0 -1 4194560 100 0 0 0 2 1 0 0 20 0 1 0 500 4000 100 \
    18446744073709551615 94633947275264 94633947356645 140725834353232 0 0 0 65536 4 65538 \
    1 0 0 17 3 0 0 0 0 0 94633947400016 94633947401600 94633972318208 140725834359501 \
    140725834359509 140725834359509 140725834362862 0\n";

fn bench_parse(c: &mut Criterion) {
    let simple = format!("42 (sh) {}", TAIL);
    let awkward = format!("42 (my)weird (proc) name) {}", TAIL);

    c.bench_function("parse_process_record simple", |b| {
        b.iter(|| parse_process_record(black_box(simple.as_bytes())))
    });
    c.bench_function("parse_process_record awkward name", |b| {
        b.iter(|| parse_process_record(black_box(awkward.as_bytes())))
    });
}

criterion_group!(benches, bench_parse);
criterion_main!(benches);
