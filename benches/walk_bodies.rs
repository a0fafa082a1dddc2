//! Benchmark: validate large synthesized bodies. Measures the walker on the
//! shapes that dominate real bus traffic: long arrays of structs, raw byte
//! arrays, and deep variant-in-variant nesting. Bodies are built in memory;
//! no bus or file input is involved.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sigwalk::{validate, Endianness, Verdict};

fn align(buf: &mut Vec<u8>, n: usize) {
    while buf.len() % n != 0 {
        buf.push(0);
    }
}

fn push_u32(buf: &mut Vec<u8>, v: u32) {
    align(buf, 4);
    buf.extend_from_slice(&v.to_le_bytes());
}

fn push_str(buf: &mut Vec<u8>, s: &str) {
    push_u32(buf, s.len() as u32);
    buf.extend_from_slice(s.as_bytes());
    buf.push(0);
}

/// Body for `a(us)` with `elements` entries.
fn array_of_struct_body(elements: usize) -> Vec<u8> {
    let mut buf = Vec::new();
    push_u32(&mut buf, 0); // patched below
    align(&mut buf, 8);
    let start = buf.len();
    for i in 0..elements {
        align(&mut buf, 8);
        push_u32(&mut buf, i as u32);
        push_str(&mut buf, "element-name");
    }
    let n = (buf.len() - start) as u32;
    buf[0..4].copy_from_slice(&n.to_le_bytes());
    buf
}

/// Body for `ay` with `len` bytes of payload.
fn byte_array_body(len: usize) -> Vec<u8> {
    let mut buf = Vec::new();
    push_u32(&mut buf, len as u32);
    buf.resize(4 + len, 0x5a);
    buf
}

/// Body for signature `v`: `depth` variants nested around one u32.
fn nested_variant_body(depth: usize) -> Vec<u8> {
    let mut buf = Vec::new();
    for _ in 0..depth {
        buf.extend_from_slice(&[1, b'v', 0]);
    }
    buf.extend_from_slice(&[1, b'u', 0]);
    align(&mut buf, 4);
    buf.extend_from_slice(&7u32.to_le_bytes());
    buf
}

fn assert_consistent(signature: &str, body: &[u8]) {
    let verdict = validate(black_box(signature), black_box(body), Endianness::Little);
    assert!(matches!(verdict, Verdict::Consistent));
}

fn bench_walk(c: &mut Criterion) {
    let structs = array_of_struct_body(10_000);
    c.bench_function("validate a(us) 10k elements", |b| {
        b.iter(|| assert_consistent("a(us)", &structs))
    });

    let bytes = byte_array_body(1 << 20);
    c.bench_function("validate ay 1 MiB", |b| {
        b.iter(|| assert_consistent("ay", &bytes))
    });

    let variants = nested_variant_body(32);
    c.bench_function("validate v nested 32 deep", |b| {
        b.iter(|| assert_consistent("v", &variants))
    });
}

criterion_group!(benches, bench_walk);
criterion_main!(benches);
