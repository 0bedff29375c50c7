use criterion::{criterion_group, criterion_main, Criterion};
use vrtio::{flip_rows_in_place, swap_bytes_in_place, PixelBuffer, SampleType};

const SIZE: (usize, usize) = (2048, 2048);

fn bench_swap_bytes(c: &mut Criterion) {
    let mut buffer = PixelBuffer::zeroed(SampleType::Float32, SIZE.0, SIZE.1);
    c.bench_function("swap_bytes", |b| {
        b.iter(|| swap_bytes_in_place(buffer.as_bytes_mut(), SampleType::Float32).unwrap())
    });
}

fn bench_flip_rows(c: &mut Criterion) {
    let mut buffer = PixelBuffer::zeroed(SampleType::Float32, SIZE.0, SIZE.1);
    let row_bytes = SIZE.0 * SampleType::Float32.sample_bytes();
    c.bench_function("flip_rows", |b| {
        b.iter(|| flip_rows_in_place(buffer.as_bytes_mut(), row_bytes))
    });
}

criterion_group!(benches, bench_swap_bytes, bench_flip_rows);
criterion_main!(benches);
