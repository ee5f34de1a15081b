use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use cr2fits::image_pipeline::netpbm;

fn generate_ppm(width: usize, height: usize) -> Vec<u8> {
    let mut data = format!("P6 {width} {height} 255\n").into_bytes();
    for y in 0..height {
        for x in 0..width {
            let value = ((x + y) % 256) as u8;
            data.extend_from_slice(&[value, value, value]);
        }
    }
    data
}

fn generate_pbm(width: usize, height: usize) -> Vec<u8> {
    let mut data = format!("P4 {width} {height}\n").into_bytes();
    let stride = width.div_ceil(8);
    for y in 0..height {
        for i in 0..stride {
            data.push(((y + i) % 256) as u8);
        }
    }
    data
}

fn benchmark_decode_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("ppm_decode_by_size");

    let sizes = vec![
        (100, 100, "100x100"),
        (500, 500, "500x500"),
        (1000, 1000, "1000x1000"),
    ];

    for (width, height, label) in sizes {
        let stream = generate_ppm(width, height);
        group.bench_with_input(BenchmarkId::from_parameter(label), &stream, |b, data| {
            b.iter(|| {
                let _ = netpbm::decode(black_box(data));
            });
        });
    }

    group.finish();
}

fn benchmark_bitmap_unpack(c: &mut Criterion) {
    let stream = generate_pbm(1000, 1000);
    c.bench_function("pbm_unpack_1000x1000", |b| {
        b.iter(|| {
            let _ = netpbm::decode(black_box(&stream));
        });
    });
}

criterion_group!(benches, benchmark_decode_sizes, benchmark_bitmap_unpack);
criterion_main!(benches);
