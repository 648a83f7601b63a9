use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use devmem::{allocator::Allocator, copy, DeviceAllocator, DeviceVector, HostAllocator, Vector};

/// Builds a vector of `n` elements one `push_back` at a time
pub fn push_n<A: Allocator<Value = u32> + Default>(n: u32) -> Vector<u32, A> {
    let mut v = Vector::new();
    for i in 0..n {
        v.push_back(i).unwrap();
    }
    v
}

pub fn push_back(c: &mut Criterion) {
    let mut group = c.benchmark_group("push_back");

    group.bench_function("device", |b| {
        b.iter(|| black_box(push_n::<DeviceAllocator<u32>>(1000)));
    });
    group.bench_function("host", |b| {
        b.iter(|| black_box(push_n::<HostAllocator<u32>>(1000)));
    });

    group.finish();
}

pub fn transfer(c: &mut Criterion) {
    let mut group = c.benchmark_group("transfer");

    for n in [1 << 10, 1 << 16, 1 << 20] {
        let host: Vec<f32> = (0..n).map(|i| i as f32).collect();
        let mut out = vec![0.0f32; n];
        let mut d_v: DeviceVector<f32> = DeviceVector::zeroed(n).unwrap();
        let first = d_v.begin();

        group.throughput(Throughput::Bytes((n * std::mem::size_of::<f32>()) as u64));
        group.bench_with_input(BenchmarkId::new("to_device", n), &host, |b, host| {
            b.iter(|| unsafe { copy(&host[..], first) });
        });
        group.bench_with_input(BenchmarkId::new("to_host", n), &n, |b, &n| {
            b.iter(|| {
                unsafe { copy(first..first + n, &mut out[..]) };
                black_box(out[n - 1])
            });
        });
        group.bench_function(BenchmarkId::new("assign", n), |b| {
            b.iter(|| d_v.assign(&host).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, push_back, transfer);
criterion_main!(benches);
