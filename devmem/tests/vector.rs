use devmem::{
    allocator::Allocator, copy, fill, DeviceAllocator, DeviceVector, HostAllocator, HostVector,
    Vector,
};
use rand::{rngs::StdRng, Rng, SeedableRng};

fn random_values(n: usize) -> Vec<i32> {
    let mut rng = StdRng::seed_from_u64(0);
    (0..n).map(|_| rng.gen_range(0..=100)).collect()
}

#[test]
fn fill_then_copy_both_ways() {
    let mut d_v: DeviceVector<i32> = DeviceVector::from_elem(10, 1).unwrap();
    let first = d_v.begin();

    let mut v = vec![0; 5];
    unsafe {
        fill(first..first + 7, 7);
        copy(first..first + 5, &mut v[..]);
    }
    assert_eq!(v, [7; 5]);

    v.fill(12);
    unsafe { copy(&v[..], first) };

    assert_eq!(d_v.to_host(), [12, 12, 12, 12, 12, 7, 7, 1, 1, 1]);
}

#[test]
fn construct_from_host() {
    for n in [3, 45, 823, 1000] {
        let v = random_values(n);

        let d_v1: DeviceVector<i32> = DeviceVector::try_from(v.clone()).unwrap();
        let d_v2: DeviceVector<i32> = DeviceVector::try_from(&v[..]).unwrap();

        assert_eq!(d_v1.len(), n);
        assert_eq!(d_v2.len(), n);
        for (i, &value) in v.iter().enumerate() {
            assert_eq!(d_v1.get(i), value);
            assert_eq!(d_v2.at(i).get(), value);
        }
    }
}

fn exercise<A: Allocator<Value = u32> + Default>() -> Vec<u32> {
    let mut v = Vector::<u32, A>::new();
    for i in 0..20 {
        v.push_back(i).unwrap();
    }
    v.resize(25, 100).unwrap();
    v.set(0, 50);

    let mut w = v.try_clone().unwrap();
    w.assign(&[1, 2, 3]).unwrap();
    v.assign_from(&w).unwrap();
    v.push_back(4).unwrap();

    assert_eq!(v.capacity(), 32);
    assert_eq!(w.capacity(), 25);
    v.to_host()
}

#[test]
fn host_and_device_agree() {
    let device = exercise::<DeviceAllocator<u32>>();
    let host = exercise::<HostAllocator<u32>>();
    assert_eq!(device, [1, 2, 3, 4]);
    assert_eq!(host, device);
}

#[test]
fn host_vector_is_a_slice() {
    let mut v: HostVector<i32> = HostVector::from_host(&random_values(100)).unwrap();
    v.sort_unstable();
    assert!(v.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(v.to_host(), v.as_slice());
}

#[test]
fn explicit_queue() {
    let policy = devmem::policy::host();
    let alloc = DeviceAllocator::<u8>::new(policy.queue());
    let mut v = DeviceVector::from_host_in(b"abc", alloc.clone()).unwrap();
    assert_eq!(v.allocator(), &alloc);
    assert_eq!(v.allocator().device(), policy.device());

    let mut out = [0; 3];
    let first = v.begin();
    unsafe {
        devmem::fill_with(&policy, first + 1..first + 2, b'x');
        devmem::copy_with(&policy, first..first + 3, &mut out[..]);
    }
    assert_eq!(&out, b"axc");
}

#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
struct Particle {
    pos: [f32; 3],
    mass: f32,
}

#[test]
fn user_defined_elements() {
    let p = Particle {
        pos: [1.0, 2.0, 3.0],
        mass: 0.5,
    };
    let mut d_v: DeviceVector<Particle> = DeviceVector::zeroed(4).unwrap();
    d_v.set(2, p);
    d_v.push_back(p).unwrap();

    let host = d_v.to_host();
    assert_eq!(host.len(), 5);
    assert_eq!(host[0], Particle { pos: [0.0; 3], mass: 0.0 });
    assert_eq!(host[2], p);
    assert_eq!(d_v.at(4).get(), p);
}
