use devmem::{copy, DeviceVector};
use proptest::prelude::*;
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Copies random host subranges into a device vector and checks every step
/// against the same copies made on a host model.
fn partial_copies(n: usize, rng: &mut StdRng) {
    let v: Vec<i32> = (0..n).map(|_| rng.gen_range(0..=100)).collect();
    let mut model = v.clone();
    let mut d_v: DeviceVector<i32> = DeviceVector::from_host(&v).unwrap();

    for _ in 0..10 {
        let first = rng.gen_range(0..=n);
        let last = rng.gen_range(first..=n);
        let d_first = rng.gen_range(0..=n - (last - first));

        model[d_first..d_first + (last - first)].copy_from_slice(&v[first..last]);
        unsafe { copy(&v[first..last], d_v.begin() + d_first) };

        assert_eq!(d_v.to_host(), model, "n = {n}, copy {first}..{last} to {d_first}");
    }
}

#[test]
fn random_partial_copies() {
    let mut rng = StdRng::seed_from_u64(0);
    for n in [3, 45, 823, 1000, 9823, 384_241, 1_824_981] {
        partial_copies(n, &mut rng);
    }
}

#[test]
fn device_to_device() {
    let mut rng = StdRng::seed_from_u64(1);
    let v: Vec<u64> = (0..500).map(|_| rng.gen()).collect();
    let mut src: DeviceVector<u64> = DeviceVector::from_host(&v).unwrap();
    let mut dst: DeviceVector<u64> = DeviceVector::zeroed(500).unwrap();

    let from = src.begin();
    unsafe { copy(from + 100..from + 300, dst.begin()) };
    let mut expected = vec![0; 500];
    expected[..200].copy_from_slice(&v[100..300]);
    assert_eq!(dst.to_host(), expected);
}

proptest! {
    #[test]
    fn round_trip(v in prop::collection::vec(any::<i16>(), 0..300)) {
        let d_v: DeviceVector<i16> = DeviceVector::from_host(&v).unwrap();
        prop_assert_eq!(d_v.len(), v.len());
        prop_assert_eq!(d_v.to_host(), v);
    }

    #[test]
    fn push_back_grows_to_powers_of_two(v in prop::collection::vec(any::<u32>(), 1..200)) {
        let mut d_v: DeviceVector<u32> = DeviceVector::new();
        for &x in &v {
            d_v.push_back(x).unwrap();
        }
        prop_assert_eq!(d_v.len(), v.len());
        prop_assert_eq!(d_v.capacity(), v.len().next_power_of_two());
        prop_assert_eq!(d_v.to_host(), v);
    }

    #[test]
    fn assign_replaces_contents(
        before in prop::collection::vec(any::<u8>(), 0..100),
        after in prop::collection::vec(any::<u8>(), 0..100),
    ) {
        let mut d_v: DeviceVector<u8> = DeviceVector::from_host(&before).unwrap();
        d_v.assign(&after).unwrap();
        prop_assert_eq!(d_v.capacity(), before.len().max(after.len()));
        prop_assert_eq!(d_v.to_host(), after);
    }

    #[test]
    fn reserve_within_capacity_changes_nothing(len in 0usize..64, extra in 0usize..64, n in 0usize..128) {
        let mut d_v: DeviceVector<u16> = DeviceVector::zeroed(len).unwrap();
        d_v.reserve(len + extra).unwrap();
        let cap = d_v.capacity();
        let state = (d_v.as_ptr(), d_v.len(), cap);

        d_v.reserve(n.min(cap)).unwrap();
        d_v.reserve(n.min(cap)).unwrap();
        prop_assert_eq!((d_v.as_ptr(), d_v.len(), d_v.capacity()), state);
    }
}
