use devmem::{copy, fill, DeviceVector};

fn main() -> devmem::Result<()> {
    env_logger::init();

    let mut d_v: DeviceVector<i32> = DeviceVector::from_elem(10, 1)?;
    let first = d_v.begin();

    let mut v = vec![0; 5];
    unsafe {
        fill(first..first + 7, 7);
        copy(first..first + 5, &mut v[..]);
    }

    v.fill(12);
    unsafe { copy(&v[..], first) };

    println!("{d_v:?}");
    Ok(())
}
