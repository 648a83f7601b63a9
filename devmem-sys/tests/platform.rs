//! Runs in its own process so the configuration can be installed before the
//! platform is first used.

use devmem_sys::{
    device_memory_in_use, free, malloc_device, AllocError, Config, ConfigError, Device,
    DeviceSelector, DeviceType, Queue,
};

#[test]
fn installed_configuration() {
    Config {
        default_device: DeviceSelector::Cpu,
        gpu_count: 3,
        device_memory: 1 << 20,
    }
    .install()
    .unwrap();

    let devices = Device::all();
    let kinds: Vec<_> = devices.iter().map(Device::kind).collect();
    assert_eq!(
        kinds,
        [DeviceType::Gpu, DeviceType::Gpu, DeviceType::Gpu, DeviceType::Cpu]
    );
    assert!(devices.iter().all(|d| d.global_mem_size() == 1 << 20));
    assert_eq!(Device::host(), devices[3]);

    let queue = Queue::default();
    assert!(queue.device().is_cpu());
    assert_eq!(DeviceSelector::Default.select(), Ok(devices[0]));
    assert_eq!(DeviceSelector::Gpu.select(), Ok(devices[0]));

    // memory is accounted per device
    let gpu = devices[1];
    let context = gpu.default_context();
    let a = malloc_device(768 << 10, &gpu, &context).unwrap();
    assert_eq!(device_memory_in_use(&gpu), 768 << 10);
    assert_eq!(
        malloc_device(512 << 10, &gpu, &context),
        Err(AllocError::OutOfMemory {
            requested: 512 << 10,
            available: 256 << 10,
            device: gpu.id(),
        })
    );
    let b = malloc_device(512 << 10, &devices[2], &devices[2].default_context()).unwrap();

    unsafe {
        free(a, &context);
        free(b, &devices[2].default_context());
    }
    assert_eq!(device_memory_in_use(&gpu), 0);
    let c = malloc_device(1 << 20, &gpu, &context).unwrap();
    unsafe { free(c, &context) };

    let again = Config::default().install();
    assert_eq!(again, Err(ConfigError::AlreadyInitialized));
}
