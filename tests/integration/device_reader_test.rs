// Tests for the device reader against real sysfs-shaped trees

use pcie_exporter::core::pcie::read_devices;
use pcie_exporter::PcieError;

use super::fixtures::{bridge_gpu_nic, SysfsFixture};

#[test]
fn test_read_devices_from_fixture() {
    let fixture = bridge_gpu_nic();

    let devices = read_devices(fixture.root()).unwrap();
    assert_eq!(devices.len(), 2, "NIC without link data must be skipped");

    let bridge = &devices[0];
    assert_eq!(bridge.address, "0000:00:01.0");
    assert_eq!(bridge.vendor_id, "0x8086");
    assert_eq!(bridge.device_id, "0x1234");
    assert!(bridge.negotiated_ok);
    assert_eq!(bridge.speed_ratio, Some(1.0));
    assert_eq!(bridge.width_ratio, Some(1.0));

    let gpu = &devices[1];
    assert_eq!(gpu.address, "0000:01:00.0");
    assert_eq!(gpu.current_link_speed, "16 GT/s PCIe");
    assert_eq!(gpu.max_link_width, "16");
    assert!(!gpu.negotiated_ok);
    assert!((gpu.speed_ratio.unwrap() - 0.5).abs() < 1e-5);
    assert!((gpu.width_ratio.unwrap() - 0.5).abs() < 1e-5);
}

#[test]
fn test_read_devices_sorted_and_unique() {
    let fixture = SysfsFixture::new();
    for relative in [
        "pci0000:80/0000:81:00.0",
        "pci0000:00/0000:00:1c.0",
        "pci0000:00/0000:00:1c.0/0000:3b:00.0",
        "pci0000:00/0000:00:02.0",
    ] {
        let device = fixture.device(relative);
        fixture.link(&device, ("8.0 GT/s", "8.0 GT/s"), ("x4", "x4"));
    }

    let devices = read_devices(fixture.root()).unwrap();
    let addresses: Vec<&str> = devices.iter().map(|d| d.address.as_str()).collect();
    assert_eq!(
        addresses,
        vec!["0000:00:02.0", "0000:00:1c.0", "0000:3b:00.0", "0000:81:00.0"]
    );
    assert!(addresses.windows(2).all(|pair| pair[0] < pair[1]));
}

#[test]
fn test_read_devices_skips_partial_link_data() {
    let fixture = SysfsFixture::new();
    let device = fixture.device("pci0000:00/0000:00:03.0");
    fixture.write(&device, "current_link_speed", "8.0 GT/s");
    fixture.write(&device, "max_link_speed", "8.0 GT/s");
    fixture.write(&device, "current_link_width", "4");

    let devices = read_devices(fixture.root()).unwrap();
    assert!(devices.is_empty());
}

#[test]
fn test_read_devices_vendor_specific_text() {
    let fixture = SysfsFixture::new();
    let device = fixture.device("pci0000:00/0000:00:04.0");
    fixture.link(&device, ("Unknown", "Unknown"), ("width8", "x16"));

    let devices = read_devices(fixture.root()).unwrap();
    assert_eq!(devices.len(), 1);
    assert_eq!(devices[0].speed_ratio, Some(1.0));
    assert_eq!(devices[0].width_ratio, Some(0.5));
    assert!(!devices[0].negotiated_ok);
}

#[test]
fn test_read_devices_missing_bus_directory() {
    let fixture = SysfsFixture::empty();

    let err = read_devices(fixture.root()).unwrap_err();
    assert!(matches!(err, PcieError::ListDevices { .. }));
    assert!(err.to_string().contains("bus/pci/devices"));
}

#[test]
fn test_read_devices_is_idempotent() {
    let fixture = bridge_gpu_nic();

    let first = read_devices(fixture.root()).unwrap();
    let second = read_devices(fixture.root()).unwrap();
    assert_eq!(first, second);
}
