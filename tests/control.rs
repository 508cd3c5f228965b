use cpci429::*;

const BAR0: CmResource = CmResource::Memory {
    start: 0xFEB0_0000,
    length: 0x1000,
};

fn powered_driver() -> (Driver, DeviceId) {
    let mut driver = Driver::new(DriverConfig::default());
    let id = driver.device_add();
    driver
        .with_device(id, |device| {
            device.prepare_hardware(&[BAR0], &[BAR0], &mut SimulatedMapper::default())?;
            device.d0_entry(PowerState::D3)
        })
        .unwrap()
        .unwrap();
    (driver, id)
}

fn send(driver: &Driver, id: DeviceId, code: u32, input: &[u8], output: &mut [u8]) -> Completion {
    driver
        .submit(id, &mut IoRequest::new(code, input, output))
        .unwrap()
}

#[test]
fn write_then_read_at_default_offset() {
    let (driver, id) = powered_driver();

    let completion = send(
        &driver,
        id,
        CPCI429_IOCTL_IN_BUFFERED,
        &0xDEADBEEFu32.to_le_bytes(),
        &mut [],
    );
    assert_eq!(completion.status(), NtStatus::SUCCESS);
    assert_eq!(completion.information(), 4);

    let mut output = [0u8; 4];
    let completion = send(&driver, id, CPCI429_IOCTL_OUT_BUFFERED, &[], &mut output);
    assert_eq!(completion, Completion::Success { information: 4 });
    assert_eq!(u32::from_le_bytes(output), 0xDEADBEEF);
}

#[test]
fn offset_moves_register_access() {
    let (driver, id) = powered_driver();

    let completion = send(
        &driver,
        id,
        CPCI429_IOCTL_WRITE_OFFSETADDRESS,
        &0x10u32.to_le_bytes(),
        &mut [],
    );
    assert_eq!(completion.information(), 4);
    let offset = driver
        .with_device(id, |device| device.context().offset())
        .unwrap();
    assert_eq!(offset, 0x10);

    send(&driver, id, CPCI429_IOCTL_IN_BUFFERED, &1u32.to_le_bytes(), &mut []);

    let mut output = [0u8; 4];
    send(&driver, id, CPCI429_IOCTL_OUT_BUFFERED, &[], &mut output);
    assert_eq!(u32::from_le_bytes(output), 0x1);

    send(
        &driver,
        id,
        CPCI429_IOCTL_WRITE_OFFSETADDRESS,
        &0u32.to_le_bytes(),
        &mut [],
    );
    send(&driver, id, CPCI429_IOCTL_OUT_BUFFERED, &[], &mut output);
    assert_eq!(u32::from_le_bytes(output), 0x0);
}

#[test]
fn short_output_buffer_is_rejected() {
    let (driver, id) = powered_driver();
    send(&driver, id, CPCI429_IOCTL_IN_BUFFERED, &7u32.to_le_bytes(), &mut []);

    let mut output = [0u8; 2];
    let completion = send(&driver, id, CPCI429_IOCTL_OUT_BUFFERED, &[], &mut output);
    assert_eq!(completion.status(), NtStatus::BUFFER_TOO_SMALL);
    assert_eq!(completion.information(), 0);
    assert_eq!(output, [0, 0]);

    // Window unchanged
    let mut output = [0u8; 4];
    send(&driver, id, CPCI429_IOCTL_OUT_BUFFERED, &[], &mut output);
    assert_eq!(u32::from_le_bytes(output), 7);
}

#[test]
fn unregistered_code_is_unsupported() {
    let (driver, id) = powered_driver();

    let mut output = [0u8; 4];
    let completion = send(&driver, id, 0x999, &0xFFu32.to_le_bytes(), &mut output);
    assert_eq!(
        completion,
        Completion::Failure {
            status: NtStatus::INVALID_DEVICE_REQUEST
        }
    );
    assert_eq!(completion.information(), 0);

    send(&driver, id, CPCI429_IOCTL_OUT_BUFFERED, &[], &mut output);
    assert_eq!(u32::from_le_bytes(output), 0);
}

#[test]
fn physical_address_survives_register_traffic() {
    let (driver, id) = powered_driver();

    let mut output = [0u8; 4];
    for value in [1u32, 2, 3] {
        send(&driver, id, CPCI429_IOCTL_IN_BUFFERED, &value.to_le_bytes(), &mut []);
        let completion = send(&driver, id, CPCI429_IOCTL_READ_PADDRESS, &[], &mut output);
        assert!(completion.is_success());
        assert_eq!(u32::from_le_bytes(output), 0xFEB0_0000);
    }
}

#[test]
fn requests_after_power_down_are_not_ready() {
    let (driver, id) = powered_driver();
    driver
        .with_device(id, |device| device.d0_exit(PowerState::D3))
        .unwrap()
        .unwrap();

    let completion = send(
        &driver,
        id,
        CPCI429_IOCTL_IN_BUFFERED,
        &1u32.to_le_bytes(),
        &mut [],
    );
    assert_eq!(completion.status(), NtStatus::DEVICE_NOT_READY);
    assert_eq!(completion.information(), 0);
}
