use mockall::mock;
use rtcsim_core::soc::traits::Device;

mock! {
    pub PortDevice {}
    impl Device for PortDevice {
        fn name(&self) -> &'static str;
        fn port_range(&self) -> (u16, u16);
        fn io_read(&mut self, offset: u16) -> u8;
        fn io_write(&mut self, offset: u16, val: u8);
        fn poll(&mut self, now_ns: u64);
        fn next_deadline(&self) -> Option<u64>;
        fn get_irq_id(&self) -> Option<u32>;
    }
}

/// Mock device named `name` decoding `count` ports from `base`.
pub fn port_device(name: &'static str, base: u16, count: u16) -> MockPortDevice {
    let mut dev = MockPortDevice::new();
    let _ = dev.expect_name().return_const(name);
    let _ = dev.expect_port_range().return_const((base, count));
    dev
}
