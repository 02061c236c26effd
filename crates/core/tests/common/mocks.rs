use cachesim_core::memory::BackingStore;
use mockall::mock;

mock! {
    pub Memory {}
    impl BackingStore for Memory {
        fn read_bytes(&self, addr: u64, buf: &mut [u8]);
        fn write_bytes(&mut self, addr: u64, data: &[u8]);
    }
}
