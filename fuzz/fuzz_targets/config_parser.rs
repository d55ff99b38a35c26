#![no_main]

use libfuzzer_sys::fuzz_target;
use syzcfg::syscalls::SyscallCatalog;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes must produce Ok or a ConfigError, never a panic
    let catalog = SyscallCatalog::x86_64();
    let _ = syzcfg::config::parse(data, &catalog);
});
