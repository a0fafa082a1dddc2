//! Validator fuzz target: split arbitrary bytes into a signature and a body
//! and validate under both byte orders. Any verdict is acceptable; panicking
//! or looping is not. Build with: cargo fuzz run walk_fuzz.

#![cfg_attr(fuzzing, no_main)]

#[cfg(fuzzing)]
use libfuzzer_sys::fuzz_target;

#[cfg(fuzzing)]
fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }
    let split = (data[0] as usize).min(data.len() - 1);
    let sig = &data[1..1 + split];
    let body = &data[1 + split..];
    if let Ok(sig) = std::str::from_utf8(sig) {
        let _ = sigwalk::validate(sig, body, sigwalk::Endianness::Little);
        let _ = sigwalk::validate(sig, body, sigwalk::Endianness::Big);
    }
});

#[cfg(not(fuzzing))]
fn main() {
    eprintln!("Build with: cargo fuzz run walk_fuzz");
}
