//! Signature parser fuzz target: feed arbitrary bytes to the parser.
//! The parser must not panic; it should return Ok(types) or Err(SignatureError).
//! Build with: cargo fuzz run signature_fuzz (requires nightly and cargo fuzz).

#![cfg_attr(fuzzing, no_main)]

#[cfg(fuzzing)]
use libfuzzer_sys::fuzz_target;

#[cfg(fuzzing)]
fuzz_target!(|data: &[u8]| {
    let _ = sigwalk::parse_signature_bytes(data);
});

#[cfg(not(fuzzing))]
fn main() {
    eprintln!("Build with: cargo fuzz run signature_fuzz");
}
