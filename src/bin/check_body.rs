//! Validate bus message bodies from the command line.
//!
//! Usage:
//!   check_body [FLAGS] SIGNATURE HEXBODY
//!   check_body [FLAGS] SIGNATURE --file body.bin
//!   check_body [FLAGS]            (reads "SIGNATURE HEXBODY" lines from stdin)
//!
//! Flags: --big | --little, --lenient, --max-depth N, --max-array N,
//! --sender S, --path P, --interface I, --member M.
//! Exit code 1 if any message is inconsistent.

use sigwalk::{render_report, Endianness, MessageMeta, Validator, Verdict, WalkConfig};
use std::io::{self, BufRead};
use std::path::PathBuf;

fn print_usage() {
    eprintln!("usage: check_body [--big|--little] [--lenient] [--max-depth N] [--max-array N]");
    eprintln!("                  [--sender S] [--path P] [--interface I] [--member M]");
    eprintln!("                  [SIGNATURE [HEXBODY]] [--file body.bin]");
    eprintln!("with no positional arguments, reads \"SIGNATURE HEXBODY\" lines from stdin");
}

fn next_value(args: &mut impl Iterator<Item = String>, flag: &str) -> anyhow::Result<String> {
    args.next()
        .ok_or_else(|| anyhow::anyhow!("{} requires a value", flag))
}

fn parse_hex(s: &str) -> anyhow::Result<Vec<u8>> {
    let hex: String = s.chars().filter(|c| !c.is_whitespace()).collect();
    let hex = hex.strip_prefix("0x").unwrap_or(&hex);
    anyhow::ensure!(hex.len() % 2 == 0, "hex body must have an even number of digits");
    let mut bytes = Vec::with_capacity(hex.len() / 2);
    for chunk in hex.as_bytes().chunks(2) {
        let pair = std::str::from_utf8(chunk)?;
        let b = u8::from_str_radix(pair, 16)
            .map_err(|_| anyhow::anyhow!("invalid hex digits in body: {:?}", pair))?;
        bytes.push(b);
    }
    Ok(bytes)
}

fn report(label: Option<&str>, verdict: &Verdict, inconsistent: &mut usize) {
    match verdict {
        Verdict::Consistent => match label {
            Some(l) => println!("{}: consistent", l),
            None => println!("consistent"),
        },
        Verdict::Inconsistent(diag) => {
            print!("{}", render_report(diag));
            *inconsistent += 1;
        }
    }
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let mut endianness = Endianness::Little;
    let mut config = WalkConfig::default();
    let mut meta = MessageMeta::default();
    let mut file: Option<PathBuf> = None;
    let mut positional: Vec<String> = Vec::new();

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--big" => endianness = Endianness::Big,
            "--little" => endianness = Endianness::Little,
            "--lenient" => {
                config.strict_padding = false;
                config.strict_booleans = false;
            }
            "--max-depth" => config.max_depth = next_value(&mut args, "--max-depth")?.parse()?,
            "--max-array" => config.max_array_len = next_value(&mut args, "--max-array")?.parse()?,
            "--file" => file = Some(PathBuf::from(next_value(&mut args, "--file")?)),
            "--sender" => meta.sender = Some(next_value(&mut args, "--sender")?),
            "--path" => meta.path = Some(next_value(&mut args, "--path")?),
            "--interface" => meta.interface = Some(next_value(&mut args, "--interface")?),
            "--member" => meta.member = Some(next_value(&mut args, "--member")?),
            "--help" | "-h" => {
                print_usage();
                return Ok(());
            }
            _ => positional.push(arg),
        }
    }

    let validator = Validator::with_config(config);
    let mut inconsistent = 0usize;

    match (positional.len(), &file) {
        // Batch mode: one "SIGNATURE HEXBODY" pair per stdin line.
        (0, None) => {
            for line in io::stdin().lock().lines() {
                let line = line?;
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }
                let (signature, hex) = match line.split_once(char::is_whitespace) {
                    Some((sig, rest)) => (sig, rest),
                    None => (line, ""),
                };
                let body = parse_hex(hex)?;
                let verdict =
                    validator.validate_message(signature, &body, endianness, meta.clone());
                report(Some(signature), &verdict, &mut inconsistent);
            }
        }
        (1, Some(path)) => {
            let body = std::fs::read(path)?;
            let verdict =
                validator.validate_message(&positional[0], &body, endianness, meta.clone());
            report(None, &verdict, &mut inconsistent);
        }
        (2, None) => {
            let body = parse_hex(&positional[1])?;
            let verdict =
                validator.validate_message(&positional[0], &body, endianness, meta.clone());
            report(None, &verdict, &mut inconsistent);
        }
        _ => {
            print_usage();
            anyhow::bail!("unexpected arguments");
        }
    }

    if inconsistent > 0 {
        eprintln!("{} inconsistent message(s)", inconsistent);
        std::process::exit(1);
    }
    Ok(())
}
