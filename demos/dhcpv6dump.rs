//! Decode DHCPv6 option areas given as hex strings and print every option.
//!
//! Each argument (or each line of standard input, if there are none) is one
//! option area. Colons and whitespace in the hex are ignored.
//!
//!     cargo run --example dhcpv6dump -- 0001000e000100011dcd6500aabbccddeeff

use std::io::{self, BufRead};
use std::process;

use dhcpv6_wire::wire::{emit_options, iter_options, parse_options};

fn decode_hex(input: &str) -> Result<Vec<u8>, String> {
    let digits: Vec<u8> = input
        .bytes()
        .filter(|b| !b.is_ascii_whitespace() && *b != b':')
        .collect();
    if digits.len() % 2 != 0 {
        return Err(format!("odd number of hex digits in {input:?}"));
    }
    digits
        .chunks(2)
        .map(|pair| {
            let pair = std::str::from_utf8(pair).map_err(|e| e.to_string())?;
            u8::from_str_radix(pair, 16).map_err(|_| format!("bad hex digits {pair:?}"))
        })
        .collect()
}

fn dump(bytes: &[u8], raw: bool) -> bool {
    if raw {
        for item in iter_options(bytes) {
            match item {
                Ok((offset, option)) => {
                    println!("  {offset:5}: {} len {}", option.kind, option.data.len())
                }
                Err(err) => {
                    println!("  error: {err}");
                    return false;
                }
            }
        }
        return true;
    }

    let options = match parse_options(bytes) {
        Ok(options) => options,
        Err(err) => {
            println!("  error: {err}");
            return false;
        }
    };
    for option in options.iter() {
        println!("  {option}");
    }
    match emit_options(&options) {
        Ok(emitted) if emitted == bytes => true,
        Ok(_) => {
            println!("  error: re-encoded options differ from the input");
            false
        }
        Err(err) => {
            println!("  error: cannot re-encode: {err}");
            false
        }
    }
}

fn main() {
    let mut opts = getopts::Options::new();
    opts.optflag("h", "help", "print this help menu");
    opts.optflag("r", "raw", "list raw option headers without decoding bodies");

    let matches = match opts.parse(std::env::args().skip(1)) {
        Ok(matches) => matches,
        Err(err) => {
            eprintln!("{err}");
            process::exit(1)
        }
    };
    if matches.opt_present("h") {
        print!("{}", opts.usage("Usage: dhcpv6dump [options] [HEX...]"));
        process::exit(0)
    }

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug"))
        .format_timestamp(None)
        .init();

    let raw = matches.opt_present("r");
    let inputs: Vec<String> = if matches.free.is_empty() {
        io::stdin()
            .lock()
            .lines()
            .map_while(Result::ok)
            .filter(|line| !line.trim().is_empty())
            .collect()
    } else {
        matches.free.clone()
    };

    let mut ok = true;
    for input in inputs.iter() {
        match decode_hex(input) {
            Ok(bytes) => {
                println!("{} octets:", bytes.len());
                ok &= dump(&bytes, raw);
            }
            Err(err) => {
                eprintln!("{err}");
                ok = false;
            }
        }
    }
    if !ok {
        process::exit(1)
    }
}
