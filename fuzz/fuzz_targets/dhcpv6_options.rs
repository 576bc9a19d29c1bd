#![no_main]
use dhcpv6_wire::wire::{emit_options, options_len, parse_options};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(options) = parse_options(data) {
        assert_eq!(options_len(&options), data.len());
        let emitted = emit_options(&options).expect("decoded options must re-encode");
        assert_eq!(emitted, data);
        for option in options.iter() {
            let _ = option.to_string();
        }
    }
});
