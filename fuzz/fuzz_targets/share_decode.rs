#![no_main]

use libfuzzer_sys::fuzz_target;
use seedparts_shamir::shares::share_from_bytes;
use seedparts_shamir::{combine_shares, decode_share, encode_share};

fuzz_target!(|data: &[u8]| {
    // Raw share bytes: must parse or fail, never panic
    if let Ok(share) = share_from_bytes(data) {
        let text = encode_share(&share);
        let reparsed = decode_share(&text).expect("encoded share must decode");
        assert_eq!(reparsed, share);

        // Pairing a share with a shifted copy of itself exercises combine
        let mut other = share.clone();
        other.index = other.index.wrapping_add(1);
        let _ = combine_shares(&[share, other]);
    }

    // Share text as typed or pasted
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = decode_share(text);
    }
});
