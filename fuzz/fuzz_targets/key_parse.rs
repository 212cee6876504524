#![no_main]

use libfuzzer_sys::fuzz_target;
use seedparts_core::keys::{PrivateKey, PublicKey};
use seedparts_core::{validate_private_key, validate_public_key, Credential, EncryptionStrategy};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    let _ = validate_public_key(text);
    let _ = validate_private_key(text);

    // Any key that parses is either usable for encryption or refused cleanly
    if PublicKey::from_armored(text).is_ok() {
        let _ = EncryptionStrategy::PublicKey.encrypt("fuzz", Some(&Credential::public_key(text)));
    }

    if let Ok(key) = PrivateKey::from_armored(text) {
        let _ = key.is_locked();
    }
});
