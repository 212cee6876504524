#![no_main]

use libfuzzer_sys::fuzz_target;
use seedparts_core::{classify, resolve, DecryptionCredential, EncryptedMessage, MESSAGE_HEADER};

fuzz_target!(|data: &[u8]| {
    // Whatever the combined payload is, classification returns Ok or Err
    let _ = classify(data);
    let _ = resolve(data, Some(&DecryptionCredential::password("fuzz")));

    // Force the OpenPGP path for bodies that lack the marker
    if let Ok(body) = std::str::from_utf8(data) {
        let armored = format!("{MESSAGE_HEADER}\n\n{body}\n-----END PGP MESSAGE-----\n");
        if let Ok(message) = EncryptedMessage::from_armored(&armored) {
            let again = message.to_armored().expect("parsed message must re-armor");
            let _ = classify(again.as_bytes()).expect("re-armored message must classify");
        }
    }
});
