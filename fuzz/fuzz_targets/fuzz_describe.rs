#![no_main]

use libfuzzer_sys::fuzz_target;
use ranged_errors::{CodedError, ErrorCode, Target};

fuzz_target!(|data: &[u8]| {
    // 4 bytes of code per link, the rest is the message
    let (codes, message) = data.split_at(data.len() - data.len() % 4);
    let message = String::from_utf8_lossy(message).into_owned();

    let mut err = CodedError::new(ErrorCode::new(0)).with_message(message);
    for chunk in codes.chunks_exact(4).take(256) {
        let raw = i32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        err = CodedError::new(ErrorCode::new(raw)).with_cause(err);
    }

    let _ = err.describe();
    let _ = err.chain_log().to_string();
    let _ = err.matches_in_chain(Some(Target::Code(err.code())));
});
