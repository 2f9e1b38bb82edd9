#![no_main]

use libfuzzer_sys::fuzz_target;
use ranged_errors::{CodedError, TranslationTable};
use std::io;

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);
    let _ = TranslationTable::standard().match_text(&text);

    let err = CodedError::from_platform_error(io::Error::other(text.into_owned()));
    assert!(err.is_failure());
    let _ = err.describe();
});
