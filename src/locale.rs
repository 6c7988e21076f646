//! Decoding of captured tool output.
//!
//! The compressor writes its messages in the host's locale encoding. The
//! encoding is resolved from `LC_ALL`, `LC_CTYPE` and `LANG` (first non-empty
//! wins); output that does not decode cleanly falls back to lossy UTF-8.
//!
//! Windows hosts usually leave these variables unset, so the ANSI code page
//! is not consulted there and output is decoded as UTF-8.

use encoding_rs::{Encoding, UTF_8};

/// Locale variables consulted in priority order.
const LOCALE_VARS: [&str; 3] = ["LC_ALL", "LC_CTYPE", "LANG"];

/// Extracts the encoding named by a POSIX locale string such as
/// `ru_RU.KOI8-R` or `de_DE.UTF-8@euro`.
pub fn encoding_from_locale(locale: &str) -> Option<&'static Encoding> {
    let (_, codeset) = locale.split_once('.')?;
    let codeset = codeset.split('@').next().unwrap_or(codeset);
    Encoding::for_label(codeset.as_bytes())
}

/// Returns the host's preferred text encoding.
pub fn preferred_encoding() -> &'static Encoding {
    encoding_from_vars(|var| std::env::var(var).ok())
}

/// Resolves the encoding from the first non-empty locale variable returned
/// by `lookup`, defaulting to UTF-8.
fn encoding_from_vars(lookup: impl Fn(&str) -> Option<String>) -> &'static Encoding {
    LOCALE_VARS
        .iter()
        .filter_map(|var| lookup(*var))
        .find(|value| !value.is_empty())
        .and_then(|value| encoding_from_locale(&value))
        .unwrap_or(UTF_8)
}

/// Decodes `bytes` with `encoding`, falling back to lossy UTF-8 when the
/// bytes are malformed for that encoding.
pub fn decode_with(encoding: &'static Encoding, bytes: &[u8]) -> String {
    match encoding.decode_without_bom_handling_and_without_replacement(bytes) {
        Some(text) => text.into_owned(),
        None => {
            log::debug!(
                "captured output is not valid {}, decoding lossily",
                encoding.name()
            );
            String::from_utf8_lossy(bytes).into_owned()
        }
    }
}

/// Decodes captured tool output with the host's preferred encoding.
pub fn decode_output(bytes: &[u8]) -> String {
    decode_with(preferred_encoding(), bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use encoding_rs::{KOI8_R, SHIFT_JIS, WINDOWS_1252};
    use std::collections::HashMap;

    fn lookup(vars: &[(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<&str, &str> = vars.iter().copied().collect();
        move |name: &str| vars.get(name).map(|v| v.to_string())
    }

    #[test]
    fn test_locale_codesets() {
        assert_eq!(encoding_from_locale("en_US.UTF-8"), Some(UTF_8));
        assert_eq!(encoding_from_locale("ru_RU.KOI8-R"), Some(KOI8_R));
        assert_eq!(encoding_from_locale("ja_JP.SJIS"), Some(SHIFT_JIS));
        assert_eq!(encoding_from_locale("de_DE.ISO-8859-1@euro"), Some(WINDOWS_1252));
    }

    #[test]
    fn test_locale_without_codeset() {
        assert_eq!(encoding_from_locale("C"), None);
        assert_eq!(encoding_from_locale("POSIX"), None);
        assert_eq!(encoding_from_locale("en_US.bogus-charset"), None);
    }

    #[test]
    fn test_locale_variable_priority() {
        let all = [
            ("LC_ALL", "ru_RU.KOI8-R"),
            ("LC_CTYPE", "ja_JP.SJIS"),
            ("LANG", "de_DE.ISO-8859-1"),
        ];
        assert_eq!(encoding_from_vars(lookup(&all)), KOI8_R);
        assert_eq!(encoding_from_vars(lookup(&all[1..])), SHIFT_JIS);
        assert_eq!(encoding_from_vars(lookup(&all[2..])), WINDOWS_1252);
        assert_eq!(encoding_from_vars(lookup(&[])), UTF_8);
    }

    #[test]
    fn test_empty_locale_variable_is_skipped() {
        let vars = [("LC_ALL", ""), ("LC_CTYPE", ""), ("LANG", "ru_RU.KOI8-R")];
        assert_eq!(encoding_from_vars(lookup(&vars)), KOI8_R);

        // The first non-empty value wins even without a usable codeset
        let vars = [("LC_ALL", "C"), ("LANG", "ru_RU.KOI8-R")];
        assert_eq!(encoding_from_vars(lookup(&vars)), UTF_8);
    }

    #[test]
    fn test_decode_locale_text() {
        // "Ошибка" in KOI8-R
        let bytes = [0xEF, 0xDB, 0xC9, 0xC2, 0xCB, 0xC1];
        assert_eq!(decode_with(KOI8_R, &bytes), "Ошибка");
    }

    #[test]
    fn test_decode_falls_back_to_lossy_utf8() {
        let bytes = b"bad \xFF byte";
        assert_eq!(decode_with(UTF_8, bytes), "bad \u{FFFD} byte");
    }
}
