use encoding_rs::Encoding;
use std::io::Read;

use pybebra_core::api::CliError;

use crate::commands::cli::OptimizeArgs;

/// Source code to optimize, from `--code`, `--file` or `--stdin`.
pub fn read_code(args: &OptimizeArgs) -> Result<String, CliError> {
    if let Some(code) = &args.code {
        return Ok(code.clone());
    }
    if let Some(path) = &args.file {
        let bytes = std::fs::read(path)?;
        return Ok(decode_bytes(&bytes));
    }
    if args.stdin {
        let mut buf = Vec::new();
        std::io::stdin().read_to_end(&mut buf)?;
        return Ok(decode_bytes(&buf));
    }
    Err(CliError::Command(
        "no input: pass --code, --file or --stdin".to_string(),
    ))
}

/// How the raw input bytes were interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Source {
    Bom(&'static Encoding),
    Utf8,
    Utf16(&'static Encoding),
    Lossy,
}

/// Decodes a Python source file. Valid UTF-8 without NULs is taken as is;
/// NULs mean the file is really UTF-16 saved without a BOM.
pub fn decode_bytes(bytes: &[u8]) -> String {
    let source = classify(bytes);
    let text = match source {
        Source::Bom(enc) => enc.decode_with_bom_removal(bytes).0.into_owned(),
        Source::Utf16(enc) => enc.decode_without_bom_handling(bytes).0.into_owned(),
        Source::Utf8 | Source::Lossy => String::from_utf8_lossy(bytes).into_owned(),
    };
    match source {
        Source::Utf8 => {}
        Source::Lossy => tracing::warn!(
            target: "pybebra.input",
            bytes = bytes.len(),
            "code is not valid utf-8, bad sequences replaced"
        ),
        Source::Bom(enc) | Source::Utf16(enc) => tracing::debug!(
            target: "pybebra.input",
            bytes = bytes.len(),
            encoding = enc.name(),
            bom = matches!(source, Source::Bom(_)),
            "code transcoded to utf-8"
        ),
    }
    text
}

fn classify(bytes: &[u8]) -> Source {
    if let Some((enc, _)) = Encoding::for_bom(bytes) {
        return Source::Bom(enc);
    }
    if !bytes.contains(&0) && std::str::from_utf8(bytes).is_ok() {
        return Source::Utf8;
    }
    match utf16_byte_order(bytes) {
        Some(enc) => Source::Utf16(enc),
        None => Source::Lossy,
    }
}

/// Python source is mostly ASCII, so BOM-less UTF-16 has a NUL in one byte
/// of most code units. The byte holding the NULs gives the order.
fn utf16_byte_order(bytes: &[u8]) -> Option<&'static Encoding> {
    if bytes.len() < 2 || bytes.len() % 2 != 0 {
        return None;
    }
    let units = bytes.len() / 2;
    let (mut high_nul, mut low_nul) = (0usize, 0usize);
    for unit in bytes.chunks_exact(2) {
        if unit[1] == 0 {
            high_nul += 1;
        }
        if unit[0] == 0 {
            low_nul += 1;
        }
    }
    if high_nul * 2 > units && low_nul * 4 < high_nul {
        Some(encoding_rs::UTF_16LE)
    } else if low_nul * 2 > units && high_nul * 4 < low_nul {
        Some(encoding_rs::UTF_16BE)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn utf8_passes_through() {
        let src = "def naïve(n):\n    return n  # ✓\n";
        assert_eq!(decode_bytes(src.as_bytes()), src);
    }

    #[test]
    fn utf8_bom_is_stripped() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice(b"x = 1");
        assert_eq!(decode_bytes(&bytes), "x = 1");
    }

    #[test]
    fn utf16le_without_bom_is_detected() {
        let bytes: Vec<u8> = "def f(): pass"
            .encode_utf16()
            .flat_map(|u| u.to_le_bytes())
            .collect();
        assert_eq!(decode_bytes(&bytes), "def f(): pass");
    }

    #[test]
    fn utf16be_without_bom_is_detected() {
        let bytes: Vec<u8> = "x = [1, 2]"
            .encode_utf16()
            .flat_map(|u| u.to_be_bytes())
            .collect();
        assert_eq!(classify(&bytes), Source::Utf16(encoding_rs::UTF_16BE));
        assert_eq!(decode_bytes(&bytes), "x = [1, 2]");
    }

    #[test]
    fn plain_utf8_is_not_mistaken_for_utf16() {
        assert_eq!(classify(b"ab"), Source::Utf8);
        assert_eq!(classify(b""), Source::Utf8);
    }

    #[test]
    fn odd_length_with_nuls_falls_back_to_lossy() {
        assert_eq!(classify(b"a\0b\0c"), Source::Lossy);
        assert_eq!(decode_bytes(b"a\0b\0c"), "a\0b\0c");
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        assert_eq!(classify(&[b'a', 0xFF, b'b']), Source::Lossy);
        assert_eq!(decode_bytes(&[b'a', 0xFF, b'b']), "a\u{FFFD}b");
    }

    #[test]
    fn code_flag_wins() {
        let args = OptimizeArgs {
            file: None,
            code: Some("y = 2".to_string()),
            stdin: false,
            stream_format: "text".to_string(),
            ascii: false,
            details: false,
            no_color: false,
        };
        assert_eq!(read_code(&args).unwrap(), "y = 2");
    }

    #[test]
    fn file_is_read_and_decoded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snippet.py");
        std::fs::write(&path, b"\xEF\xBB\xBFprint(1)").unwrap();
        let args = OptimizeArgs {
            file: Some(path.display().to_string()),
            code: None,
            stdin: false,
            stream_format: "text".to_string(),
            ascii: false,
            details: false,
            no_color: false,
        };
        assert_eq!(read_code(&args).unwrap(), "print(1)");
    }
}
