//! Windows-1252 encoding utilities for thermal printers
//!
//! Portuguese text (ç, ã, é, R$ with NBSP) fits the single-byte
//! Windows-1252 code page, which most ESC/POS printers expose as
//! "WPC1252" (code table 16). One character is one printed column.

/// ESC t 16 - Select character code table WPC1252
pub const SELECT_WPC1252: [u8; 3] = [0x1B, 0x74, 16];

/// Printed width of a string in columns
pub fn text_width(s: &str) -> usize {
    s.chars().count()
}

/// Truncate a string to fit within `max_width` columns
pub fn truncate_width(s: &str, max_width: usize) -> String {
    s.chars().take(max_width).collect()
}

/// Encode text as Windows-1252 bytes
///
/// ASCII passes through unchanged. Characters outside the code page
/// become `?` so they never corrupt the command stream.
pub fn encode_cp1252(s: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(s.len());
    let mut utf8 = [0u8; 4];
    for c in s.chars() {
        if c.is_ascii() {
            out.push(c as u8);
            continue;
        }
        let (bytes, _, had_errors) = encoding_rs::WINDOWS_1252.encode(c.encode_utf8(&mut utf8));
        if had_errors {
            out.push(b'?');
        } else {
            out.extend_from_slice(&bytes);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_width() {
        assert_eq!(text_width("hello"), 5);
        assert_eq!(text_width("ação"), 4);
        assert_eq!(text_width("R$\u{a0}89,90"), 8);
    }

    #[test]
    fn test_truncate_width() {
        assert_eq!(truncate_width("hello world", 5), "hello");
        assert_eq!(truncate_width("Roupão Azul", 6), "Roupão");
        assert_eq!(truncate_width("abc", 10), "abc");
    }

    #[test]
    fn test_encode_cp1252() {
        assert_eq!(encode_cp1252("P001"), b"P001".to_vec());
        assert_eq!(encode_cp1252("ação"), vec![b'a', 0xE7, 0xE3, b'o']);
        assert_eq!(encode_cp1252("R$\u{a0}1"), vec![b'R', b'$', 0xA0, b'1']);
        assert_eq!(encode_cp1252("€"), vec![0x80]);
    }

    #[test]
    fn test_encode_cp1252_unmappable() {
        assert_eq!(encode_cp1252("a你b"), vec![b'a', b'?', b'b']);
        assert_eq!(encode_cp1252("💖"), vec![b'?']);
    }
}
