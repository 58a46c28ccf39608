//! ASCII header tokenizer for P4/P5/P6.

use alloc::format;
use alloc::string::String;

use super::{PnmFormat, PnmHeader};
use crate::error::PnmError;
use crate::reader::BufferedReader;
use crate::source::ByteSource;

/// Longest accepted header token. Anything longer cannot be a valid
/// magic number or `u32`.
pub(crate) const MAX_TOKEN_LEN: usize = 11;

struct Token {
    buf: [u8; MAX_TOKEN_LEN + 1],
    len: usize,
}

impl Token {
    fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }
}

/// `isspace` in the C locale: includes vertical tab, unlike
/// [`u8::is_ascii_whitespace`].
fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | 0x0B | 0x0C | b'\r')
}

fn eof_in_header() -> PnmError {
    PnmError::BadHeader("unexpected end of stream in header".into())
}

fn skip_line<S: ByteSource>(reader: &mut BufferedReader<S>) -> Result<(), PnmError> {
    loop {
        match reader.next_byte()? {
            Some(b'\n') => return Ok(()),
            Some(_) => {}
            None => return Err(eof_in_header()),
        }
    }
}

fn read_token<S: ByteSource>(reader: &mut BufferedReader<S>) -> Result<Token, PnmError> {
    let mut token = Token {
        buf: [0; MAX_TOKEN_LEN + 1],
        len: 0,
    };
    loop {
        let Some(b) = reader.next_byte()? else {
            if token.len == 0 {
                return Err(eof_in_header());
            }
            return Ok(token);
        };

        if is_whitespace(b) {
            if token.len == 0 {
                continue;
            }
            return Ok(token);
        }

        if b == b'#' {
            if token.len == 0 {
                skip_line(reader)?;
                continue;
            }
            return Err(PnmError::BadHeader(
                "comment starts inside a header token".into(),
            ));
        }

        if token.len == MAX_TOKEN_LEN {
            return Err(PnmError::BadHeader(format!(
                "header token longer than {MAX_TOKEN_LEN} characters"
            )));
        }
        token.buf[token.len] = b;
        token.len += 1;
    }
}

fn parse_magic(token: &Token) -> Result<PnmFormat, PnmError> {
    match token.as_bytes() {
        b"P4" => Ok(PnmFormat::Bitmap),
        b"P5" => Ok(PnmFormat::Graymap),
        b"P6" => Ok(PnmFormat::Pixmap),
        other => Err(PnmError::BadHeader(format!(
            "unsupported magic {:?}",
            String::from_utf8_lossy(other)
        ))),
    }
}

fn parse_number(token: &Token, field: &str) -> Result<u32, PnmError> {
    let bytes = token.as_bytes();
    let invalid = || {
        PnmError::BadHeader(format!(
            "{field} {:?} is not a positive integer",
            String::from_utf8_lossy(bytes)
        ))
    };
    if !bytes.iter().all(u8::is_ascii_digit) {
        return Err(invalid());
    }
    let value = bytes.iter().try_fold(0u32, |acc, &d| {
        acc.checked_mul(10)?.checked_add(u32::from(d - b'0'))
    });
    match value {
        Some(v) if v > 0 => Ok(v),
        _ => Err(invalid()),
    }
}

/// Parse the header, leaving `reader` on the first payload byte.
pub(crate) fn parse_header<S: ByteSource>(
    reader: &mut BufferedReader<S>,
) -> Result<PnmHeader, PnmError> {
    let format = parse_magic(&read_token(reader)?)?;
    let width = parse_number(&read_token(reader)?, "width")?;
    let height = parse_number(&read_token(reader)?, "height")?;
    let max_sample_value = match format {
        PnmFormat::Bitmap => 1,
        _ => parse_number(&read_token(reader)?, "maxval")?,
    };

    let header = PnmHeader {
        format,
        width,
        height,
        max_sample_value,
    };
    log::debug!(
        "parsed {:?} header: {}x{}, maxval {}",
        header.format,
        header.width,
        header.height,
        header.max_sample_value
    );
    Ok(header)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SliceSource;
    use alloc::vec::Vec;

    fn parse(data: &[u8]) -> Result<PnmHeader, PnmError> {
        parse_header(&mut BufferedReader::new(SliceSource::new(data)))
    }

    fn assert_bad_header(data: &[u8]) {
        match parse(data) {
            Err(PnmError::BadHeader(_)) => {}
            other => panic!("expected BadHeader for {data:?}, got {other:?}"),
        }
    }

    #[test]
    fn graymap_header() {
        let header = parse(b"P5 640 480 255\n").unwrap();
        assert_eq!(header.format, PnmFormat::Graymap);
        assert_eq!(header.width, 640);
        assert_eq!(header.height, 480);
        assert_eq!(header.max_sample_value, 255);
    }

    #[test]
    fn pixmap_and_bitmap_headers() {
        let header = parse(b"P6\n3 2\n65535\n").unwrap();
        assert_eq!(header.format, PnmFormat::Pixmap);
        assert_eq!((header.width, header.height), (3, 2));
        assert_eq!(header.max_sample_value, 65535);

        let header = parse(b"P4\n17 9\n").unwrap();
        assert_eq!(header.format, PnmFormat::Bitmap);
        assert_eq!((header.width, header.height), (17, 9));
        assert_eq!(header.max_sample_value, 1);
    }

    #[test]
    fn many_sizes_parse_exactly() {
        for (w, h, m) in [(1u32, 1u32, 1u32), (4, 7, 3), (512, 512, 4095), (u32::MAX, 2, 65535)] {
            let text = format!("P5 {w} {h} {m}\n");
            let header = parse(text.as_bytes()).unwrap();
            assert_eq!(
                (header.width, header.height, header.max_sample_value),
                (w, h, m)
            );
        }
    }

    #[test]
    fn comments_are_transparent() {
        let plain = parse(b"P5 10 20 255\n").unwrap();
        let commented = parse(b"P5 #comment\n10 20 255\n").unwrap();
        assert_eq!(plain, commented);

        let everywhere = parse(b"# leading\nP5\n# a\n# b\n10\n#c\n20 # d\n255\n").unwrap();
        assert_eq!(plain, everywhere);
    }

    #[test]
    fn other_whitespace_separates_tokens() {
        let header = parse(b"P5\t10\r\n20\x0b255\x0c").unwrap();
        assert_eq!((header.width, header.height), (10, 20));
    }

    #[test]
    fn stops_after_one_whitespace_byte() {
        let mut reader = BufferedReader::new(SliceSource::new(b"P5 2 1 255\n\n\x07"));
        parse_header(&mut reader).unwrap();
        // The second newline is payload.
        assert_eq!(reader.read_byte().unwrap(), b'\n');
        assert_eq!(reader.read_byte().unwrap(), 0x07);
    }

    #[test]
    fn token_length_limit() {
        // 11 characters is the longest accepted token.
        let header = parse(b"P5 00000000010 1 255\n").unwrap();
        assert_eq!(header.width, 10);
        assert_bad_header(b"P5 000000000010 1 255\n");
    }

    #[test]
    fn non_numeric_tokens() {
        assert_bad_header(b"P5 abc 10 255\n");
        assert_bad_header(b"P5 10 -1 255\n");
        assert_bad_header(b"P5 10 10 +255\n");
        assert_bad_header(b"P5 12ab 10 255\n");
    }

    #[test]
    fn zero_and_overflowing_values() {
        assert_bad_header(b"P5 0 10 255\n");
        assert_bad_header(b"P5 10 10 0\n");
        assert_bad_header(b"P5 4294967296 1 255\n");
    }

    #[test]
    fn comment_inside_token() {
        assert_bad_header(b"P5 10#c\n 10 255\n");
    }

    #[test]
    fn bad_magic() {
        for magic in [&b"P1"[..], b"P2", b"P3", b"P7", b"Pf", b"BM", b"P55"] {
            let mut data = Vec::from(magic);
            data.extend_from_slice(b" 1 1 255\n");
            assert_bad_header(&data);
        }
    }

    #[test]
    fn truncated_headers() {
        assert_bad_header(b"");
        assert_bad_header(b"P5");
        assert_bad_header(b"P5 10 10");
        assert_bad_header(b"P5 10 10 \n");
        assert_bad_header(b"P5 10 # no newline");
    }

    #[test]
    fn token_terminated_by_end_of_stream() {
        let header = parse(b"P5 3 4 255").unwrap();
        assert_eq!(header.max_sample_value, 255);
    }
}
