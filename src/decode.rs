//! Byte-stream to code-point decoder (§4.A).
//!
//! Hand-rolled rather than built on `utf8parse`'s table-driven receiver,
//! because the `c1utf8_as` policy bits intercept decisions (what to do with
//! a successfully-decoded C1 code point, or a raw C1 byte) that a generic
//! UTF-8 receiver has no hook for.

bitflags::bitflags! {
    /// Policy for C1 control codes (0x80..=0x9F) encountered while UTF-8
    /// mode is active.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct C1Utf8As: u8 {
        /// A raw byte 0x80..=0x9F is emitted as the corresponding C1
        /// control without attempting multi-byte decode.
        const AS_BYTE = 1 << 1;
        /// A successfully-decoded code point in 0x80..=0x9F is accepted as
        /// a C1 control rather than replaced with U+FFFD.
        const AS_UTF8 = 1 << 2;
    }
}

const REPLACEMENT: char = '\u{FFFD}';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeOutput {
    /// More bytes are needed before a code point can be produced.
    NeedMore,
    /// A complete code point was decoded.
    CodePoint(char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct InProgress {
    remaining: u8,
    value: u32,
    /// Lower bound for this sequence length, to reject overlong encodings.
    min: u32,
}

/// Incremental UTF-8 decoder honouring the UTF8 mode bit and the
/// `c1utf8_as` policy.
#[derive(Debug, Clone, Default)]
pub struct Utf8Decoder {
    state: Option<InProgress>,
}

impl Utf8Decoder {
    pub fn new() -> Self {
        Utf8Decoder::default()
    }

    /// Feed one byte. `utf8_mode` and `c1_policy` are read fresh each call
    /// so the caller can flip modes mid-stream (as `ESC % G` / `ESC % @` do).
    pub fn feed(&mut self, b: u8, utf8_mode: bool, c1_policy: C1Utf8As) -> DecodeOutput {
        if !utf8_mode {
            self.state = None;
            return DecodeOutput::CodePoint(b as char);
        }

        if (0x80..=0x9F).contains(&b) && self.state.is_none() && c1_policy.contains(C1Utf8As::AS_BYTE) {
            return DecodeOutput::CodePoint(b as char);
        }

        if let Some(mut st) = self.state.take() {
            if b & 0xC0 != 0x80 {
                // Not a continuation byte: abandon the sequence and
                // reprocess this byte as a fresh lead byte.
                self.state = None;
                return self.feed(b, utf8_mode, c1_policy);
            }
            st.value = (st.value << 6) | u32::from(b & 0x3F);
            st.remaining -= 1;
            if st.remaining == 0 {
                return self.finish(st.value, st.min, c1_policy);
            }
            self.state = Some(st);
            return DecodeOutput::NeedMore;
        }

        match b {
            0x00..=0x7F => DecodeOutput::CodePoint(b as char),
            0xC2..=0xDF => {
                self.state = Some(InProgress {
                    remaining: 1,
                    value: u32::from(b & 0x1F),
                    min: 0x80,
                });
                DecodeOutput::NeedMore
            }
            0xE0..=0xEF => {
                self.state = Some(InProgress {
                    remaining: 2,
                    value: u32::from(b & 0x0F),
                    min: 0x800,
                });
                DecodeOutput::NeedMore
            }
            0xF0..=0xF4 => {
                self.state = Some(InProgress {
                    remaining: 3,
                    value: u32::from(b & 0x07),
                    min: 0x1_0000,
                });
                DecodeOutput::NeedMore
            }
            // Lead byte for an overlong 1-byte sequence (0xC0/0xC1), a
            // stray continuation byte, or 0xF5..=0xFF: always invalid.
            _ => DecodeOutput::CodePoint(REPLACEMENT),
        }
    }

    fn finish(&mut self, value: u32, min: u32, c1_policy: C1Utf8As) -> DecodeOutput {
        if value < min || (0xD800..=0xDFFF).contains(&value) || value > 0x10FFFF {
            return DecodeOutput::CodePoint(REPLACEMENT);
        }
        if (0x80..=0x9F).contains(&value) && !c1_policy.contains(C1Utf8As::AS_UTF8) {
            return DecodeOutput::CodePoint(REPLACEMENT);
        }
        match char::from_u32(value) {
            Some(c) => DecodeOutput::CodePoint(c),
            None => DecodeOutput::CodePoint(REPLACEMENT),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_all(bytes: &[u8], policy: C1Utf8As) -> Vec<char> {
        let mut d = Utf8Decoder::new();
        let mut out = Vec::new();
        for &b in bytes {
            if let DecodeOutput::CodePoint(c) = d.feed(b, true, policy) {
                out.push(c);
            }
        }
        out
    }

    #[test]
    fn ascii_passthrough() {
        assert_eq!(decode_all(b"hello", C1Utf8As::empty()), "hello".chars().collect::<Vec<_>>());
    }

    #[test]
    fn two_byte_sequence() {
        // U+00E9 'é' = 0xC3 0xA9
        assert_eq!(decode_all(&[0xC3, 0xA9], C1Utf8As::empty()), vec!['\u{E9}']);
    }

    #[test]
    fn three_byte_sequence() {
        // U+2603 '☃' = 0xE2 0x98 0x83
        assert_eq!(decode_all(&[0xE2, 0x98, 0x83], C1Utf8As::empty()), vec!['\u{2603}']);
    }

    #[test]
    fn four_byte_sequence() {
        // U+1F600 = 0xF0 0x9F 0x98 0x80
        assert_eq!(decode_all(&[0xF0, 0x9F, 0x98, 0x80], C1Utf8As::empty()), vec!['\u{1F600}']);
    }

    #[test]
    fn overlong_rejected() {
        // 0xC0 0x80 is an overlong encoding of NUL.
        assert_eq!(decode_all(&[0xC0, 0x80], C1Utf8As::empty()), vec!['\u{FFFD}']);
    }

    #[test]
    fn surrogate_rejected() {
        // 0xED 0xA0 0x80 encodes U+D800.
        assert_eq!(decode_all(&[0xED, 0xA0, 0x80], C1Utf8As::empty()), vec!['\u{FFFD}']);
    }

    #[test]
    fn c1_via_utf8_rejected_by_default() {
        // U+0085 (NEL) = 0xC2 0x85, rejected unless AS_UTF8 is set.
        assert_eq!(decode_all(&[0xC2, 0x85], C1Utf8As::empty()), vec!['\u{FFFD}']);
        assert_eq!(decode_all(&[0xC2, 0x85], C1Utf8As::AS_UTF8), vec!['\u{85}']);
    }

    #[test]
    fn raw_c1_byte_as_byte_policy() {
        let mut d = Utf8Decoder::new();
        let out = d.feed(0x9B, true, C1Utf8As::AS_BYTE);
        assert_eq!(out, DecodeOutput::CodePoint('\u{9B}'));
    }

    #[test]
    fn utf8_mode_off_is_byte_passthrough() {
        let mut d = Utf8Decoder::new();
        assert_eq!(d.feed(0xC3, false, C1Utf8As::empty()), DecodeOutput::CodePoint('\u{C3}'));
    }
}
