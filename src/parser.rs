//! Parse signature text into Single Complete Types.
//!
//! The parser is purely syntactic: it never looks at body bytes, and the same
//! input always produces the same output. Trailing characters after a complete
//! type are not an error; they begin the next top-level type.

use crate::ast::{code_kind, CodeKind, CompleteType};

/// Container nesting allowed in a signature before parsing is rejected.
pub const MAX_SIGNATURE_DEPTH: usize = 64;

/// A signature that is not valid grammar. Offsets are byte positions into the
/// signature text where the problem was detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SignatureError {
    #[error("unknown type code 0x{code:02x} at offset {at}")]
    UnknownTypeCode { code: u8, at: usize },
    #[error("array at offset {at} has no element type")]
    ArrayMissingElementType { at: usize },
    #[error("empty struct at offset {at}")]
    EmptyStruct { at: usize },
    #[error("struct opened at offset {at} is never closed")]
    UnmatchedStructOpen { at: usize },
    #[error("struct close at offset {at} matches no open struct")]
    UnmatchedStructClose { at: usize },
    #[error("dict entry at offset {at} is not the sole element type of an array")]
    DictEntryOutsideArray { at: usize },
    #[error("dict entry key at offset {at} must be a basic type")]
    DictEntryKeyMustBeBasic { at: usize },
    #[error("dict entry at offset {at} must contain exactly two types")]
    DictEntryWrongArity { at: usize },
    #[error("container opened at offset {at} is never terminated")]
    UnterminatedContainer { at: usize },
    #[error("nesting exceeds {max} containers at offset {at}")]
    NestingTooDeep { at: usize, max: usize },
}

/// Parse a signature into its ordered sequence of Single Complete Types.
pub fn parse_signature(signature: &str) -> Result<Vec<CompleteType>, SignatureError> {
    parse_signature_bytes(signature.as_bytes())
}

/// Byte-level entry point. The walker re-enters the parser through this when
/// it reads a signature out of a body (variant headers, signature fields),
/// where the bytes are not known to be valid UTF-8; any byte outside the type
/// code table fails as [`SignatureError::UnknownTypeCode`].
pub fn parse_signature_bytes(signature: &[u8]) -> Result<Vec<CompleteType>, SignatureError> {
    let mut p = Parser { input: signature, pos: 0 };
    let mut types = Vec::new();
    while !p.at_end() {
        types.push(p.complete_type(0, false)?);
    }
    Ok(types)
}

struct Parser<'a> {
    input: &'a [u8],
    pos: usize,
}

impl Parser<'_> {
    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn peek_kind(&self) -> Option<CodeKind> {
        self.peek().and_then(code_kind)
    }

    /// One Single Complete Type starting at the current position. `in_array`
    /// is true only for the element type directly following an array marker,
    /// the sole position where a dict entry is legal.
    fn complete_type(&mut self, depth: usize, in_array: bool) -> Result<CompleteType, SignatureError> {
        let at = self.pos;
        if depth > MAX_SIGNATURE_DEPTH {
            return Err(SignatureError::NestingTooDeep { at, max: MAX_SIGNATURE_DEPTH });
        }
        let code = match self.peek() {
            Some(c) => c,
            None => return Err(SignatureError::UnterminatedContainer { at }),
        };
        match code_kind(code) {
            None => Err(SignatureError::UnknownTypeCode { code, at }),
            Some(CodeKind::Basic(bt)) => {
                self.pos += 1;
                Ok(CompleteType::Basic(bt))
            }
            Some(CodeKind::Variant) => {
                self.pos += 1;
                Ok(CompleteType::Variant)
            }
            Some(CodeKind::Array) => {
                self.pos += 1;
                match self.peek_kind() {
                    Some(CodeKind::StructClose) | Some(CodeKind::DictClose) => {
                        Err(SignatureError::ArrayMissingElementType { at })
                    }
                    _ if self.at_end() => Err(SignatureError::ArrayMissingElementType { at }),
                    _ => {
                        let elem = self.complete_type(depth + 1, true)?;
                        Ok(CompleteType::Array(Box::new(elem)))
                    }
                }
            }
            Some(CodeKind::StructOpen) => {
                self.pos += 1;
                let mut fields = Vec::new();
                loop {
                    match self.peek_kind() {
                        _ if self.at_end() => {
                            return Err(SignatureError::UnmatchedStructOpen { at })
                        }
                        Some(CodeKind::StructClose) => {
                            self.pos += 1;
                            if fields.is_empty() {
                                return Err(SignatureError::EmptyStruct { at });
                            }
                            return Ok(CompleteType::Struct(fields));
                        }
                        _ => fields.push(self.complete_type(depth + 1, false)?),
                    }
                }
            }
            Some(CodeKind::StructClose) => Err(SignatureError::UnmatchedStructClose { at }),
            Some(CodeKind::DictOpen) => {
                if !in_array {
                    return Err(SignatureError::DictEntryOutsideArray { at });
                }
                self.pos += 1;
                self.dict_entry(at, depth)
            }
            // A stray close marker: a dict entry delimiter with no
            // enclosing array-of-dict context.
            Some(CodeKind::DictClose) => Err(SignatureError::DictEntryOutsideArray { at }),
        }
    }

    /// Body of a dict entry, after the open marker has been consumed. `at` is
    /// the offset of the open marker.
    fn dict_entry(&mut self, at: usize, depth: usize) -> Result<CompleteType, SignatureError> {
        let key_at = self.pos;
        let key = match self.peek_kind() {
            _ if self.at_end() => return Err(SignatureError::UnterminatedContainer { at }),
            Some(CodeKind::DictClose) => return Err(SignatureError::DictEntryWrongArity { at }),
            _ => self.complete_type(depth + 1, false)?,
        };
        if !matches!(key, CompleteType::Basic(_)) {
            return Err(SignatureError::DictEntryKeyMustBeBasic { at: key_at });
        }
        let value = match self.peek_kind() {
            _ if self.at_end() => return Err(SignatureError::UnterminatedContainer { at }),
            Some(CodeKind::DictClose) => return Err(SignatureError::DictEntryWrongArity { at }),
            _ => self.complete_type(depth + 1, false)?,
        };
        match self.peek_kind() {
            _ if self.at_end() => Err(SignatureError::UnterminatedContainer { at }),
            Some(CodeKind::DictClose) => {
                self.pos += 1;
                Ok(CompleteType::DictEntry(Box::new(key), Box::new(value)))
            }
            _ => Err(SignatureError::DictEntryWrongArity { at }),
        }
    }
}
