//! Alignment-aware walk of a message body against its parsed signature.
//!
//! This module provides **structure-only** traversal of a body buffer: it
//! advances a byte cursor by following the type tree, applying per-type
//! alignment, length-prefix, and padding rules, and stops at the first point
//! where the declared signature and the actual bytes disagree. No decoded
//! values are ever allocated.
//!
//! ## Design
//!
//! - **No decode:** the walker reads only what steering requires (length
//!   prefixes, variant headers, padding bytes in strict mode, boolean values
//!   in strict mode).
//! - **Zero-copy:** the walker holds a slice and a `pos`; nothing is copied.
//! - **First failure wins:** every inconsistency is reported as a
//!   [`WalkError`] with a specific [`WalkErrorKind`], the byte offset where it
//!   was detected, and the [`TypePath`] to the offending type. There is no
//!   generic fallback kind.
//!
//! Variants make nesting a *runtime* property: a fixed signature `"v"` can
//! carry arbitrarily deep variant-in-variant bodies, so the walker threads a
//! depth counter through recursion and rejects beyond
//! [`WalkConfig::max_depth`] instead of exhausting the stack.
//!
//! A walk is a single-threaded, non-suspending pass bounded by buffer length
//! and the depth limit. The walker holds no cross-message state; validating
//! many messages concurrently needs no locking.

use crate::ast::{BasicType, CompleteType};
use crate::parser::{parse_signature_bytes, SignatureError};
use byteorder::{BigEndian, ByteOrder, LittleEndian};
use std::fmt;

/// Byte order declared in the message header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endianness {
    Big,
    Little,
}

impl Endianness {
    /// Byte-order tag as carried in the message header: `l` or `B`.
    pub fn from_tag(tag: u8) -> Option<Endianness> {
        match tag {
            b'l' => Some(Endianness::Little),
            b'B' => Some(Endianness::Big),
            _ => None,
        }
    }
}

/// Protocol maximum for one array's declared byte length (64 MiB).
pub const MAX_ARRAY_LEN: u32 = 64 * 1024 * 1024;

/// Default ceiling on container nesting while walking a body.
pub const MAX_WALK_DEPTH: usize = 64;

/// Tunables for a walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkConfig {
    /// Require padding bytes to be zero-filled.
    pub strict_padding: bool,
    /// Require booleans to be encoded as exactly 0 or 1.
    pub strict_booleans: bool,
    /// Ceiling on one array's declared byte length.
    pub max_array_len: u32,
    /// Ceiling on container nesting.
    pub max_depth: usize,
}

impl Default for WalkConfig {
    fn default() -> Self {
        WalkConfig {
            strict_padding: true,
            strict_booleans: true,
            max_array_len: MAX_ARRAY_LEN,
            max_depth: MAX_WALK_DEPTH,
        }
    }
}

impl WalkConfig {
    /// Structural checks only: padding bytes and boolean values pass
    /// unchecked.
    pub fn lenient() -> Self {
        WalkConfig {
            strict_padding: false,
            strict_booleans: false,
            ..WalkConfig::default()
        }
    }
}

/// One step from the body root to the type being walked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathSegment {
    /// Top-level type index within the signature.
    Item(usize),
    /// Struct field index.
    Field(usize),
    /// Array element index.
    Element(usize),
    /// Dict entry key.
    Key,
    /// Dict entry value.
    Value,
    /// Value of a variant, typed by its inline signature.
    VariantValue,
}

/// Path from the body root to the offending type.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TypePath(pub Vec<PathSegment>);

impl fmt::Display for TypePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("body");
        }
        for (i, seg) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" -> ")?;
            }
            match seg {
                PathSegment::Item(n) => write!(f, "item {}", n)?,
                PathSegment::Field(n) => write!(f, "struct field {}", n)?,
                PathSegment::Element(n) => write!(f, "array element {}", n)?,
                PathSegment::Key => f.write_str("dict entry key")?,
                PathSegment::Value => f.write_str("dict entry value")?,
                PathSegment::VariantValue => f.write_str("variant value")?,
            }
        }
        Ok(())
    }
}

/// What, specifically, disagreed between the signature and the bytes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WalkErrorKind {
    #[error("buffer ends inside padding")]
    BufferExhaustedDuringPadding,
    #[error("non-zero padding byte")]
    NonZeroPadding,
    #[error("buffer too short for fixed-size value")]
    BufferExhaustedReadingValue,
    #[error("boolean encoded as a value other than 0 or 1")]
    InvalidBooleanEncoding,
    #[error("buffer too short for length prefix")]
    BufferExhaustedReadingLength,
    #[error("buffer too short for length-prefixed data")]
    BufferExhaustedReadingData,
    #[error("missing nul terminator")]
    MissingNulTerminator,
    #[error("embedded signature is invalid: {0}")]
    EmbeddedSignatureInvalid(SignatureError),
    #[error("array length exceeds the remaining buffer")]
    ArrayLengthExceedsRemainder,
    #[error("array length exceeds the protocol maximum")]
    ArrayLengthExceedsMaximum,
    #[error("array elements do not divide the declared byte count")]
    ArrayBodyLengthMismatch,
    #[error("variant signature does not describe a single complete type")]
    VariantSignatureNotSingleType,
    #[error("unconsumed bytes after the last type")]
    TrailingBytesUnconsumed,
    #[error("container nesting exceeds the configured limit")]
    NestingTooDeep,
}

/// First inconsistency found while walking: what, where, and in which type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at offset {offset} ({path})")]
pub struct WalkError {
    pub kind: WalkErrorKind,
    /// Byte offset into the body where the inconsistency was detected.
    pub offset: usize,
    pub path: TypePath,
}

/// Read-only walker: advances a cursor over the body by following the type
/// tree. Use [`BodyWalker::walk_all`] to consume a whole body, or
/// [`BodyWalker::walk_type`] plus [`BodyWalker::position`] for custom loops.
pub struct BodyWalker<'a> {
    data: &'a [u8],
    pos: usize,
    endianness: Endianness,
    config: WalkConfig,
    depth: usize,
    path: Vec<PathSegment>,
}

impl<'a> BodyWalker<'a> {
    pub fn new(data: &'a [u8], endianness: Endianness) -> Self {
        Self::with_config(data, endianness, WalkConfig::default())
    }

    pub fn with_config(data: &'a [u8], endianness: Endianness, config: WalkConfig) -> Self {
        Self::at(data, 0, endianness, config)
    }

    /// Start the cursor at a nonzero position. Alignment is computed on
    /// absolute buffer offsets, so position zero of `data` must be 8-byte
    /// aligned relative to the start of the full message.
    pub fn at(data: &'a [u8], start: usize, endianness: Endianness, config: WalkConfig) -> Self {
        BodyWalker {
            data,
            pos: start,
            endianness,
            config,
            depth: 0,
            path: Vec::new(),
        }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> &[u8] {
        &self.data[self.pos..]
    }

    /// Walk every top-level type in order, then require the cursor to land
    /// exactly on the buffer end. Leftover bytes are the chief
    /// signature-vs-body mismatch this crate exists to catch.
    pub fn walk_all(&mut self, types: &[CompleteType]) -> Result<(), WalkError> {
        for (i, t) in types.iter().enumerate() {
            self.path.push(PathSegment::Item(i));
            self.walk_type(t)?;
            self.path.pop();
        }
        if self.pos != self.data.len() {
            return Err(self.error(WalkErrorKind::TrailingBytesUnconsumed));
        }
        Ok(())
    }

    /// Walk one Single Complete Type, including its leading alignment.
    pub fn walk_type(&mut self, t: &CompleteType) -> Result<(), WalkError> {
        self.align_to(t.alignment())?;
        match t {
            CompleteType::Basic(bt) => self.walk_basic(*bt),
            CompleteType::Variant => self.walk_variant(),
            CompleteType::Array(elem) => self.walk_array(elem),
            CompleteType::Struct(fields) => {
                self.push_depth()?;
                for (i, f) in fields.iter().enumerate() {
                    self.path.push(PathSegment::Field(i));
                    self.walk_type(f)?;
                    self.path.pop();
                }
                self.depth -= 1;
                Ok(())
            }
            CompleteType::DictEntry(key, value) => {
                self.push_depth()?;
                self.path.push(PathSegment::Key);
                self.walk_type(key)?;
                self.path.pop();
                self.path.push(PathSegment::Value);
                self.walk_type(value)?;
                self.path.pop();
                self.depth -= 1;
                Ok(())
            }
        }
    }

    fn error(&self, kind: WalkErrorKind) -> WalkError {
        self.error_at(kind, self.pos)
    }

    fn error_at(&self, kind: WalkErrorKind, offset: usize) -> WalkError {
        WalkError {
            kind,
            offset,
            path: TypePath(self.path.clone()),
        }
    }

    fn push_depth(&mut self) -> Result<(), WalkError> {
        if self.depth >= self.config.max_depth {
            return Err(self.error(WalkErrorKind::NestingTooDeep));
        }
        self.depth += 1;
        Ok(())
    }

    /// Advance past padding until the cursor is a multiple of `alignment`.
    /// The wire format requires padding to be zero-filled; in strict mode a
    /// non-zero padding byte is an inconsistency in its own right.
    fn align_to(&mut self, alignment: usize) -> Result<(), WalkError> {
        debug_assert!(alignment.is_power_of_two());
        let target = (self.pos + alignment - 1) & !(alignment - 1);
        if target > self.data.len() {
            return Err(self.error(WalkErrorKind::BufferExhaustedDuringPadding));
        }
        if self.config.strict_padding {
            for i in self.pos..target {
                if self.data[i] != 0 {
                    return Err(self.error_at(WalkErrorKind::NonZeroPadding, i));
                }
            }
        }
        self.pos = target;
        Ok(())
    }

    fn get_u32(&self, pos: usize) -> u32 {
        match self.endianness {
            Endianness::Big => BigEndian::read_u32(&self.data[pos..]),
            Endianness::Little => LittleEndian::read_u32(&self.data[pos..]),
        }
    }

    fn read_u32(&mut self, kind_on_exhaust: WalkErrorKind) -> Result<u32, WalkError> {
        if self.pos + 4 > self.data.len() {
            return Err(self.error(kind_on_exhaust));
        }
        let v = self.get_u32(self.pos);
        self.pos += 4;
        Ok(v)
    }

    fn walk_basic(&mut self, bt: BasicType) -> Result<(), WalkError> {
        match bt.fixed_size() {
            Some(size) => {
                if self.pos + size > self.data.len() {
                    return Err(self.error(WalkErrorKind::BufferExhaustedReadingValue));
                }
                if bt == BasicType::Boolean && self.config.strict_booleans {
                    let raw = self.get_u32(self.pos);
                    if raw > 1 {
                        return Err(self.error(WalkErrorKind::InvalidBooleanEncoding));
                    }
                }
                self.pos += size;
                Ok(())
            }
            None => {
                let (start, end) = self.walk_string_like(bt)?;
                if bt == BasicType::Signature {
                    if let Err(e) = parse_signature_bytes(&self.data[start..end]) {
                        return Err(
                            self.error_at(WalkErrorKind::EmbeddedSignatureInvalid(e), start)
                        );
                    }
                }
                Ok(())
            }
        }
    }

    /// Length-prefixed value: a 4-byte prefix for string/object-path, a
    /// 1-byte prefix for signature, then exactly `length` data bytes and one
    /// nul terminator. Returns the data range.
    fn walk_string_like(&mut self, bt: BasicType) -> Result<(usize, usize), WalkError> {
        let len = if bt == BasicType::Signature {
            if self.pos >= self.data.len() {
                return Err(self.error(WalkErrorKind::BufferExhaustedReadingLength));
            }
            let l = self.data[self.pos] as usize;
            self.pos += 1;
            l
        } else {
            self.read_u32(WalkErrorKind::BufferExhaustedReadingLength)? as usize
        };
        let start = self.pos;
        if start + len + 1 > self.data.len() {
            return Err(self.error_at(WalkErrorKind::BufferExhaustedReadingData, start));
        }
        if self.data[start + len] != 0 {
            return Err(self.error_at(WalkErrorKind::MissingNulTerminator, start + len));
        }
        self.pos = start + len + 1;
        Ok((start, start + len))
    }

    /// The variant's concrete type is discovered in the body itself: an
    /// inline signature header, which must describe exactly one complete
    /// type, followed by that type's value.
    fn walk_variant(&mut self) -> Result<(), WalkError> {
        let (start, end) = self.walk_string_like(BasicType::Signature)?;
        let parsed = match parse_signature_bytes(&self.data[start..end]) {
            Ok(types) => types,
            Err(e) => {
                return Err(self.error_at(WalkErrorKind::EmbeddedSignatureInvalid(e), start))
            }
        };
        if parsed.len() != 1 {
            return Err(self.error_at(WalkErrorKind::VariantSignatureNotSingleType, start));
        }
        self.push_depth()?;
        self.path.push(PathSegment::VariantValue);
        self.walk_type(&parsed[0])?;
        self.path.pop();
        self.depth -= 1;
        Ok(())
    }

    /// The array length prefix is a byte count, not an element count; the
    /// element stream must divide it exactly. Element alignment applies once
    /// after the prefix even when the array is empty.
    fn walk_array(&mut self, elem: &CompleteType) -> Result<(), WalkError> {
        let prefix_at = self.pos;
        let len = self.read_u32(WalkErrorKind::BufferExhaustedReadingLength)? as usize;
        if len > self.config.max_array_len as usize {
            return Err(self.error_at(WalkErrorKind::ArrayLengthExceedsMaximum, prefix_at));
        }
        if len > self.data.len() - self.pos {
            return Err(self.error_at(WalkErrorKind::ArrayLengthExceedsRemainder, prefix_at));
        }
        self.push_depth()?;
        self.align_to(elem.alignment())?;
        let start = self.pos;
        let mut index = 0;
        while self.pos - start < len {
            self.path.push(PathSegment::Element(index));
            self.walk_type(elem)?;
            if self.pos - start > len {
                return Err(
                    self.error_at(WalkErrorKind::ArrayBodyLengthMismatch, start + len)
                );
            }
            self.path.pop();
            index += 1;
        }
        self.depth -= 1;
        Ok(())
    }
}
