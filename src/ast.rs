//! Type code table and Single Complete Type tree for the bus wire format.

/// A basic (non-container) wire type, identified by a one-character type code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BasicType {
    Byte,
    Boolean,
    Int16,
    Uint16,
    Int32,
    Uint32,
    Int64,
    Uint64,
    Double,
    UnixFd,
    String,
    ObjectPath,
    Signature,
}

impl BasicType {
    /// The one-character type code.
    pub fn code(self) -> char {
        match self {
            BasicType::Byte => 'y',
            BasicType::Boolean => 'b',
            BasicType::Int16 => 'n',
            BasicType::Uint16 => 'q',
            BasicType::Int32 => 'i',
            BasicType::Uint32 => 'u',
            BasicType::Int64 => 'x',
            BasicType::Uint64 => 't',
            BasicType::Double => 'd',
            BasicType::UnixFd => 'h',
            BasicType::String => 's',
            BasicType::ObjectPath => 'o',
            BasicType::Signature => 'g',
        }
    }

    /// Byte-offset multiple the encoding must start on. For the string-like
    /// types this is the alignment of the length prefix.
    pub fn alignment(self) -> usize {
        match self {
            BasicType::Byte | BasicType::Signature => 1,
            BasicType::Int16 | BasicType::Uint16 => 2,
            BasicType::Boolean
            | BasicType::Int32
            | BasicType::Uint32
            | BasicType::UnixFd
            | BasicType::String
            | BasicType::ObjectPath => 4,
            BasicType::Int64 | BasicType::Uint64 | BasicType::Double => 8,
        }
    }

    /// Encoded size in bytes for fixed-size types; `None` for the
    /// length-prefixed string/object-path/signature types.
    pub fn fixed_size(self) -> Option<usize> {
        match self {
            BasicType::Byte => Some(1),
            BasicType::Int16 | BasicType::Uint16 => Some(2),
            BasicType::Boolean | BasicType::Int32 | BasicType::Uint32 | BasicType::UnixFd => {
                Some(4)
            }
            BasicType::Int64 | BasicType::Uint64 | BasicType::Double => Some(8),
            BasicType::String | BasicType::ObjectPath | BasicType::Signature => None,
        }
    }
}

/// Classification of one type code character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeKind {
    Basic(BasicType),
    Array,
    Variant,
    StructOpen,
    StructClose,
    DictOpen,
    DictClose,
}

/// The static type code table. `None` means the byte is not a recognized
/// type code.
pub fn code_kind(code: u8) -> Option<CodeKind> {
    match code {
        b'y' => Some(CodeKind::Basic(BasicType::Byte)),
        b'b' => Some(CodeKind::Basic(BasicType::Boolean)),
        b'n' => Some(CodeKind::Basic(BasicType::Int16)),
        b'q' => Some(CodeKind::Basic(BasicType::Uint16)),
        b'i' => Some(CodeKind::Basic(BasicType::Int32)),
        b'u' => Some(CodeKind::Basic(BasicType::Uint32)),
        b'x' => Some(CodeKind::Basic(BasicType::Int64)),
        b't' => Some(CodeKind::Basic(BasicType::Uint64)),
        b'd' => Some(CodeKind::Basic(BasicType::Double)),
        b'h' => Some(CodeKind::Basic(BasicType::UnixFd)),
        b's' => Some(CodeKind::Basic(BasicType::String)),
        b'o' => Some(CodeKind::Basic(BasicType::ObjectPath)),
        b'g' => Some(CodeKind::Basic(BasicType::Signature)),
        b'a' => Some(CodeKind::Array),
        b'v' => Some(CodeKind::Variant),
        b'(' => Some(CodeKind::StructOpen),
        b')' => Some(CodeKind::StructClose),
        b'{' => Some(CodeKind::DictOpen),
        b'}' => Some(CodeKind::DictClose),
        _ => None,
    }
}

/// One Single Complete Type: a basic leaf or one full container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompleteType {
    Basic(BasicType),
    /// The concrete type is carried inline in the body, not in the outer
    /// signature; it is resolved while walking.
    Variant,
    Array(Box<CompleteType>),
    /// One or more field types, ordered.
    Struct(Vec<CompleteType>),
    /// Key then value. Only valid as the sole element type of an array;
    /// the key is always a basic type.
    DictEntry(Box<CompleteType>, Box<CompleteType>),
}

impl CompleteType {
    /// Required alignment of this type's encoding. For arrays this is the
    /// alignment of the length prefix; elements have their own alignment.
    pub fn alignment(&self) -> usize {
        match self {
            CompleteType::Basic(bt) => bt.alignment(),
            CompleteType::Variant => 1,
            CompleteType::Array(_) => 4,
            CompleteType::Struct(_) | CompleteType::DictEntry(..) => 8,
        }
    }

    /// Textual form of this type. Concatenating the textual form of every
    /// top-level type reproduces the parsed signature exactly.
    pub fn signature(&self) -> String {
        let mut out = String::new();
        self.write_signature(&mut out);
        out
    }

    fn write_signature(&self, out: &mut String) {
        match self {
            CompleteType::Basic(bt) => out.push(bt.code()),
            CompleteType::Variant => out.push('v'),
            CompleteType::Array(elem) => {
                out.push('a');
                elem.write_signature(out);
            }
            CompleteType::Struct(fields) => {
                out.push('(');
                for f in fields {
                    f.write_signature(out);
                }
                out.push(')');
            }
            CompleteType::DictEntry(key, value) => {
                out.push('{');
                key.write_signature(out);
                value.write_signature(out);
                out.push('}');
            }
        }
    }
}
