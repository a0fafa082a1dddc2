//! # sigwalk — bus body-signature consistency checker
//!
//! Inspects messages observed on an inter-process message bus and decides
//! whether each message's declared body type-signature agrees with the bytes
//! of its body, i.e. whether the body could be unmarshalled at all according
//! to the bus's binary wire format.
//!
//! ## Pipeline
//!
//! - [`parser`]: signature text → ordered [`CompleteType`] trees
//! - [`walk`]: type trees + body bytes → first inconsistency, if any
//! - [`validate`]: the one-call front door, yielding a [`Verdict`]
//! - [`report`]: renders inconsistent verdicts for humans
//!
//! The bus connection that supplies messages and the policy for acting on
//! reports are the caller's business: validation itself is a pure function of
//! (signature, body, byte order), holds no cross-message state, and is safe
//! to run concurrently across messages.
//!
//! ## Example
//!
//! ```
//! use sigwalk::{validate, Endianness, Verdict};
//!
//! // "s": 4-byte length prefix, the bytes, one nul terminator.
//! let body = [5, 0, 0, 0, b'h', b'e', b'l', b'l', b'o', 0];
//! assert!(matches!(validate("s", &body, Endianness::Little), Verdict::Consistent));
//!
//! // Same signature, one byte short of what it promises.
//! let verdict = validate("s", &body[..9], Endianness::Little);
//! assert!(!verdict.is_consistent());
//! ```
//!
//! Strictness (zero-filled padding, 0/1 booleans) and resource ceilings
//! (array byte length, container nesting) are configured per
//! [`WalkConfig`]; the defaults are strict.

pub mod ast;
pub mod parser;
pub mod report;
pub mod validate;
pub mod walk;

pub use ast::{code_kind, BasicType, CodeKind, CompleteType};
pub use parser::{parse_signature, parse_signature_bytes, SignatureError, MAX_SIGNATURE_DEPTH};
pub use report::render_report;
pub use validate::{validate, Diagnostic, Failure, MessageMeta, Validator, Verdict};
pub use walk::{
    BodyWalker, Endianness, PathSegment, TypePath, WalkConfig, WalkError, WalkErrorKind,
    MAX_ARRAY_LEN, MAX_WALK_DEPTH,
};
