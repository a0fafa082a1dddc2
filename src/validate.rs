//! Orchestrates parsing and walking for one message and yields a [`Verdict`].

use crate::parser::{parse_signature, SignatureError};
use crate::walk::{BodyWalker, Endianness, WalkConfig, WalkError};

/// Message header fields carried through into diagnostics for downstream
/// reporting. Never interpreted here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageMeta {
    pub sender: Option<String>,
    pub path: Option<String>,
    pub interface: Option<String>,
    pub member: Option<String>,
}

/// Why a message was judged inconsistent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Failure {
    /// The declared signature is not valid grammar. No cursor information
    /// exists; the body was never examined.
    #[error("signature unparsable: {0}")]
    SignatureUnparsable(#[from] SignatureError),
    /// The signature parsed but the body bytes disagree with it.
    #[error("{0}")]
    Body(#[from] WalkError),
}

/// Everything downstream reporting needs about one inconsistent message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// The declared body signature, verbatim.
    pub signature: String,
    pub endianness: Endianness,
    pub meta: MessageMeta,
    pub failure: Failure,
}

/// Outcome of validating one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Every top-level type consumed cleanly and the cursor landed exactly on
    /// the buffer end.
    Consistent,
    Inconsistent(Diagnostic),
}

impl Verdict {
    pub fn is_consistent(&self) -> bool {
        matches!(self, Verdict::Consistent)
    }
}

/// Stateless validator: parse the declared signature, walk the body against
/// it. Validation is a pure function of its inputs; the same message always
/// yields the same verdict, and nothing is retried.
#[derive(Debug, Clone, Copy, Default)]
pub struct Validator {
    config: WalkConfig,
}

impl Validator {
    pub fn new() -> Self {
        Validator::default()
    }

    pub fn with_config(config: WalkConfig) -> Self {
        Validator { config }
    }

    pub fn config(&self) -> &WalkConfig {
        &self.config
    }

    pub fn validate(&self, signature: &str, body: &[u8], endianness: Endianness) -> Verdict {
        self.validate_message(signature, body, endianness, MessageMeta::default())
    }

    /// Validate one message, carrying its header metadata through into any
    /// diagnostic produced.
    pub fn validate_message(
        &self,
        signature: &str,
        body: &[u8],
        endianness: Endianness,
        meta: MessageMeta,
    ) -> Verdict {
        log::trace!(
            "validating {} body bytes against signature {:?}",
            body.len(),
            signature
        );
        let failure = match parse_signature(signature) {
            Err(e) => Failure::SignatureUnparsable(e),
            Ok(types) => {
                let mut walker = BodyWalker::with_config(body, endianness, self.config);
                match walker.walk_all(&types) {
                    Ok(()) => return Verdict::Consistent,
                    Err(e) => Failure::Body(e),
                }
            }
        };
        log::debug!("inconsistent body for signature {:?}: {}", signature, failure);
        Verdict::Inconsistent(Diagnostic {
            signature: signature.to_string(),
            endianness,
            meta,
            failure,
        })
    }
}

/// Validate with the default [`WalkConfig`] and no metadata.
pub fn validate(signature: &str, body: &[u8], endianness: Endianness) -> Verdict {
    Validator::new().validate(signature, body, endianness)
}
