//! Render inconsistent verdicts as human-readable report blocks.
//!
//! The core never calls this; it is the downstream face used by callers that
//! want the classic banner block per flagged message.

use crate::validate::{Diagnostic, Failure};

const RULE_WIDTH: usize = 60;

/// Render one diagnostic as a banner block.
pub fn render_report(diag: &Diagnostic) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let mut out = String::new();
    out.push_str(&rule);
    out.push('\n');
    out.push_str("      Bus message with inconsistent body signature:\n");
    out.push_str(&rule);
    out.push('\n');
    out.push_str(&format!(" Signature: \"{}\",\n", diag.signature));
    if diag.meta.sender.is_some() || diag.meta.path.is_some() {
        out.push_str(&format!(
            " Sender: \"{}\", Path: \"{}\"\n",
            diag.meta.sender.as_deref().unwrap_or("unknown"),
            diag.meta.path.as_deref().unwrap_or("unknown"),
        ));
    }
    if let (Some(interface), Some(member)) = (&diag.meta.interface, &diag.meta.member) {
        out.push_str(&format!(" Interface: \"{}\", Member: \"{}\"\n", interface, member));
    }
    match &diag.failure {
        Failure::SignatureUnparsable(e) => {
            out.push_str(&format!("  Failure: {}\n", e));
        }
        Failure::Body(e) => {
            out.push_str(&format!("  Failure: {}\n", e.kind));
            out.push_str(&format!("  Offset: {}\n", e.offset));
            out.push_str(&format!("  Type path: {}\n", e.path));
        }
    }
    out
}
