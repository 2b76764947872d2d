//! deSEC TXT value quoting
//!
//! deSEC stores TXT record contents in presentation format: every value
//! travels wrapped in literal `"` characters, both in read responses and in
//! write payloads. This is a wire convention of this provider, not a property
//! of challenge tokens, so it is applied exactly once at the read/write
//! boundary and never inside the reconciler.

use dns01_core::ValueCodec;

const QUOTE: char = '"';

/// Quote-wrapping codec for deSEC TXT values
#[derive(Debug, Clone, Copy, Default)]
pub struct QuotedTxtCodec;

impl ValueCodec for QuotedTxtCodec {
    fn encode(&self, value: &str) -> String {
        format!("{QUOTE}{value}{QUOTE}")
    }

    /// Strip one pair of surrounding quotes; values without them pass through
    fn decode(&self, wire: &str) -> String {
        wire.strip_prefix(QUOTE)
            .and_then(|inner| inner.strip_suffix(QUOTE))
            .unwrap_or(wire)
            .to_string()
    }
}
