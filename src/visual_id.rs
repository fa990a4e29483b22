//! Position-keyed element identifiers.
//!
//! The editor persists ids across sessions, so an id must depend only on where the
//! element sits: `ve-` + the first 8 hex chars of SHA-256(`path:line:column`).

#[cfg(feature = "napi")]
use napi_derive::napi;
use sha2::{Digest, Sha256};

pub const VISUAL_ID_PREFIX: &str = "ve-";
const HASH_LEN: usize = 8;

/// Source position of an opening element, relative to the module's `src/` root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementLocation<'p> {
    pub relative_path: &'p str,
    pub line: u32,
    pub column: u32,
}

impl<'p> ElementLocation<'p> {
    pub fn new(relative_path: &'p str, line: u32, column: u32) -> Self {
        Self {
            relative_path,
            line,
            column,
        }
    }

    pub fn key(&self) -> String {
        format!("{}:{}:{}", self.relative_path, self.line, self.column)
    }

    pub fn visual_id(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.key().as_bytes());
        let digest = format!("{:x}", hasher.finalize());
        format!("{}{}", VISUAL_ID_PREFIX, &digest[..HASH_LEN])
    }
}

pub fn generate_visual_id(relative_path: &str, line: u32, column: u32) -> String {
    ElementLocation::new(relative_path, line, column).visual_id()
}

// ═══════════════════════════════════════════════════════════════════════════════
// NAPI EXPORTS
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(feature = "napi")]
#[napi(js_name = "generateVisualId")]
pub fn generate_visual_id_native(relative_path: String, line: u32, column: u32) -> String {
    generate_visual_id(&relative_path, line, column)
}
