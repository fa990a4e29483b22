//! Module eligibility pre-check.
//!
//! Runs on the module id alone, before any parsing, so ineligible files cost nothing.

#[cfg(feature = "napi")]
use napi_derive::napi;

pub const SOURCE_SEGMENT: &str = "/src/";
const MARKUP_EXTENSIONS: [&str; 2] = [".tsx", ".jsx"];
const DEPENDENCY_SEGMENT: &str = "node_modules";
const TEST_MARKERS: [&str; 3] = [".test.", ".spec.", ".d.ts"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No `/src/` segment in the id.
    OutsideSourceRoot,
    /// Not a `.tsx` / `.jsx` file.
    UnsupportedExtension,
    /// Vendored dependency.
    Dependency,
    /// Test, spec or type declaration file.
    TestOrDeclaration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eligibility {
    Eligible,
    Skip(SkipReason),
}

impl Eligibility {
    pub fn is_eligible(self) -> bool {
        self == Eligibility::Eligible
    }
}

/// Checks are ordered; the first failing rule decides the reason.
pub fn check_module(id: &str) -> Eligibility {
    if !id.contains(SOURCE_SEGMENT) {
        return Eligibility::Skip(SkipReason::OutsideSourceRoot);
    }
    if !MARKUP_EXTENSIONS.iter().any(|ext| id.ends_with(ext)) {
        return Eligibility::Skip(SkipReason::UnsupportedExtension);
    }
    if id.contains(DEPENDENCY_SEGMENT) {
        return Eligibility::Skip(SkipReason::Dependency);
    }
    if TEST_MARKERS.iter().any(|marker| id.contains(marker)) {
        return Eligibility::Skip(SkipReason::TestOrDeclaration);
    }
    Eligibility::Eligible
}

/// Path of the module relative to the project's `src/` root, without a leading slash.
/// Nested `src/` directories below the root stay part of the path.
pub fn relative_source_path(id: &str) -> &str {
    match id.split_once(SOURCE_SEGMENT) {
        Some((_, rest)) => rest,
        None => id.trim_start_matches('/'),
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// NAPI EXPORTS
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(feature = "napi")]
#[napi(js_name = "isEligibleModule")]
pub fn is_eligible_module_native(id: String) -> bool {
    check_module(&id).is_eligible()
}
