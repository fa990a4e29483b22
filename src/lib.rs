//! # Visual Editor Source Annotator
//!
//! Build-time instrumentation that lets a visual editor map rendered DOM nodes back to
//! the component source that produced them.
//!
//! ## Pipeline
//!
//! 1. **Eligibility**: [`filter::check_module`] rejects modules by id alone, before parsing.
//! 2. **Parse**: oxc parses the module as TypeScript + JSX.
//! 3. **Annotate**: [`annotate::ElementAnnotator`] appends `data-visual-id`,
//!    `data-source-file` and (optionally) `data-source-line` to each eligible opening element.
//! 4. **Emit**: oxc codegen regenerates the module together with a source map.
//!
//! ## Invariants
//!
//! 1. **Stable ids**: a visual id depends only on `(relative path, line, column)`.
//! 2. **Idempotence**: an element carrying `data-visual-id` is never annotated again.
//! 3. **Exclusion first**: excluded and `use`/`_`-prefixed names are skipped before any
//!    other check.
//! 4. **Fail-open**: parse errors and internal failures resolve to
//!    [`TransformOutcome::NoChange`]; the host build is never aborted.

pub mod annotate;
pub mod config;
pub mod error;
pub mod filter;
pub mod location;
pub mod logging;
pub mod transform;
pub mod visual_id;


pub use annotate::{ElementAnnotator, ElementName, VisualAnnotation};
pub use config::{should_activate, BuildMode, PluginConfig, PluginOptions};
pub use error::{ConfigError, TransformError};
pub use filter::{check_module, Eligibility, SkipReason};
pub use transform::{
    annotate_module, ModuleDescriptor, RewrittenModule, TransformOutcome, VisualTransformer,
};
pub use visual_id::{generate_visual_id, ElementLocation};
