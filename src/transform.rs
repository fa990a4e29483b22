//! Transform orchestration.
//!
//! Per module: eligibility → parse → annotate → codegen. Every failure is fail-open:
//! the host keeps the original code and the build continues.

use crate::annotate::ElementAnnotator;
use crate::config::{PluginConfig, PluginOptions};
use crate::error::TransformError;
use crate::filter::{check_module, relative_source_path, Eligibility};
use crate::logging::init_tracing;
#[cfg(feature = "napi")]
use napi_derive::napi;
use oxc_allocator::Allocator;
use oxc_ast_visit::VisitMut;
use oxc_codegen::{Codegen, CodegenOptions};
use oxc_parser::Parser;
use oxc_span::SourceType;
use rayon::prelude::*;
use serde::Serialize;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use tracing::{debug, info, trace, warn};

// ═══════════════════════════════════════════════════════════════════════════════
// INPUT/OUTPUT TYPES
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy)]
pub struct ModuleDescriptor<'m> {
    pub id: &'m str,
    pub code: &'m str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RewrittenModule {
    pub code: String,
    /// Source map as JSON text.
    pub map: String,
    pub annotated: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransformOutcome {
    /// Host keeps the original module untouched.
    NoChange,
    Rewritten(RewrittenModule),
}

impl TransformOutcome {
    pub fn is_no_change(&self) -> bool {
        matches!(self, TransformOutcome::NoChange)
    }

    pub fn rewritten(&self) -> Option<&RewrittenModule> {
        match self {
            TransformOutcome::Rewritten(module) => Some(module),
            TransformOutcome::NoChange => None,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// CORE PIPELINE
// ═══════════════════════════════════════════════════════════════════════════════

fn module_source_type() -> SourceType {
    SourceType::default()
        .with_typescript(true)
        .with_jsx(true)
        .with_module(true)
}

/// Parse, annotate and regenerate one module. Does not apply the eligibility filter.
pub fn annotate_module(
    config: &PluginConfig,
    code: &str,
    id: &str,
) -> Result<TransformOutcome, TransformError> {
    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, code, module_source_type()).parse();

    if ret.panicked || !ret.errors.is_empty() {
        let message = ret
            .errors
            .first()
            .map(|e| e.to_string())
            .unwrap_or_else(|| "parser aborted".to_string());
        return Err(TransformError::Parse {
            id: id.to_string(),
            message,
            details: ret.errors.iter().map(|e| format!("{:?}", e)).collect(),
        });
    }

    let mut program = ret.program;
    let relative_path = relative_source_path(id);
    let mut annotator = ElementAnnotator::new(&allocator, config, relative_path, code);
    annotator.visit_program(&mut program);

    if !annotator.is_modified() {
        return Ok(TransformOutcome::NoChange);
    }
    let annotated = annotator.annotated;

    let options = CodegenOptions {
        source_map_path: Some(PathBuf::from(id)),
        ..CodegenOptions::default()
    };
    let generated = Codegen::new().with_options(options).build(&program);
    let map = generated
        .map
        .ok_or_else(|| TransformError::Unexpected {
            id: id.to_string(),
            message: "codegen produced no source map".to_string(),
        })?
        .to_json_string();

    Ok(TransformOutcome::Rewritten(RewrittenModule {
        code: generated.code,
        map,
        annotated,
    }))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic with non-string payload".to_string()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TRANSFORMER
// ═══════════════════════════════════════════════════════════════════════════════

/// One per plugin lifetime. Holds only the immutable config, so it can be shared
/// across threads.
#[derive(Debug, Clone, Default)]
pub struct VisualTransformer {
    config: PluginConfig,
}

impl VisualTransformer {
    pub fn new(config: PluginConfig) -> Self {
        Self { config }
    }

    pub fn from_options(options: PluginOptions) -> Self {
        Self::new(PluginConfig::resolve(options))
    }

    /// Entry point for host bindings: resolves the options and makes sure a log
    /// subscriber exists, so fail-open diagnostics are never dropped.
    pub fn for_host(options: PluginOptions) -> Self {
        let transformer = Self::from_options(options);
        init_tracing(transformer.config.verbose);
        transformer
    }

    pub fn config(&self) -> &PluginConfig {
        &self.config
    }

    /// Never fails: errors are logged and resolve to `NoChange`.
    pub fn transform(&self, code: &str, id: &str) -> TransformOutcome {
        if !self.config.enabled {
            return TransformOutcome::NoChange;
        }
        if let Eligibility::Skip(reason) = check_module(id) {
            trace!(id, ?reason, "skipping module");
            return TransformOutcome::NoChange;
        }
        if self.config.verbose {
            debug!(id, "processing module");
        }

        match self.try_transform(code, id) {
            Ok(outcome) => {
                if let TransformOutcome::Rewritten(module) = &outcome {
                    if self.config.verbose {
                        info!(
                            file = relative_source_path(id),
                            annotated = module.annotated,
                            "annotated {} element(s)",
                            module.annotated
                        );
                    }
                }
                outcome
            }
            Err(err) => {
                self.report(&err);
                TransformOutcome::NoChange
            }
        }
    }

    /// `annotate_module` with panics from traversal or codegen turned into errors.
    pub fn try_transform(&self, code: &str, id: &str) -> Result<TransformOutcome, TransformError> {
        panic::catch_unwind(AssertUnwindSafe(|| annotate_module(&self.config, code, id)))
            .unwrap_or_else(|payload| {
                Err(TransformError::Unexpected {
                    id: id.to_string(),
                    message: panic_message(payload.as_ref()),
                })
            })
    }

    /// Transform independent modules in parallel. Output order matches input order.
    pub fn transform_batch(&self, modules: &[ModuleDescriptor<'_>]) -> Vec<TransformOutcome> {
        modules
            .par_iter()
            .map(|module| self.transform(module.code, module.id))
            .collect()
    }

    fn report(&self, err: &TransformError) {
        warn!(id = err.id(), "{}", err);
        if self.config.verbose {
            for detail in err.details() {
                debug!(id = err.id(), "{}", detail);
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// NAPI EXPORTS
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(feature = "napi")]
#[napi(object)]
pub struct TransformOutput {
    pub code: String,
    pub map: String,
}

#[cfg(feature = "napi")]
#[napi(js_name = "VisualTransformer")]
pub struct NativeVisualTransformer {
    inner: VisualTransformer,
}

#[cfg(feature = "napi")]
#[napi]
impl NativeVisualTransformer {
    #[napi(constructor)]
    pub fn new(options: Option<PluginOptions>) -> Self {
        Self {
            inner: VisualTransformer::for_host(options.unwrap_or_default()),
        }
    }

    /// `null` tells the host to keep the original code.
    #[napi]
    pub fn transform(&self, code: String, id: String) -> Option<TransformOutput> {
        match self.inner.transform(&code, &id) {
            TransformOutcome::Rewritten(module) => Some(TransformOutput {
                code: module.code,
                map: module.map,
            }),
            TransformOutcome::NoChange => None,
        }
    }
}
