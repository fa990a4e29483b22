//! JSX element annotation pass.
//!
//! `ElementAnnotator` walks a parsed module and appends the visual editor attributes
//! to every eligible `JSXOpeningElement`. The pass is strictly additive: existing
//! attributes are never removed or rewritten, and an element that already carries
//! `data-visual-id` is left untouched.

use crate::config::PluginConfig;
use crate::location::LineIndex;
use crate::visual_id::ElementLocation;
use oxc_allocator::Allocator;
use oxc_ast::ast::*;
use oxc_ast::AstBuilder;
use oxc_ast_visit::walk_mut::walk_jsx_opening_element;
use oxc_ast_visit::VisitMut;
use oxc_span::SPAN;
use std::fmt;

pub const VISUAL_ID_ATTR: &str = "data-visual-id";
pub const SOURCE_FILE_ATTR: &str = "data-source-file";
pub const SOURCE_LINE_ATTR: &str = "data-source-line";

// ═══════════════════════════════════════════════════════════════════════════════
// ELEMENT NAMES
// ═══════════════════════════════════════════════════════════════════════════════

/// Tag name forms that take part in exclusion matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementName<'n> {
    /// `<div>`, `<Button>`
    Identifier(&'n str),
    /// `<React.Fragment>`
    Member { object: &'n str, property: &'n str },
}

impl<'n> ElementName<'n> {
    /// Namespaced names, `this`, and member chains deeper than one level resolve to `None`.
    pub fn resolve(name: &'n JSXElementName<'_>) -> Option<Self> {
        match name {
            JSXElementName::Identifier(id) => Some(ElementName::Identifier(id.name.as_str())),
            JSXElementName::IdentifierReference(id) => {
                Some(ElementName::Identifier(id.name.as_str()))
            }
            JSXElementName::MemberExpression(member) => match &member.object {
                JSXMemberExpressionObject::IdentifierReference(object) => {
                    Some(ElementName::Member {
                        object: object.name.as_str(),
                        property: member.property.name.as_str(),
                    })
                }
                _ => None,
            },
            JSXElementName::NamespacedName(_) | JSXElementName::ThisExpression(_) => None,
        }
    }
}

impl fmt::Display for ElementName<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementName::Identifier(name) => f.write_str(name),
            ElementName::Member { object, property } => write!(f, "{}.{}", object, property),
        }
    }
}

/// Name used for exclusion checks; empty when the tag form is not resolvable.
pub fn display_name(name: &JSXElementName<'_>) -> String {
    ElementName::resolve(name)
        .map(|n| n.to_string())
        .unwrap_or_default()
}

// ═══════════════════════════════════════════════════════════════════════════════
// ANNOTATION
// ═══════════════════════════════════════════════════════════════════════════════

/// Attribute values for one element, in emission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisualAnnotation {
    pub visual_id: String,
    pub source_file: String,
    pub source_line: Option<String>,
}

impl VisualAnnotation {
    pub fn new(config: &PluginConfig, location: &ElementLocation<'_>) -> Self {
        Self {
            visual_id: location.visual_id(),
            source_file: config.source_file(location.relative_path),
            source_line: config
                .include_line_numbers
                .then(|| location.line.to_string()),
        }
    }

    pub fn attributes(&self) -> Vec<(&'static str, &str)> {
        let mut attrs = vec![
            (VISUAL_ID_ATTR, self.visual_id.as_str()),
            (SOURCE_FILE_ATTR, self.source_file.as_str()),
        ];
        if let Some(line) = &self.source_line {
            attrs.push((SOURCE_LINE_ATTR, line.as_str()));
        }
        attrs
    }
}

pub fn has_visual_id(element: &JSXOpeningElement<'_>) -> bool {
    element.attributes.iter().any(|item| match item {
        JSXAttributeItem::Attribute(attr) => {
            matches!(&attr.name, JSXAttributeName::Identifier(id) if id.name == VISUAL_ID_ATTR)
        }
        JSXAttributeItem::SpreadAttribute(_) => false,
    })
}

pub struct ElementAnnotator<'a, 'c> {
    ast: AstBuilder<'a>,
    config: &'c PluginConfig,
    relative_path: &'c str,
    lines: LineIndex<'c>,
    /// Elements annotated during this pass. Scoped to one module.
    pub annotated: usize,
}

impl<'a, 'c> ElementAnnotator<'a, 'c> {
    pub fn new(
        allocator: &'a Allocator,
        config: &'c PluginConfig,
        relative_path: &'c str,
        source: &'c str,
    ) -> Self {
        Self {
            ast: AstBuilder::new(allocator),
            config,
            relative_path,
            lines: LineIndex::new(source),
            annotated: 0,
        }
    }

    pub fn is_modified(&self) -> bool {
        self.annotated > 0
    }

    /// Returns `true` when attributes were appended.
    fn annotate_element(&mut self, element: &mut JSXOpeningElement<'a>) -> bool {
        // Exclusion runs before the already-annotated check
        if self.config.is_excluded(&display_name(&element.name)) {
            return false;
        }
        if has_visual_id(element) {
            return false;
        }
        if element.span == SPAN {
            return false;
        }
        let Some((line, column)) = self.lines.line_column(element.span.start) else {
            return false;
        };

        let location = ElementLocation::new(self.relative_path, line, column);
        let annotation = VisualAnnotation::new(self.config, &location);
        for (name, value) in annotation.attributes() {
            let value = self.ast.allocator.alloc_str(value);
            let attr = self.ast.jsx_attribute_item_attribute(
                SPAN,
                self.ast.jsx_attribute_name_identifier(SPAN, name),
                Some(self.ast.jsx_attribute_value_string_literal(SPAN, value, None)),
            );
            element.attributes.push(attr);
        }
        true
    }
}

impl<'a> VisitMut<'a> for ElementAnnotator<'a, '_> {
    fn visit_jsx_opening_element(&mut self, element: &mut JSXOpeningElement<'a>) {
        if self.annotate_element(element) {
            self.annotated += 1;
        }
        // Attribute values may contain nested JSX
        walk_jsx_opening_element(self, element);
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use oxc_parser::Parser;
    use oxc_span::SourceType;

    fn tsx() -> SourceType {
        SourceType::default()
            .with_typescript(true)
            .with_jsx(true)
            .with_module(true)
    }

    /// Display names of every opening element in `source`, in document order.
    fn tag_names(source: &str) -> Vec<String> {
        struct Collect(Vec<String>);
        impl<'a> VisitMut<'a> for Collect {
            fn visit_jsx_opening_element(&mut self, element: &mut JSXOpeningElement<'a>) {
                self.0.push(display_name(&element.name));
                walk_jsx_opening_element(self, element);
            }
        }

        let allocator = Allocator::default();
        let ret = Parser::new(&allocator, source, tsx()).parse();
        assert!(ret.errors.is_empty(), "{:?}", ret.errors);
        let mut program = ret.program;
        let mut collect = Collect(Vec::new());
        collect.visit_program(&mut program);
        collect.0
    }

    fn annotate(source: &str, config: &PluginConfig) -> (usize, Vec<Vec<String>>) {
        struct AttrNames(Vec<Vec<String>>);
        impl<'a> VisitMut<'a> for AttrNames {
            fn visit_jsx_opening_element(&mut self, element: &mut JSXOpeningElement<'a>) {
                let names = element
                    .attributes
                    .iter()
                    .filter_map(|item| match item {
                        JSXAttributeItem::Attribute(attr) => match &attr.name {
                            JSXAttributeName::Identifier(id) => Some(id.name.to_string()),
                            JSXAttributeName::NamespacedName(_) => None,
                        },
                        JSXAttributeItem::SpreadAttribute(_) => None,
                    })
                    .collect();
                self.0.push(names);
                walk_jsx_opening_element(self, element);
            }
        }

        let allocator = Allocator::default();
        let ret = Parser::new(&allocator, source, tsx()).parse();
        let mut program = ret.program;
        let mut annotator = ElementAnnotator::new(&allocator, config, "App.tsx", source);
        annotator.visit_program(&mut program);
        let count = annotator.annotated;

        let mut names = AttrNames(Vec::new());
        names.visit_program(&mut program);
        (count, names.0)
    }

    #[test]
    fn test_resolve_simple_and_member_names() {
        let names = tag_names("<div><Button /><React.Fragment /><motion.div /></div>;");
        assert_eq!(names, vec!["div", "Button", "React.Fragment", "motion.div"]);
    }

    #[test]
    fn test_deep_member_and_namespaced_names_are_empty() {
        let names = tag_names("<><a.b.c /><svg:rect /></>;");
        assert_eq!(names, vec!["", ""]);
    }

    #[test]
    fn test_element_name_display() {
        assert_eq!(ElementName::Identifier("div").to_string(), "div");
        assert_eq!(
            ElementName::Member {
                object: "React",
                property: "Suspense"
            }
            .to_string(),
            "React.Suspense"
        );
    }

    #[test]
    fn test_attributes_appended_in_order() {
        let (count, attrs) = annotate(r#"<div className="x" />;"#, &PluginConfig::default());
        assert_eq!(count, 1);
        assert_eq!(
            attrs[0],
            vec![
                "className",
                VISUAL_ID_ATTR,
                SOURCE_FILE_ATTR,
                SOURCE_LINE_ATTR
            ]
        );
    }

    #[test]
    fn test_line_attribute_optional() {
        let config = PluginConfig {
            include_line_numbers: false,
            ..PluginConfig::default()
        };
        let (_, attrs) = annotate("<div />;", &config);
        assert_eq!(attrs[0], vec![VISUAL_ID_ATTR, SOURCE_FILE_ATTR]);
    }

    #[test]
    fn test_excluded_and_prefixed_elements_skipped() {
        let source = "<Fragment><useSlot /><_Hidden /><span /></Fragment>;";
        let (count, attrs) = annotate(source, &PluginConfig::default());
        assert_eq!(count, 1);
        assert!(attrs[0].is_empty());
        assert!(attrs[1].is_empty());
        assert!(attrs[2].is_empty());
        assert_eq!(attrs[3].len(), 3);
    }

    #[test]
    fn test_nested_jsx_in_attribute_value_is_visited() {
        let source = "<Layout header={<h1>Title</h1>} />;";
        let (count, attrs) = annotate(source, &PluginConfig::default());
        assert_eq!(count, 2);
        assert!(attrs.iter().all(|names| names.contains(&VISUAL_ID_ATTR.to_string())));
    }

    #[test]
    fn test_existing_visual_id_left_alone() {
        let source = r#"<div data-visual-id="ve-deadbeef" />;"#;
        let (count, attrs) = annotate(source, &PluginConfig::default());
        assert_eq!(count, 0);
        assert_eq!(attrs[0], vec![VISUAL_ID_ATTR]);
    }

    #[test]
    fn test_visual_annotation_values() {
        let config = PluginConfig::default();
        let location = ElementLocation::new("components/Button.tsx", 10, 2);
        let annotation = VisualAnnotation::new(&config, &location);
        assert_eq!(
            annotation.attributes(),
            vec![
                (VISUAL_ID_ATTR, "ve-dc2d80e1"),
                (SOURCE_FILE_ATTR, "/app/src/components/Button.tsx"),
                (SOURCE_LINE_ATTR, "10"),
            ]
        );
    }
}
