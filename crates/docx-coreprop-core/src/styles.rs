//! Named style replacement for paragraphs, tables and runs.

use docx_coreprop_config::{StyleMapping, StyleScope};
use docx_coreprop_package::{Document, StyleCatalog, StyleType, Styled};
use tracing::{debug, info};

use crate::error::{ApplyError, ApplyResult};

pub fn style_type(scope: StyleScope) -> StyleType {
    match scope {
        StyleScope::Paragraph => StyleType::Paragraph,
        StyleScope::Table => StyleType::Table,
        StyleScope::Character => StyleType::Character,
    }
}

/// Applies every `from -> to` mapping of `scope` in order, returning how many
/// elements were restyled.
pub fn replace_styles(
    document: &mut Document,
    scope: StyleScope,
    mappings: &[StyleMapping],
) -> ApplyResult<usize> {
    if mappings.is_empty() {
        return Ok(0);
    }
    let catalog = document.styles().clone();
    let mut total = 0;
    for mapping in mappings {
        let mut replacement = Replacement::new(&catalog, scope, mapping);
        match scope {
            StyleScope::Paragraph => {
                document.try_for_each_paragraph(|mut paragraph| replacement.visit(&mut paragraph))?
            }
            StyleScope::Table => {
                document.try_for_each_table(|mut table| replacement.visit(&mut table))?
            }
            StyleScope::Character => {
                document.try_for_each_run(|mut run| replacement.visit(&mut run))?
            }
        }

        if replacement.count == 0 {
            debug!(scope = %scope, "no element uses style {:?}", mapping.from);
        } else {
            info!(scope = %scope, count = replacement.count, "{} -> {}", mapping.from, mapping.to);
        }
        total += replacement.count;
    }
    Ok(total)
}

/// One mapping being applied across a scope.
struct Replacement<'a> {
    catalog: &'a StyleCatalog,
    scope: StyleScope,
    style_type: StyleType,
    mapping: &'a StyleMapping,
    /// Resolved on first match: `None` for the type's default style.
    target: Option<Option<String>>,
    count: usize,
}

impl<'a> Replacement<'a> {
    fn new(catalog: &'a StyleCatalog, scope: StyleScope, mapping: &'a StyleMapping) -> Self {
        Replacement {
            catalog,
            scope,
            style_type: style_type(scope),
            mapping,
            target: None,
            count: 0,
        }
    }

    fn visit<S: Styled>(&mut self, element: &mut S) -> ApplyResult<()> {
        let current = self
            .catalog
            .effective(element.style_id(), self.style_type)
            .and_then(|style| style.name.as_deref());
        if current != Some(self.mapping.from.as_str()) {
            return Ok(());
        }

        let target = match &self.target {
            Some(target) => target.clone(),
            None => {
                let target = self.resolve_target()?;
                self.target = Some(target.clone());
                target
            }
        };
        element.set_style_id(target.as_deref());
        self.count += 1;
        Ok(())
    }

    fn resolve_target(&self) -> ApplyResult<Option<String>> {
        let id = require_style(self.catalog, self.scope, &self.mapping.to)?;
        let is_default = self
            .catalog
            .default_for(self.style_type)
            .is_some_and(|default| default.id == id);
        Ok((!is_default).then_some(id))
    }
}

/// Resolves `name` to the id of a catalog style of the scope's type.
pub fn require_style(
    catalog: &StyleCatalog,
    scope: StyleScope,
    name: &str,
) -> ApplyResult<String> {
    let expected = style_type(scope);
    let style = catalog.get(name).ok_or_else(|| ApplyError::StyleNotFound {
        scope,
        name: name.to_owned(),
    })?;
    if style.style_type != expected {
        return Err(ApplyError::StyleTypeMismatch {
            name: name.to_owned(),
            expected,
            actual: style.style_type,
        });
    }
    Ok(style.id.clone())
}
