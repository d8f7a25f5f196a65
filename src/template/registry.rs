use std::collections::BTreeMap;
use std::sync::Arc;

use crate::alias::{self, AliasEntry};
use crate::error::{ParseError, RegistryError, RenderError};
use crate::params::Params;
use crate::template::cache::TemplateCache;
use crate::template::render;
use crate::template::structure::Structure;

/// Output of one render call: the surviving SQL (driver placeholders
/// untouched) plus the alias entries found in its select list.
#[derive(Debug, Clone, PartialEq)]
pub struct Rendered {
    pub sql: String,
    pub aliases: Vec<AliasEntry>,
}

/// The set of registered templates, immutable after construction. Raw text
/// is kept for the life of the process; parsed structures are filled into
/// the cache on first use.
#[derive(Debug)]
pub struct TemplateRegistry {
    templates: BTreeMap<String, String>,
    cache: TemplateCache,
}

impl TemplateRegistry {
    /// Build a registry from `(name, sql)` pairs. Chaining several sources
    /// into one iterator is how query collections are merged; a name
    /// appearing twice is a configuration bug and fails construction.
    pub fn new<I, K, V>(entries: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut templates = BTreeMap::new();
        for (name, sql) in entries {
            let name = name.into();
            if templates.contains_key(&name) {
                return Err(RegistryError::DuplicateName(name));
            }
            templates.insert(name, sql.into());
        }
        log::debug!("registered {} templates", templates.len());
        Ok(Self {
            templates,
            cache: TemplateCache::new(),
        })
    }

    /// Load a registry from a TOML table of `name = "SQL text"`.
    pub fn from_toml_str(raw: &str) -> Result<Self, RegistryError> {
        let table: BTreeMap<String, String> = toml::from_str(raw)?;
        Self::new(table)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    /// Raw registered text, exactly as supplied.
    pub fn raw(&self, name: &str) -> Option<&str> {
        self.templates.get(name).map(String::as_str)
    }

    /// Parse every registered template now, so structural and condition
    /// syntax errors surface at startup instead of at first render.
    pub fn validate(&self) -> Result<(), RegistryError> {
        for (name, raw) in &self.templates {
            self.structure_of(name, raw)
                .map_err(|source| RegistryError::Invalid {
                    name: name.clone(),
                    source,
                })?;
        }
        Ok(())
    }

    /// Render a template: resolve its conditionals against `params` and
    /// return the surviving SQL text.
    pub fn render(&self, name: &str, params: &Params) -> Result<String, RenderError> {
        let raw = self
            .templates
            .get(name)
            .ok_or_else(|| RenderError::UnknownTemplate(name.to_owned()))?;
        let structure = self.structure_of(name, raw)?;
        Ok(render::select(&structure, params)?)
    }

    /// Render plus alias extraction, the full per-call contract.
    pub fn render_with_aliases(
        &self,
        name: &str,
        params: &Params,
    ) -> Result<Rendered, RenderError> {
        let sql = self.render(name, params)?;
        let aliases = alias::extract(&sql);
        Ok(Rendered { sql, aliases })
    }

    /// Parses performed since construction; one per distinct template when
    /// renders are sequential.
    pub fn parse_count(&self) -> usize {
        self.cache.parse_count()
    }

    fn structure_of(&self, name: &str, raw: &str) -> Result<Arc<Structure>, ParseError> {
        self.cache.get_or_parse(name, raw)
    }
}
