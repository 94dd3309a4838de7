//! Template storage: the lookup contract consumed by the trigger engine and
//! an in-memory implementation

use async_trait::async_trait;
use dashmap::DashMap;

use super::types::{Message, Template, TemplateError, TemplateResult, TriggerPayload};

/// Lookup contract for template storage backends.
///
/// The store owns the activation policy: `get_active_messages` must return
/// only the messages that should fire, in dispatch order.
#[async_trait]
pub trait TemplateStore: Send + Sync {
    /// Resolve an event id to its template
    async fn get_template_by_id(&self, id: &str) -> TemplateResult<Option<Template>>;

    /// Messages of `template` that are active for `payload`
    async fn get_active_messages(
        &self,
        template: &Template,
        payload: &TriggerPayload,
    ) -> TemplateResult<Vec<Message>>;
}

/// In-memory template storage
pub struct InMemoryTemplateStore {
    templates: DashMap<String, Template>,
}

impl Default for InMemoryTemplateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryTemplateStore {
    /// Create an empty template store
    pub fn new() -> Self {
        Self {
            templates: DashMap::new(),
        }
    }

    /// Build a store from a set of templates, validating each
    pub fn from_templates(templates: impl IntoIterator<Item = Template>) -> TemplateResult<Self> {
        let store = Self::new();
        for template in templates {
            store.create(template)?;
        }
        Ok(store)
    }

    /// Add a new template
    pub fn create(&self, template: Template) -> TemplateResult<()> {
        template.validate()?;

        if self.templates.contains_key(&template.id) {
            return Err(TemplateError::AlreadyExists(template.id));
        }

        tracing::debug!(
            template_id = %template.id,
            messages = template.messages.len(),
            "Template registered"
        );
        self.templates.insert(template.id.clone(), template);

        Ok(())
    }

    /// Get a template by ID
    pub fn get(&self, id: &str) -> TemplateResult<Template> {
        self.templates
            .get(id)
            .map(|t| t.clone())
            .ok_or_else(|| TemplateError::NotFound(id.to_string()))
    }

    /// List all templates
    pub fn list(&self) -> Vec<Template> {
        self.templates
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// Delete a template by ID
    pub fn delete(&self, id: &str) -> TemplateResult<()> {
        self.templates
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| TemplateError::NotFound(id.to_string()))
    }

    /// Check if a template exists
    pub fn exists(&self, id: &str) -> bool {
        self.templates.contains_key(id)
    }

    /// Get the number of templates
    pub fn count(&self) -> usize {
        self.templates.len()
    }
}

#[async_trait]
impl TemplateStore for InMemoryTemplateStore {
    async fn get_template_by_id(&self, id: &str) -> TemplateResult<Option<Template>> {
        Ok(self.templates.get(id).map(|t| t.clone()))
    }

    async fn get_active_messages(
        &self,
        template: &Template,
        payload: &TriggerPayload,
    ) -> TemplateResult<Vec<Message>> {
        Ok(template.active_messages(payload))
    }
}
