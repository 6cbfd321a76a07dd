//! Named, insertion-ordered collection of fitted models

use std::fmt;

use indexmap::IndexMap;
use ms_models::FittedModel;

/// Fitted models keyed by name, in insertion order
#[derive(Default)]
pub struct ModelSet {
    models: IndexMap<String, Box<dyn FittedModel>>,
}

impl ModelSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a model under `name`.
    ///
    /// An existing entry with the same name is replaced in place and
    /// returned.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        model: Box<dyn FittedModel>,
    ) -> Option<Box<dyn FittedModel>> {
        self.models.insert(name.into(), model)
    }

    /// Builder-style [`insert`](Self::insert) for concrete models
    pub fn with<M: FittedModel + 'static>(mut self, name: impl Into<String>, model: M) -> Self {
        self.insert(name, Box::new(model));
        self
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&dyn FittedModel> {
        self.models.get(name).map(|m| &**m)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.models.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.models.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &dyn FittedModel)> {
        self.models
            .iter()
            .map(|(name, model)| (name.as_str(), &**model))
    }
}

impl fmt::Debug for ModelSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|(name, model)| (name, model.formula().to_string())))
            .finish()
    }
}

impl FromIterator<(String, Box<dyn FittedModel>)> for ModelSet {
    fn from_iter<I: IntoIterator<Item = (String, Box<dyn FittedModel>)>>(iter: I) -> Self {
        Self {
            models: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for ModelSet {
    type Item = (String, Box<dyn FittedModel>);
    type IntoIter = indexmap::map::IntoIter<String, Box<dyn FittedModel>>;

    fn into_iter(self) -> Self::IntoIter {
        self.models.into_iter()
    }
}
