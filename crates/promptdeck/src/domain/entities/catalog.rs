//! Catalog - The full collection of prompts
//!
//! Pure domain entity without infrastructure dependencies.

use std::collections::HashMap;

use crate::domain::entities::{Prompt, PromptId};
use crate::domain::errors::DomainError;

/// Catalog - Prompts in content-source order, unique by id
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    prompts: Vec<Prompt>,
    positions: HashMap<PromptId, usize>,
}

impl Catalog {
    /// Build a catalog, validating every prompt and rejecting duplicate ids
    pub fn new(prompts: Vec<Prompt>) -> Result<Self, DomainError> {
        let mut positions = HashMap::with_capacity(prompts.len());
        for (position, prompt) in prompts.iter().enumerate() {
            prompt.validate()?;
            if positions.insert(prompt.id, position).is_some() {
                return Err(DomainError::Validation(format!(
                    "duplicate prompt id {}",
                    prompt.id
                )));
            }
        }
        Ok(Self { prompts, positions })
    }

    pub fn get(&self, id: PromptId) -> Option<&Prompt> {
        self.positions.get(&id).map(|&i| &self.prompts[i])
    }

    pub(crate) fn get_mut(&mut self, id: PromptId) -> Option<&mut Prompt> {
        match self.positions.get(&id) {
            Some(&i) => self.prompts.get_mut(i),
            None => None,
        }
    }

    pub fn contains(&self, id: PromptId) -> bool {
        self.positions.contains_key(&id)
    }

    pub fn prompts(&self) -> &[Prompt] {
        &self.prompts
    }

    pub fn len(&self) -> usize {
        self.prompts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prompts.is_empty()
    }
}
