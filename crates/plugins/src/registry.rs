// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Name-indexed plugin registry.
//!
//! Plugins register under a (category, name) pair at startup; the engine
//! resolves them by name at job time. Names are unique within a category
//! but may repeat across categories ("container" is both a builder and
//! a transport).

use crate::action::ActionFactory;
use crate::builder::BuilderFactory;
use crate::provisioner::Provisioner;
use crate::transport::TransportFactory;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Plugin categories.
///
/// `Dispatcher` and `Api` mark extension points at the system boundary;
/// nothing registers under them here, but consumers embedding the
/// registry use the same namespace rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Builder,
    Transport,
    Provisioner,
    Action,
    Dispatcher,
    Api,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Builder => "builder",
            Category::Transport => "transport",
            Category::Provisioner => "provisioner",
            Category::Action => "action",
            Category::Dispatcher => "dispatcher",
            Category::Api => "api",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("{category} plugin {name:?} is already registered")]
    DuplicateName { category: Category, name: String },
}

/// Registered plugin factories, indexed by category and name.
#[derive(Default)]
pub struct Registry {
    builders: HashMap<String, Arc<dyn BuilderFactory>>,
    transports: HashMap<String, Arc<dyn TransportFactory>>,
    provisioners: HashMap<String, Arc<dyn Provisioner>>,
    actions: HashMap<String, Arc<dyn ActionFactory>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_builder(
        &mut self,
        name: &str,
        factory: Arc<dyn BuilderFactory>,
    ) -> Result<(), RegistryError> {
        if self.builders.contains_key(name) {
            return Err(duplicate(Category::Builder, name));
        }
        self.builders.insert(name.to_string(), factory);
        Ok(())
    }

    pub fn register_transport(
        &mut self,
        name: &str,
        factory: Arc<dyn TransportFactory>,
    ) -> Result<(), RegistryError> {
        if self.transports.contains_key(name) {
            return Err(duplicate(Category::Transport, name));
        }
        self.transports.insert(name.to_string(), factory);
        Ok(())
    }

    pub fn register_provisioner(
        &mut self,
        name: &str,
        provisioner: Arc<dyn Provisioner>,
    ) -> Result<(), RegistryError> {
        if self.provisioners.contains_key(name) {
            return Err(duplicate(Category::Provisioner, name));
        }
        self.provisioners.insert(name.to_string(), provisioner);
        Ok(())
    }

    pub fn register_action(
        &mut self,
        name: &str,
        factory: Arc<dyn ActionFactory>,
    ) -> Result<(), RegistryError> {
        if self.actions.contains_key(name) {
            return Err(duplicate(Category::Action, name));
        }
        self.actions.insert(name.to_string(), factory);
        Ok(())
    }

    pub fn find_builder(&self, name: &str) -> Option<Arc<dyn BuilderFactory>> {
        self.builders.get(name).cloned()
    }

    pub fn find_transport(&self, name: &str) -> Option<Arc<dyn TransportFactory>> {
        self.transports.get(name).cloned()
    }

    pub fn find_provisioner(&self, name: &str) -> Option<Arc<dyn Provisioner>> {
        self.provisioners.get(name).cloned()
    }

    pub fn find_action(&self, name: &str) -> Option<Arc<dyn ActionFactory>> {
        self.actions.get(name).cloned()
    }
}

fn duplicate(category: Category, name: &str) -> RegistryError {
    RegistryError::DuplicateName {
        category,
        name: name.to_string(),
    }
}

/// Register every built-in plugin.
pub fn register_builtins(registry: &mut Registry) -> Result<(), RegistryError> {
    crate::builder::container::register(registry)?;
    crate::transport::container::register(registry)?;
    crate::provisioner::debian::register(registry)?;
    crate::action::command::register(registry)?;
    Ok(())
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
