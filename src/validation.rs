//! Static validation of the provider graph.
//!
//! Every provider declares its parameter types at registration, so the
//! whole dependency graph is known before anything is constructed. The
//! checks here walk that graph and report wiring mistakes up front, rather
//! than at the first resolution that happens to hit them.

use std::collections::HashSet;
use std::fmt;

use crate::error::join_chain;
use crate::key::TypeKey;
use crate::lifetime::Lifetime;
use crate::registration::{ProviderEntry, Registry};

/// Result of [`Injector::validate`](crate::Injector::validate).
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    /// Problems that make some resolution fail
    pub errors: Vec<ValidationError>,
    /// Configurations that work but are probably not intended
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.errors.is_empty() && self.warnings.is_empty() {
            return f.write_str("provider graph is valid");
        }
        for error in &self.errors {
            writeln!(f, "error: {error}")?;
        }
        for warning in &self.warnings {
            writeln!(f, "warning: {warning}")?;
        }
        Ok(())
    }
}

/// A wiring error that makes resolution fail.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A constructor parameter has no provider.
    #[error("{service} depends on {dependency}, which has no provider")]
    MissingDependency { service: TypeKey, dependency: TypeKey },

    /// Providers that depend on each other. The chain ends with the key it
    /// started from.
    #[error("circular dependency: [{}]", join_chain(.cycle))]
    CircularDependency { cycle: Vec<TypeKey> },
}

/// A configuration that resolves but is probably a mistake.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationWarning {
    /// A singleton keeps the first new-instance dependency it receives
    /// forever.
    #[error("singleton {singleton} captures new-instance dependency {dependency}")]
    SingletonDependsOnNew { singleton: TypeKey, dependency: TypeKey },
}

/// Walks every provider in `registry`.
///
/// Providers are visited in type-name order so reports are stable from one
/// run to the next.
pub(crate) fn validate_registry(registry: &Registry) -> ValidationResult {
    let mut entries: Vec<&ProviderEntry> = registry.iter().map(|entry| entry.as_ref()).collect();
    entries.sort_by_key(|entry| entry.key.display_name());

    let mut result = ValidationResult::default();

    for entry in &entries {
        for dependency in &entry.dependencies {
            match registry.get(dependency) {
                None => result.errors.push(ValidationError::MissingDependency {
                    service: entry.key,
                    dependency: *dependency,
                }),
                Some(provider) => {
                    if entry.lifetime == Lifetime::Singleton && provider.lifetime == Lifetime::New {
                        result.warnings.push(ValidationWarning::SingletonDependsOnNew {
                            singleton: entry.key,
                            dependency: *dependency,
                        });
                    }
                }
            }
        }
    }

    let mut finished = HashSet::new();
    let mut path = Vec::new();
    for entry in &entries {
        find_cycles(registry, entry.key, &mut finished, &mut path, &mut result.errors);
    }

    tracing::debug!(
        providers = entries.len(),
        errors = result.errors.len(),
        warnings = result.warnings.len(),
        "validated provider graph"
    );
    result
}

fn find_cycles(
    registry: &Registry,
    current: TypeKey,
    finished: &mut HashSet<TypeKey>,
    path: &mut Vec<TypeKey>,
    errors: &mut Vec<ValidationError>,
) {
    if let Some(start) = path.iter().position(|key| *key == current) {
        let mut cycle = path[start..].to_vec();
        cycle.push(current);
        errors.push(ValidationError::CircularDependency { cycle });
        return;
    }
    if finished.contains(&current) {
        return;
    }
    // Missing providers are reported separately
    let Some(entry) = registry.get(&current) else {
        return;
    };

    path.push(current);
    for dependency in &entry.dependencies {
        find_cycles(registry, *dependency, finished, path, errors);
    }
    path.pop();
    finished.insert(current);
}
