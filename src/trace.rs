//! Resolution trace used for cycle detection.
//!
//! The trace holds the chain of types currently under construction on the
//! injector's call stack. Pushing a type that is already present means the
//! graph loops back on itself.

use std::fmt;

use crate::error::{DiError, DiResult};
use crate::key::TypeKey;

#[cfg(feature = "smallvec")]
type TraceStack = smallvec::SmallVec<[TypeKey; 8]>;
#[cfg(not(feature = "smallvec"))]
type TraceStack = Vec<TypeKey>;

/// Ordered chain of types under active resolution.
///
/// # Examples
///
/// ```rust
/// use katana_di::{DiError, ResolutionTrace, TypeKey};
///
/// let mut trace = ResolutionTrace::new();
/// trace.push(TypeKey::of::<u8>()).unwrap();
/// trace.push(TypeKey::of::<u16>()).unwrap();
/// assert_eq!(trace.to_string(), "[u8 -> u16]");
///
/// let err = trace.push(TypeKey::of::<u8>()).unwrap_err();
/// assert_eq!(err.to_string(), "Cyclic dependency detected: [u8 -> u16 -> u8]");
/// ```
#[derive(Debug, Clone, Default)]
pub struct ResolutionTrace {
    keys: TraceStack,
}

impl ResolutionTrace {
    /// Creates an empty trace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `key`.
    ///
    /// If `key` is already present it is still appended, and the error
    /// carries the whole chain including that closing edge.
    pub fn push(&mut self, key: TypeKey) -> DiResult<()> {
        let cyclic = self.contains(key);
        self.keys.push(key);
        if cyclic {
            return Err(DiError::Cyclic(self.keys.to_vec()));
        }
        Ok(())
    }

    /// Removes and returns the most recent key; `None` when empty.
    pub fn pop(&mut self) -> Option<TypeKey> {
        self.keys.pop()
    }

    /// Clears the trace.
    pub fn reset(&mut self) {
        self.keys.clear();
    }

    pub fn contains(&self, key: TypeKey) -> bool {
        self.keys.iter().any(|k| *k == key)
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Keys from the outermost resolution to the innermost.
    pub fn keys(&self) -> &[TypeKey] {
        &self.keys
    }
}

impl fmt::Display for ResolutionTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, key) in self.keys.iter().enumerate() {
            if i > 0 {
                f.write_str(" -> ")?;
            }
            f.write_str(key.display_name())?;
        }
        f.write_str("]")
    }
}
