//! Sign resolvers: textual sign → constant value or operation descriptor.
//!
//! Two independent read-mostly tables. Each parser instance owns private
//! resolver values, so custom registrations never leak between parsers.
//! Registration silently overwrites an existing sign; there is no removal.
//!
//! Both resolvers expose the length in characters of their longest known
//! sign, which bounds the lexer's greedy probe. The bound is maintained
//! eagerly on registration: mutation is rare and lookup is hot, and keeping
//! it current lets the lexer borrow the resolver immutably.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::builtin;
use crate::operation::Operation;

fn sign_len(sign: &str) -> usize {
    sign.chars().count()
}

/// Lookup table mapping constant signs to their values.
#[derive(Clone, Debug)]
pub struct ConstantResolver {
    table: FxHashMap<String, f64>,
    max_sign_len: usize,
}

impl ConstantResolver {
    /// Create a resolver with no known constants.
    pub fn empty() -> Self {
        ConstantResolver {
            table: FxHashMap::default(),
            max_sign_len: 0,
        }
    }

    /// Register a constant. An existing sign is silently overwritten.
    ///
    /// # Panics
    /// Panics if `sign` is empty - a caller bug.
    pub fn register(&mut self, sign: &str, value: f64) {
        assert!(!sign.is_empty(), "constant sign must be non-empty");
        self.max_sign_len = self.max_sign_len.max(sign_len(sign));
        self.table.insert(sign.to_string(), value);
    }

    /// Look up a constant by its sign.
    #[inline]
    pub fn find(&self, sign: &str) -> Option<f64> {
        self.table.get(sign).copied()
    }

    /// Length in characters of the longest known sign.
    #[inline]
    pub fn max_sign_len(&self) -> usize {
        self.max_sign_len
    }

    /// Iterate over the known `(sign, value)` pairs.
    pub fn entries(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.table.iter().map(|(sign, value)| (sign.as_str(), *value))
    }
}

/// Seeded with the built-in constants.
impl Default for ConstantResolver {
    fn default() -> Self {
        let mut resolver = ConstantResolver::empty();
        for (sign, value) in builtin::constants() {
            resolver.register(sign, value);
        }
        resolver
    }
}

/// Lookup table mapping operation signs to their descriptors.
///
/// An operation is indexed under every one of its aliases; looking up any
/// alias yields the same shared descriptor.
#[derive(Clone, Debug)]
pub struct OperationResolver {
    table: FxHashMap<String, Arc<Operation>>,
    max_sign_len: usize,
}

impl OperationResolver {
    /// Create a resolver with no known operations.
    pub fn empty() -> Self {
        OperationResolver {
            table: FxHashMap::default(),
            max_sign_len: 0,
        }
    }

    /// Register an operation under each of its aliases.
    ///
    /// Aliases that collide with existing signs silently take over those
    /// signs.
    pub fn register(&mut self, operation: Operation) {
        let operation = Arc::new(operation);
        for sign in operation.signs() {
            self.max_sign_len = self.max_sign_len.max(sign_len(sign));
            self.table.insert(sign.clone(), Arc::clone(&operation));
        }
    }

    /// Look up an operation by one of its signs.
    #[inline]
    pub fn find(&self, sign: &str) -> Option<&Arc<Operation>> {
        self.table.get(sign)
    }

    /// Length in characters of the longest known sign.
    #[inline]
    pub fn max_sign_len(&self) -> usize {
        self.max_sign_len
    }

    /// Iterate over the distinct registered operations.
    ///
    /// An operation with several aliases is yielded once per alias by the
    /// underlying table; callers that need distinct descriptors can compare
    /// by primary sign.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Arc<Operation>)> + '_ {
        self.table.iter().map(|(sign, op)| (sign.as_str(), op))
    }
}

/// Seeded with the built-in operations.
impl Default for OperationResolver {
    fn default() -> Self {
        let mut resolver = OperationResolver::empty();
        for operation in builtin::operations() {
            resolver.register(operation);
        }
        resolver
    }
}
