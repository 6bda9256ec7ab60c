//! Bound statement parameters.
//!
//! Builders collect literal values while the SQL text referencing them is
//! still being rendered, so values are erased to `dyn ToSql` up front and
//! only receive their placeholder number when a builder appends them to a
//! [`ParamList`].

use std::fmt;
use std::sync::Arc;
use tokio_postgres::types::ToSql;

/// A single bound value, type-erased for the driver.
///
/// Cloning shares the underlying value, which keeps predicates and built
/// statements cheap to clone.
#[derive(Clone)]
pub struct Param(Arc<dyn ToSql + Send + Sync>);

impl Param {
    /// Erase a literal into a bindable parameter.
    pub fn new<T: ToSql + Send + Sync + 'static>(value: T) -> Self {
        Param(Arc::new(value))
    }

    /// The driver-facing view of the value.
    pub fn as_sql(&self) -> &(dyn ToSql + Sync) {
        &*self.0 as &(dyn ToSql + Sync)
    }
}

impl fmt::Debug for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Param").field(&"<dyn ToSql>").finish()
    }
}

/// Parameters in placeholder order.
///
/// [`push`](Self::push) returns the 1-based position the value will occupy,
/// which is exactly the `$n` the caller writes into the SQL text, so text
/// and bindings cannot disagree.
#[derive(Clone, Debug, Default)]
pub struct ParamList {
    params: Vec<Param>,
}

impl ParamList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value; returns its placeholder number.
    pub fn push(&mut self, param: Param) -> usize {
        self.params.push(param);
        self.params.len()
    }

    /// Number of bound values.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Slice form accepted by the driver's query methods.
    pub fn as_refs(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.params.iter().map(|p| p.as_sql()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_hands_out_one_based_placeholder_numbers() {
        let mut params = ParamList::new();
        assert!(params.is_empty());
        assert_eq!(params.push(Param::new(1i64)), 1);
        assert_eq!(params.push(Param::new("x")), 2);
        assert_eq!(params.len(), 2);
        assert_eq!(params.as_refs().len(), 2);
    }
}
