//! A rendered SQL statement with its bound parameters.

use crate::param::ParamList;
use tokio_postgres::types::ToSql;

/// Output of a statement builder: SQL text plus parameters in placeholder
/// order. Produced by a builder, consumed once by the execution engine.
#[derive(Clone, Debug)]
pub struct Statement {
    /// The rendered SQL text.
    pub sql: String,
    /// Bound values, ordered to match `$1..$n` in the text.
    pub params: ParamList,
}

impl Statement {
    pub(crate) fn new(sql: String, params: ParamList) -> Self {
        Self { sql, params }
    }

    /// Parameter references in driver form.
    pub fn param_refs(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.params.as_refs()
    }
}
