//! Dialect-agnostic predicate tree for WHERE clauses.
//!
//! Predicates reference model fields by their Rust names and carry boxed
//! literal values. Nothing is validated at construction time; rendering
//! against a [`TableDescriptor`] resolves field names to column names and
//! surfaces unknown fields as [`Error::Column`].

use crate::error::Result;
use crate::meta::TableDescriptor;
use crate::param::{Param, ParamList};
use tokio_postgres::types::ToSql;

/// Comparison operator of a leaf predicate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Ne,
    Lt,
    Lte,
    Gt,
    Gte,
}

impl CmpOp {
    fn sql(self) -> &'static str {
        match self {
            CmpOp::Eq => "=",
            CmpOp::Ne => "<>",
            CmpOp::Lt => "<",
            CmpOp::Lte => "<=",
            CmpOp::Gt => ">",
            CmpOp::Gte => ">=",
        }
    }
}

/// A reference to a model field, the entry point for building predicates.
#[derive(Clone, Copy, Debug)]
pub struct Col {
    field: &'static str,
}

/// Reference a field by its Rust name.
///
/// # Example
/// ```ignore
/// let pred = structsql::col("id").eq(123i64);
/// ```
pub fn col(field: &'static str) -> Col {
    Col { field }
}

impl Col {
    /// column = value
    pub fn eq<V: ToSql + Send + Sync + 'static>(self, value: V) -> Predicate {
        self.cmp(CmpOp::Eq, value)
    }

    /// column <> value
    pub fn ne<V: ToSql + Send + Sync + 'static>(self, value: V) -> Predicate {
        self.cmp(CmpOp::Ne, value)
    }

    /// column < value
    pub fn lt<V: ToSql + Send + Sync + 'static>(self, value: V) -> Predicate {
        self.cmp(CmpOp::Lt, value)
    }

    /// column <= value
    pub fn lte<V: ToSql + Send + Sync + 'static>(self, value: V) -> Predicate {
        self.cmp(CmpOp::Lte, value)
    }

    /// column > value
    pub fn gt<V: ToSql + Send + Sync + 'static>(self, value: V) -> Predicate {
        self.cmp(CmpOp::Gt, value)
    }

    /// column >= value
    pub fn gte<V: ToSql + Send + Sync + 'static>(self, value: V) -> Predicate {
        self.cmp(CmpOp::Gte, value)
    }

    fn cmp<V: ToSql + Send + Sync + 'static>(self, op: CmpOp, value: V) -> Predicate {
        Predicate::Cmp {
            field: self.field,
            op,
            value: Param::new(value),
        }
    }
}

/// A composable boolean condition over model fields.
///
/// Immutable once constructed; composed by nesting.
#[derive(Clone, Debug)]
pub enum Predicate {
    /// field op $n
    Cmp {
        field: &'static str,
        op: CmpOp,
        value: Param,
    },
    /// Both sides must hold.
    And(Box<Predicate>, Box<Predicate>),
    /// Either side must hold.
    Or(Box<Predicate>, Box<Predicate>),
    /// Negate the inner predicate.
    Not(Box<Predicate>),
}

impl Predicate {
    /// Combine with another predicate under AND.
    pub fn and(self, other: Predicate) -> Predicate {
        Predicate::And(Box::new(self), Box::new(other))
    }

    /// Combine with another predicate under OR.
    pub fn or(self, other: Predicate) -> Predicate {
        Predicate::Or(Box::new(self), Box::new(other))
    }

    /// Negate this predicate.
    pub fn not(self) -> Predicate {
        Predicate::Not(Box::new(self))
    }

    /// Render to a SQL fragment, appending bound values to `params` in the
    /// order their placeholders appear in the fragment.
    ///
    /// Every AND/OR node is parenthesized, so operator precedence in the
    /// rendered text matches the tree shape at any nesting depth.
    pub(crate) fn render(
        &self,
        table: &TableDescriptor,
        params: &mut ParamList,
    ) -> Result<String> {
        match self {
            Predicate::Cmp { field, op, value } => {
                let column = table.resolve(field)?;
                let idx = params.push(value.clone());
                Ok(format!("{} {} ${}", column.column, op.sql(), idx))
            }
            Predicate::And(left, right) => {
                let left = left.render(table, params)?;
                let right = right.render(table, params)?;
                Ok(format!("({} AND {})", left, right))
            }
            Predicate::Or(left, right) => {
                let left = left.render(table, params)?;
                let right = right.render(table, params)?;
                Ok(format!("({} OR {})", left, right))
            }
            Predicate::Not(inner) => {
                let inner = inner.render(table, params)?;
                Ok(format!("NOT ({})", inner))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::meta::ColumnDescriptor;

    fn users() -> TableDescriptor {
        const COLUMNS: &[ColumnDescriptor] = &[
            ColumnDescriptor {
                field: "id",
                column: "id",
                primary_key: true,
            },
            ColumnDescriptor {
                field: "first_name",
                column: "first_name",
                primary_key: false,
            },
            ColumnDescriptor {
                field: "age",
                column: "age",
                primary_key: false,
            },
        ];
        TableDescriptor {
            table: "users",
            columns: COLUMNS,
        }
    }

    #[test]
    fn simple_eq() {
        let table = users();
        let mut params = ParamList::new();
        let sql = col("id").eq(123i64).render(&table, &mut params).unwrap();
        assert_eq!(sql, "id = $1");
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn all_comparison_operators() {
        let table = users();
        let cases = [
            (col("age").eq(1i16), "age = $1"),
            (col("age").ne(1i16), "age <> $1"),
            (col("age").lt(1i16), "age < $1"),
            (col("age").lte(1i16), "age <= $1"),
            (col("age").gt(1i16), "age > $1"),
            (col("age").gte(1i16), "age >= $1"),
        ];
        for (pred, expected) in cases {
            let mut params = ParamList::new();
            assert_eq!(pred.render(&table, &mut params).unwrap(), expected);
        }
    }

    #[test]
    fn and_or_are_always_parenthesized() {
        let table = users();
        let mut params = ParamList::new();
        let pred = col("id")
            .eq(1i64)
            .and(col("age").gt(18i16))
            .or(col("first_name").eq("Deng").not());
        let sql = pred.render(&table, &mut params).unwrap();
        assert_eq!(sql, "((id = $1 AND age > $2) OR NOT (first_name = $3))");
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn deep_nesting_keeps_grouping() {
        let table = users();
        let mut params = ParamList::new();
        let pred = col("id")
            .eq(1i64)
            .or(col("id").eq(2i64))
            .and(col("age").lt(30i16).or(col("age").gt(60i16)));
        let sql = pred.render(&table, &mut params).unwrap();
        assert_eq!(sql, "((id = $1 OR id = $2) AND (age < $3 OR age > $4))");
    }

    #[test]
    fn params_follow_placeholder_order() {
        let table = users();
        let mut params = ParamList::new();
        let pred = col("age").gt(18i16).and(col("id").eq(7i64));
        let sql = pred.render(&table, &mut params).unwrap();
        // $1 binds the age literal, $2 the id literal, left to right.
        assert_eq!(sql, "(age > $1 AND id = $2)");
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn unknown_field_fails_at_render_time() {
        let table = users();
        // Construction succeeds; the failure surfaces on render.
        let pred = col("missing").eq(1i32);
        let mut params = ParamList::new();
        let err = pred.render(&table, &mut params).unwrap_err();
        assert!(matches!(err, Error::Column(_)));
    }
}
