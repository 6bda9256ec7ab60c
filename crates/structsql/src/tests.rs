//! Crate-level builder tests against a hand-written model.
//!
//! The derive macro cannot be used from inside this crate, so the model
//! implements [`Model`] by hand, mirroring exactly what the derive emits.

use crate::error::Error;
use crate::meta::{ColumnDescriptor, Model, TableDescriptor};
use crate::param::Param;
use crate::{Result, Row, col, insert, raw, select};

struct TestModel {
    id: i64,
    first_name: String,
    age: i16,
    last_name: Option<String>,
}

impl Model for TestModel {
    fn layout() -> TableDescriptor {
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
            ColumnDescriptor {
                field: "last_name",
                column: "last_name",
                primary_key: false,
            },
        ];
        TableDescriptor {
            table: "test_model",
            columns: COLUMNS,
        }
    }

    fn bind(&self, skip_pk: bool) -> Vec<Param> {
        let mut params = Vec::new();
        if !skip_pk {
            params.push(Param::new(self.id));
        }
        params.push(Param::new(self.first_name.clone()));
        params.push(Param::new(self.age));
        params.push(Param::new(self.last_name.clone()));
        params
    }

    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            id: row
                .try_get(0)
                .map_err(|e| Error::decode("id", e.to_string()))?,
            first_name: row
                .try_get(1)
                .map_err(|e| Error::decode("first_name", e.to_string()))?,
            age: row
                .try_get(2)
                .map_err(|e| Error::decode("age", e.to_string()))?,
            last_name: row
                .try_get(3)
                .map_err(|e| Error::decode("last_name", e.to_string()))?,
        })
    }
}

fn sample(name: &str, age: i16, last: Option<&str>) -> TestModel {
    TestModel {
        id: 0,
        first_name: name.to_string(),
        age,
        last_name: last.map(str::to_string),
    }
}

#[test]
fn select_without_filter() {
    let stmt = select::<TestModel>().build().unwrap();
    assert_eq!(
        stmt.sql,
        "SELECT id, first_name, age, last_name FROM test_model"
    );
    assert!(stmt.params.is_empty());
}

#[test]
fn select_with_filter() {
    let stmt = select::<TestModel>()
        .filter(col("id").eq(123i64))
        .build()
        .unwrap();
    assert_eq!(
        stmt.sql,
        "SELECT id, first_name, age, last_name FROM test_model WHERE id = $1"
    );
    assert_eq!(stmt.params.len(), 1);
}

#[test]
fn select_with_composed_filter() {
    let stmt = select::<TestModel>()
        .filter(
            col("first_name")
                .eq("Deng")
                .and(col("age").gte(18i16))
                .or(col("last_name").ne("Ming")),
        )
        .build()
        .unwrap();
    assert_eq!(
        stmt.sql,
        "SELECT id, first_name, age, last_name FROM test_model \
         WHERE ((first_name = $1 AND age >= $2) OR last_name <> $3)"
    );
    assert_eq!(stmt.params.len(), 3);
}

#[test]
fn select_filter_replaces_previous() {
    let stmt = select::<TestModel>()
        .filter(col("id").eq(1i64))
        .filter(col("age").gt(30i16))
        .build()
        .unwrap();
    assert_eq!(
        stmt.sql,
        "SELECT id, first_name, age, last_name FROM test_model WHERE age > $1"
    );
    assert_eq!(stmt.params.len(), 1);
}

#[test]
fn select_unknown_field_fails_on_build() {
    let err = select::<TestModel>()
        .filter(col("missing").eq(1i32))
        .build()
        .unwrap_err();
    assert!(matches!(err, Error::Column(_)));
}

#[test]
fn insert_single_row() {
    let stmt = insert::<TestModel>()
        .value(sample("Deng", 18, Some("Ming")))
        .build()
        .unwrap();
    assert_eq!(
        stmt.sql,
        "INSERT INTO test_model (id, first_name, age, last_name) \
         VALUES ($1, $2, $3, $4)"
    );
    assert_eq!(stmt.params.len(), 4);
}

#[test]
fn insert_multiple_rows_number_placeholders_continuously() {
    let stmt = insert::<TestModel>()
        .values([sample("a", 1, None), sample("b", 2, Some("x"))])
        .build()
        .unwrap();
    assert_eq!(
        stmt.sql,
        "INSERT INTO test_model (id, first_name, age, last_name) \
         VALUES ($1, $2, $3, $4), ($5, $6, $7, $8)"
    );
    assert_eq!(stmt.params.len(), 8);
}

#[test]
fn insert_skip_pk_drops_key_column_and_value() {
    let stmt = insert::<TestModel>()
        .skip_pk()
        .value(sample("Deng", 18, None))
        .build()
        .unwrap();
    assert_eq!(
        stmt.sql,
        "INSERT INTO test_model (first_name, age, last_name) VALUES ($1, $2, $3)"
    );
    assert_eq!(stmt.params.len(), 3);
}

#[test]
fn insert_without_values_fails() {
    let err = insert::<TestModel>().build().unwrap_err();
    assert!(matches!(err, Error::NoValues));
}

#[test]
fn raw_bind_collects_params_in_order() {
    let stmt = raw("UPDATE test_model SET age = $1 WHERE id = $2")
        .bind(21i16)
        .bind(7i64)
        .build();
    assert_eq!(stmt.sql, "UPDATE test_model SET age = $1 WHERE id = $2");
    assert_eq!(stmt.params.len(), 2);
}

#[test]
fn raw_without_binds() {
    let stmt = raw("TRUNCATE test_model").build();
    assert_eq!(stmt.sql, "TRUNCATE test_model");
    assert!(stmt.params.is_empty());
}

#[test]
fn optional_field_binds_null_and_value() {
    let with_null = sample("a", 1, None).bind(false);
    let with_value = sample("a", 1, Some("x")).bind(false);
    assert_eq!(with_null.len(), 4);
    assert_eq!(with_value.len(), 4);
}
