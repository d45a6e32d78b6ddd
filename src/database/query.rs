use sqlx::{postgres::{PgArguments, PgRow}, FromRow, PgPool};
use uuid::Uuid;

use crate::database::manager::DatabaseError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn to_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone)]
pub struct OrderBy {
    pub column: String,
    pub sort: SortDirection,
}

/// Typed bind parameter for generated queries.
#[derive(Debug, Clone, PartialEq)]
pub enum Param {
    Uuid(Uuid),
}

#[derive(Debug, Clone)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<Param>,
}

/// Builds `SELECT <columns> FROM <table> WHERE <col> = $n ... ORDER BY ...`.
///
/// Identifiers are validated and quoted; values always travel as bind
/// parameters.
#[derive(Debug, Clone)]
pub struct SelectQuery {
    table_name: String,
    select_columns: Vec<String>,
    conditions: Vec<(String, Param)>,
    order: Vec<OrderBy>,
}

impl SelectQuery {
    pub fn new(table_name: impl Into<String>) -> Result<Self, DatabaseError> {
        let table_name = table_name.into();
        validate_identifier(&table_name)?;
        Ok(Self {
            table_name,
            select_columns: vec![],
            conditions: vec![],
            order: vec![],
        })
    }

    pub fn select(mut self, columns: &[&str]) -> Result<Self, DatabaseError> {
        for column in columns {
            validate_identifier(column)?;
        }
        self.select_columns = columns.iter().map(|c| c.to_string()).collect();
        Ok(self)
    }

    pub fn where_eq(mut self, column: &str, value: Param) -> Result<Self, DatabaseError> {
        validate_identifier(column)?;
        self.conditions.push((column.to_string(), value));
        Ok(self)
    }

    pub fn order_by(mut self, column: &str, sort: SortDirection) -> Result<Self, DatabaseError> {
        validate_identifier(column)?;
        self.order.push(OrderBy { column: column.to_string(), sort });
        Ok(self)
    }

    pub fn to_sql(&self) -> SqlResult {
        let select_clause = if self.select_columns.is_empty() {
            "*".to_string()
        } else {
            self.select_columns.iter().map(|c| format!("\"{}\"", c)).collect::<Vec<_>>().join(", ")
        };

        let where_clause = self
            .conditions
            .iter()
            .enumerate()
            .map(|(i, (column, _))| format!("\"{}\" = ${}", column, i + 1))
            .collect::<Vec<_>>()
            .join(" AND ");

        let order_clause = self
            .order
            .iter()
            .map(|o| format!("\"{}\" {}", o.column, o.sort.to_sql()))
            .collect::<Vec<_>>()
            .join(", ");

        let query = [
            format!("SELECT {}", select_clause),
            format!("FROM \"{}\"", self.table_name),
            if where_clause.is_empty() { String::new() } else { format!("WHERE {}", where_clause) },
            if order_clause.is_empty() { String::new() } else { format!("ORDER BY {}", order_clause) },
        ]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

        SqlResult {
            query,
            params: self.conditions.iter().map(|(_, p)| p.clone()).collect(),
        }
    }

    pub async fn fetch_all<T>(&self, pool: &PgPool) -> Result<Vec<T>, DatabaseError>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        let sql_result = self.to_sql();
        let mut q = sqlx::query_as::<_, T>(&sql_result.query);
        for p in sql_result.params.iter() {
            q = bind_param(q, p);
        }
        let rows = q.fetch_all(pool).await?;
        Ok(rows)
    }
}

fn bind_param<'q, O>(
    q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>,
    p: &'q Param,
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>
where
    O: for<'r> FromRow<'r, PgRow>,
{
    match p {
        Param::Uuid(id) => q.bind(*id),
    }
}

fn validate_identifier(name: &str) -> Result<(), DatabaseError> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    };

    if valid {
        Ok(())
    } else {
        Err(DatabaseError::InvalidIdentifier(name.to_string()))
    }
}
