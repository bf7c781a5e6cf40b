//! SQL statement construction from predicates and patches.
//!
//! Statements use SQLite positional `?` placeholders. Parameters are
//! returned in bind order: for UPDATE, SET assignments precede WHERE values.

use serde_json::Value;

use crate::predicate::{Patch, Predicate};

/// WHERE fragment with a leading space; empty when the predicate is absent
/// or empty (no filter, whole table).
fn where_clause(filter: Option<&Predicate>, params: &mut Vec<Value>) -> String {
    let Some(filter) = filter else {
        return String::new();
    };
    if filter.is_empty() {
        return String::new();
    }
    let conditions = filter
        .entries()
        .map(|(field, value)| {
            params.push(value.clone());
            format!("{field} = ?")
        })
        .collect::<Vec<_>>()
        .join(" AND ");
    format!(" WHERE {conditions}")
}

/// `SELECT * FROM <table> [WHERE ..]`.
pub fn build_select(table: &str, filter: Option<&Predicate>) -> (String, Vec<Value>) {
    let mut params = Vec::new();
    let sql = format!("SELECT * FROM {table}{}", where_clause(filter, &mut params));
    (sql, params)
}

/// `UPDATE <table> SET .. [WHERE ..]`.
pub fn build_update(table: &str, filter: &Predicate, patch: &Patch) -> (String, Vec<Value>) {
    let mut params = Vec::new();
    let assignments = patch
        .entries()
        .map(|(field, value)| {
            params.push(value.clone());
            format!("{field} = ?")
        })
        .collect::<Vec<_>>()
        .join(", ");
    let sql = format!(
        "UPDATE {table} SET {assignments}{}",
        where_clause(Some(filter), &mut params)
    );
    (sql, params)
}

/// `DELETE FROM <table> [WHERE ..]`.
pub fn build_delete(table: &str, filter: &Predicate) -> (String, Vec<Value>) {
    let mut params = Vec::new();
    let sql = format!(
        "DELETE FROM {table}{}",
        where_clause(Some(filter), &mut params)
    );
    (sql, params)
}
