//! Route table: descriptors keyed by path segment, built once at startup and read-only afterwards.
//! One generic handler per route kind looks its descriptor up here.

use crate::catalog::{ColumnDescriptor, TableDescriptor};
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;
use thiserror::Error;

/// Fixed routes; a table or procedure with one of these names would be unreachable.
pub const RESERVED_SEGMENTS: &[&str] = &[
    "getAllTables",
    "getTableColumns",
    "getTableData",
    "health",
    "ready",
    "version",
];

/// Why a table or procedure got no routes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    #[error("no primary key column")]
    NoPrimaryKey,
    #[error("composite primary key ({0} columns)")]
    CompositePrimaryKey(usize),
    #[error("name is reserved by a fixed route")]
    Reserved,
    #[error("name is not usable as a path segment")]
    InvalidName,
    #[error("already registered")]
    Duplicate,
    #[error("a table with the same name owns the route")]
    ShadowsTable,
}

#[derive(Clone, Debug)]
pub struct TableRoute {
    pub table: TableDescriptor,
    pub primary_key: ColumnDescriptor,
}

#[derive(Clone, Debug)]
pub struct ProcedureRoute {
    pub name: String,
}

/// What a path segment resolves to.
pub enum Route<'a> {
    Table(&'a TableRoute),
    Procedure(&'a ProcedureRoute),
}

#[derive(Clone, Debug, Default)]
pub struct RouteTable {
    tables: BTreeMap<String, TableRoute>,
    procedures: BTreeMap<String, ProcedureRoute>,
}

fn segment_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_$.]*$").expect("static pattern"))
}

fn check_segment(name: &str) -> Result<(), SkipReason> {
    if RESERVED_SEGMENTS.contains(&name) {
        return Err(SkipReason::Reserved);
    }
    if !segment_pattern().is_match(name) {
        return Err(SkipReason::InvalidName);
    }
    Ok(())
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register list/get, create, update and delete for a table. Requires exactly one primary-key column.
    pub fn register_table(&mut self, table: TableDescriptor) -> Result<(), SkipReason> {
        check_segment(&table.name)?;
        if self.tables.contains_key(&table.name) {
            return Err(SkipReason::Duplicate);
        }
        let primary_key = match table.primary_keys().as_slice() {
            [] => return Err(SkipReason::NoPrimaryKey),
            [pk] => (*pk).clone(),
            many => return Err(SkipReason::CompositePrimaryKey(many.len())),
        };
        self.tables.insert(table.name.clone(), TableRoute { table, primary_key });
        Ok(())
    }

    /// Register `POST /{name}` for a procedure. Tables win name collisions.
    pub fn register_procedure(&mut self, name: &str) -> Result<(), SkipReason> {
        check_segment(name)?;
        if self.tables.contains_key(name) {
            return Err(SkipReason::ShadowsTable);
        }
        if self.procedures.contains_key(name) {
            return Err(SkipReason::Duplicate);
        }
        self.procedures.insert(
            name.to_string(),
            ProcedureRoute {
                name: name.to_string(),
            },
        );
        Ok(())
    }

    pub fn table(&self, segment: &str) -> Option<&TableRoute> {
        self.tables.get(segment)
    }

    pub fn procedure(&self, segment: &str) -> Option<&ProcedureRoute> {
        self.procedures.get(segment)
    }

    pub fn resolve(&self, segment: &str) -> Option<Route<'_>> {
        self.table(segment)
            .map(Route::Table)
            .or_else(|| self.procedure(segment).map(Route::Procedure))
    }

    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    pub fn procedure_names(&self) -> impl Iterator<Item = &str> {
        self.procedures.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(name: &str, pk: bool) -> ColumnDescriptor {
        ColumnDescriptor {
            name: name.into(),
            data_type: "int".into(),
            max_length: None,
            nullable: !pk,
            is_primary_key: pk,
        }
    }

    fn table(name: &str, columns: Vec<ColumnDescriptor>) -> TableDescriptor {
        TableDescriptor {
            name: name.into(),
            columns,
        }
    }

    #[test]
    fn table_with_single_primary_key_is_registered() {
        let mut routes = RouteTable::new();
        routes
            .register_table(table("Articles", vec![column("Id", true), column("Stock", false)]))
            .unwrap();
        let route = routes.table("Articles").unwrap();
        assert_eq!(route.primary_key.name, "Id");
        assert!(matches!(routes.resolve("Articles"), Some(Route::Table(_))));
    }

    #[test]
    fn tables_without_exactly_one_primary_key_are_skipped() {
        let mut routes = RouteTable::new();
        assert_eq!(
            routes.register_table(table("Logs", vec![column("Line", false)])),
            Err(SkipReason::NoPrimaryKey)
        );
        assert_eq!(
            routes.register_table(table("Pairs", vec![column("A", true), column("B", true)])),
            Err(SkipReason::CompositePrimaryKey(2))
        );
        assert!(routes.resolve("Logs").is_none());
        assert_eq!(routes.table_names().count(), 0);
    }

    #[test]
    fn reserved_and_malformed_names_are_skipped() {
        let mut routes = RouteTable::new();
        assert_eq!(routes.register_procedure("getAllTables"), Err(SkipReason::Reserved));
        assert_eq!(routes.register_procedure("bad/name"), Err(SkipReason::InvalidName));
    }

    #[test]
    fn tables_win_name_collisions() {
        let mut routes = RouteTable::new();
        routes.register_table(table("Precios", vec![column("Id", true)])).unwrap();
        assert_eq!(routes.register_procedure("Precios"), Err(SkipReason::ShadowsTable));
        routes.register_procedure("StoreDePrueba").unwrap();
        assert_eq!(routes.register_procedure("StoreDePrueba"), Err(SkipReason::Duplicate));
        assert!(matches!(routes.resolve("StoreDePrueba"), Some(Route::Procedure(_))));
        assert_eq!(routes.procedure_names().collect::<Vec<_>>(), vec!["StoreDePrueba"]);
    }
}
