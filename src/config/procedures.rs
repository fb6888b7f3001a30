//! Names of the generic procedures the gateway relies on.

/// Each field is overridable through the env key listed in `ProcedureNames::ENV_KEYS`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProcedureNames {
    pub get_all_tables: String,
    pub get_table_columns: String,
    pub get_records: String,
    pub create_record: String,
    pub update_record: String,
    pub delete_record: String,
    pub get_all_procedures: String,
    pub get_procedure_parameters: String,
}

impl Default for ProcedureNames {
    fn default() -> Self {
        ProcedureNames {
            get_all_tables: "GetAllTables".into(),
            get_table_columns: "GetTableColumns".into(),
            get_records: "GetRecords".into(),
            create_record: "CreateRecord".into(),
            update_record: "UpdateRecord".into(),
            delete_record: "DeleteRecord".into(),
            get_all_procedures: "GetAllProcedures".into(),
            get_procedure_parameters: "GetProcedureParameters".into(),
        }
    }
}

impl ProcedureNames {
    pub const ENV_KEYS: [&'static str; 8] = [
        "PROC_GET_ALL_TABLES",
        "PROC_GET_TABLE_COLUMNS",
        "PROC_GET_RECORDS",
        "PROC_CREATE_RECORD",
        "PROC_UPDATE_RECORD",
        "PROC_DELETE_RECORD",
        "PROC_GET_ALL_PROCEDURES",
        "PROC_GET_PROCEDURE_PARAMETERS",
    ];

    pub(crate) fn from_lookup(lookup: &dyn Fn(&str) -> Option<String>) -> Self {
        let mut names = ProcedureNames::default();
        for (key, slot) in Self::ENV_KEYS.iter().zip(names.slots_mut()) {
            if let Some(v) = lookup(key).filter(|v| !v.trim().is_empty()) {
                *slot = v.trim().to_string();
            }
        }
        names
    }

    fn slots_mut(&mut self) -> [&mut String; 8] {
        [
            &mut self.get_all_tables,
            &mut self.get_table_columns,
            &mut self.get_records,
            &mut self.create_record,
            &mut self.update_record,
            &mut self.delete_record,
            &mut self.get_all_procedures,
            &mut self.get_procedure_parameters,
        ]
    }

    fn all(&self) -> [&str; 8] {
        [
            &self.get_all_tables,
            &self.get_table_columns,
            &self.get_records,
            &self.create_record,
            &self.update_record,
            &self.delete_record,
            &self.get_all_procedures,
            &self.get_procedure_parameters,
        ]
    }

    /// Generic procedures are infrastructure and never exposed as RPC routes.
    pub fn is_generic(&self, name: &str) -> bool {
        self.all().iter().any(|n| n.eq_ignore_ascii_case(name))
    }
}
