//! Column descriptors handed to export tools.
//!
//! Rendering (CSV, PDF, spreadsheets) lives outside the engine. Exporters get
//! an ordered descriptor list and rows as plain `key -> value` maps whose keys
//! match the descriptors.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::ReportRow;

/// How an exporter should format a column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// ISO `YYYY-MM-DD` string.
    Date,
    Text,
    /// Signed integer cents.
    Currency,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ExportColumn {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: ColumnKind,
}

const fn column(key: &'static str, label: &'static str, kind: ColumnKind) -> ExportColumn {
    ExportColumn { key, label, kind }
}

static REVENUE_REPORT_COLUMNS: [ExportColumn; 8] = [
    column("date", "Date", ColumnKind::Date),
    column("invoice_number", "Invoice #", ColumnKind::Text),
    column("project_number", "Project #", ColumnKind::Text),
    column("project_name", "Project", ColumnKind::Text),
    column("client_name", "Client", ColumnKind::Text),
    column("description", "Description", ColumnKind::Text),
    column("account_name", "Account", ColumnKind::Text),
    column("amount_minor", "Amount", ColumnKind::Currency),
];

/// Columns of the revenue line items report, in display order.
pub fn revenue_report_columns() -> &'static [ExportColumn] {
    &REVENUE_REPORT_COLUMNS
}

impl ReportRow {
    /// Projects the row into a `key -> value` map.
    ///
    /// Every field is present; missing optional values are `null`.
    pub fn to_record(&self) -> Map<String, Value> {
        let optional_id = |id: Option<Uuid>| Value::from(id.map(|id| id.to_string()));

        let mut record = Map::new();
        record.insert("id".into(), Value::from(self.id.to_string()));
        record.insert(
            "date".into(),
            Value::from(self.date.format("%Y-%m-%d").to_string()),
        );
        record.insert("invoice_number".into(), Value::from(self.invoice_number.clone()));
        record.insert("amount_minor".into(), Value::from(self.amount.cents()));
        record.insert("description".into(), Value::from(self.description.clone()));
        record.insert("account_code".into(), Value::from(self.account_code.clone()));
        record.insert("account_name".into(), Value::from(self.account_name.clone()));
        record.insert(
            "external_txn_id".into(),
            Value::from(self.external_txn_id.clone()),
        );
        record.insert("project_id".into(), optional_id(self.project_id));
        record.insert("client_id".into(), optional_id(self.client_id));
        record.insert("is_split".into(), Value::from(self.is_split));
        record.insert("project_number".into(), Value::from(self.project_number.clone()));
        record.insert("project_name".into(), Value::from(self.project_name.clone()));
        record.insert("client_name".into(), Value::from(self.client_name.clone()));
        record
    }
}
