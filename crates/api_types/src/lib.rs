use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Response body for every create endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct Created {
    pub id: Uuid,
}

pub mod client {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ClientNew {
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ClientView {
        pub id: Uuid,
        pub name: String,
    }
}

pub mod project {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ProjectNew {
        /// Unique job number, e.g. `PR-104`.
        pub project_number: String,
        pub project_name: String,
        /// Client name stored on the project itself.
        pub client_name: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ProjectView {
        pub id: Uuid,
        pub project_number: String,
        pub project_name: String,
        pub client_name: Option<String>,
    }
}

pub mod revenue {
    use super::*;

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct RevenueNew {
        /// `YYYY-MM-DD`.
        pub date: NaiveDate,
        pub invoice_number: Option<String>,
        /// Signed amount in cents. Must not be 0.
        pub amount_minor: i64,
        pub description: Option<String>,
        pub account_code: Option<String>,
        pub account_name: Option<String>,
        pub external_txn_id: Option<String>,
        pub project_id: Option<Uuid>,
        pub client_id: Option<Uuid>,
        #[serde(default)]
        pub is_split: bool,
    }
}

pub mod report {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum ColumnKind {
        Date,
        Text,
        Currency,
    }

    /// Export column descriptor.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ColumnView {
        pub key: String,
        pub label: String,
        pub kind: ColumnKind,
    }

    /// Revenue line items report.
    ///
    /// Every row is a `key -> value` map containing at least every column key.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct RevenueReport {
        pub columns: Vec<ColumnView>,
        pub rows: Vec<serde_json::Map<String, serde_json::Value>>,
        pub total_minor: i64,
    }
}
