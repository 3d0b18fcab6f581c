use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{MoneyCents, Project, Revenue, util::normalize_optional_text};

/// Project number/name shown when a revenue line has no resolvable project.
pub const UNASSIGNED: &str = "Unassigned";

/// A revenue line merged with its resolved project and client.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRow {
    pub id: Uuid,
    pub date: NaiveDate,
    pub invoice_number: Option<String>,
    #[serde(rename = "amount_minor")]
    pub amount: MoneyCents,
    pub description: Option<String>,
    pub account_code: Option<String>,
    pub account_name: Option<String>,
    pub external_txn_id: Option<String>,
    pub project_id: Option<Uuid>,
    pub client_id: Option<Uuid>,
    pub is_split: bool,
    pub project_number: String,
    pub project_name: String,
    pub client_name: Option<String>,
}

impl ReportRow {
    /// Builds the row for `fact`.
    ///
    /// Fallbacks, in order:
    /// - `project_number`: project's number, then [`UNASSIGNED`].
    /// - `project_name`: project's name, then [`UNASSIGNED`].
    /// - `client_name`: `client_name` (direct lookup by the fact's client id),
    ///   then the project's embedded client name, then none.
    ///
    /// Blank strings count as missing at every step.
    pub(crate) fn merge(
        fact: Revenue,
        project: Option<&Project>,
        client_name: Option<&str>,
    ) -> Self {
        let project_number = project
            .and_then(|p| normalize_optional_text(Some(p.project_number.as_str())))
            .unwrap_or_else(|| UNASSIGNED.to_string());
        let project_name = project
            .and_then(|p| normalize_optional_text(Some(p.project_name.as_str())))
            .unwrap_or_else(|| UNASSIGNED.to_string());
        let client_name = normalize_optional_text(client_name)
            .or_else(|| project.and_then(|p| normalize_optional_text(p.client_name.as_deref())));

        Self {
            id: fact.id,
            date: fact.date,
            invoice_number: normalize_optional_text(fact.invoice_number.as_deref()),
            amount: fact.amount,
            description: normalize_optional_text(fact.description.as_deref()),
            account_code: normalize_optional_text(fact.account_code.as_deref()),
            account_name: normalize_optional_text(fact.account_name.as_deref()),
            external_txn_id: normalize_optional_text(fact.external_txn_id.as_deref()),
            project_id: fact.project_id,
            client_id: fact.client_id,
            is_split: fact.is_split,
            project_number,
            project_name,
            client_name,
        }
    }
}
