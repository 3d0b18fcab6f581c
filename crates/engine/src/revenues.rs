//! Revenue line items.
//!
//! A `Revenue` is the fact record reports are built from. It references its
//! project and client by id only; display fields for those are resolved at
//! report time (see [`crate::report`]).

use chrono::NaiveDate;
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    EngineError, MoneyCents,
    util::{normalize_optional_text, parse_uuid},
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Revenue {
    pub id: Uuid,
    pub date: NaiveDate,
    /// Invoice number issued by the accounting system.
    pub invoice_number: Option<String>,
    pub amount: MoneyCents,
    pub description: Option<String>,
    /// Short account label, e.g. `4000`.
    pub account_code: Option<String>,
    /// Full account label, e.g. `4000 Construction Income`.
    pub account_name: Option<String>,
    /// Transaction id in the bank feed or accounting system.
    pub external_txn_id: Option<String>,
    pub project_id: Option<Uuid>,
    pub client_id: Option<Uuid>,
    /// `true` when this line is one part of a larger split transaction.
    pub is_split: bool,
}

/// Input for recording a new revenue line.
#[derive(Clone, Debug, Default)]
pub struct RevenueNew {
    pub date: NaiveDate,
    pub invoice_number: Option<String>,
    pub amount: MoneyCents,
    pub description: Option<String>,
    pub account_code: Option<String>,
    pub account_name: Option<String>,
    pub external_txn_id: Option<String>,
    pub project_id: Option<Uuid>,
    pub client_id: Option<Uuid>,
    pub is_split: bool,
}

impl Revenue {
    pub fn new(input: RevenueNew) -> Result<Self, EngineError> {
        if input.amount.is_zero() {
            return Err(EngineError::InvalidAmount(
                "amount must not be zero".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            date: input.date,
            invoice_number: normalize_optional_text(input.invoice_number.as_deref()),
            amount: input.amount,
            description: normalize_optional_text(input.description.as_deref()),
            account_code: normalize_optional_text(input.account_code.as_deref()),
            account_name: normalize_optional_text(input.account_name.as_deref()),
            external_txn_id: normalize_optional_text(input.external_txn_id.as_deref()),
            project_id: input.project_id,
            client_id: input.client_id,
            is_split: input.is_split,
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "revenues")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub date: Date,
    pub invoice_number: Option<String>,
    pub amount_minor: i64,
    pub description: Option<String>,
    pub account_code: Option<String>,
    pub account_name: Option<String>,
    pub external_txn_id: Option<String>,
    pub project_id: Option<String>,
    pub client_id: Option<String>,
    pub is_split: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::projects::Entity",
        from = "Column::ProjectId",
        to = "super::projects::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Projects,
    #[sea_orm(
        belongs_to = "super::clients::Entity",
        from = "Column::ClientId",
        to = "super::clients::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Clients,
}

impl Related<super::projects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Projects.def()
    }
}

impl Related<super::clients::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Clients.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Revenue> for ActiveModel {
    fn from(value: &Revenue) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            date: ActiveValue::Set(value.date),
            invoice_number: ActiveValue::Set(value.invoice_number.clone()),
            amount_minor: ActiveValue::Set(value.amount.cents()),
            description: ActiveValue::Set(value.description.clone()),
            account_code: ActiveValue::Set(value.account_code.clone()),
            account_name: ActiveValue::Set(value.account_name.clone()),
            external_txn_id: ActiveValue::Set(value.external_txn_id.clone()),
            project_id: ActiveValue::Set(value.project_id.map(|id| id.to_string())),
            client_id: ActiveValue::Set(value.client_id.map(|id| id.to_string())),
            is_split: ActiveValue::Set(value.is_split),
        }
    }
}

impl TryFrom<Model> for Revenue {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "revenue")?,
            date: model.date,
            invoice_number: normalize_optional_text(model.invoice_number.as_deref()),
            amount: MoneyCents::new(model.amount_minor),
            description: normalize_optional_text(model.description.as_deref()),
            account_code: normalize_optional_text(model.account_code.as_deref()),
            account_name: normalize_optional_text(model.account_name.as_deref()),
            external_txn_id: normalize_optional_text(model.external_txn_id.as_deref()),
            project_id: model
                .project_id
                .as_deref()
                .map(|id| parse_uuid(id, "project"))
                .transpose()?,
            client_id: model
                .client_id
                .as_deref()
                .map(|id| parse_uuid(id, "client"))
                .transpose()?,
            is_split: model.is_split,
        })
    }
}
