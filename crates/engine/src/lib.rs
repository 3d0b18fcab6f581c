//! Back-office engine: clients, projects, revenue lines and the revenue
//! report.
//!
//! The [`Engine`] owns the database connection and exposes the ledger
//! operations. Reports are built by [`report::Reconciler`], for which the
//! engine is the fact source and both lookup services.

pub use clients::Client;
pub use error::{EngineError, ResolutionKind};
pub use money::MoneyCents;
pub use ops::{Engine, EngineBuilder};
pub use projects::Project;
pub use report::{
    ColumnKind, Completion, ExportColumn, Notice, Reconciler, Report, ReportRow, ReportSnapshot,
    ReportView, revenue_report_columns,
};
pub use revenues::{Revenue, RevenueNew};
pub use session::{Role, Session};

mod clients;
mod error;
mod money;
mod ops;
mod projects;
pub mod report;
mod revenues;
mod session;
mod users;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
