use std::collections::BTreeSet;

use chrono::NaiveDate;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};

use engine::{
    Completion, Engine, EngineError, MoneyCents, ReportView, RevenueNew, Role,
    report::{ClientLookup, FactSource, ProjectLookup, UNASSIGNED},
};
use migration::MigratorTrait;
use uuid::Uuid;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 6, d).unwrap()
}

fn revenue(date: NaiveDate, cents: i64) -> RevenueNew {
    RevenueNew {
        date,
        amount: MoneyCents::new(cents),
        ..Default::default()
    }
}

#[tokio::test]
async fn empty_ledger_gives_empty_report() {
    let (engine, _db) = engine_with_db().await;

    let report = engine.revenue_report().await.unwrap();

    assert!(report.rows.is_empty());
    assert_eq!(report.total, MoneyCents::ZERO);
}

#[tokio::test]
async fn report_merges_projects_and_clients() {
    let (engine, _db) = engine_with_db().await;

    let acme = engine.new_client("Acme Builders").await.unwrap();
    let roof = engine
        .new_project("PR-1", "Roof Job", Some("Acme (legacy)"))
        .await
        .unwrap();
    let deck = engine.new_project("PR-2", "Deck", Some("Beta Corp")).await.unwrap();

    engine
        .new_revenue(RevenueNew {
            invoice_number: Some("INV-1".to_string()),
            project_id: Some(roof),
            client_id: Some(acme),
            ..revenue(day(3), 100_000)
        })
        .await
        .unwrap();
    engine
        .new_revenue(RevenueNew {
            project_id: Some(deck),
            ..revenue(day(10), 25_050)
        })
        .await
        .unwrap();
    engine
        .new_revenue(RevenueNew {
            description: Some("Walk-in sale".to_string()),
            ..revenue(day(7), 1_000)
        })
        .await
        .unwrap();

    let report = engine.revenue_report().await.unwrap();

    let dates: Vec<NaiveDate> = report.rows.iter().map(|r| r.date).collect();
    assert_eq!(dates, vec![day(10), day(7), day(3)]);

    let deck_row = &report.rows[0];
    assert_eq!(deck_row.project_number, "PR-2");
    assert_eq!(deck_row.client_name.as_deref(), Some("Beta Corp"));

    let walk_in = &report.rows[1];
    assert_eq!(walk_in.project_number, UNASSIGNED);
    assert_eq!(walk_in.project_name, UNASSIGNED);
    assert_eq!(walk_in.client_name, None);

    let roof_row = &report.rows[2];
    assert_eq!(roof_row.project_name, "Roof Job");
    assert_eq!(roof_row.client_name.as_deref(), Some("Acme Builders"));
    assert_eq!(roof_row.invoice_number.as_deref(), Some("INV-1"));

    assert_eq!(report.total, MoneyCents::new(126_050));
}

#[tokio::test]
async fn lookups_return_only_known_ids() {
    let (engine, _db) = engine_with_db().await;
    let project = engine.new_project("PR-9", "Fence", None).await.unwrap();
    let client = engine.new_client("Gamma").await.unwrap();

    let projects = engine
        .resolve_projects(&BTreeSet::from([project, Uuid::new_v4()]))
        .await
        .unwrap();
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[&project].project_number, "PR-9");

    let clients = engine
        .resolve_clients(&BTreeSet::from([client, Uuid::new_v4()]))
        .await
        .unwrap();
    assert_eq!(clients.len(), 1);
    assert_eq!(clients[&client], "Gamma");

    assert!(engine.resolve_projects(&BTreeSet::new()).await.unwrap().is_empty());
}

#[tokio::test]
async fn orphaned_project_reference_reports_unassigned() {
    let (engine, db) = engine_with_db().await;
    let project = engine.new_project("PR-4", "Basement", None).await.unwrap();
    engine
        .new_revenue(RevenueNew {
            project_id: Some(project),
            ..revenue(day(1), 500)
        })
        .await
        .unwrap();

    // Simulate a project removed behind the ledger's back.
    let backend = db.get_database_backend();
    db.execute(Statement::from_string(backend, "PRAGMA foreign_keys = OFF"))
        .await
        .unwrap();
    db.execute(Statement::from_string(backend, "DELETE FROM projects"))
        .await
        .unwrap();

    let report = engine.revenue_report().await.unwrap();
    assert_eq!(report.rows.len(), 1);
    assert_eq!(report.rows[0].project_number, UNASSIGNED);
    assert_eq!(report.rows[0].project_id, Some(project));
}

#[tokio::test]
async fn project_table_failure_fails_the_report() {
    let (engine, db) = engine_with_db().await;
    let project = engine.new_project("PR-5", "Attic", None).await.unwrap();
    engine
        .new_revenue(RevenueNew {
            project_id: Some(project),
            ..revenue(day(2), 900)
        })
        .await
        .unwrap();

    let backend = db.get_database_backend();
    db.execute(Statement::from_string(backend, "PRAGMA foreign_keys = OFF"))
        .await
        .unwrap();
    db.execute(Statement::from_string(backend, "DROP TABLE projects"))
        .await
        .unwrap();

    let err = engine.revenue_report().await.unwrap_err();
    assert!(matches!(
        err,
        EngineError::Resolution(engine::ResolutionKind::Project, _)
    ));

    let view = ReportView::new();
    let outcome = view.refresh(&engine.revenue_reconciler()).await;
    assert_eq!(outcome, Completion::Failed);
    let snapshot = view.snapshot().await;
    assert!(snapshot.rows.is_empty());
    assert!(snapshot.notice.is_some());
}

#[tokio::test]
async fn client_table_failure_degrades_client_names() {
    let (engine, db) = engine_with_db().await;
    let client = engine.new_client("Delta").await.unwrap();
    let project = engine
        .new_project("PR-6", "Porch", Some("Delta (from project)"))
        .await
        .unwrap();
    engine
        .new_revenue(RevenueNew {
            project_id: Some(project),
            client_id: Some(client),
            ..revenue(day(4), 700)
        })
        .await
        .unwrap();

    let backend = db.get_database_backend();
    db.execute(Statement::from_string(backend, "PRAGMA foreign_keys = OFF"))
        .await
        .unwrap();
    db.execute(Statement::from_string(backend, "DROP TABLE clients"))
        .await
        .unwrap();

    let report = engine.revenue_report().await.unwrap();
    assert_eq!(report.rows.len(), 1);
    assert_eq!(
        report.rows[0].client_name.as_deref(),
        Some("Delta (from project)")
    );
    assert_eq!(report.total, MoneyCents::new(700));
}

#[tokio::test]
async fn view_refresh_applies_engine_report() {
    let (engine, _db) = engine_with_db().await;
    engine.new_revenue(revenue(day(5), 1_234)).await.unwrap();

    let view = ReportView::new();
    let outcome = view.refresh(&engine.revenue_reconciler()).await;

    let snapshot = view.snapshot().await;
    assert_eq!(outcome, Completion::Applied);
    assert_eq!(snapshot.rows.len(), 1);
    assert_eq!(snapshot.total, MoneyCents::new(1_234));
    assert!(!snapshot.loading);
}

#[tokio::test]
async fn facts_are_listed_newest_first() {
    let (engine, _db) = engine_with_db().await;
    for d in [12, 2, 20, 9] {
        engine.new_revenue(revenue(day(d), 100)).await.unwrap();
    }

    let facts = engine.list_facts().await.unwrap();
    let dates: Vec<NaiveDate> = facts.iter().map(|f| f.date).collect();
    assert_eq!(dates, vec![day(20), day(12), day(9), day(2)]);
}

#[tokio::test]
async fn revenue_requires_existing_references() {
    let (engine, _db) = engine_with_db().await;

    let err = engine
        .new_revenue(RevenueNew {
            project_id: Some(Uuid::new_v4()),
            ..revenue(day(1), 100)
        })
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::KeyNotFound("project not exists".to_string()));

    let err = engine
        .new_revenue(RevenueNew {
            client_id: Some(Uuid::new_v4()),
            ..revenue(day(1), 100)
        })
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::KeyNotFound("client not exists".to_string()));

    assert!(engine.list_facts().await.unwrap().is_empty());
}

#[tokio::test]
async fn project_numbers_are_unique() {
    let (engine, _db) = engine_with_db().await;
    engine.new_project("PR-1", "Roof", None).await.unwrap();

    let err = engine.new_project(" PR-1 ", "Other", None).await.unwrap_err();
    assert_eq!(err, EngineError::ExistingKey("PR-1".to_string()));

    let err = engine.new_project("PR-2", "  ", None).await.unwrap_err();
    assert_eq!(
        err,
        EngineError::InvalidInput("project name must not be empty".to_string())
    );
}

#[tokio::test]
async fn authenticate_starts_session_with_stored_role() {
    let (engine, _db) = engine_with_db().await;
    engine.new_user("alice", "secret", Role::Editor).await.unwrap();

    let session = engine.authenticate("alice", "secret").await.unwrap().unwrap();
    assert_eq!(session.username(), "alice");
    assert_eq!(session.role(), Role::Editor);
    assert!(session.require(Role::Editor).is_ok());

    assert!(engine.authenticate("alice", "wrong").await.unwrap().is_none());
    assert!(engine.authenticate("bob", "secret").await.unwrap().is_none());

    let err = engine.new_user("alice", "x", Role::Viewer).await.unwrap_err();
    assert_eq!(err, EngineError::ExistingKey("alice".to_string()));
}
