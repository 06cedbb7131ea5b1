//! Label title uniqueness enforced by `PostgreSQL`.

use std::sync::Arc;

use super::helpers::PgHarness;
use pg_embedded_setup_unpriv::TestCluster;
use pg_embedded_setup_unpriv::test_support::shared_test_cluster;
use rstest::rstest;
use taskboard::task::{
    domain::{Label, Title},
    ports::{LabelRepository, RepositoryError},
    services::{ErrorKind, TaskBoardError},
};

#[rstest]
fn unique_index_reports_title_clash(shared_test_cluster: &'static TestCluster) -> eyre::Result<()> {
    let harness = PgHarness::prepare(shared_test_cluster, "pg_label_index")?;
    let (_owner, _board, task) = harness.seed()?;
    let first = Label::new(task.id(), Title::new("Backend", 255)?, &*harness.clock);
    let second = Label::new(task.id(), Title::new("BACKEND", 255)?, &*harness.clock);
    harness.runtime.block_on(harness.store.store_label(&first))?;

    let result = harness.runtime.block_on(harness.store.store_label(&second));

    eyre::ensure!(
        matches!(
            result,
            Err(RepositoryError::DuplicateLabelTitle { task_id, ref title })
                if task_id == task.id() && title == "BACKEND"
        ),
        "index violation should be a title clash, got {result:?}"
    );
    Ok(())
}

#[rstest]
fn rename_onto_existing_title_is_a_clash(
    shared_test_cluster: &'static TestCluster,
) -> eyre::Result<()> {
    let harness = PgHarness::prepare(shared_test_cluster, "pg_label_rename")?;
    let (_owner, _board, task) = harness.seed()?;
    let backend = Label::new(task.id(), Title::new("backend", 255)?, &*harness.clock);
    let mut urgent = Label::new(task.id(), Title::new("urgent", 255)?, &*harness.clock);
    harness.runtime.block_on(harness.store.store_label(&backend))?;
    harness.runtime.block_on(harness.store.store_label(&urgent))?;

    urgent.rename(Title::new("Backend", 255)?);
    let result = harness.runtime.block_on(harness.store.update_label(&urgent));

    let err = TaskBoardError::from(
        result
            .err()
            .ok_or_else(|| eyre::eyre!("rename should clash"))?,
    );
    eyre::ensure!(
        err.kind() == ErrorKind::Validation,
        "title clash should be a validation error, got {err:?}"
    );
    Ok(())
}

#[rstest]
fn racing_label_adds_report_duplicates(
    shared_test_cluster: &'static TestCluster,
) -> eyre::Result<()> {
    let harness = PgHarness::prepare(shared_test_cluster, "pg_label_race")?;
    let (owner, _board, task) = harness.seed()?;
    let labels = Arc::new(harness.labels);
    let task_id = task.id();

    let results = harness.runtime.block_on(async {
        let handles: Vec<_> = ["Backend", "backend", "BACKEND", "backend"]
            .into_iter()
            .map(|title| {
                let racer = Arc::clone(&labels);
                let actor = owner.clone();
                tokio::spawn(async move { racer.add_label(&actor, task_id, title).await })
            })
            .collect();
        let mut results = Vec::with_capacity(handles.len());
        for handle in handles {
            results.push(handle.await?);
        }
        Ok::<_, eyre::Report>(results)
    })?;

    let added = results.iter().filter(|result| result.is_ok()).count();
    eyre::ensure!(added == 1, "expected one label, got {added}");
    for err in results.iter().filter_map(|result| result.as_ref().err()) {
        eyre::ensure!(
            matches!(err, TaskBoardError::DuplicateLabel(_)),
            "losers should see a duplicate label, got {err:?}"
        );
        eyre::ensure!(err.kind() == ErrorKind::Validation, "duplicates are validation errors");
    }
    Ok(())
}
