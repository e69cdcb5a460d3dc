//! Version log integration tests.
//!
//! Appends go through the public store API only: read latest, merge, append.

use std::sync::Arc;

use rstest::rstest;

use dossier_core::entities::CriterionUpdate;
use dossier_core::enums::{Criterion, Strength, VersionSource};
use dossier_core::version_merge::{apply_updates, seed_assessments};
use dossier_db::error::DatabaseError;
use dossier_db::service::DossierStore;

async fn test_store() -> DossierStore {
    DossierStore::new_local(":memory:").await.unwrap()
}

fn update(criterion: Criterion, strength: Strength, evidence: &[&str]) -> CriterionUpdate {
    CriterionUpdate {
        criterion,
        strength,
        reason: format!("{strength} after review"),
        evidence: evidence.iter().map(ToString::to_string).collect(),
    }
}

#[tokio::test]
async fn weak_to_strong_adds_only_unseen_excerpt() {
    let store = test_store().await;

    let v1_criteria = apply_updates(
        &seed_assessments(),
        &[update(Criterion::Awards, Strength::Weak, &["Regional prize 2019"])],
    );
    let v1 = store
        .append_version("case-1", 0, v1_criteria, VersionSource::Incremental)
        .await
        .unwrap();

    let v2_criteria = apply_updates(
        &v1.criteria,
        &[update(
            Criterion::Awards,
            Strength::Strong,
            &["Regional prize 2019", "National medal 2022"],
        )],
    );
    let v2 = store
        .append_version("case-1", v1.version, v2_criteria, VersionSource::Incremental)
        .await
        .unwrap();

    assert_eq!(v2.version, 2);
    let awards = v2.assessment(Criterion::Awards).unwrap();
    assert_eq!(awards.strength, Strength::Strong);
    assert_eq!(awards.evidence.len(), 2);
    assert_eq!(v2.summary().criteria_satisfied_count, 1);
}

#[tokio::test]
async fn concurrent_appends_on_same_base_produce_one_version() {
    let store = Arc::new(test_store().await);

    let mut handles = Vec::new();
    for _ in 0..4 {
        let store = Arc::clone(&store);
        handles.push(tokio::spawn(async move {
            store
                .append_version("case-1", 0, seed_assessments(), VersionSource::Agent)
                .await
        }));
    }

    let mut ok = 0;
    let mut conflicts = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => ok += 1,
            Err(DatabaseError::VersionConflict { .. }) => conflicts += 1,
            Err(e) => panic!("unexpected error: {e}"),
        }
    }

    assert_eq!(ok, 1);
    assert_eq!(conflicts, 3);
    let versions = store.list_versions("case-1", 10).await.unwrap();
    assert_eq!(versions.len(), 1);
    assert_eq!(versions[0].version, 1);
}

#[rstest]
#[case::behind(0)]
#[case::ahead(5)]
#[tokio::test]
async fn stale_or_future_base_is_a_conflict(#[case] base: u32) {
    let store = test_store().await;
    store
        .append_version("case-1", 0, seed_assessments(), VersionSource::Extraction)
        .await
        .unwrap();
    store
        .append_version("case-1", 1, seed_assessments(), VersionSource::Incremental)
        .await
        .unwrap();

    let err = store
        .append_version("case-1", base, seed_assessments(), VersionSource::Incremental)
        .await
        .unwrap_err();
    assert!(
        matches!(err, DatabaseError::VersionConflict { expected, .. } if expected == base),
        "unexpected error: {err}"
    );
    assert_eq!(store.latest_version("case-1").await.unwrap().unwrap().version, 2);
}

#[tokio::test]
async fn versions_survive_reopening_the_database_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("dossier.db");
    let path = path.to_str().unwrap();

    {
        let store = DossierStore::new_local(path).await.unwrap();
        let criteria = apply_updates(
            &seed_assessments(),
            &[update(Criterion::Judging, Strength::Strong, &["Program committee 2023"])],
        );
        store
            .append_version("case-7", 0, criteria, VersionSource::Incremental)
            .await
            .unwrap();
    }

    let reopened = DossierStore::new_local(path).await.unwrap();
    let latest = reopened.latest_version("case-7").await.unwrap().unwrap();
    assert_eq!(latest.version, 1);
    assert_eq!(
        latest.assessment(Criterion::Judging).unwrap().strength,
        Strength::Strong
    );
    assert_eq!(latest.strong_count, 1);
}
