//! Integration tests for the repository layer against a real database:
//! - Create full hierarchy (user -> agency -> mandate -> candidature)
//! - Unique constraint violations
//! - Guarded status updates (assign / release / set_status)
//! - Notification read-state operations

use chrono::{Duration, NaiveDate, Utc};
use sqlx::PgPool;

use filature_core::status::{CandidatureStatus, LicenseStatus, MandateStatus};
use filature_core::types::DbId;
use filature_db::models::candidature::CreateCandidature;
use filature_db::models::investigator::CreateInvestigator;
use filature_db::models::mandate::{CreateMandate, MandateListQuery};
use filature_db::models::notification::CreateNotification;
use filature_db::models::agency::CreateAgency;
use filature_db::models::user::{CreateUser, ROLE_AGENCY, ROLE_INVESTIGATOR};
use filature_db::repositories::{
    AgencyRepo, CandidatureRepo, InvestigatorRepo, MandateRepo, NotificationRepo, UserRepo,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_user(email: &str, role: &str) -> CreateUser {
    CreateUser {
        email: email.to_string(),
        password_hash: "$argon2id$fake".to_string(),
        role: role.to_string(),
        full_name: "Test User".to_string(),
    }
}

fn new_mandate(title: &str) -> CreateMandate {
    CreateMandate {
        title: title.to_string(),
        mandate_type: "surveillance".to_string(),
        description: "Evening surveillance of a commercial property.".to_string(),
        city: "Montreal".to_string(),
        region: "Monteregie".to_string(),
        postal_code: None,
        latitude: None,
        longitude: None,
        date_required: Utc::now() + Duration::days(7),
        duration_days: Some(3),
        priority: None,
        budget_cad_cents: None,
        assignment_type: None,
        direct_investigator_id: None,
    }
}

async fn seed_agency(pool: &PgPool, email: &str) -> DbId {
    let user = UserRepo::create(pool, &new_user(email, ROLE_AGENCY))
        .await
        .unwrap();
    AgencyRepo::create(
        pool,
        &CreateAgency {
            user_id: user.id,
            name: format!("Agence {email}"),
            permit_number: format!("AGP-{}", user.id),
            phone: None,
            city: Some("Montreal".to_string()),
            region: Some("Monteregie".to_string()),
        },
    )
    .await
    .unwrap()
    .id
}

async fn seed_investigator(pool: &PgPool, email: &str) -> DbId {
    let user = UserRepo::create(pool, &new_user(email, ROLE_INVESTIGATOR))
        .await
        .unwrap();
    InvestigatorRepo::create(
        pool,
        &CreateInvestigator {
            user_id: user.id,
            display_name: "Enq. Tremblay".to_string(),
            phone: None,
            city: Some("Laval".to_string()),
            region: Some("Laval".to_string()),
            specialities: None,
        },
    )
    .await
    .unwrap()
    .id
}

async fn seed_open_mandate(pool: &PgPool, agency_id: DbId, title: &str) -> DbId {
    MandateRepo::create(pool, agency_id, &new_mandate(title), "normal", "public", None)
        .await
        .unwrap()
        .id
}

// ---------------------------------------------------------------------------
// Hierarchy and constraints
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_full_hierarchy(pool: PgPool) {
    let agency_id = seed_agency(&pool, "agence@example.com").await;
    let investigator_id = seed_investigator(&pool, "enq@example.com").await;
    let mandate_id = seed_open_mandate(&pool, agency_id, "Filature en soiree").await;

    let mandate = MandateRepo::find_by_id(&pool, mandate_id)
        .await
        .unwrap()
        .expect("mandate should exist");
    assert_eq!(mandate.status_id, MandateStatus::Open.id());
    assert_eq!(mandate.assigned_to, None);
    assert_eq!(mandate.priority, "normal");

    let candidature = CandidatureRepo::create(
        &pool,
        &CreateCandidature {
            mandate_id,
            investigator_id,
            message: Some("Disponible toute la semaine.".to_string()),
        },
    )
    .await
    .unwrap();
    assert_eq!(candidature.status_id, CandidatureStatus::Interested.id());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_email_rejected(pool: PgPool) {
    UserRepo::create(&pool, &new_user("dup@example.com", ROLE_AGENCY))
        .await
        .unwrap();
    let err = UserRepo::create(&pool, &new_user("dup@example.com", ROLE_AGENCY))
        .await
        .unwrap_err();
    match err {
        sqlx::Error::Database(db_err) => {
            assert_eq!(db_err.code().as_deref(), Some("23505"));
        }
        other => panic!("expected unique violation, got {other:?}"),
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_candidature_rejected(pool: PgPool) {
    let agency_id = seed_agency(&pool, "a@example.com").await;
    let investigator_id = seed_investigator(&pool, "i@example.com").await;
    let mandate_id = seed_open_mandate(&pool, agency_id, "Verification").await;

    let create = CreateCandidature {
        mandate_id,
        investigator_id,
        message: None,
    };
    CandidatureRepo::create(&pool, &create).await.unwrap();
    let err = CandidatureRepo::create(&pool, &create).await.unwrap_err();
    match err {
        sqlx::Error::Database(db_err) => {
            assert!(db_err
                .constraint()
                .is_some_and(|c| c == "uq_candidatures_mandate_investigator"));
        }
        other => panic!("expected unique violation, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Guarded status updates
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_assign_if_open_happy_path(pool: PgPool) {
    let agency_id = seed_agency(&pool, "a@example.com").await;
    let investigator_id = seed_investigator(&pool, "i@example.com").await;
    let mandate_id = seed_open_mandate(&pool, agency_id, "Surveillance").await;

    let updated = MandateRepo::assign_if_open(&pool, mandate_id, investigator_id)
        .await
        .unwrap()
        .expect("open mandate should accept assignment");
    assert_eq!(updated.status_id, MandateStatus::InProgress.id());
    assert_eq!(updated.assigned_to, Some(investigator_id));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_assign_if_open_loses_race(pool: PgPool) {
    let agency_id = seed_agency(&pool, "a@example.com").await;
    let first = seed_investigator(&pool, "first@example.com").await;
    let second = seed_investigator(&pool, "second@example.com").await;
    let mandate_id = seed_open_mandate(&pool, agency_id, "Surveillance").await;

    assert!(MandateRepo::assign_if_open(&pool, mandate_id, first)
        .await
        .unwrap()
        .is_some());

    // Second assignment must match zero rows, not overwrite the first.
    assert!(MandateRepo::assign_if_open(&pool, mandate_id, second)
        .await
        .unwrap()
        .is_none());

    let mandate = MandateRepo::find_by_id(&pool, mandate_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(mandate.assigned_to, Some(first));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_release_assignment_requires_expected_investigator(pool: PgPool) {
    let agency_id = seed_agency(&pool, "a@example.com").await;
    let investigator_id = seed_investigator(&pool, "i@example.com").await;
    let mandate_id = seed_open_mandate(&pool, agency_id, "Surveillance").await;

    MandateRepo::assign_if_open(&pool, mandate_id, investigator_id)
        .await
        .unwrap()
        .unwrap();

    // Wrong expected assignee: no-op.
    assert!(MandateRepo::release_assignment(
        &pool,
        mandate_id,
        investigator_id + 1,
        MandateStatus::InProgress
    )
    .await
    .unwrap()
    .is_none());

    let released = MandateRepo::release_assignment(
        &pool,
        mandate_id,
        investigator_id,
        MandateStatus::InProgress,
    )
    .await
    .unwrap()
    .expect("matching release should succeed");
    assert_eq!(released.status_id, MandateStatus::Open.id());
    assert_eq!(released.assigned_to, None);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_set_status_guarded_rejects_stale_from(pool: PgPool) {
    let agency_id = seed_agency(&pool, "a@example.com").await;
    let mandate_id = seed_open_mandate(&pool, agency_id, "Surveillance").await;

    // open -> cancelled succeeds once...
    assert!(MandateRepo::set_status_guarded(
        &pool,
        mandate_id,
        MandateStatus::Open,
        MandateStatus::Cancelled
    )
    .await
    .unwrap()
    .is_some());

    // ...and a second attempt with the stale `from` state matches nothing.
    assert!(MandateRepo::set_status_guarded(
        &pool,
        mandate_id,
        MandateStatus::Open,
        MandateStatus::Cancelled
    )
    .await
    .unwrap()
    .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_count_in_progress_for_investigator(pool: PgPool) {
    let agency_id = seed_agency(&pool, "a@example.com").await;
    let investigator_id = seed_investigator(&pool, "i@example.com").await;

    assert_eq!(
        MandateRepo::count_in_progress_for_investigator(&pool, investigator_id)
            .await
            .unwrap(),
        0
    );

    for n in 0..3 {
        let mandate_id = seed_open_mandate(&pool, agency_id, &format!("Mandat {n}")).await;
        MandateRepo::assign_if_open(&pool, mandate_id, investigator_id)
            .await
            .unwrap()
            .unwrap();
    }

    assert_eq!(
        MandateRepo::count_in_progress_for_investigator(&pool, investigator_id)
            .await
            .unwrap(),
        3
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_filters_by_status_and_region(pool: PgPool) {
    let agency_id = seed_agency(&pool, "a@example.com").await;
    seed_open_mandate(&pool, agency_id, "Mandat un").await;
    let cancelled = seed_open_mandate(&pool, agency_id, "Mandat deux").await;
    MandateRepo::set_status_guarded(
        &pool,
        cancelled,
        MandateStatus::Open,
        MandateStatus::Cancelled,
    )
    .await
    .unwrap()
    .unwrap();

    let open = MandateRepo::list(
        &pool,
        Some(MandateStatus::Open.id()),
        &MandateListQuery::default(),
    )
    .await
    .unwrap();
    assert_eq!(open.len(), 1);
    assert_eq!(open[0].title, "Mandat un");

    let none = MandateRepo::list(
        &pool,
        None,
        &MandateListQuery {
            region: Some("Gaspesie".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert!(none.is_empty());
}

// ---------------------------------------------------------------------------
// Candidature resolution
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_resolved_candidature_never_mutated_again(pool: PgPool) {
    let agency_id = seed_agency(&pool, "a@example.com").await;
    let investigator_id = seed_investigator(&pool, "i@example.com").await;
    let mandate_id = seed_open_mandate(&pool, agency_id, "Surveillance").await;

    let candidature = CandidatureRepo::create(
        &pool,
        &CreateCandidature {
            mandate_id,
            investigator_id,
            message: None,
        },
    )
    .await
    .unwrap();

    assert!(CandidatureRepo::resolve_if_interested(
        &pool,
        candidature.id,
        CandidatureStatus::Rejected
    )
    .await
    .unwrap()
    .is_some());

    // Already resolved: second resolution is a no-op.
    assert!(CandidatureRepo::resolve_if_interested(
        &pool,
        candidature.id,
        CandidatureStatus::Accepted
    )
    .await
    .unwrap()
    .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reject_interested_siblings(pool: PgPool) {
    let agency_id = seed_agency(&pool, "a@example.com").await;
    let mandate_id = seed_open_mandate(&pool, agency_id, "Surveillance").await;

    let mut ids = Vec::new();
    for n in 0..3 {
        let investigator_id = seed_investigator(&pool, &format!("i{n}@example.com")).await;
        let c = CandidatureRepo::create(
            &pool,
            &CreateCandidature {
                mandate_id,
                investigator_id,
                message: None,
            },
        )
        .await
        .unwrap();
        ids.push(c.id);
    }

    let rejected = CandidatureRepo::reject_interested_siblings(&pool, mandate_id, ids[0])
        .await
        .unwrap();
    assert_eq!(rejected.len(), 2);
    assert!(rejected.iter().all(|c| c.id != ids[0]));
    assert!(rejected
        .iter()
        .all(|c| c.status_id == CandidatureStatus::Rejected.id()));
}

// ---------------------------------------------------------------------------
// Notifications and profile data
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_notification_read_state(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("n@example.com", ROLE_INVESTIGATOR))
        .await
        .unwrap();

    let create = CreateNotification {
        user_id: user.id,
        mandate_id: None,
        title: "Candidature acceptee".to_string(),
        message: "Votre candidature a ete acceptee.".to_string(),
        notification_type: "candidature_accepted".to_string(),
    };
    let id = NotificationRepo::create(&pool, &create).await.unwrap();
    NotificationRepo::create(&pool, &create).await.unwrap();

    assert_eq!(
        NotificationRepo::unread_count(&pool, user.id).await.unwrap(),
        2
    );
    assert!(NotificationRepo::mark_read(&pool, id, user.id)
        .await
        .unwrap());
    // Marking twice is a no-op.
    assert!(!NotificationRepo::mark_read(&pool, id, user.id)
        .await
        .unwrap());
    assert_eq!(
        NotificationRepo::mark_all_read(&pool, user.id).await.unwrap(),
        1
    );

    let unread = NotificationRepo::list_for_user(&pool, user.id, true, None, None)
        .await
        .unwrap();
    assert!(unread.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unknown_notification_type_rejected(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("n@example.com", ROLE_INVESTIGATOR))
        .await
        .unwrap();

    let err = NotificationRepo::create(
        &pool,
        &CreateNotification {
            user_id: user.id,
            mandate_id: None,
            title: "t".to_string(),
            message: "m".to_string(),
            notification_type: "carrier_pigeon".to_string(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, sqlx::Error::Database(_)));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unavailable_dates_round_trip(pool: PgPool) {
    let investigator_id = seed_investigator(&pool, "i@example.com").await;
    let day = NaiveDate::from_ymd_opt(2030, 6, 15).unwrap();

    InvestigatorRepo::add_unavailable_date(&pool, investigator_id, day)
        .await
        .unwrap();
    // Idempotent re-add.
    InvestigatorRepo::add_unavailable_date(&pool, investigator_id, day)
        .await
        .unwrap();

    let dates = InvestigatorRepo::list_unavailable_dates(&pool, investigator_id)
        .await
        .unwrap();
    assert_eq!(dates.len(), 1);
    assert_eq!(dates[0].unavailable_on, day);

    assert!(
        InvestigatorRepo::remove_unavailable_date(&pool, investigator_id, day)
            .await
            .unwrap()
    );
    assert!(
        !InvestigatorRepo::remove_unavailable_date(&pool, investigator_id, day)
            .await
            .unwrap()
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_agency_license_decision(pool: PgPool) {
    let agency_id = seed_agency(&pool, "a@example.com").await;

    let pending = AgencyRepo::list_pending_verification(&pool, 50, 0)
        .await
        .unwrap();
    assert_eq!(pending.len(), 1);

    let verified = AgencyRepo::set_license_status(&pool, agency_id, LicenseStatus::Verified, None)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(verified.license_status_id, LicenseStatus::Verified.id());

    assert!(AgencyRepo::list_pending_verification(&pool, 50, 0)
        .await
        .unwrap()
        .is_empty());
}
