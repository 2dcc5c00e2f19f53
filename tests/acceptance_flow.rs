// Technician accept/decline scenarios, including multi-worker staffing.
mod common;

use std::time::Duration;

use uuid::Uuid;
use wireconnect::db::jobdb::JobStore;
use wireconnect::models::jobmodel::JobStatus;
use wireconnect::service::acceptance_service::{OfferAction, RespondOutcome};
use wireconnect::service::assignment_service::AssignmentOutcome;
use wireconnect::service::error::ServiceError;

use common::{book_dto, harness, online_technician};

const WINDOW: Duration = Duration::from_secs(60);

#[tokio::test]
async fn single_worker_accept_finalizes_job() {
    let h = harness(WINDOW);
    let client = Uuid::new_v4();

    let tech = online_technician(6.6020, 3.3520, 4.0);
    h.store.technicians.lock().unwrap().push(tech.clone());

    let outcome = h.jobs.book_job(client, book_dto(1)).await.unwrap();
    let job_id = outcome.job().id;

    let outcome = h
        .acceptance
        .respond(job_id, tech.user_id, OfferAction::Accept)
        .await
        .unwrap();

    let RespondOutcome::Accepted { job } = outcome else {
        panic!("expected acceptance");
    };

    assert_eq!(job.status, JobStatus::Accepted);
    assert_eq!(job.assigned_tech_ids, vec![tech.user_id]);
    assert!(job.accepted_at.is_some());
    assert!(job.expires_at.is_none());
}

#[tokio::test]
async fn accept_is_idempotent() {
    let h = harness(WINDOW);
    let client = Uuid::new_v4();

    let tech = online_technician(6.6020, 3.3520, 4.0);
    h.store.technicians.lock().unwrap().push(tech.clone());

    let outcome = h.jobs.book_job(client, book_dto(1)).await.unwrap();
    let job_id = outcome.job().id;

    h.acceptance
        .respond(job_id, tech.user_id, OfferAction::Accept)
        .await
        .unwrap();

    // A second accept changes nothing: no duplicate entry, no new transition.
    let outcome = h
        .acceptance
        .respond(job_id, tech.user_id, OfferAction::Accept)
        .await
        .unwrap();

    let RespondOutcome::Accepted { job } = outcome else {
        panic!("expected acceptance");
    };

    assert_eq!(job.assigned_tech_ids, vec![tech.user_id]);
    assert_eq!(job.status, JobStatus::Accepted);
}

#[tokio::test]
async fn decline_moves_offer_to_next_candidate() {
    let h = harness(WINDOW);
    let client = Uuid::new_v4();

    let first = online_technician(6.6020, 3.3520, 4.0);
    let second = online_technician(6.6500, 3.4000, 4.0);
    h.store.technicians.lock().unwrap().push(first.clone());
    h.store.technicians.lock().unwrap().push(second.clone());

    let outcome = h.jobs.book_job(client, book_dto(1)).await.unwrap();
    let job_id = outcome.job().id;

    let outcome = h
        .acceptance
        .respond(job_id, first.user_id, OfferAction::Decline)
        .await
        .unwrap();

    let RespondOutcome::Declined { job } = outcome else {
        panic!("expected decline");
    };

    assert_eq!(job.status, JobStatus::PendingAccept);
    assert_eq!(job.assigned_tech_id, Some(second.user_id));
    assert_eq!(job.declined_techs, vec![first.user_id]);
}

#[tokio::test]
async fn responding_without_holding_the_offer_is_unauthorized() {
    let h = harness(WINDOW);
    let client = Uuid::new_v4();

    let offeree = online_technician(6.6020, 3.3520, 4.0);
    let bystander = online_technician(6.6500, 3.4000, 4.0);
    h.store.technicians.lock().unwrap().push(offeree.clone());
    h.store.technicians.lock().unwrap().push(bystander.clone());

    let outcome = h.jobs.book_job(client, book_dto(1)).await.unwrap();
    let job_id = outcome.job().id;

    let err = h
        .acceptance
        .respond(job_id, bystander.user_id, OfferAction::Accept)
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::NotCurrentOfferee(_, _)));

    let err = h
        .acceptance
        .respond(job_id, bystander.user_id, OfferAction::Decline)
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::NotCurrentOfferee(_, _)));
}

#[tokio::test]
async fn two_worker_job_staffs_in_order_and_spares_the_third_candidate() {
    let h = harness(WINDOW);
    let client = Uuid::new_v4();

    let a = online_technician(6.6020, 3.3520, 4.0);
    let b = online_technician(6.6500, 3.4000, 4.0);
    let c = online_technician(6.9000, 3.6000, 4.0);
    h.store.technicians.lock().unwrap().push(a.clone());
    h.store.technicians.lock().unwrap().push(b.clone());
    h.store.technicians.lock().unwrap().push(c.clone());

    let outcome = h.jobs.book_job(client, book_dto(2)).await.unwrap();
    let job_id = outcome.job().id;
    assert_eq!(outcome.job().assigned_tech_id, Some(a.user_id));

    // First acceptance leaves a slot open; the top-up round offers B.
    let outcome = h
        .acceptance
        .respond(job_id, a.user_id, OfferAction::Accept)
        .await
        .unwrap();

    let RespondOutcome::PartiallyStaffed { job } = outcome else {
        panic!("expected partial staffing");
    };

    assert_eq!(job.status, JobStatus::PendingAccept);
    assert_eq!(job.assigned_tech_id, Some(b.user_id));
    assert_eq!(job.assigned_tech_ids, vec![a.user_id]);

    // Second acceptance fills the job; C is never contacted.
    let outcome = h
        .acceptance
        .respond(job_id, b.user_id, OfferAction::Accept)
        .await
        .unwrap();

    let RespondOutcome::Accepted { job } = outcome else {
        panic!("expected acceptance");
    };

    assert_eq!(job.status, JobStatus::Accepted);
    assert_eq!(job.assigned_tech_ids, vec![a.user_id, b.user_id]);
    assert!(!job.notified_techs.contains(&c.user_id));
}

#[tokio::test]
async fn partial_job_with_empty_pool_waits_for_assignment() {
    let h = harness(WINDOW);
    let client = Uuid::new_v4();

    let only = online_technician(6.6020, 3.3520, 4.0);
    h.store.technicians.lock().unwrap().push(only.clone());

    let outcome = h.jobs.book_job(client, book_dto(2)).await.unwrap();
    let job_id = outcome.job().id;

    let outcome = h
        .acceptance
        .respond(job_id, only.user_id, OfferAction::Accept)
        .await
        .unwrap();

    // One slot filled, nobody left to offer to: the job waits, keeping its
    // recorded acceptance.
    let RespondOutcome::PartiallyStaffed { job } = outcome else {
        panic!("expected partial staffing");
    };

    assert_eq!(job.status, JobStatus::PendingAssignment);
    assert_eq!(job.assigned_tech_ids, vec![only.user_id]);
    assert_eq!(job.assigned_tech_id, None);
}

#[tokio::test]
async fn declined_and_accepted_sets_stay_disjoint() {
    let h = harness(WINDOW);
    let client = Uuid::new_v4();

    let a = online_technician(6.6020, 3.3520, 4.0);
    let b = online_technician(6.6500, 3.4000, 4.0);
    let c = online_technician(6.9000, 3.6000, 4.0);
    h.store.technicians.lock().unwrap().push(a.clone());
    h.store.technicians.lock().unwrap().push(b.clone());
    h.store.technicians.lock().unwrap().push(c.clone());

    let outcome = h.jobs.book_job(client, book_dto(2)).await.unwrap();
    let job_id = outcome.job().id;

    h.acceptance
        .respond(job_id, a.user_id, OfferAction::Accept)
        .await
        .unwrap();
    h.acceptance
        .respond(job_id, b.user_id, OfferAction::Decline)
        .await
        .unwrap();

    let job = h.store.get_job_by_id(job_id).await.unwrap().unwrap();

    for tech in &job.assigned_tech_ids {
        assert!(!job.declined_techs.contains(tech));
    }
    assert_eq!(job.assigned_tech_ids, vec![a.user_id]);
    assert_eq!(job.declined_techs, vec![b.user_id]);
    assert_eq!(job.assigned_tech_id, Some(c.user_id));
}

#[tokio::test]
async fn previously_notified_technician_may_decline_a_partial_job() {
    let h = harness(WINDOW);
    let client = Uuid::new_v4();

    let only = online_technician(6.6020, 3.3520, 4.0);
    h.store.technicians.lock().unwrap().push(only.clone());

    let outcome = h.jobs.book_job(client, book_dto(2)).await.unwrap();
    let job_id = outcome.job().id;

    // Fill one slot, leaving the job parked with an open slot.
    h.acceptance
        .respond(job_id, only.user_id, OfferAction::Accept)
        .await
        .unwrap();

    // A new technician is offered the remaining slot once available.
    let late = online_technician(6.6500, 3.4000, 4.0);
    h.store.technicians.lock().unwrap().push(late.clone());
    let outcome = h.assignment.dispatch_round(job_id).await.unwrap();
    assert!(matches!(outcome, AssignmentOutcome::Offered { .. }));

    // They decline; the engine has nobody else and parks the job again, with
    // the decline recorded so they are never re-offered.
    let outcome = h
        .acceptance
        .respond(job_id, late.user_id, OfferAction::Decline)
        .await
        .unwrap();

    let RespondOutcome::Declined { job } = outcome else {
        panic!("expected decline");
    };

    assert_eq!(job.status, JobStatus::PendingAssignment);
    assert_eq!(job.declined_techs, vec![late.user_id]);
    assert_eq!(job.assigned_tech_ids, vec![only.user_id]);
}

// The next two tests drive the store directly to open the window in which a
// multi-worker job sits in `partial` between an acceptance and the follow-up
// assignment round, and a previously offered technician responds late.
#[tokio::test]
async fn late_accept_between_rounds_is_honored() {
    let h = harness(WINDOW);
    let client = Uuid::new_v4();
    let tech = online_technician(6.6020, 3.3520, 4.0);

    let job = h
        .store
        .create_job(
            client,
            tech.category,
            "Run new conduit".to_string(),
            "Surface conduit for two new AC points".to_string(),
            "Lagos".to_string(),
            "Ikeja".to_string(),
            "3 Adeniyi Jones".to_string(),
            Some(6.6018),
            Some(3.3515),
            60_000.0,
            2,
        )
        .await
        .unwrap();

    h.store
        .reserve_if_available(job.id, tech.user_id, chrono::Utc::now() + chrono::Duration::minutes(3))
        .await
        .unwrap()
        .unwrap();
    h.store
        .clear_offer_after_acceptance(job.id, tech.user_id)
        .await
        .unwrap()
        .unwrap();

    // Job is `partial` with no outstanding offer; the notified technician's
    // late accept still lands.
    let outcome = h
        .acceptance
        .respond(job.id, tech.user_id, OfferAction::Accept)
        .await
        .unwrap();

    let RespondOutcome::PartiallyStaffed { job } = outcome else {
        panic!("expected partial staffing");
    };

    assert_eq!(job.assigned_tech_ids, vec![tech.user_id]);
}

#[tokio::test]
async fn late_decline_between_rounds_is_recorded_without_a_transition() {
    let h = harness(WINDOW);
    let client = Uuid::new_v4();
    let tech = online_technician(6.6020, 3.3520, 4.0);

    let job = h
        .store
        .create_job(
            client,
            tech.category,
            "Run new conduit".to_string(),
            "Surface conduit for two new AC points".to_string(),
            "Lagos".to_string(),
            "Ikeja".to_string(),
            "3 Adeniyi Jones".to_string(),
            Some(6.6018),
            Some(3.3515),
            60_000.0,
            2,
        )
        .await
        .unwrap();

    h.store
        .reserve_if_available(job.id, tech.user_id, chrono::Utc::now() + chrono::Duration::minutes(3))
        .await
        .unwrap()
        .unwrap();
    h.store
        .clear_offer_after_acceptance(job.id, tech.user_id)
        .await
        .unwrap()
        .unwrap();

    let outcome = h
        .acceptance
        .respond(job.id, tech.user_id, OfferAction::Decline)
        .await
        .unwrap();

    let RespondOutcome::Declined { job } = outcome else {
        panic!("expected decline");
    };

    assert_eq!(job.status, JobStatus::Partial);
    assert_eq!(job.declined_techs, vec![tech.user_id]);
    assert!(job.assigned_tech_ids.is_empty());
}

#[tokio::test]
async fn respond_after_cancellation_is_unauthorized() {
    let h = harness(WINDOW);
    let client = Uuid::new_v4();

    let tech = online_technician(6.6020, 3.3520, 4.0);
    h.store.technicians.lock().unwrap().push(tech.clone());

    let outcome = h.jobs.book_job(client, book_dto(1)).await.unwrap();
    let job_id = outcome.job().id;

    h.jobs.cancel_job(job_id, client).await.unwrap();

    let err = h
        .acceptance
        .respond(job_id, tech.user_id, OfferAction::Accept)
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::NotCurrentOfferee(_, _)));
}
