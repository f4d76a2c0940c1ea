/// View projection tests
///
/// Filtering and display ordering of the tracker board.
/// Run with: cargo test --test projection_tests
use chrono::{DateTime, Duration, TimeZone, Utc};
use dignitary_tracker::{
    InMemoryCollection, ManualClock, PersonFields, PersonPatch, RecordStore, Status,
    TrackedPerson, project, status_priority,
};
use std::sync::Arc;
use uuid::Uuid;

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap()
}

fn clocked_store() -> (RecordStore, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(start()));
    let store = RecordStore::with_clock(Arc::new(InMemoryCollection::new()), clock.clone());
    (store, clock)
}

/// Small deterministic generator so the property checks are reproducible.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        self.0 >> 33
    }
}

fn generated_board(seed: u64, size: usize) -> Vec<TrackedPerson> {
    let mut rng = Lcg(seed);
    let names = ["Jane Doe", "John Smith", "Maria Garcia", "Ken Sato", "Amara Obi"];
    let orgs = ["United Nations", "Exampleland", "Samplestan", "Red Cross"];
    (0..size)
        .map(|i| {
            let status = Status::ALL[(rng.next() % 5) as usize];
            // Few distinct stamps so ties actually happen.
            let minutes = (rng.next() % 4) as i64;
            TrackedPerson::from_fields(
                Uuid::from_u128(rng.next() as u128 * 1000 + i as u128),
                PersonFields::new(
                    names[(rng.next() % 5) as usize],
                    "Delegate",
                    orgs[(rng.next() % 4) as usize],
                )
                .status(status),
                start() + Duration::minutes(minutes),
            )
            .unwrap()
        })
        .collect()
}

#[tokio::test]
async fn test_scenario_priority_beats_recency() {
    let (store, clock) = clocked_store();
    for (name, status) in [
        ("Oldest", Status::Reached),
        ("Middle", Status::ReachingIn5Min),
        ("Newest", Status::NotStarted),
    ] {
        store
            .create(PersonFields::new(name, "Envoy", "Council").status(status))
            .await
            .unwrap();
        clock.advance(Duration::minutes(1));
    }

    let statuses: Vec<Status> = project(&store.list_all().await.unwrap(), "")
        .into_iter()
        .map(|r| r.status)
        .collect();

    assert_eq!(
        statuses,
        [Status::ReachingIn5Min, Status::NotStarted, Status::Reached]
    );
}

#[tokio::test]
async fn test_recent_update_moves_record_up_within_status() {
    let (store, clock) = clocked_store();
    let first = store
        .create(PersonFields::new("First", "Envoy", "Council").status(Status::Started))
        .await
        .unwrap();
    clock.advance(Duration::minutes(1));
    store
        .create(PersonFields::new("Second", "Envoy", "Council").status(Status::Started))
        .await
        .unwrap();

    let names = |records: Vec<TrackedPerson>| -> Vec<String> {
        records.into_iter().map(|r| r.name).collect()
    };
    assert_eq!(names(project(&store.list_all().await.unwrap(), "")), ["Second", "First"]);

    clock.advance(Duration::minutes(1));
    store
        .update(first.id, PersonPatch::inline(Status::Started, Some("moving".into())))
        .await
        .unwrap();
    assert_eq!(names(project(&store.list_all().await.unwrap(), "")), ["First", "Second"]);
}

#[test]
fn test_search_matches_designation_case_insensitively() {
    let ambassador = TrackedPerson::from_fields(
        Uuid::from_u128(1),
        PersonFields::new("John Smith", "Ambassador", "United Nations"),
        start(),
    )
    .unwrap();
    let minister = TrackedPerson::from_fields(
        Uuid::from_u128(2),
        PersonFields::new("Jane Doe", "Foreign Minister", "Republic of Exampleland"),
        start(),
    )
    .unwrap();

    let found = project(&[ambassador.clone(), minister], "amb");

    assert_eq!(found, vec![ambassador.clone()]);
    assert!(!ambassador.organization.to_lowercase().contains("amb"));
}

#[test]
fn test_search_matches_status_label() {
    let mut board = generated_board(7, 30);
    board.push(
        TrackedPerson::from_fields(
            Uuid::from_u128(u128::MAX),
            PersonFields::new("Ken Sato", "Envoy", "Council").status(Status::ReachingIn5Min),
            start(),
        )
        .unwrap(),
    );
    let found = project(&board, "REACHING IN 5");
    assert!(!found.is_empty());
    assert!(found.iter().all(|r| r.status == Status::ReachingIn5Min));
}

#[test]
fn test_projection_is_filtered_subset() {
    for seed in 1..20 {
        let board = generated_board(seed, 25);
        for search in ["", "jane", "NATIONS", "started", "zzz", " sam ", "jane "] {
            let projected = project(&board, search);
            let needle = search.to_lowercase();

            assert!(projected.len() <= board.len());
            for record in &projected {
                assert!(board.contains(record));
                assert!(
                    needle.is_empty()
                        || record.name.to_lowercase().contains(&needle)
                        || record.designation.to_lowercase().contains(&needle)
                        || record.organization.to_lowercase().contains(&needle)
                        || record.status.label().to_lowercase().contains(&needle)
                );
            }
            let expected = board.iter().filter(|r| r.matches(&needle)).count();
            assert_eq!(projected.len(), expected);
        }
    }
}

#[test]
fn test_projection_order_invariant() {
    for seed in 1..50 {
        let board = generated_board(seed, 40);
        let projected = project(&board, "");
        for pair in projected.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            let (pa, pb) = (status_priority(a.status), status_priority(b.status));
            assert!(pa <= pb);
            if pa == pb {
                assert!(a.last_updated >= b.last_updated);
                if a.last_updated == b.last_updated {
                    assert!(a.id < b.id);
                }
            }
        }
    }
}

#[test]
fn test_projection_is_deterministic_regardless_of_input_order() {
    let board = generated_board(42, 30);
    let mut reversed = board.clone();
    reversed.reverse();
    assert_eq!(project(&board, "a"), project(&reversed, "a"));
}
