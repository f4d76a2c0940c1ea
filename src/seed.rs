//! Sample board used for demos and first start.

use crate::core::{PersonFields, Result, Status, TrackedPerson};
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

/// Stable id for a seed entry, so reseeding replaces rather than duplicates.
pub fn seed_id(name: &str) -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_OID, format!("dignitary:{name}").as_bytes())
}

/// Three sample dignitaries stamped relative to `now`.
pub fn sample_dignitaries(now: DateTime<Utc>) -> Result<Vec<TrackedPerson>> {
    let entries = [
        (
            PersonFields::new("Jane Doe", "Foreign Minister", "Republic of Exampleland")
                .status(Status::Started)
                .remarks("Arriving with delegation of 3")
                .car_number("DL-01-AB-1234")
                .liaison("Alex Johnson", "+91-9876543210")
                .facilitator("Sarah Williams"),
            Duration::zero(),
        ),
        (
            PersonFields::new("John Smith", "Ambassador", "United Nations")
                .status(Status::ReachingIn5Min)
                .remarks("Will proceed directly to conference room")
                .car_number("DL-02-CD-5678")
                .liaison("Michael Brown", "+91-8765432109")
                .facilitator("Robert Davis"),
            Duration::minutes(15),
        ),
        (
            PersonFields::new("Maria Garcia", "Secretary of State", "Republic of Samplestan")
                .status(Status::NotStarted)
                .remarks("Awaiting flight confirmation")
                .car_number("DL-03-EF-9012")
                .liaison("Emily Wilson", "+91-7654321098")
                .facilitator("Daniel Lee"),
            Duration::minutes(30),
        ),
    ];

    entries
        .into_iter()
        .map(|(fields, age)| {
            let id = seed_id(&fields.name);
            TrackedPerson::from_fields(id, fields, now - age)
        })
        .collect()
}
