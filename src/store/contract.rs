//! Behaviour every `AttendanceStore` backend must share.
//!
//! Works against a store that already holds other rows: records are tagged
//! with ministry names unique to the run, and totals are compared as deltas.

use chrono::{DateTime, Duration, TimeZone, Utc};
use uuid::Uuid;

use super::AttendanceStore;
use crate::model::attendance::{AttendanceRecord, AttendanceStats, RecordFilter};

fn record(ministries: &[&str], timestamp: DateTime<Utc>) -> AttendanceRecord {
    AttendanceRecord {
        id: Uuid::new_v4().to_string(),
        email: "contract@example.com".into(),
        full_name: "Contract Check".into(),
        contact: Some("+15550100".into()),
        is_member_of_ministry: !ministries.is_empty(),
        ministries: ministries.iter().map(|m| m.to_string()).collect(),
        timestamp,
    }
}

fn count_for(stats: &AttendanceStats, ministry: &str) -> i64 {
    stats
        .ministry_breakdown
        .iter()
        .find(|m| m.ministry == ministry)
        .map_or(0, |m| m.count)
}

fn ids(records: &[AttendanceRecord]) -> Vec<&str> {
    records.iter().map(|r| r.id.as_str()).collect()
}

pub async fn check_store_contract(store: &dyn AttendanceStore) {
    let tag = Uuid::new_v4().to_simple().to_string();
    let choir = format!("Choir-{tag}");
    let media = format!("Media-{tag}");
    let base = Utc.with_ymd_and_hms(2001, 1, 1, 10, 0, 0).unwrap() + Duration::microseconds(250);

    let before = store.stats().await.unwrap();

    let early = record(&[choir.as_str()], base);
    let late = record(&[media.as_str(), choir.as_str()], base + Duration::hours(1));
    let other = record(&[media.as_str()], base + Duration::hours(2));
    let guest = record(&[], base + Duration::hours(3));
    for rec in [&early, &late, &other, &guest] {
        store.insert(rec).await.unwrap();
    }

    // round trip keeps every field, microseconds included
    assert_eq!(store.get(&early.id).await.unwrap().as_ref(), Some(&early));
    assert_eq!(store.get(&guest.id).await.unwrap().as_ref(), Some(&guest));
    assert_eq!(store.get(&Uuid::new_v4().to_string()).await.unwrap(), None);

    // membership, newest first
    let by_choir = RecordFilter {
        ministry: Some(choir.clone()),
        ..Default::default()
    };
    let found = store.list(&by_choir).await.unwrap();
    assert_eq!(ids(&found), vec![late.id.as_str(), early.id.as_str()]);

    // bounds are inclusive on both ends
    let exact = RecordFilter {
        start: Some(late.timestamp),
        end: Some(late.timestamp),
        ministry: Some(choir.clone()),
    };
    assert_eq!(ids(&store.list(&exact).await.unwrap()), vec![late.id.as_str()]);

    let narrow = RecordFilter {
        start: Some(early.timestamp + Duration::microseconds(1)),
        end: Some(late.timestamp - Duration::microseconds(1)),
        ministry: Some(choir.clone()),
    };
    assert!(store.list(&narrow).await.unwrap().is_empty());

    // fan-out counts every occurrence
    let after = store.stats().await.unwrap();
    assert_eq!(after.total - before.total, 4);
    assert_eq!(after.with_ministry - before.with_ministry, 3);
    assert_eq!(after.without_ministry - before.without_ministry, 1);
    assert_eq!(after.with_ministry + after.without_ministry, after.total);
    assert_eq!(count_for(&after, &choir), 2);
    assert_eq!(count_for(&after, &media), 2);
    assert!(
        after
            .ministry_breakdown
            .windows(2)
            .all(|w| w[0].count > w[1].count
                || (w[0].count == w[1].count && w[0].ministry <= w[1].ministry))
    );

    // delete hands the record back once
    assert_eq!(store.delete(&early.id).await.unwrap(), Some(early.clone()));
    assert_eq!(store.delete(&early.id).await.unwrap(), None);
    assert_eq!(store.get(&early.id).await.unwrap(), None);
    assert_eq!(ids(&store.list(&by_choir).await.unwrap()), vec![late.id.as_str()]);

    for rec in [&late, &other, &guest] {
        assert!(store.delete(&rec.id).await.unwrap().is_some());
    }
    let cleaned = store.stats().await.unwrap();
    assert_eq!(cleaned.total, before.total);
    assert_eq!(count_for(&cleaned, &choir), 0);
}
