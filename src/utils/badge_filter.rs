use anyhow::{anyhow, Result};
use autoscale_cuckoo_filter::CuckooFilter;
use futures::StreamExt;
use once_cell::sync::Lazy;
use sqlx::MySqlPool;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use crate::model::employee::Employee;

/// Expected capacity and false-positive rate.
/// Tune these based on real headcounts.
const FILTER_CAPACITY: usize = 100_000;
const FALSE_POSITIVE_RATE: f64 = 0.001;

static BADGE_FILTER: Lazy<RwLock<CuckooFilter<String>>> =
    Lazy::new(|| RwLock::new(CuckooFilter::new(FILTER_CAPACITY, FALSE_POSITIVE_RATE)));

/// Flips once warmup has streamed every identifier. Until then the filter
/// cannot prove absence, so lookups must go to the database.
static READY: AtomicBool = AtomicBool::new(false);

#[inline]
fn normalize(identifier: &str) -> String {
    identifier.to_lowercase()
}

pub fn is_ready() -> bool {
    READY.load(Ordering::Acquire)
}

/// Check if an identifier might belong to an employee (false positives
/// possible)
pub fn might_exist(identifier: &str) -> bool {
    let identifier = normalize(identifier);
    BADGE_FILTER
        .read()
        .expect("badge filter poisoned")
        .contains(&identifier)
}

/// Insert a single identifier into the filter
pub fn insert(identifier: &str) {
    let identifier = normalize(identifier);
    BADGE_FILTER
        .write()
        .expect("badge filter poisoned")
        .add(&identifier);
}

/// Insert every identifier a badge could carry for this employee.
pub fn insert_identifiers(employee: &Employee) {
    let mut filter = BADGE_FILTER.write().expect("badge filter poisoned");
    filter.add(&normalize(&employee.email));
    filter.add(&employee.id.to_string());
}

/// Warm up the badge filter using streaming + batching
pub async fn warmup_badge_filter(pool: &MySqlPool, batch_size: usize) -> Result<()> {
    let mut stream =
        sqlx::query_as::<_, (u64, String)>("SELECT id, email FROM employees").fetch(pool);

    let mut batch = Vec::with_capacity(batch_size * 2);
    let mut total = 0usize;

    while let Some(row) = stream.next().await {
        let (id, email) = row.map_err(|e| anyhow!("DB row fetch failed: {}", e))?;

        batch.push(normalize(&email));
        batch.push(id.to_string());
        total += 1;

        if batch.len() >= batch_size * 2 {
            insert_batch(&batch);
            batch.clear();
        }
    }

    if !batch.is_empty() {
        insert_batch(&batch);
    }

    READY.store(true, Ordering::Release);
    tracing::info!(employees = total, "Badge filter warmup complete");
    Ok(())
}

/// Insert a batch of normalized identifiers
fn insert_batch(identifiers: &[String]) {
    let mut filter = BADGE_FILTER.write().expect("badge filter poisoned");

    for identifier in identifiers {
        filter.add(identifier);
    }
}
