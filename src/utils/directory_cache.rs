use anyhow::Result;
use futures_util::StreamExt;
use moka::future::Cache;
use once_cell::sync::Lazy;
use sqlx::MySqlPool;
use std::sync::Arc;
use std::time::Duration;

use crate::model::employee::Employee;

/// Identity cache in front of the employees table, keyed by every identifier
/// a badge can carry (lowercased email and numeric id as a string). Values
/// are shared rows, so a hit costs one Arc clone.
pub static DIRECTORY_CACHE: Lazy<Cache<String, Arc<Employee>>> = Lazy::new(|| {
    Cache::builder()
        .max_capacity(100_000) // tune based on memory
        .time_to_live(Duration::from_secs(86400)) // 24h TTL
        .build()
});

pub async fn get(identifier: &str) -> Option<Arc<Employee>> {
    DIRECTORY_CACHE.get(&identifier.to_lowercase()).await
}

/// Cache an employee under both identifier forms
pub async fn remember(employee: &Arc<Employee>) {
    DIRECTORY_CACHE
        .insert(employee.email.to_lowercase(), Arc::clone(employee))
        .await;
    DIRECTORY_CACHE
        .insert(employee.id.to_string(), Arc::clone(employee))
        .await;
}

/// Batch cache a set of employees
async fn remember_batch(employees: &[Arc<Employee>]) {
    let futures: Vec<_> = employees.iter().map(|e| remember(e)).collect();

    // Await all insertions concurrently
    futures::future::join_all(futures).await;
}

/// Load only RECENTLY active employees into the in-memory cache (batched)
pub async fn warmup_directory_cache(
    pool: &MySqlPool,
    days: u32,
    batch_size: usize,
) -> Result<()> {
    let mut stream = sqlx::query_as::<_, Employee>(
        r#"
        SELECT id, email, password, name, role_id, department, position,
               shift_type, profile_image, created_at, last_login_at
        FROM employees
        WHERE last_login_at >= NOW() - INTERVAL ? DAY
        ORDER BY last_login_at DESC
        "#,
    )
    .bind(days)
    .fetch(pool);

    let mut batch: Vec<Arc<Employee>> = Vec::with_capacity(batch_size);
    let mut total_count = 0usize;

    while let Some(row) = stream.next().await {
        batch.push(Arc::new(row?));
        total_count += 1;

        if batch.len() >= batch_size {
            remember_batch(&batch).await;
            batch.clear();
        }
    }

    // Insert any remaining employees
    if !batch.is_empty() {
        remember_batch(&batch).await;
    }

    tracing::info!(
        employees = total_count,
        days,
        "Directory cache warmup complete"
    );

    Ok(())
}
