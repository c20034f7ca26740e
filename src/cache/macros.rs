/// Read-through caching over an optional [`Cache`](crate::cache::Cache).
///
/// With `None`, or when the lookup fails, the block runs as if the cache did
/// not exist. Successful values are written back in the background.
///
/// # Arguments
/// * `$cache`: an `Option<&Cache>`.
/// * `$key`: the `CacheKey` to read and write.
/// * `$ttl`: time-to-live in seconds.
/// * `$block`: future producing an `AppResult` on a miss.
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        match $cache {
            Some(cache) => {
                let hit = match cache.get_from_cache(&$key).await {
                    Ok(hit) => hit,
                    Err(e) => {
                        tracing::warn!(
                            error = %e,
                            key = %$key,
                            "Cache read failed, treating as miss"
                        );
                        None
                    }
                };

                if let Some(cached) = hit {
                    tracing::debug!(key = %$key, "Cache hit");
                    Ok(cached)
                } else {
                    let value = $block.await?;
                    cache.set_in_background(&$key, &value, $ttl);
                    Ok(value)
                }
            }
            None => $block.await,
        }
    }};
}
