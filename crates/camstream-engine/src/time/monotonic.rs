use std::sync::OnceLock;
use std::time::Instant;

static EPOCH: OnceLock<Instant> = OnceLock::new();

/// Nanoseconds since the process-wide monotonic epoch.
///
/// The epoch is fixed on first use. Capture sources stamp frames with this
/// clock so presentation timestamps from different threads are comparable.
pub fn presentation_nanos() -> i64 {
    let epoch = *EPOCH.get_or_init(Instant::now);
    i64::try_from(epoch.elapsed().as_nanos()).unwrap_or(i64::MAX)
}
