use log::debug;
use std::time::Duration;
use strum::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Phase {
    Refreshing,
    Waiting,
}

/// Run `cycle` now, then again after every `period`, forever.
///
/// The cycle itself never suspends; the sleep is the only await point, so
/// aborting the hosting task is the only way out.
pub async fn run_forever<F>(period: Duration, mut cycle: F)
where
    F: FnMut(),
{
    let mut n: u64 = 0;
    loop {
        debug!("- Cycle {}: {}", n, Phase::Refreshing);
        cycle();
        debug!("- Cycle {}: {} {}", n, Phase::Waiting, humantime::format_duration(period));
        tokio::time::sleep(period).await;
        n += 1;
    }
}
