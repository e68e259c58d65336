use core::time::Duration;

use embedded_hal_async::delay::DelayNs;

/// Suspend for at least `duration`, rounding up to whole microseconds.
pub(crate) async fn wait_at_least<D: DelayNs>(delay: &mut D, duration: Duration) {
    if duration.is_zero() {
        return;
    }
    let whole_us = u32::try_from(duration.as_micros()).unwrap_or(u32::MAX);
    let us = if duration.subsec_nanos().checked_rem(1_000) == Some(0) {
        whole_us
    } else {
        whole_us.saturating_add(1)
    };
    delay.delay_us(us).await;
}
