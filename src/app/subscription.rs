// SPDX-License-Identifier: MPL-2.0
//! Timer subscriptions for the application.

use super::Message;
use iced::{time, Subscription};
use std::time::Duration;

/// Tick interval while a request or a preview decode is in flight.
const ANIMATION_INTERVAL: Duration = Duration::from_millis(50);

/// Tick interval when only toasts need their auto-dismiss checked.
const NOTIFICATION_INTERVAL: Duration = Duration::from_millis(100);

/// Creates the periodic tick driving the busy spinner and toast expiry.
///
/// No subscription is returned when nothing animates and no toast is shown,
/// so an idle window does not wake up.
pub fn create_tick_subscription(animating: bool, has_notifications: bool) -> Subscription<Message> {
    if animating {
        time::every(ANIMATION_INTERVAL).map(Message::Tick)
    } else if has_notifications {
        time::every(NOTIFICATION_INTERVAL).map(Message::Tick)
    } else {
        Subscription::none()
    }
}
