// SPDX-License-Identifier: MPL-2.0
//! Toast notifications.
//!
//! Every user-visible outcome of an operation (sign-in, upload, delete,
//! shared-link resolution, download) is reported as a [`Notification`]
//! pushed to the [`Manager`]. Toasts are stacked in the bottom-right corner:
//! success and info vanish after 3s, warnings after 5s, errors stay until
//! dismissed.

mod manager;
mod notification;
mod toast;

pub use manager::{Manager, Message as NotificationMessage, MAX_VISIBLE};
pub use notification::{Notification, NotificationId, Severity};
pub use toast::Toast;
