// SPDX-License-Identifier: MPL-2.0
//! Internationalization (i18n) support for the application.
//!
//! Fluent bundles are embedded at build time from `assets/i18n/*.ftl`. The
//! active locale is chosen from the CLI flag, then the config file, then the
//! OS locale, falling back to `en-US`.

pub mod fluent;
