// SPDX-License-Identifier: MPL-2.0
//! Asset previews: format dispatch, the model and texture viewers, and the
//! failure boundary around each mount.

pub mod boundary;
pub mod dispatch;
pub mod model_canvas;
pub mod texture;

pub use boundary::{ComponentPath, Failure, Supervised};
pub use dispatch::{load, Content, Loaded, Pane, PayloadSource, Plan, ViewContext};
pub use model_canvas::{Camera, ModelCanvas, PreparedModel};
pub use texture::TextureImage;
