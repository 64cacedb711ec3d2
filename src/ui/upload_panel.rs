// SPDX-License-Identifier: MPL-2.0
//! Upload form: file selection, visibility, and submit.
//!
//! The file dialog and the read happen in the app; this component only
//! tracks the chosen path and the "Make public" flag.

use crate::domain::asset::CategoryToken;
use crate::error::ValidationError;
use crate::i18n::fluent::I18n;
use crate::ui::design_tokens::{palette, spacing, typography};
use crate::ui::styles;
use iced::{
    alignment::Vertical,
    widget::{button, checkbox, Column, Container, Row, Text},
    Element, Length,
};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default)]
pub struct State {
    file: Option<PathBuf>,
    is_public: bool,
}

impl State {
    #[must_use]
    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    #[must_use]
    pub fn is_public(&self) -> bool {
        self.is_public
    }

    pub fn set_file(&mut self, file: PathBuf) {
        self.file = Some(file);
    }

    /// Clears the form after a completed upload.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

pub struct ViewContext<'a> {
    pub i18n: &'a I18n,
    pub state: &'a State,
    pub category: CategoryToken,
    pub busy: bool,
}

#[derive(Debug, Clone)]
pub enum Message {
    ChooseFile,
    TogglePublic(bool),
    Upload,
}

#[derive(Debug, Clone)]
pub enum Event {
    None,
    ChooseFile,
    Upload { path: PathBuf, is_public: bool },
    Invalid(ValidationError),
}

pub fn update(message: Message, state: &mut State) -> Event {
    match message {
        Message::ChooseFile => Event::ChooseFile,
        Message::TogglePublic(value) => {
            state.is_public = value;
            Event::None
        }
        Message::Upload => match &state.file {
            Some(path) => Event::Upload {
                path: path.clone(),
                is_public: state.is_public,
            },
            None => Event::Invalid(ValidationError::MissingFile),
        },
    }
}

pub fn view<'a>(ctx: ViewContext<'a>) -> Element<'a, Message> {
    let category = ctx.i18n.tr(ctx.category.label_key());
    let title = Text::new(
        ctx.i18n
            .tr_with_args("upload-title", &[("category", category.as_str())]),
    )
    .size(typography::TITLE_SM);

    let file_label = match ctx.state.file() {
        Some(path) => path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string()),
        None => ctx.i18n.tr("upload-no-file"),
    };

    let choose = button(Text::new(ctx.i18n.tr("upload-choose-file")).size(typography::BODY_SM))
        .style(styles::button::unselected)
        .on_press(Message::ChooseFile);

    let public = checkbox(ctx.state.is_public())
        .label(ctx.i18n.tr("upload-make-public"))
        .on_toggle(Message::TogglePublic);

    let upload = button(Text::new(ctx.i18n.tr("upload-button")))
        .style(styles::button::primary)
        .on_press_maybe((!ctx.busy).then_some(Message::Upload));

    let file_row = Row::new()
        .spacing(spacing::SM)
        .align_y(Vertical::Center)
        .push(choose)
        .push(
            Text::new(file_label)
                .size(typography::BODY_SM)
                .color(palette::GRAY_200),
        );

    let controls = Row::new()
        .spacing(spacing::MD)
        .align_y(Vertical::Center)
        .push(public)
        .push(upload);

    Container::new(
        Column::new()
            .spacing(spacing::SM)
            .push(title)
            .push(file_row)
            .push(controls),
    )
    .width(Length::Fill)
    .padding(spacing::SM)
    .style(styles::container::panel)
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_without_file_is_rejected() {
        let mut state = State::default();
        assert!(matches!(
            update(Message::Upload, &mut state),
            Event::Invalid(ValidationError::MissingFile)
        ));
    }

    #[test]
    fn upload_carries_path_and_visibility() {
        let mut state = State::default();
        state.set_file(PathBuf::from("/tmp/chair.glb"));
        update(Message::TogglePublic(true), &mut state);
        match update(Message::Upload, &mut state) {
            Event::Upload { path, is_public } => {
                assert_eq!(path, PathBuf::from("/tmp/chair.glb"));
                assert!(is_public);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn reset_clears_form() {
        let mut state = State::default();
        state.set_file(PathBuf::from("a.obj"));
        update(Message::TogglePublic(true), &mut state);
        state.reset();
        assert!(state.file().is_none());
        assert!(!state.is_public());
    }
}
