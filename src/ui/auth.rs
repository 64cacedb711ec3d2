// SPDX-License-Identifier: MPL-2.0
//! Authentication screen: login and signup forms behind a mode toggle.
//!
//! The form keeps its own field state and emits an [`Event`] carrying
//! validated credentials; the app performs the request.

use crate::application::port::{Credentials, SignupRequest};
use crate::error::ValidationError;
use crate::i18n::fluent::I18n;
use crate::ui::design_tokens::{sizing, spacing, typography};
use crate::ui::styles;
use iced::{
    alignment::Horizontal,
    widget::{button, text, text_input, Column, Container, Text},
    Element, Length,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Login,
    Signup,
}

/// Field values of the authentication form.
#[derive(Debug, Clone, Default)]
pub struct State {
    pub mode: Mode,
    pub username: String,
    pub email: String,
    pub password: String,
}

impl State {
    /// Forgets the password, e.g. after a completed request.
    pub fn clear_password(&mut self) {
        self.password.clear();
    }

    /// Switches back to login after a successful signup.
    pub fn signup_completed(&mut self) {
        self.mode = Mode::Login;
        self.email.clear();
        self.password.clear();
    }
}

pub struct ViewContext<'a> {
    pub i18n: &'a I18n,
    pub state: &'a State,
    pub busy: bool,
}

#[derive(Debug, Clone)]
pub enum Message {
    UsernameChanged(String),
    EmailChanged(String),
    PasswordChanged(String),
    Submit,
    ToggleMode,
}

#[derive(Debug, Clone)]
pub enum Event {
    None,
    Login(Credentials),
    Signup(SignupRequest),
    Invalid(ValidationError),
}

pub fn update(message: Message, state: &mut State) -> Event {
    match message {
        Message::UsernameChanged(value) => {
            state.username = value;
            Event::None
        }
        Message::EmailChanged(value) => {
            state.email = value;
            Event::None
        }
        Message::PasswordChanged(value) => {
            state.password = value;
            Event::None
        }
        Message::ToggleMode => {
            state.mode = match state.mode {
                Mode::Login => Mode::Signup,
                Mode::Signup => Mode::Login,
            };
            Event::None
        }
        Message::Submit => submit(state),
    }
}

fn submit(state: &State) -> Event {
    match state.mode {
        Mode::Login => {
            let credentials = Credentials {
                username: state.username.trim().to_string(),
                password: state.password.clone(),
            };
            match credentials.validate() {
                Ok(()) => Event::Login(credentials),
                Err(err) => Event::Invalid(err),
            }
        }
        Mode::Signup => {
            let request = SignupRequest {
                username: state.username.trim().to_string(),
                email: state.email.trim().to_string(),
                password: state.password.clone(),
            };
            match request.validate() {
                Ok(()) => Event::Signup(request),
                Err(err) => Event::Invalid(err),
            }
        }
    }
}

pub fn view<'a>(ctx: ViewContext<'a>) -> Element<'a, Message> {
    let state = ctx.state;
    let (title_key, submit_key, toggle_key) = match state.mode {
        Mode::Login => ("auth-login-title", "auth-login-button", "auth-switch-to-signup"),
        Mode::Signup => ("auth-signup-title", "auth-signup-button", "auth-switch-to-login"),
    };

    let username_placeholder = ctx.i18n.tr("auth-username");
    let username = text_input(&username_placeholder, &state.username)
        .on_input(Message::UsernameChanged)
        .on_submit(Message::Submit)
        .padding(spacing::XS)
        .size(typography::BODY);

    let password_placeholder = ctx.i18n.tr("auth-password");
    let password = text_input(&password_placeholder, &state.password)
        .on_input(Message::PasswordChanged)
        .on_submit(Message::Submit)
        .secure(true)
        .padding(spacing::XS)
        .size(typography::BODY);

    let mut form = Column::new()
        .spacing(spacing::SM)
        .push(Text::new(ctx.i18n.tr(title_key)).size(typography::TITLE_MD))
        .push(username);

    if state.mode == Mode::Signup {
        let email_placeholder = ctx.i18n.tr("auth-email");
        form = form.push(
            text_input(&email_placeholder, &state.email)
                .on_input(Message::EmailChanged)
                .on_submit(Message::Submit)
                .padding(spacing::XS)
                .size(typography::BODY),
        );
    }

    // Disabled while a request is in flight
    let submit = button(text(ctx.i18n.tr(submit_key)).width(Length::Fill).align_x(Horizontal::Center))
        .width(Length::Fill)
        .style(styles::button::primary)
        .on_press_maybe((!ctx.busy).then_some(Message::Submit));

    let toggle = button(text(ctx.i18n.tr(toggle_key)).size(typography::BODY_SM))
        .style(styles::button::ghost)
        .on_press(Message::ToggleMode);

    form = form.push(password).push(submit).push(toggle);

    let card = Container::new(form)
        .width(Length::Fixed(sizing::AUTH_FORM_WIDTH))
        .padding(spacing::LG)
        .style(styles::container::panel);

    Container::new(card)
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .into()
}
