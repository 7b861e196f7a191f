use std::sync::{Arc, Mutex, PoisonError};

use iced::{
    widget::{button, column, row, text, text_input},
    window, Element, Size, Task,
};

use super::InputProvider;
use crate::domain::AppError;

/// Blocking modal window with a single text field.
///
/// Closing the window or pressing Cancel leaves the answer empty.
pub struct DialogPrompt;

impl InputProvider for DialogPrompt {
    fn request_url(&mut self, prompt: &str) -> Result<Option<String>, AppError> {
        let answer = Arc::new(Mutex::new(None));
        let slot = Arc::clone(&answer);
        let message = prompt.to_string();
        let title = prompt.to_string();

        iced::application(
            move || PromptWindow::new(message.clone(), Arc::clone(&slot)),
            PromptWindow::update,
            PromptWindow::view,
        )
        .title(move |_: &PromptWindow| title.clone())
        .window(window::Settings {
            size: Size::new(460.0, 150.0),
            resizable: false,
            ..Default::default()
        })
        .run()
        .map_err(|e| AppError::Prompt(e.to_string()))?;

        let value = answer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        Ok(value)
    }
}

#[derive(Debug, Clone)]
enum PromptMessage {
    InputChanged(String),
    Submit,
    Cancel,
}

struct PromptWindow {
    message: String,
    input: String,
    answer: Arc<Mutex<Option<String>>>,
}

impl PromptWindow {
    fn new(message: String, answer: Arc<Mutex<Option<String>>>) -> Self {
        Self {
            message,
            input: String::new(),
            answer,
        }
    }

    fn update(&mut self, message: PromptMessage) -> Task<PromptMessage> {
        match message {
            PromptMessage::InputChanged(value) => {
                self.input = value;
                Task::none()
            }
            PromptMessage::Submit => {
                *self.answer.lock().unwrap_or_else(PoisonError::into_inner) =
                    Some(self.input.clone());
                iced::exit()
            }
            PromptMessage::Cancel => iced::exit(),
        }
    }

    fn view(&self) -> Element<'_, PromptMessage> {
        column![
            text(&self.message).size(16),
            text_input("https://", &self.input)
                .on_input(PromptMessage::InputChanged)
                .on_submit(PromptMessage::Submit)
                .padding(8),
            row![
                button("OK").on_press(PromptMessage::Submit).padding([6, 18]),
                button("Cancel")
                    .on_press(PromptMessage::Cancel)
                    .padding([6, 18]),
            ]
            .spacing(10),
        ]
        .padding(16)
        .spacing(12)
        .into()
    }
}
