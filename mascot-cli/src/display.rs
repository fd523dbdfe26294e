use mascot_core::types::{Message, Sender};
use mascot_engine::traits::DisplaySurface;

/// Prints the transcript; a terminal is always "visible".
#[derive(Debug, Default)]
pub struct StdoutDisplay;

pub fn transcript_line(message: &Message) -> String {
    let who = match message.sender {
        Sender::User => "you",
        Sender::Assistant => "mascot",
    };
    format!("[{who}] {}", message.text)
}

impl DisplaySurface for StdoutDisplay {
    fn add_message(&self, message: Message) {
        println!("{}", transcript_line(&message));
    }

    fn is_visible(&self) -> bool {
        true
    }

    fn show(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_are_tagged_by_sender() {
        assert_eq!(transcript_line(&Message::user("hi")), "[you] hi");
        assert_eq!(
            transcript_line(&Message::assistant("Corrected Sentence:\nI went.")),
            "[mascot] Corrected Sentence:\nI went."
        );
    }
}
