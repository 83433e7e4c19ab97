use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

/// Internal representation of the "add CD" form fields.
#[derive(Default, Clone)]
pub(crate) struct CdForm {
    /// Id the CD will receive once submitted, shown in the form title.
    pub(crate) id: u32,
    pub(crate) title: String,
    pub(crate) artist: String,
    pub(crate) active: CdField,
}

/// Fields available within the CD form.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
pub(crate) enum CdField {
    #[default]
    Title,
    Artist,
}

impl CdForm {
    pub(crate) fn with_id(id: u32) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    /// Swap focus between the title and artist fields.
    pub(crate) fn toggle_field(&mut self) {
        self.active = match self.active {
            CdField::Title => CdField::Artist,
            CdField::Artist => CdField::Title,
        };
    }

    /// Append a character to the active field. Control characters are
    /// ignored.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        match self.active {
            CdField::Title => self.title.push(ch),
            CdField::Artist => self.artist.push(ch),
        }
        true
    }

    pub(crate) fn backspace(&mut self) {
        match self.active {
            CdField::Title => {
                self.title.pop();
            }
            CdField::Artist => {
                self.artist.pop();
            }
        }
    }

    /// Render a single line for the form widget.
    pub(crate) fn build_line(&self, field_name: &str, field: CdField) -> Line<'static> {
        let value = match field {
            CdField::Title => &self.title,
            CdField::Artist => &self.artist,
        };
        let is_active = self.active == field;

        let display = if value.is_empty() && !is_active {
            "<empty>".to_string()
        } else {
            value.clone()
        };

        let style = if is_active {
            Style::default().fg(Color::Yellow)
        } else if value.is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        Line::from(vec![
            Span::raw(format!("{field_name}: ")),
            Span::styled(display, style),
        ])
    }

    /// Return the character count for the requested field.
    pub(crate) fn value_len(&self, field: CdField) -> usize {
        match field {
            CdField::Title => self.title.chars().count(),
            CdField::Artist => self.artist.chars().count(),
        }
    }
}

/// Single-line text prompt used for the delete id and the confirmations.
#[derive(Default, Clone)]
pub(crate) struct TextPrompt {
    pub(crate) input: String,
}

impl TextPrompt {
    pub(crate) fn push_char(&mut self, ch: char) {
        if !ch.is_control() {
            self.input.push(ch);
        }
    }

    pub(crate) fn backspace(&mut self) {
        self.input.pop();
    }

    pub(crate) fn len(&self) -> usize {
        self.input.chars().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typing_goes_to_active_field() {
        let mut form = CdForm::with_id(3);
        for ch in "Rumours".chars() {
            form.push_char(ch);
        }
        form.toggle_field();
        for ch in "Fleetwood Mac".chars() {
            form.push_char(ch);
        }
        form.backspace();

        assert_eq!(form.id, 3);
        assert_eq!(form.title, "Rumours");
        assert_eq!(form.artist, "Fleetwood Ma");
        assert_eq!(form.value_len(CdField::Artist), 12);
    }

    #[test]
    fn control_characters_are_ignored() {
        let mut form = CdForm::default();
        assert!(!form.push_char('\u{7}'));
        assert!(form.title.is_empty());

        let mut prompt = TextPrompt::default();
        prompt.push_char('\t');
        prompt.push_char('7');
        assert_eq!(prompt.input, "7");
        assert_eq!(prompt.len(), 1);
    }
}
