// Busy indicator shown while a remote call is in flight.

const FRAMES: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Spinner {
    tick: usize,
}

impl Spinner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&mut self) {
        self.tick = (self.tick + 1) % FRAMES.len();
    }

    pub fn glyph(self) -> char {
        FRAMES[self.tick]
    }

    pub fn status(self, label: &str) -> String {
        format!(" {label} {} ", self.glyph())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_wraps_around() {
        let mut spinner = Spinner::new();
        let first = spinner.glyph();
        for _ in 0..FRAMES.len() {
            spinner.advance();
        }
        assert_eq!(spinner.glyph(), first);
        spinner.advance();
        assert_ne!(spinner.glyph(), first);
    }

    #[test]
    fn status_shows_label_and_glyph() {
        assert_eq!(Spinner::new().status("Evaluating..."), " Evaluating... ⠋ ");
    }
}
