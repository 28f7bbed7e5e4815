//! ANSI styling for the text renderer.
//!
//! [`Style::plain`] produces no escape sequences at all, which keeps rendered
//! output comparable in tests and safe to pipe.

use crate::app::NotificationLevel;
use crate::domain::StudentStatus;

/// Colors as 24-bit RGB triples.
const GREEN: (u8, u8, u8) = (0xa6, 0xe3, 0xa1);
const RED: (u8, u8, u8) = (0xf3, 0x8b, 0xa8);
const YELLOW: (u8, u8, u8) = (0xf9, 0xe2, 0xaf);
const BLUE: (u8, u8, u8) = (0x89, 0xb4, 0xfa);
const HIGHLIGHT_BG: (u8, u8, u8) = (0x45, 0x47, 0x5a);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Style {
    ansi: bool,
}

impl Style {
    /// No escape sequences.
    #[must_use]
    pub const fn plain() -> Self {
        Self { ansi: false }
    }

    /// 24-bit color escape sequences.
    #[must_use]
    pub const fn ansi() -> Self {
        Self { ansi: true }
    }

    fn fg((r, g, b): (u8, u8, u8)) -> String {
        format!("\u{001b}[38;2;{r};{g};{b}m")
    }

    fn bg((r, g, b): (u8, u8, u8)) -> String {
        format!("\u{001b}[48;2;{r};{g};{b}m")
    }

    fn wrap(&self, open: &str, text: &str) -> String {
        if self.ansi {
            format!("{open}{text}\u{001b}[0m")
        } else {
            text.to_string()
        }
    }

    #[must_use]
    pub fn bold(&self, text: &str) -> String {
        self.wrap("\u{001b}[1m", text)
    }

    #[must_use]
    pub fn dim(&self, text: &str) -> String {
        self.wrap("\u{001b}[2m", text)
    }

    #[must_use]
    pub fn status(&self, status: StudentStatus) -> String {
        let color = match status {
            StudentStatus::Active => GREEN,
            StudentStatus::Inactive => RED,
        };
        self.wrap(&Self::fg(color), status.as_str())
    }

    #[must_use]
    pub fn notification(&self, level: NotificationLevel, text: &str) -> String {
        let color = match level {
            NotificationLevel::Info => BLUE,
            NotificationLevel::Success => GREEN,
            NotificationLevel::Warning => YELLOW,
            NotificationLevel::Error => RED,
        };
        self.wrap(&Self::fg(color), text)
    }

    /// Renders `text` with the characters at `indices` highlighted.
    ///
    /// In plain mode highlighted runs are wrapped in `[` `]`.
    #[must_use]
    pub fn highlighted(&self, text: &str, indices: &[usize]) -> String {
        if indices.is_empty() {
            return text.to_string();
        }

        let (open, close) = if self.ansi {
            (
                format!("{}{}", Self::fg(YELLOW), Self::bg(HIGHLIGHT_BG)),
                "\u{001b}[0m".to_string(),
            )
        } else {
            ("[".to_string(), "]".to_string())
        };

        let mut out = String::with_capacity(text.len() + indices.len() * 2);
        let mut in_run = false;
        for (i, ch) in text.chars().enumerate() {
            let hit = indices.binary_search(&i).is_ok();
            if hit && !in_run {
                out.push_str(&open);
            } else if !hit && in_run {
                out.push_str(&close);
            }
            in_run = hit;
            out.push(ch);
        }
        if in_run {
            out.push_str(&close);
        }
        out
    }
}
