//! Terminal-agnostic keyboard input.

/// Keyboard input abstraction.
///
/// Decouples application logic from terminal libraries (crossterm, termion,
/// etc.) enabling deterministic simulation testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    /// Printable character (typed into the focused input).
    Char(char),
    /// Enter/Return key (press the focused button).
    Enter,
    /// Backspace key (delete last character of the focused input).
    Backspace,
    /// Tab key (focus next).
    Tab,
    /// Shift-Tab (focus previous).
    BackTab,
    /// Up arrow key (focus previous).
    Up,
    /// Down arrow key (focus next).
    Down,
    /// Escape key (back).
    Esc,
    /// F5 (restart the flow).
    Restart,
    /// Ctrl-C (quit).
    Interrupt,
}
