/// Input action produced from one line of operator input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    /// 1-based menu entry (volume or subfolder)
    Select(usize),
    /// Use the current folder as the trace folder
    Upload,
    /// `0` or `b`: previous folder, or volume selection
    Back,
    /// `q`, or closed input: end the session
    Quit,
    /// Anything else
    Invalid,
}

/// Process a line typed at a menu prompt. `None` means input was closed.
pub fn parse_input(line: Option<&str>) -> InputAction {
    let Some(line) = line else {
        return InputAction::Quit;
    };

    match line.trim().to_ascii_lowercase().as_str() {
        "0" | "b" | "back" => InputAction::Back,
        "u" | "upload" => InputAction::Upload,
        "q" | "quit" | "exit" => InputAction::Quit,
        other => match other.parse::<usize>() {
            Ok(n) if n > 0 => InputAction::Select(n),
            _ => InputAction::Invalid,
        },
    }
}
