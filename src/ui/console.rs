use std::io::{self, BufRead, Write};

/// The person at the keyboard: something that can be shown text and asked
/// for a line of input.
pub trait Operator {
    fn show(&mut self, text: &str) -> io::Result<()>;

    /// Prompt for one line. `None` when input is closed.
    fn ask(&mut self, prompt: &str) -> io::Result<Option<String>>;

    /// Yes/no question; anything but a leading `y` (or closed input) is no.
    fn confirm(&mut self, question: &str) -> io::Result<bool> {
        let answer = self.ask(&format!("{} [y|n]: ", question))?;
        Ok(answer
            .and_then(|a| a.trim().chars().next())
            .is_some_and(|c| c.eq_ignore_ascii_case(&'y')))
    }
}

/// Operator on stdin/stdout.
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl Console<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self {
            input: io::stdin().lock(),
            output: io::stdout(),
        }
    }
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> Operator for Console<R, W> {
    fn show(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.output, "{}", text)
    }

    fn ask(&mut self, prompt: &str) -> io::Result<Option<String>> {
        self.output.write_all(prompt.as_bytes())?;
        self.output.flush()?;

        let mut buffer = String::new();
        if self.input.read_line(&mut buffer)? == 0 {
            return Ok(None);
        }
        Ok(Some(buffer.trim_end_matches(&['\r', '\n'][..]).to_string()))
    }
}
