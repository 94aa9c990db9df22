use presenter::TextView;
use std::io::Write;
use tracing::warn;

/// Shows the location on the terminal, replacing the previous output.
pub struct TerminalView {
    out: std::io::Stdout,
}

impl TerminalView {
    const CLEAR_SCREEN: &'static str = "\x1B[2J\x1B[H";
}

impl Default for TerminalView {
    fn default() -> Self {
        TerminalView {
            out: std::io::stdout(),
        }
    }
}

impl TextView for TerminalView {
    fn set_text(&mut self, text: &str) {
        let mut out = self.out.lock();
        if let Err(e) = writeln!(out, "{}{text}", Self::CLEAR_SCREEN).and_then(|_| out.flush()) {
            warn!("Failed to write the location to the terminal. Error: {e}");
        }
    }

    fn show_notice(&mut self, notice: &str) {
        let mut out = self.out.lock();
        if let Err(e) = writeln!(out, "{notice}").and_then(|_| out.flush()) {
            warn!("Failed to write the notice to the terminal. Error: {e}");
        }
    }
}
