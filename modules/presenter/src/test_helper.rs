// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use crate::TextView;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct MemoryViewState {
    text: Option<String>,
    notices: Vec<String>,
    writes: usize,
}

/// A [`TextView`] that keeps the displayed text in memory.
///
/// Clones share the same state, so a test can keep a clone and inspect what the
/// presenter displayed.
#[derive(Clone, Default)]
pub struct MemoryTextView {
    state: Arc<Mutex<MemoryViewState>>,
}

impl MemoryTextView {
    pub fn new() -> Self {
        Self::default()
    }

    /// The currently displayed text, `None` if nothing was displayed yet.
    pub fn text(&self) -> Option<String> {
        self.lock().text.clone()
    }

    pub fn notices(&self) -> Vec<String> {
        self.lock().notices.clone()
    }

    /// How often the text was replaced.
    pub fn writes(&self) -> usize {
        self.lock().writes
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryViewState> {
        self.state.lock().unwrap_or_else(|state| state.into_inner())
    }
}

impl TextView for MemoryTextView {
    fn set_text(&mut self, text: &str) {
        let mut state = self.lock();
        state.text = Some(text.to_string());
        state.writes += 1;
    }

    fn show_notice(&mut self, notice: &str) {
        self.lock().notices.push(notice.to_string());
    }
}
