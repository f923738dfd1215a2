use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
}

/// Transient user notifications, shared between controllers.
#[derive(Clone, Default)]
pub struct Toasts {
    entries: Arc<Mutex<Vec<Toast>>>,
}

impl Toasts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show_info(&self, message: impl Into<String>) {
        let message = message.into();
        tracing::info!("{}", message);
        self.push(ToastLevel::Info, message);
    }

    pub fn show_error(&self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!("{}", message);
        self.push(ToastLevel::Error, message);
    }

    /// Remove and return everything shown so far.
    pub fn drain(&self) -> Vec<Toast> {
        match self.entries.lock() {
            Ok(mut entries) => entries.drain(..).collect(),
            Err(_) => Vec::new(),
        }
    }

    pub fn last(&self) -> Option<Toast> {
        self.entries.lock().ok().and_then(|e| e.last().cloned())
    }

    fn push(&self, level: ToastLevel, message: String) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(Toast { level, message });
        }
    }
}
