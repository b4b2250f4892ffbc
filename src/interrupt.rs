use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use log::warn;

/// Ctrl-C state shared between the signal handler and the export step.
///
/// While fetching, an interrupt ends the process at once; nothing has been
/// written yet. While the CSV is being written the handler only raises the
/// flag, and the exporter discards its temporary file before persisting.
#[derive(Debug, Default)]
pub struct InterruptFlag {
    requested: AtomicBool,
    writing: AtomicBool,
}

pub struct WritingGuard<'a> {
    flag: &'a InterruptFlag,
}

impl InterruptFlag {
    pub fn new() -> Arc<Self> {
        Arc::new(InterruptFlag::default())
    }

    pub fn install(self: &Arc<Self>) -> Result<(), ctrlc::Error> {
        let flag = Arc::clone(self);
        ctrlc::set_handler(move || flag.on_interrupt())
    }

    fn on_interrupt(&self) {
        self.request();
        if self.writing.load(Ordering::SeqCst) {
            warn!("Interrupted while writing output, discarding it...");
        } else {
            warn!("Interrupted, aborting without writing output.");
            process::exit(1);
        }
    }

    pub fn request(&self) {
        self.requested.store(true, Ordering::SeqCst);
    }

    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }

    /// Marks the output as in progress until the guard drops.
    pub fn writing(&self) -> WritingGuard<'_> {
        self.writing.store(true, Ordering::SeqCst);
        WritingGuard { flag: self }
    }
}

impl Drop for WritingGuard<'_> {
    fn drop(&mut self) {
        self.flag.writing.store(false, Ordering::SeqCst);
    }
}
