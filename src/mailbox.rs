//! A one-byte keyboard mailbox: a background thread blocks on stdin reads
//! and publishes the most recent keystroke into an atomic cell. The main
//! loop polls the mailbox between samples; no lock is needed because the
//! mailbox only ever needs to carry the single most recent command and a
//! stale read is harmless (the next poll will see the same or a newer
//! byte).

use std::io::Read;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

const EMPTY: u8 = 0;

/// Shared handle to the keyboard thread's mailbox.
#[derive(Clone)]
pub struct Mailbox {
    cell: Arc<AtomicU8>,
}

impl Mailbox {
    /// Spawn the keyboard-reading thread and return a handle plus a
    /// join handle the caller can ignore (the thread runs for the
    /// lifetime of the process; it isn't designed to be joined cleanly
    /// since it blocks on a read that has no cancellation hook).
    pub fn spawn<R: Read + Send + 'static>(mut input: R) -> (Self, JoinHandle<()>) {
        let cell = Arc::new(AtomicU8::new(EMPTY));
        let thread_cell = Arc::clone(&cell);
        let handle = std::thread::spawn(move || {
            let mut byte = [0u8; 1];
            while let Ok(1) = input.read(&mut byte) {
                thread_cell.store(byte[0], Ordering::Relaxed);
            }
        });
        (Mailbox { cell }, handle)
    }

    /// Take whatever keystroke is pending, if any, clearing the mailbox.
    pub fn take(&self) -> Option<u8> {
        let byte = self.cell.swap(EMPTY, Ordering::Relaxed);
        if byte == EMPTY {
            None
        } else {
            Some(byte)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::time::Duration;

    #[test]
    fn delivers_keystrokes_written_by_the_background_thread() {
        let (mailbox, handle) = Mailbox::spawn(Cursor::new(b"q".to_vec()));
        let mut seen = None;
        for _ in 0..100 {
            if let Some(b) = mailbox.take() {
                seen = Some(b);
                break;
            }
            std::thread::sleep(Duration::from_millis(1));
        }
        assert_eq!(seen, Some(b'q'));
        let _ = handle.join();
    }

    #[test]
    fn take_is_empty_with_no_input() {
        let (mailbox, _handle) = Mailbox::spawn(Cursor::new(Vec::<u8>::new()));
        assert_eq!(mailbox.take(), None);
    }
}
