//! Process-wide pool of scratch `String` buffers used while rendering.
//!
//! Joining into a reused buffer only saves the growth reallocations of the
//! join; the rendered SQL is still copied out into a fresh `String`.

use std::sync::{Mutex, OnceLock};

/// Buffers above this capacity are dropped instead of pooled.
const MAX_POOLED_CAPACITY: usize = 16 * 1024;
const MAX_POOLED_BUFFERS: usize = 32;

fn pool() -> &'static Mutex<Vec<String>> {
    static POOL: OnceLock<Mutex<Vec<String>>> = OnceLock::new();
    POOL.get_or_init(|| Mutex::new(Vec::new()))
}

/// A pooled buffer; goes back to the pool (cleared) when dropped.
pub(crate) struct Scratch {
    buf: String,
}

impl Scratch {
    pub(crate) fn acquire(size_hint: usize) -> Self {
        let reused = pool()
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop();
        let mut buf = reused.unwrap_or_default();
        buf.reserve(size_hint);
        Self { buf }
    }

    pub(crate) fn push_str(&mut self, s: &str) {
        self.buf.push_str(s);
    }

    pub(crate) fn push(&mut self, c: char) {
        self.buf.push(c);
    }

    pub(crate) fn as_str(&self) -> &str {
        &self.buf
    }
}

impl Drop for Scratch {
    fn drop(&mut self) {
        if self.buf.capacity() > MAX_POOLED_CAPACITY {
            return;
        }
        let mut buf = std::mem::take(&mut self.buf);
        buf.clear();
        let mut pool = pool().lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if pool.len() < MAX_POOLED_BUFFERS {
            pool.push(buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acquired_buffer_starts_empty() {
        {
            let mut s = Scratch::acquire(8);
            s.push_str("leftover");
        }
        let s = Scratch::acquire(8);
        assert_eq!(s.as_str(), "");
    }

    #[test]
    fn usable_from_many_threads() {
        let handles: Vec<_> = (0..8)
            .map(|i| {
                std::thread::spawn(move || {
                    let mut s = Scratch::acquire(4);
                    s.push_str("t");
                    s.push(char::from(b'0' + i as u8));
                    s.as_str().to_string()
                })
            })
            .collect();
        for (i, h) in handles.into_iter().enumerate() {
            assert_eq!(h.join().unwrap(), format!("t{i}"));
        }
    }
}
