//! A binary semaphore built on `Condvar` + `Mutex<bool>`.
//!
//! The standard library has no semaphore primitive, so the worker handoff
//! protocol in [`crate::tail`] is built directly on this. `post` sets the
//! flag and wakes one waiter; `wait` blocks until the flag is set, then
//! clears it — exactly the binary (0/1 token) semantics the protocol needs.

use std::sync::{Condvar, Mutex};

pub struct BinarySemaphore {
    flag: Mutex<bool>,
    cv: Condvar,
}

impl BinarySemaphore {
    pub fn new(initially_signaled: bool) -> Self {
        Self { flag: Mutex::new(initially_signaled), cv: Condvar::new() }
    }

    pub fn post(&self) {
        let mut flag = self.flag.lock().expect("semaphore mutex poisoned");
        *flag = true;
        self.cv.notify_one();
    }

    pub fn wait(&self) {
        let mut flag = self.flag.lock().expect("semaphore mutex poisoned");
        while !*flag {
            flag = self.cv.wait(flag).expect("semaphore mutex poisoned");
        }
        *flag = false;
    }
}
