use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};

// One-way flag shared between the main and GUI threads. Once triggered it
// stays triggered.
#[derive(Clone)]
pub struct Shutdown {
    flag: Arc<(Mutex<bool>, Condvar)>,
}

// a panicking holder cannot leave a bool half-written
fn lock(mutex: &Mutex<bool>) -> MutexGuard<'_, bool> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Shutdown {
    pub fn new() -> Shutdown {
        Shutdown {
            flag: Arc::new((Mutex::new(false), Condvar::new())),
        }
    }

    pub fn is_triggered(&self) -> bool {
        *lock(&self.flag.0)
    }

    pub fn wait(&self) {
        let (mutex, condvar) = &*self.flag;
        let _guard = condvar
            .wait_while(lock(mutex), |triggered| !*triggered)
            .unwrap_or_else(PoisonError::into_inner);
    }

    pub fn trigger(&self) {
        let (mutex, condvar) = &*self.flag;
        *lock(mutex) = true;
        condvar.notify_all();
    }

    /// Returns a guard that triggers the shutdown when dropped, including
    /// while the owning thread unwinds from a panic.
    pub fn on_drop(&self) -> TriggerOnDrop {
        TriggerOnDrop(self.clone())
    }
}

pub struct TriggerOnDrop(Shutdown);

impl Drop for TriggerOnDrop {
    fn drop(&mut self) {
        self.0.trigger();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn starts_untriggered() {
        assert!(!Shutdown::new().is_triggered());
    }

    #[test]
    fn wakes_waiters_on_other_threads() {
        let shutdown = Shutdown::new();
        let waiter = {
            let shutdown = shutdown.clone();
            thread::spawn(move || {
                shutdown.wait();
                shutdown.is_triggered()
            })
        };
        shutdown.trigger();
        assert!(waiter.join().unwrap());
    }

    #[test]
    fn wait_returns_immediately_once_triggered() {
        let shutdown = Shutdown::new();
        shutdown.trigger();
        shutdown.wait();
        assert!(shutdown.clone().is_triggered());
    }

    #[test]
    fn panicking_thread_still_triggers() {
        let shutdown = Shutdown::new();
        let worker = {
            let shutdown = shutdown.clone();
            thread::spawn(move || {
                let _trigger = shutdown.on_drop();
                panic!("window could not be opened");
            })
        };
        shutdown.wait();
        assert!(shutdown.is_triggered());
        assert!(worker.join().is_err());
    }

    #[test]
    fn guard_triggers_on_normal_return() {
        let shutdown = Shutdown::new();
        {
            let _trigger = shutdown.on_drop();
            assert!(!shutdown.is_triggered());
        }
        assert!(shutdown.is_triggered());
    }
}
