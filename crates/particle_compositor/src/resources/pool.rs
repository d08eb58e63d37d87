//! Generic object pool
//!
//! Keeps released instances around so frame-transient objects (geometry
//! buffers, working arrays) are not reallocated every frame.
//!
//! # Architecture
//!
//! ```text
//! rent()  ──► free list non-empty? ──► pop (skip instances failing validate)
//!                   │ no
//!                   └──► factory()
//!
//! release(&mut handle) ──► reset(instance) ──► push to free list
//!                              handle = None
//! ```
//!
//! Ownership is tracked by the type system: a rented instance is moved out
//! to the caller and moved back in on release, so an instance always has
//! exactly one owner. Pairing `rent`/`release` is the caller's job;
//! [`ResourcePool::with_rented`] does it for scoped use. An instance that is
//! never released is simply dropped with its owner.

type Factory<T> = Box<dyn FnMut() -> T>;
type Reset<T> = Box<dyn FnMut(&mut T)>;
type Validate<T> = Box<dyn Fn(&T) -> bool>;

/// Acquire/release pool with factory, reset and optional validation hooks.
pub struct ResourcePool<T> {
    /// Released instances awaiting reuse, all in baseline state
    free: Vec<T>,
    factory: Factory<T>,
    reset: Reset<T>,
    validate: Option<Validate<T>>,
    /// Instances constructed through the factory
    created: usize,
    /// Instances currently held by callers
    outstanding: usize,
}

impl<T> ResourcePool<T> {
    /// Create a pool.
    ///
    /// `factory` must produce instances already in baseline state; `reset`
    /// must restore that state and runs once per release.
    pub fn new<F, R>(factory: F, reset: R) -> Self
    where
        F: FnMut() -> T + 'static,
        R: FnMut(&mut T) + 'static,
    {
        Self {
            free: Vec::new(),
            factory: Box::new(factory),
            reset: Box::new(reset),
            validate: None,
            created: 0,
            outstanding: 0,
        }
    }

    /// Attach a liveness check. Free instances failing it are discarded on
    /// rent instead of being handed out.
    pub fn with_validator<V>(mut self, validate: V) -> Self
    where
        V: Fn(&T) -> bool + 'static,
    {
        self.validate = Some(Box::new(validate));
        self
    }

    /// Construct instances up front so the first frames do not allocate
    pub fn prewarm(&mut self, count: usize) {
        self.free.reserve(count);
        for _ in 0..count {
            let instance = self.construct();
            self.free.push(instance);
        }
    }

    /// Take an instance in baseline state
    pub fn rent(&mut self) -> T {
        let instance = loop {
            match self.free.pop() {
                Some(candidate) if self.is_valid(&candidate) => break candidate,
                Some(_) => {
                    log::warn!("ResourcePool discarded an instance that failed validation");
                }
                None => break self.construct(),
            }
        };
        self.outstanding += 1;
        instance
    }

    /// Return an instance to the pool and clear the caller's handle.
    ///
    /// The instance is reset before it becomes rentable again. An empty
    /// handle is a no-op.
    pub fn release(&mut self, handle: &mut Option<T>) {
        let Some(mut instance) = handle.take() else {
            return;
        };
        (self.reset)(&mut instance);
        self.outstanding = self.outstanding.saturating_sub(1);
        self.free.push(instance);
    }

    /// Rent an instance for the duration of `f`, releasing it afterwards
    pub fn with_rented<R>(&mut self, f: impl FnOnce(&mut T) -> R) -> R {
        let mut instance = self.rent();
        let result = f(&mut instance);
        self.release(&mut Some(instance));
        result
    }

    /// Remove and return every free instance, e.g. for disposal
    pub fn drain_free(&mut self) -> std::vec::Drain<'_, T> {
        self.free.drain(..)
    }

    /// Instances available for reuse
    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    /// Instances currently rented out
    pub fn outstanding(&self) -> usize {
        self.outstanding
    }

    /// Instances ever constructed by the factory
    pub fn created_count(&self) -> usize {
        self.created
    }

    fn construct(&mut self) -> T {
        self.created += 1;
        log::debug!("ResourcePool constructing instance #{}", self.created);
        (self.factory)()
    }

    fn is_valid(&self, instance: &T) -> bool {
        self.validate.as_ref().map_or(true, |validate| validate(instance))
    }
}

impl<T> std::fmt::Debug for ResourcePool<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourcePool")
            .field("free", &self.free.len())
            .field("created", &self.created)
            .field("outstanding", &self.outstanding)
            .finish()
    }
}
