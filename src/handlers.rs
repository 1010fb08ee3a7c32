//! Receive handler registry.
//!
//! Handlers are plain function pointers invoked in registration order for
//! every drained packet. A handler receives the payload and a [`Dispatch`]
//! context through which it may attach or detach handlers; such changes are
//! queued and applied once the current dispatch has finished, so the list
//! being iterated never changes underneath it.
//!
//! ## Example
//!
//! ```rust
//! use nrf905::handlers::{Dispatch, HandlerRegistry};
//! use nrf905::payload::RxPayload;
//!
//! fn one_shot(payload: &RxPayload, dispatch: &mut Dispatch<'_>) {
//!     assert_eq!(payload.len(), 32);
//!     // Runs once, then removes itself after this dispatch completes
//!     let _ = dispatch.detach(dispatch.handler_id());
//! }
//!
//! let mut registry = HandlerRegistry::new();
//! registry.attach(one_shot).unwrap();
//! registry.dispatch(&RxPayload::new([0; 32]));
//! assert!(registry.is_empty());
//! ```

use heapless::Vec;

use crate::consts::MAX_HANDLERS;
use crate::error::Error;
use crate::payload::RxPayload;

/// Callback invoked for each received packet.
pub type ReceivedHandler = fn(&RxPayload, &mut Dispatch<'_>);

/// Token identifying an attached handler.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct HandlerId(u16);

#[derive(Clone, Copy, Debug)]
struct Entry {
    id: HandlerId,
    handler: ReceivedHandler,
}

#[derive(Clone, Copy, Debug)]
enum Pending {
    Attach(Entry),
    Detach(HandlerId),
}

/// Ordered, fixed-capacity list of receive handlers.
#[derive(Debug, Default)]
pub struct HandlerRegistry {
    entries: Vec<Entry, MAX_HANDLERS>,
    pending: Vec<Pending, MAX_HANDLERS>,
    next_id: u16,
}

/// Hands out the next id not held by an attached or queued handler.
///
/// At most `2 * MAX_HANDLERS` ids are live, so the search always ends.
fn allocate(next_id: &mut u16, entries: &[Entry], queued: &[Pending]) -> HandlerId {
    loop {
        let id = HandlerId(*next_id);
        *next_id = next_id.wrapping_add(1);
        let in_use = entries.iter().any(|entry| entry.id == id)
            || queued
                .iter()
                .any(|pending| matches!(pending, Pending::Attach(entry) if entry.id == id));
        if !in_use {
            return id;
        }
    }
}

impl HandlerRegistry {
    /// Creates an empty registry.
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            pending: Vec::new(),
            next_id: 0,
        }
    }

    /// Number of attached handlers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no handler is attached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Appends a handler; it runs after every handler attached before it.
    ///
    /// # Errors
    /// [`Error::RegistryFull`] once [`MAX_HANDLERS`] handlers are attached.
    pub fn attach(&mut self, handler: ReceivedHandler) -> Result<HandlerId, Error> {
        if self.entries.is_full() {
            return Err(Error::RegistryFull);
        }
        let entry = Entry {
            id: allocate(&mut self.next_id, &self.entries, &self.pending),
            handler,
        };
        self.entries
            .push(entry)
            .map_err(|_| Error::RegistryFull)?;
        Ok(entry.id)
    }

    /// Removes a handler. Returns `false` if it was not attached.
    pub fn detach(&mut self, id: HandlerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        self.entries.len() != before
    }

    /// Invokes every handler in registration order, then applies the changes
    /// the handlers queued.
    ///
    /// A panicking handler aborts the dispatch; handlers after it are not run.
    pub fn dispatch(&mut self, payload: &RxPayload) {
        for entry in self.entries.iter() {
            let mut dispatch = Dispatch {
                current: entry.id,
                attached: &self.entries,
                queued: &mut self.pending,
                next_id: &mut self.next_id,
            };
            (entry.handler)(payload, &mut dispatch);
        }
        self.apply_pending();
    }

    fn apply_pending(&mut self) {
        for pending in self.pending.iter() {
            match *pending {
                Pending::Attach(entry) => {
                    if self.entries.push(entry).is_err() {
                        warn!("dropping deferred attach of handler {:?}", entry.id);
                    }
                }
                Pending::Detach(id) => self.entries.retain(|entry| entry.id != id),
            }
        }
        self.pending.clear();
    }
}

/// Context handed to a handler while a packet is being dispatched.
#[derive(Debug)]
pub struct Dispatch<'a> {
    current: HandlerId,
    attached: &'a [Entry],
    queued: &'a mut Vec<Pending, MAX_HANDLERS>,
    next_id: &'a mut u16,
}

impl Dispatch<'_> {
    /// Id of the handler currently running.
    pub fn handler_id(&self) -> HandlerId {
        self.current
    }

    /// Queues a handler to be attached after this dispatch. It will not see
    /// the current packet.
    ///
    /// # Errors
    /// [`Error::RegistryFull`] if the registry or the queue has no room.
    pub fn attach(&mut self, handler: ReceivedHandler) -> Result<HandlerId, Error> {
        let queued_attaches = self
            .queued
            .iter()
            .filter(|pending| matches!(pending, Pending::Attach(_)))
            .count();
        if self.attached.len() + queued_attaches >= MAX_HANDLERS || self.queued.is_full() {
            return Err(Error::RegistryFull);
        }
        let entry = Entry {
            id: allocate(self.next_id, self.attached, self.queued.as_slice()),
            handler,
        };
        self.queued
            .push(Pending::Attach(entry))
            .map_err(|_| Error::RegistryFull)?;
        Ok(entry.id)
    }

    /// Queues a handler for removal after this dispatch. Handlers later in the
    /// list still see the current packet.
    ///
    /// # Errors
    /// [`Error::RegistryFull`] if the queue has no room.
    pub fn detach(&mut self, id: HandlerId) -> Result<(), Error> {
        self.queued
            .push(Pending::Detach(id))
            .map_err(|_| Error::RegistryFull)
    }
}
