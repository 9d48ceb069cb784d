//! The hook layer: named behavior slots and the composition rules for
//! patching them.
//!
//! The host engine owns a [`Registry`] mapping slot names to callables. A
//! patch either wraps the current occupant of a slot ([`Registry::install`],
//! capturing the previous behavior so it can defer to it at call time) or
//! replaces it outright ([`Registry::replace`]). Installation only happens
//! during bring-up and needs `&mut Registry`; invocation takes `&Registry`,
//! so the install-before-first-use ordering is enforced by the borrow
//! checker rather than by convention.

use std::any::Any;
use std::collections::HashMap;
use std::marker::PhantomData;
use std::rc::Rc;

/// A callable occupying a behavior slot. Behaviors receive the registry as
/// well as the host state, because host defaults routinely invoke other
/// patchable slots.
pub type Behavior<H, A, R> = Rc<dyn Fn(&Registry<H>, &mut H, A) -> R>;

/// A typed key for one behavior slot. Identity is the name; the signature
/// is carried in the type so lookups stay checked.
pub struct Slot<A, R> {
    name: &'static str,
    _sig: PhantomData<fn(A) -> R>,
}

impl<A, R> Slot<A, R> {
    pub const fn new(name: &'static str) -> Slot<A, R> {
        Slot {
            name,
            _sig: PhantomData,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

// Derived impls would bound A and R, which a key never needs.
impl<A, R> Clone for Slot<A, R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<A, R> Copy for Slot<A, R> {}

/// The host's mapping from slot name to current behavior. Passed explicitly
/// to whoever needs it; never a process global.
pub struct Registry<H> {
    slots: HashMap<&'static str, Box<dyn Any>>,
    _host: PhantomData<fn(&mut H)>,
}

impl<H: 'static> Registry<H> {
    pub fn new() -> Registry<H> {
        Registry {
            slots: HashMap::new(),
            _host: PhantomData,
        }
    }

    /// Declares an extension point with its default behavior. Host-side.
    pub fn expose<A: 'static, R: 'static>(
        &mut self,
        slot: Slot<A, R>,
        behavior: impl Fn(&Registry<H>, &mut H, A) -> R + 'static,
    ) {
        self.slots
            .insert(slot.name, Box::new(Rc::new(behavior) as Behavior<H, A, R>));
    }

    /// Total override: writes the slot unconditionally, creating it if the
    /// host never exposed it. The previous occupant (if any) is discarded.
    pub fn replace<A: 'static, R: 'static>(
        &mut self,
        slot: Slot<A, R>,
        behavior: impl Fn(&Registry<H>, &mut H, A) -> R + 'static,
    ) {
        if self.slots.contains_key(slot.name) {
            log::debug!("overriding slot '{}'", slot.name);
        }
        self.expose(slot, behavior);
    }

    /// Wraps the current occupant of `slot`: reads it, hands it to `make`,
    /// and writes the result back. `make` must not call the previous
    /// behavior itself; deferring to it is a call-time decision.
    ///
    /// A slot the host never exposed (or one exposed with a different
    /// signature) leaves the registry untouched and returns `false`. Patch
    /// installation is never fatal.
    pub fn install<A: 'static, R: 'static>(
        &mut self,
        slot: Slot<A, R>,
        make: impl FnOnce(Behavior<H, A, R>) -> Behavior<H, A, R>,
    ) -> bool {
        let previous = match self.slots.get(slot.name) {
            Some(occupant) => match occupant.downcast_ref::<Behavior<H, A, R>>() {
                Some(behavior) => Rc::clone(behavior),
                None => {
                    log::warn!(
                        "slot '{}' exists with a different signature; leaving it alone",
                        slot.name
                    );
                    return false;
                }
            },
            None => {
                log::warn!("slot '{}' is not exposed by the host; skipping", slot.name);
                return false;
            }
        };

        self.slots.insert(slot.name, Box::new(make(previous)));
        true
    }

    /// Calls the current occupant of `slot`. The behavior is cloned out of
    /// the map first, so a call already in flight keeps whichever callable
    /// it captured regardless of what the host does to the slot afterwards.
    ///
    /// Panics if the host invokes a slot it never exposed, which is a bug
    /// in the host's bring-up, not a recoverable patch failure.
    pub fn invoke<A: 'static, R: 'static>(&self, slot: Slot<A, R>, host: &mut H, args: A) -> R {
        let behavior = self
            .slots
            .get(slot.name)
            .and_then(|occupant| occupant.downcast_ref::<Behavior<H, A, R>>())
            .map(Rc::clone)
            .unwrap_or_else(|| panic!("slot '{}' invoked before it was exposed", slot.name));

        behavior(self, host, args)
    }

    pub fn is_exposed<A, R>(&self, slot: Slot<A, R>) -> bool {
        self.slots.contains_key(slot.name)
    }
}

impl<H: 'static> Default for Registry<H> {
    fn default() -> Self {
        Registry::new()
    }
}
