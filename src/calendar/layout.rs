use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::num::NonZeroUsize;
use std::rc::{Rc, Weak};

/// Narrowest width, in pixels, at which a day cell is still comfortable
pub const MIN_CELL_WIDTH: u32 = 64;

/// Width, in pixels, of the gap between adjacent day cells
pub const GAP_WIDTH: u32 = 12;

/// Container width, in pixels, from which the two-week layout is used.
///
/// This is sized for eight cells' worth of width rather than fourteen so that
/// the wide layout only kicks in when the cells will not be cramped.
pub const WIDE_LAYOUT_MIN_WIDTH: u32 = 8 * MIN_CELL_WIDTH + 13 * GAP_WIDTH;

const ONE_WEEK: NonZeroUsize = NonZeroUsize::MIN.saturating_add(6);

const TWO_WEEKS: NonZeroUsize = NonZeroUsize::MIN.saturating_add(13);

/// Number of day columns in the month grid
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Columns {
    #[default]
    Seven,
    Fourteen,
}

impl Columns {
    pub fn get(self) -> NonZeroUsize {
        match self {
            Columns::Seven => ONE_WEEK,
            Columns::Fourteen => TWO_WEEKS,
        }
    }
}

/// Choose the number of grid columns for a container `width` pixels wide
pub fn decide_columns(width: u32) -> Columns {
    if width >= WIDE_LAYOUT_MIN_WIDTH {
        Columns::Fourteen
    } else {
        Columns::Seven
    }
}

type Listener = Box<dyn FnMut(u32)>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    listeners: BTreeMap<u64, Listener>,
    last_width: Option<u32>,
}

/// A push-based source of container width measurements.
///
/// The host feeds measurements in with [`WidthNotifier::notify()`] whenever
/// the space available to the calendar changes; observers receive them
/// synchronously, on the same thread, for as long as they hold on to the
/// [`Subscription`] returned by [`WidthNotifier::subscribe()`].
///
/// Listeners must not subscribe to or unsubscribe from the same notifier
/// while they are being notified.
#[derive(Clone, Default)]
pub struct WidthNotifier {
    registry: Rc<RefCell<Registry>>,
}

impl WidthNotifier {
    pub fn new() -> WidthNotifier {
        WidthNotifier::default()
    }

    /// Start delivering width measurements to `listener`.
    ///
    /// If a measurement has already been published, `listener` is called with
    /// it immediately.  Delivery stops when the returned `Subscription` is
    /// dropped.
    pub fn subscribe<F>(&self, mut listener: F) -> Subscription
    where
        F: FnMut(u32) + 'static,
    {
        let last_width = self.registry.borrow().last_width;
        if let Some(width) = last_width {
            listener(width);
        }
        let mut registry = self.registry.borrow_mut();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.listeners.insert(id, Box::new(listener));
        log::trace!("width listener {id} subscribed");
        Subscription {
            registry: Rc::downgrade(&self.registry),
            id,
        }
    }

    /// Publish a new width measurement to all current subscribers
    pub fn notify(&self, width: u32) {
        let mut registry = self.registry.borrow_mut();
        registry.last_width = Some(width);
        for listener in registry.listeners.values_mut() {
            listener(width);
        }
    }

    pub fn last_width(&self) -> Option<u32> {
        self.registry.borrow().last_width
    }

    pub fn listener_count(&self) -> usize {
        self.registry.borrow().listeners.len()
    }
}

impl fmt::Debug for WidthNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WidthNotifier")
            .field("listeners", &self.listener_count())
            .field("last_width", &self.last_width())
            .finish()
    }
}

/// Guard for a listener registered with a [`WidthNotifier`].  Dropping it
/// unsubscribes the listener.
#[derive(Debug)]
#[must_use = "the listener is unsubscribed as soon as the Subscription is dropped"]
pub struct Subscription {
    registry: Weak<RefCell<Registry>>,
    id: u64,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.borrow_mut().listeners.remove(&self.id);
            log::trace!("width listener {} unsubscribed", self.id);
        }
    }
}
