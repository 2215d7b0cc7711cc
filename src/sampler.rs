//! The sampling capability an [`Encoder`](crate::Encoder) polls every tick.

/// Raw button level reported by a pressed button.
pub const BUTTON_PRESSED: u8 = 1;

/// Raw button level reported by a released button.
pub const BUTTON_RELEASED: u8 = 0;

/// A source of raw encoder samples.
///
/// Implementations read whatever hardware the encoder is wired to. Both
/// methods are called from inside the tick functions and must not block.
pub trait Sampler {
    /// Current quadrature code.
    ///
    /// `0b11` is the idle code at a detent and `0b00` marks an invalid
    /// transition. Any other code is a settled turn whose low two bits carry
    /// the direction: bit 0 is right, bit 1 is left.
    fn encoder_state(&mut self) -> u8;

    /// Return `true` while the push button is pressed.
    fn button_pressed(&mut self) -> bool;
}

impl<T: Sampler + ?Sized> Sampler for &mut T {
    fn encoder_state(&mut self) -> u8 {
        (**self).encoder_state()
    }

    fn button_pressed(&mut self) -> bool {
        (**self).button_pressed()
    }
}

/// A [`Sampler`] built from a pair of plain functions and a shared context.
///
/// Both getters receive the same caller-owned context. The button getter is
/// expected to return [`BUTTON_PRESSED`] or [`BUTTON_RELEASED`]; any other
/// level counts as released.
///
/// The context can be a reference (`&'a Pins`, `&'a RefCell<..>`) when the
/// caller wants to keep ownership of the underlying state.
pub struct FnSampler<C> {
    get_encoder_state: fn(&mut C) -> u8,
    get_button_state: fn(&mut C) -> u8,
    context: C,
}

impl<C> FnSampler<C> {
    /// Build a sampler from two getters and their context.
    pub fn new(
        get_encoder_state: fn(&mut C) -> u8,
        get_button_state: fn(&mut C) -> u8,
        context: C,
    ) -> Self {
        Self {
            get_encoder_state,
            get_button_state,
            context,
        }
    }

    /// Shared context passed to both getters.
    pub fn context(&self) -> &C {
        &self.context
    }

    /// Mutable access to the shared context.
    pub fn context_mut(&mut self) -> &mut C {
        &mut self.context
    }

    /// Consume the sampler and return the context.
    pub fn into_context(self) -> C {
        self.context
    }
}

impl<C> Sampler for FnSampler<C> {
    fn encoder_state(&mut self) -> u8 {
        (self.get_encoder_state)(&mut self.context)
    }

    fn button_pressed(&mut self) -> bool {
        (self.get_button_state)(&mut self.context) == BUTTON_PRESSED
    }
}
