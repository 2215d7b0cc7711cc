//! # Encodr
//!
//! A small `no_std` decoder for a quadrature rotary encoder with an
//! integrated push button. It is driven by a fixed-period tick (a timer
//! callback or a polling loop) and needs no interrupts, no allocation and no
//! global state. One [`Encoder`] instance handles one encoder/button pair.
//!
//! Two state machines share one byte of pending [`Events`]:
//!
//! - the rotation decoder waits for the idle code at a detent, then
//!   classifies the next settled code as a turn to the right or left, or as
//!   a held turn if the button is pressed at that moment;
//! - the button decoder debounces presses for 50 ms and then tells a click
//!   (released before the hold timeout) from a hold.
//!
//! Events are edge triggered: each accessor reports its event once and
//! clears it.
//!
//! ## API
//!
//! ### Instantiate
//!
//! Implement [`Sampler`] for whatever reads your pins, then pick the tick
//! period and the hold timeout. With a 10 ms period and a 500 ms hold
//! timeout, the debounce takes 5 ticks and a hold takes 50 more.
//!
//! ```rust
//! use encodr::{Config, Encoder, Sampler};
//!
//! struct Pins {
//!     code: u8,
//!     pressed: bool,
//! }
//!
//! impl Sampler for Pins {
//!     fn encoder_state(&mut self) -> u8 {
//!         self.code
//!     }
//!
//!     fn button_pressed(&mut self) -> bool {
//!         self.pressed
//!     }
//! }
//!
//! let pins = Pins { code: 0b11, pressed: false };
//! let encoder = Encoder::new(pins, Config::new(10, 500)).unwrap();
//! assert_eq!(encoder.debounce_ticks(), 5);
//! assert_eq!(encoder.hold_ticks(), 50);
//! ```
//!
//! If your sampling code is a pair of plain functions sharing a context,
//! [`Encoder::from_fns`] builds the sampler for you:
//!
//! ```rust
//! use encodr::{Encoder, Error};
//!
//! fn encoder_state(pins: &mut [u8; 2]) -> u8 {
//!     pins[0]
//! }
//!
//! fn button_state(pins: &mut [u8; 2]) -> u8 {
//!     pins[1]
//! }
//!
//! let encoder = Encoder::from_fns(Some(encoder_state), Some(button_state), [0b11, 0], 10, 500);
//! assert!(encoder.is_ok());
//!
//! let encoder = Encoder::from_fns(Some(encoder_state), None, [0b11, 0], 10, 500);
//! assert_eq!(encoder.err(), Some(Error::MissingButtonSampler));
//! ```
//!
//! ### Update
//!
//! Call [`Encoder::process_rotation`] and [`Encoder::process_button`] (or
//! both at once through [`Encoder::process`]) once per period, then poll
//! the accessors whenever convenient.
//!
//! ```rust
//! # use encodr::{Config, Encoder, Sampler};
//! # struct Pins { code: u8, pressed: bool }
//! # impl Sampler for Pins {
//! #     fn encoder_state(&mut self) -> u8 { self.code }
//! #     fn button_pressed(&mut self) -> bool { self.pressed }
//! # }
//! let pins = Pins { code: 0b11, pressed: false };
//! let mut encoder = Encoder::new(pins, Config::new(10, 500)).unwrap();
//!
//! // Rest at a detent, then settle one step to the right
//! encoder.process_rotation();
//! encoder.sampler_mut().code = 0b01;
//! encoder.process_rotation();
//!
//! assert!(encoder.take_right());
//! assert!(!encoder.take_right());
//! assert!(!encoder.take_left());
//! ```
//!
//! ### Timing
//!
//! The period is a constant, not a measurement. Skipped or late ticks
//! stretch the debounce and hold windows accordingly. Budgets are floor
//! divisions of the configured times by the period; a budget of zero is
//! accepted and makes that countdown complete on every tick it runs.
//!
//! ## Crate Features
//!
//! - **`defmt`**: trace phase transitions and emitted events through
//!   [`defmt`](https://docs.rs/defmt), and derive `defmt::Format` for the
//!   public types.
#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code, missing_docs)]

mod error;
mod events;
mod fmt;
mod sampler;

use doc_comment::doc_comment;

use crate::fmt::{debug, trace};

pub use crate::error::Error;
pub use crate::events::Events;
pub use crate::sampler::{FnSampler, Sampler, BUTTON_PRESSED, BUTTON_RELEASED};

/// Time a press must be stable before it counts, in milliseconds.
pub const DEBOUNCE_TIME_MS: u8 = 50;

/// Code reported at rest on a detent.
const IDLE_CODE: u8 = 0b11;
/// Code reported after an invalid transition.
const ERROR_CODE: u8 = 0b00;
/// Direction bits of a settled code.
const DIRECTION_MASK: u8 = 0b11;
/// Distance between a turn flag and its held counterpart.
const HOLD_SHIFT: u8 = 2;

/// Encoder timing configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Tick period in milliseconds. Must be greater than zero.
    pub period_ms: u8,
    /// How long the button must stay pressed to register a hold, in
    /// milliseconds.
    pub button_hold_timeout_ms: u16,
}

impl Config {
    /// Create a configuration from a tick period and a hold timeout.
    pub const fn new(period_ms: u8, button_hold_timeout_ms: u16) -> Self {
        Self {
            period_ms,
            button_hold_timeout_ms,
        }
    }
}

impl Default for Config {
    /// 10 ms ticks, 500 ms hold timeout.
    fn default() -> Self {
        Self::new(10, 500)
    }
}

/// State of the rotation decoder.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RotationPhase {
    /// Waiting for the idle code at a detent.
    AwaitingDetent,
    /// Idle seen; the next settled code completes a turn.
    AwaitingTurn,
}

/// State of the button decoder.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonPhase {
    /// Released, waiting for a press.
    AwaitingPress,
    /// Press seen, counting down the debounce window.
    Debouncing,
    /// Debounced press, waiting for a release (click) or the hold timeout.
    AwaitingHoldOrRelease,
    /// Hold reported, waiting for the release.
    Holding,
    /// A turn was completed while pressed, waiting for the release.
    TurnWhileHeld,
}

/// A rotary encoder with push button.
///
/// Owns its [`Sampler`] (pass `&mut sampler` to keep ownership) and one byte
/// of pending events. Instances are fully independent of each other.
pub struct Encoder<S> {
    sampler: S,
    config: Config,
    rotation_phase: RotationPhase,
    button_phase: ButtonPhase,
    pending: Events,
    debounce_ticks: u8,
    debounce_counter: u8,
    hold_ticks: u16,
    hold_counter: u16,
}

impl<C> Encoder<FnSampler<C>> {
    /// Create an encoder from a pair of sampling functions sharing one
    /// context.
    ///
    /// Fails before anything is built if either function is missing or
    /// `period_ms` is zero.
    pub fn from_fns(
        get_encoder_state: Option<fn(&mut C) -> u8>,
        get_button_state: Option<fn(&mut C) -> u8>,
        context: C,
        period_ms: u8,
        button_hold_timeout_ms: u16,
    ) -> Result<Self, Error> {
        let get_encoder_state = get_encoder_state.ok_or(Error::MissingStateSampler)?;
        let get_button_state = get_button_state.ok_or(Error::MissingButtonSampler)?;
        let sampler = FnSampler::new(get_encoder_state, get_button_state, context);
        Encoder::new(sampler, Config::new(period_ms, button_hold_timeout_ms))
    }
}

impl<S: Sampler> Encoder<S> {
    /// Create an encoder polling `sampler` with the given timing.
    ///
    /// Both decoders start in their initial phase with no pending events.
    /// The debounce budget is `50 / period_ms` ticks and the hold budget is
    /// `button_hold_timeout_ms / period_ms` ticks, both rounded down.
    pub fn new(sampler: S, config: Config) -> Result<Self, Error> {
        if config.period_ms == 0 {
            return Err(Error::ZeroPeriod);
        }

        let debounce_ticks = DEBOUNCE_TIME_MS / config.period_ms;
        let hold_ticks = config.button_hold_timeout_ms / u16::from(config.period_ms);
        debug!(
            "encoder: debounce {} ticks, hold {} ticks",
            debounce_ticks,
            hold_ticks
        );

        Ok(Self {
            sampler,
            config,
            rotation_phase: RotationPhase::AwaitingDetent,
            button_phase: ButtonPhase::AwaitingPress,
            pending: Events::empty(),
            debounce_ticks,
            debounce_counter: debounce_ticks,
            hold_ticks,
            hold_counter: hold_ticks,
        })
    }

    /// Run both decoders for one tick, rotation first.
    pub fn process(&mut self) {
        self.process_rotation();
        self.process_button();
    }

    /// Advance the rotation decoder by one tick.
    ///
    /// A turn is only recognised after the idle code has been seen. The
    /// first non-idle code after that completes the turn; an error code
    /// abandons it silently.
    pub fn process_rotation(&mut self) {
        let code = self.sampler.encoder_state();

        match (self.rotation_phase, code) {
            (RotationPhase::AwaitingDetent, IDLE_CODE) => {
                self.rotation_phase = RotationPhase::AwaitingTurn;
            }
            (RotationPhase::AwaitingDetent, _) | (_, IDLE_CODE) => (),
            (RotationPhase::AwaitingTurn, ERROR_CODE) => {
                trace!("rotation: invalid transition, turn discarded");
                self.rotation_phase = RotationPhase::AwaitingDetent;
            }
            (RotationPhase::AwaitingTurn, code) => self.complete_turn(code),
        }
    }

    fn complete_turn(&mut self, code: u8) {
        let direction = code & DIRECTION_MASK;

        if self.sampler.button_pressed() {
            self.pending.insert(Events::from_bits(direction << HOLD_SHIFT));
            // Button countdowns keep whatever they have already spent.
            self.button_phase = ButtonPhase::TurnWhileHeld;
        } else {
            self.pending.insert(Events::from_bits(direction));
        }
        trace!("rotation: code {}, pending {}", code, self.pending);

        self.rotation_phase = RotationPhase::AwaitingDetent;
    }

    /// Advance the button decoder by one tick.
    ///
    /// The checks below run in order against the current phase, so a phase
    /// entered by one check is handled by the next within the same tick:
    /// the press tick is also the first debounce tick, and the tick that
    /// ends the debounce is also the first hold tick.
    pub fn process_button(&mut self) {
        let pressed = self.sampler.button_pressed();

        if self.button_phase == ButtonPhase::AwaitingPress && pressed {
            self.button_phase = ButtonPhase::Debouncing;
        }
        if self.button_phase == ButtonPhase::AwaitingPress {
            return;
        }
        if self.button_phase == ButtonPhase::Debouncing {
            self.debounce(pressed);
        }
        if self.button_phase == ButtonPhase::AwaitingHoldOrRelease {
            self.await_hold_or_release(pressed);
        }
        if !pressed
            && matches!(
                self.button_phase,
                ButtonPhase::TurnWhileHeld | ButtonPhase::Holding
            )
        {
            self.button_phase = ButtonPhase::AwaitingPress;
        }
    }

    fn debounce(&mut self, pressed: bool) {
        self.debounce_counter = self.debounce_counter.saturating_sub(1);
        if self.debounce_counter != 0 {
            return;
        }

        self.debounce_counter = self.debounce_ticks;
        self.button_phase = if pressed {
            ButtonPhase::AwaitingHoldOrRelease
        } else {
            trace!("button: bounce rejected");
            ButtonPhase::AwaitingPress
        };
    }

    fn await_hold_or_release(&mut self, pressed: bool) {
        if !pressed {
            trace!("button: click");
            self.pending.insert(Events::BUTTON_CLICK);
            self.hold_counter = self.hold_ticks;
            self.button_phase = ButtonPhase::AwaitingPress;
        }

        // The countdown also runs on the release tick, so the next press
        // starts one tick short.
        self.hold_counter = self.hold_counter.saturating_sub(1);
        if self.hold_counter == 0 {
            trace!("button: hold");
            self.pending.insert(Events::BUTTON_HOLD);
            self.hold_counter = self.hold_ticks;
            self.button_phase = ButtonPhase::Holding;
        }
    }
}

macro_rules! impl_take {
    ($name:ident, $flag:ident, $what:expr) => {
        doc_comment! {
            concat!(
                "Return `true` if ",
                $what,
                " since the last call, and clear the event.\n\n",
                "Consumes [`Events::",
                stringify!($flag),
                "`](struct.Events.html#associatedconstant.",
                stringify!($flag),
                "). Repeated calls return `false` until the event happens again.",
            ),
            pub fn $name(&mut self) -> bool {
                self.pending.take(Events::$flag)
            }
        }
    };
}

impl<S> Encoder<S> {
    impl_take!(take_right, RIGHT, "the encoder was turned right");
    impl_take!(take_left, LEFT, "the encoder was turned left");
    impl_take!(take_hold_right, HOLD_RIGHT, "the encoder was turned right with the button pressed");
    impl_take!(take_hold_left, HOLD_LEFT, "the encoder was turned left with the button pressed");
    impl_take!(take_button_click, BUTTON_CLICK, "the button was clicked");
    impl_take!(take_button_hold, BUTTON_HOLD, "the button was held for the hold timeout");

    /// Pending events, without clearing them.
    pub fn pending_events(&self) -> Events {
        self.pending
    }

    /// Current rotation decoder phase.
    pub fn rotation_phase(&self) -> RotationPhase {
        self.rotation_phase
    }

    /// Current button decoder phase.
    pub fn button_phase(&self) -> ButtonPhase {
        self.button_phase
    }

    /// Debounce budget in ticks.
    pub fn debounce_ticks(&self) -> u8 {
        self.debounce_ticks
    }

    /// Hold budget in ticks.
    pub fn hold_ticks(&self) -> u16 {
        self.hold_ticks
    }

    /// Timing this encoder was built with.
    pub fn config(&self) -> Config {
        self.config
    }

    /// The sampler.
    pub fn sampler(&self) -> &S {
        &self.sampler
    }

    /// Mutable access to the sampler.
    pub fn sampler_mut(&mut self) -> &mut S {
        &mut self.sampler
    }

    /// Consume the encoder and hand back its sampler.
    pub fn release(self) -> S {
        self.sampler
    }
}
