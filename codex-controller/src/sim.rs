//! Simulated rig
//!
//! A dry-run stand-in for the physical rig. Every part shares one world:
//!
//! - `SimStage` moves the head by exactly the jogs it is sent
//! - `SimContactPin` reads high while the head rests on the card stack, or
//!   while the scripted operator holds the button
//! - `SimSuctionPin` picks the top card up and drops it where the head is
//! - `SimVision` reads the held card, misreading it a scripted number of times
//!
//! The pins are plain embedded-hal pins, so the real GPIO drivers sit on top
//! of them unchanged.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::convert::Infallible;
use std::rc::Rc;

use codex_core::config::{MotionConfig, PinConfig};
use codex_core::motion::Position;
use codex_core::traits::{Label, StageClient, StageError, VisionClassifier};
use embedded_hal::digital::{ErrorType, InputPin, OutputPin};
use tracing::{debug, trace};

/// Height of the stack tray floor above firmware zero
pub const TRAY_Z: f64 = 20.0;

/// Thickness of one card
pub const CARD_THICKNESS_MM: f64 = 0.3;

/// Head counts as over the stack within this lateral distance
const STACK_TOLERANCE_MM: f64 = 5.0;

/// Card in the simulated deck
#[derive(Debug, Clone, PartialEq)]
pub struct SimCard {
    /// Printed name; `None` for a card the camera can never read
    pub name: Option<String>,
    /// Failed reads before the name comes through
    pub misreads: u8,
}

impl SimCard {
    pub fn named(name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            misreads: 0,
        }
    }

    pub fn unreadable() -> Self {
        Self {
            name: None,
            misreads: 0,
        }
    }

    pub fn with_misreads(mut self, misreads: u8) -> Self {
        self.misreads = misreads;
        self
    }
}

/// Card dropped somewhere by the head
#[derive(Debug, Clone, PartialEq)]
pub struct DroppedCard {
    pub card: SimCard,
    pub at: Position,
}

/// Physical state shared by all simulated parts
#[derive(Debug)]
pub struct SimWorld {
    /// True head position relative to firmware zero
    pub head: Position,
    /// Input stack XY
    pub stack_x: f64,
    pub stack_y: f64,
    /// Remaining deck, top card first
    pub deck: VecDeque<SimCard>,
    /// Card on the suction head
    pub held: Option<SimCard>,
    /// Fan state
    pub suction_on: bool,
    /// Cards released by the head, in order
    pub dropped: Vec<DroppedCard>,
    /// Scripted operator button readings, consumed before physical contact
    pub button: VecDeque<bool>,
    /// Commands received
    pub homes: u32,
    pub jogs: u32,
    /// Fail the jog with this zero-based index
    pub fail_jog: Option<u32>,
}

impl SimWorld {
    /// Create a world with the head at firmware zero
    pub fn new(stack_x: f64, stack_y: f64, deck: impl IntoIterator<Item = SimCard>) -> Self {
        Self {
            head: Position::ORIGIN,
            stack_x,
            stack_y,
            deck: deck.into_iter().collect(),
            held: None,
            suction_on: false,
            dropped: Vec::new(),
            button: VecDeque::new(),
            homes: 0,
            jogs: 0,
            fail_jog: None,
        }
    }

    /// Create a world laid out for a rig configuration
    pub fn for_rig(motion: &MotionConfig, deck: impl IntoIterator<Item = SimCard>) -> Self {
        Self::new(motion.input_stack.x, motion.input_stack.y, deck)
    }

    /// Queue operator presses, each a release followed by a press
    pub fn press_button(&mut self, times: usize) {
        for _ in 0..times {
            self.button.push_back(false);
            self.button.push_back(true);
        }
    }

    /// Z of the top card, if any card is left
    pub fn stack_top_z(&self) -> Option<f64> {
        if self.deck.is_empty() {
            None
        } else {
            Some(TRAY_Z + self.deck.len() as f64 * CARD_THICKNESS_MM)
        }
    }

    /// Check if the head rests on the top card
    pub fn head_on_stack(&self) -> bool {
        let over = (self.head.x - self.stack_x).abs() <= STACK_TOLERANCE_MM
            && (self.head.y - self.stack_y).abs() <= STACK_TOLERANCE_MM;
        match self.stack_top_z() {
            Some(top) => over && self.head.z <= top + 1e-9,
            None => false,
        }
    }

    fn set_suction(&mut self, on: bool) {
        if on == self.suction_on {
            return;
        }
        self.suction_on = on;

        if on {
            if self.held.is_none() && self.head_on_stack() {
                self.held = self.deck.pop_front();
                debug!(card = ?self.held, "picked card");
            }
        } else if let Some(card) = self.held.take() {
            debug!(?card, at = ?self.head, "dropped card");
            self.dropped.push(DroppedCard {
                card,
                at: self.head,
            });
        }
    }
}

/// Handle to the shared world
pub type SimHandle = Rc<RefCell<SimWorld>>;

/// Wrap a world for sharing between simulated parts
pub fn share(world: SimWorld) -> SimHandle {
    Rc::new(RefCell::new(world))
}

/// A deck with a bit of everything: plain cards, the default special card,
/// a card that needs a retry, and one that never reads
pub fn default_deck() -> Vec<SimCard> {
    vec![
        SimCard::named("Llanowar Elves"),
        SimCard::named("Colossal Dreadmaw"),
        SimCard::named("Giant Growth").with_misreads(1),
        SimCard::unreadable(),
        SimCard::named("Counterspell"),
        SimCard::named("Lightning Bolt").with_misreads(2),
        SimCard::named("Serra Angel"),
        SimCard::named("Colossal Dreadmaw"),
        SimCard::named("Dark Ritual"),
        SimCard::named("Shivan Dragon"),
        SimCard::named("Swords to Plowshares"),
        SimCard::named("Birds of Paradise"),
    ]
}

/// Stage that moves the simulated head
#[derive(Debug, Clone)]
pub struct SimStage {
    world: SimHandle,
}

impl SimStage {
    pub fn new(world: SimHandle) -> Self {
        Self { world }
    }
}

impl StageClient for SimStage {
    fn home(&mut self) -> Result<(), StageError> {
        let mut world = self.world.borrow_mut();
        world.homes += 1;
        world.head = Position::ORIGIN;
        trace!("sim home");
        Ok(())
    }

    fn jog(&mut self, dx: f64, dy: f64, dz: f64) -> Result<(), StageError> {
        let mut world = self.world.borrow_mut();
        let index = world.jogs;
        world.jogs += 1;
        if world.fail_jog == Some(index) {
            return Err(StageError::Communication);
        }

        world.head.x += dx;
        world.head.y += dy;
        world.head.z += dz;
        trace!(head = ?world.head, "sim jog");
        Ok(())
    }
}

/// Contact switch input
///
/// Reads the raw level a switch wired per `config` would produce.
#[derive(Debug, Clone)]
pub struct SimContactPin {
    world: SimHandle,
    config: PinConfig,
}

impl SimContactPin {
    pub fn new(world: SimHandle, config: &PinConfig) -> Self {
        Self {
            world,
            config: *config,
        }
    }

    fn pressed(&self) -> bool {
        let mut world = self.world.borrow_mut();
        match world.button.pop_front() {
            Some(pressed) => pressed,
            None => world.head_on_stack(),
        }
    }
}

impl ErrorType for SimContactPin {
    type Error = Infallible;
}

impl InputPin for SimContactPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.config.level_for(self.pressed()))
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_high().map(|high| !high)
    }
}

/// Suction fan output
#[derive(Debug, Clone)]
pub struct SimSuctionPin {
    world: SimHandle,
    config: PinConfig,
}

impl SimSuctionPin {
    pub fn new(world: SimHandle, config: &PinConfig) -> Self {
        Self {
            world,
            config: *config,
        }
    }

    fn drive(&mut self, high: bool) {
        let on = self.config.is_active(high);
        self.world.borrow_mut().set_suction(on);
    }
}

impl ErrorType for SimSuctionPin {
    type Error = Infallible;
}

impl OutputPin for SimSuctionPin {
    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.drive(true);
        Ok(())
    }

    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.drive(false);
        Ok(())
    }
}

/// Frame of the card currently on the head
#[derive(Debug, Clone, PartialEq)]
pub struct SimFrame {
    pub card: SimCard,
}

/// Camera and recognizer looking at the suction head
#[derive(Debug, Clone)]
pub struct SimVision {
    world: SimHandle,
}

impl SimVision {
    pub fn new(world: SimHandle) -> Self {
        Self { world }
    }
}

impl VisionClassifier for SimVision {
    type Frame = SimFrame;

    /// Nothing on the head, nothing to see
    fn capture(&mut self) -> Option<SimFrame> {
        let world = self.world.borrow();
        world.held.clone().map(|card| SimFrame { card })
    }

    fn classify(&mut self, frame: &SimFrame) -> Option<Label> {
        let mut world = self.world.borrow_mut();

        // Misreads belong to the physical card, not the frame
        if let Some(held) = world.held.as_mut() {
            if held.misreads > 0 {
                held.misreads -= 1;
                return None;
            }
        }

        let name = frame.card.name.as_deref()?;
        let mut label = Label::new();
        label.push_str(name).ok()?;
        Some(label)
    }
}
