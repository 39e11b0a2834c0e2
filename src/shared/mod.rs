//! Shared components, resources, events, and states for Forest Bear.
//!
//! This is the type contract. Every domain plugin imports from here.

use bevy::prelude::*;

// ═══════════════════════════════════════════════════════════════════════
// GAME STATE: top-level state machine
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, States, Default)]
pub enum GameState {
    #[default]
    Loading,
    Playing,
}

/// Ordering for per-tick movement: steering writes velocities, integration
/// moves bodies with them.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MovementSet {
    Steer,
    Integrate,
}

// ═══════════════════════════════════════════════════════════════════════
// BODIES
// ═══════════════════════════════════════════════════════════════════════

/// Marker for the forest bear NPC.
#[derive(Component, Debug, Default)]
pub struct BearNpc;

/// Marker for the player-controlled body.
#[derive(Component, Debug, Default)]
pub struct Player;

/// Marker for patrol targets. Looked up by their `Name`.
#[derive(Component, Debug, Default)]
pub struct Waypoint;

/// Linear velocity in world units per second.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct Velocity(pub Vec3);

/// Whether the body rested on the ground after the last integration step.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Grounded(pub bool);

/// Flat floor every body collides with.
#[derive(Resource, Debug, Clone, Copy)]
pub struct GroundPlane {
    pub height: f32,
}

impl Default for GroundPlane {
    fn default() -> Self {
        Self { height: 0.0 }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// DIALOGUE SURFACES
// ═══════════════════════════════════════════════════════════════════════

/// Anything that can show a line of NPC speech.
pub trait TextDisplay {
    fn set_text(&mut self, text: &str);
}

/// Anything that can render an ordered set of selectable answers.
pub trait ChoiceList {
    fn update_choices(&mut self, choices: Vec<String>);
}

/// Speech bubble text owned by an NPC. The UI mirrors it into a label
/// floating above the NPC.
#[derive(Component, Debug, Clone, Default, PartialEq, Eq)]
pub struct DialogueMarker {
    pub text: String,
}

impl DialogueMarker {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl TextDisplay for DialogueMarker {
    fn set_text(&mut self, text: &str) {
        self.text.clear();
        self.text.push_str(text);
    }
}

/// The on-screen answer buttons. There is one per scene.
#[derive(Component, Debug, Clone, Default, PartialEq, Eq)]
pub struct ButtonOptions {
    pub choices: Vec<String>,
}

impl ChoiceList for ButtonOptions {
    fn update_choices(&mut self, choices: Vec<String>) {
        self.choices = choices;
    }
}

/// Lets systems hand out the bar without flagging it as changed until a
/// write actually happens.
impl ChoiceList for Mut<'_, ButtonOptions> {
    fn update_choices(&mut self, choices: Vec<String>) {
        self.choices = choices;
    }
}

// ═══════════════════════════════════════════════════════════════════════
// QUIZ
// ═══════════════════════════════════════════════════════════════════════

/// One entry of a `<choices>` block: the element's tag name and its text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizChoice {
    pub key: String,
    pub text: String,
}

/// The quiz currently on screen, kept so a selected option can be checked.
#[derive(Resource, Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveQuiz {
    pub asker: Option<Entity>,
    pub choices: Vec<QuizChoice>,
    pub answer: Option<String>,
}

impl ActiveQuiz {
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

// ═══════════════════════════════════════════════════════════════════════
// EVENTS
// ═══════════════════════════════════════════════════════════════════════

/// A named body crossed into a detection area.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodyEnteredEvent {
    pub area: Entity,
    pub body: Entity,
}

/// Ask the NPC's model a free-form question; the raw reply is shown as-is.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct AskAiEvent {
    pub npc: Entity,
    pub question: String,
}

/// Ask the NPC's model for a multiple-choice quiz.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizRequestEvent {
    pub npc: Entity,
}

/// The player picked an answer button.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChoiceSelectedEvent {
    pub index: usize,
}
