//! Effect-driven function decoration.
//!
//! Runs after a function's structural body has been lowered: the recorded
//! effect set turns into target modifiers (a `constexpr` prefix, a
//! `noexcept` suffix) with idempotent merge, and the decoration is
//! published on the event bus for external telemetry.

use aurora_common::{Event, EventBus};
use aurora_sema::{Effect, EffectSet};

use crate::cpp::CppFunction;

pub struct FunctionDecorator<'a> {
    events: &'a EventBus,
}

impl<'a> FunctionDecorator<'a> {
    pub fn new(events: &'a EventBus) -> Self {
        FunctionDecorator { events }
    }

    pub fn decorate(&self, func: &mut CppFunction, effects: EffectSet) {
        if effects.contains(Effect::Constexpr) {
            func.add_prefix_modifier("constexpr");
        }
        if effects.contains(Effect::Noexcept) {
            func.add_suffix_modifier("noexcept");
        }
        self.events.publish(Event::FunctionDecorated {
            name: func.name.clone(),
            effects: effects.names(),
        });
    }
}
