//! Process-scoped registry of shared effect instances.
//!
//! Replaces ambient singletons: the registry is built once at process start
//! (builder, then frozen) and passed by reference into pipeline
//! construction. Tests build their own registries and can swap any kind for
//! a fake; a later registration for the same kind wins.

use crate::effect::{EffectKind, ProcessingSideEffect};
use crate::effects::{
    BroadcastChangesEffect, ContainerRefreshEffect, IgniteEffect, UseItemEffect,
    UseItemOnBlockEffect,
};
use crate::error::ConfigurationFault;
use crate::world::InteractionResult;
use std::collections::HashMap;
use std::sync::Arc;

/// A shared, reentrant effect instance.
pub type SharedEffect = Arc<dyn ProcessingSideEffect<InteractionResult>>;

/// Builder for constructing an immutable [`EffectRegistry`].
#[derive(Default)]
pub struct EffectRegistryBuilder {
    effects: HashMap<EffectKind, SharedEffect>,
}

impl EffectRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an effect instance under its own kind. Registering the same
    /// kind again replaces the earlier instance.
    pub fn register(&mut self, effect: SharedEffect) -> &mut Self {
        self.effects.insert(effect.kind(), effect);
        self
    }

    /// Freeze the registry.
    pub fn build(self) -> EffectRegistry {
        EffectRegistry {
            effects: self.effects,
        }
    }
}

/// Immutable effect registry. Frozen after build; only reads afterward.
pub struct EffectRegistry {
    effects: HashMap<EffectKind, SharedEffect>,
}

impl EffectRegistry {
    /// The registry holding every built-in interaction effect.
    pub fn standard() -> Self {
        let mut builder = EffectRegistryBuilder::new();
        builder
            .register(Arc::new(UseItemEffect))
            .register(Arc::new(UseItemOnBlockEffect))
            .register(Arc::new(ContainerRefreshEffect))
            .register(Arc::new(BroadcastChangesEffect))
            .register(Arc::new(IgniteEffect));
        builder.build()
    }

    pub fn get(&self, kind: EffectKind) -> Option<SharedEffect> {
        self.effects.get(&kind).cloned()
    }

    /// Like [`get`](Self::get), but an absent kind is a
    /// [`ConfigurationFault`] -- pipeline assembly requires every listed
    /// effect to exist.
    pub fn require(&self, kind: EffectKind) -> Result<SharedEffect, ConfigurationFault> {
        self.get(kind)
            .ok_or(ConfigurationFault::UnregisteredEffect(kind))
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}
