//! Rig: ordered constraint instances with weights and activation state.
//!
//! Methods:
//! - new, add_constraint, from_config
//! - activate (bind every valid constraint), deactivate
//! - evaluate (per tick: scene sync for the whole rig, then root motion -> animation
//!   per constraint in insertion order)

use crate::config::RigConfig;
use crate::constraint::RigConstraint;
use crate::error::RigError;
use crate::handle::BindContext;
use crate::ids::ConstraintId;
use crate::registry::ConstraintRegistry;
use crate::stream::AnimationStream;
use crate::weight::ConstraintWeight;

/// One constraint slot in a rig.
#[derive(Debug)]
pub struct RigEntry {
    pub id: ConstraintId,
    pub weight: ConstraintWeight,
    pub constraint: Box<dyn RigConstraint>,
}

#[derive(Debug, Default)]
pub struct Rig {
    pub name: String,
    entries: Vec<RigEntry>,
}

impl Rig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    /// Build a rig from its JSON description using `registry` for constraint types.
    pub fn from_config(cfg: &RigConfig, registry: &ConstraintRegistry) -> Result<Self, RigError> {
        let mut rig = Rig::new(cfg.name.clone());
        for c in &cfg.constraints {
            let constraint = registry.create(&c.kind, c.data.clone())?;
            rig.add_constraint(c.id.clone(), constraint, c.weight)?;
        }
        Ok(rig)
    }

    /// Append a constraint; evaluation follows insertion order.
    pub fn add_constraint(
        &mut self,
        id: impl Into<ConstraintId>,
        constraint: Box<dyn RigConstraint>,
        weight: impl Into<ConstraintWeight>,
    ) -> Result<(), RigError> {
        let id = id.into();
        if self.entries.iter().any(|e| e.id == id) {
            return Err(RigError::DuplicateConstraint { id: id.0 });
        }
        self.entries.push(RigEntry {
            id,
            weight: weight.into(),
            constraint,
        });
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = &RigEntry> {
        self.entries.iter()
    }

    pub fn constraint(&self, id: &str) -> Option<&dyn RigConstraint> {
        self.entries
            .iter()
            .find(|e| e.id.as_str() == id)
            .map(|e| e.constraint.as_ref())
    }

    pub fn constraint_mut(&mut self, id: &str) -> Option<&mut (dyn RigConstraint + 'static)> {
        self.entries
            .iter_mut()
            .find(|e| e.id.as_str() == id)
            .map(|e| e.constraint.as_mut())
    }

    pub fn weight(&self, id: &str) -> Option<f32> {
        self.entries
            .iter()
            .find(|e| e.id.as_str() == id)
            .map(|e| e.weight.get())
    }

    /// Set a constraint's weight (clamped to [0, 1]). Returns false for unknown ids.
    pub fn set_weight(&mut self, id: &str, weight: f32) -> bool {
        match self.entries.iter_mut().find(|e| e.id.as_str() == id) {
            Some(e) => {
                e.weight.set(weight);
                true
            }
            None => false,
        }
    }

    /// Bind every valid constraint against `ctx`.
    ///
    /// Invalid constraints are left inactive and never evaluated. Activation is
    /// all-or-nothing: on a binding error every constraint is deactivated and
    /// the error is returned.
    pub fn activate(&mut self, ctx: &mut dyn BindContext) -> Result<(), RigError> {
        if let Err(err) = self.bind_all(ctx) {
            log::debug!("rig '{}': activation failed, deactivating: {}", self.name, err);
            self.deactivate();
            return Err(err);
        }
        Ok(())
    }

    fn bind_all(&mut self, ctx: &mut dyn BindContext) -> Result<(), RigError> {
        for entry in &mut self.entries {
            if !entry.constraint.is_valid() {
                log::warn!(
                    "rig '{}': constraint '{}' ({}) is missing references; skipping",
                    self.name,
                    entry.id,
                    entry.constraint.kind()
                );
                entry.constraint.deactivate();
                continue;
            }
            entry.constraint.activate(ctx)?;
            log::debug!(
                "rig '{}': activated constraint '{}' ({})",
                self.name,
                entry.id,
                entry.constraint.kind()
            );
        }
        Ok(())
    }

    pub fn deactivate(&mut self) {
        for entry in &mut self.entries {
            entry.constraint.deactivate();
        }
        log::debug!("rig '{}': deactivated", self.name);
    }

    pub fn is_active(&self) -> bool {
        self.entries.iter().any(|e| e.constraint.is_active())
    }

    /// Run one evaluation tick over every active constraint.
    ///
    /// Scene-synced transforms of every active constraint with a positive
    /// weight are pulled into the stream first, then the jobs run in insertion
    /// order. A later constraint therefore sees what earlier ones wrote, and a
    /// zero-weight constraint has no effect at all.
    pub fn evaluate(&mut self, stream: &mut dyn AnimationStream) {
        for entry in self.live_entries() {
            for id in entry.constraint.synced_transforms() {
                stream.sync_scene(*id);
            }
        }
        for entry in &mut self.entries {
            if entry.constraint.is_active() {
                entry.constraint.evaluate(stream, entry.weight.get());
            }
        }
    }

    fn live_entries(&self) -> impl Iterator<Item = &RigEntry> {
        self.entries
            .iter()
            .filter(|e| e.constraint.is_active() && e.weight.get() > 0.0)
    }
}
