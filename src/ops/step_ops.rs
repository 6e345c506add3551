use crate::model::task::Step;
use crate::ops::identity::new_step_id;

/// Error type for step list operations. The list is left untouched
/// whenever one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StepError {
    #[error("step index {index} out of range (have {len} steps)")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("step title is blank")]
    BlankTitle,
}

/// A single-field change to one step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepUpdate {
    Title(String),
    Completed(bool),
    Order(u32),
}

/// Rewrite every step's `order` to its 1-based position.
pub fn renumber(steps: &mut [Step]) {
    for (i, step) in steps.iter_mut().enumerate() {
        step.order = (i + 1) as u32;
    }
}

/// The ordered steps of the task currently being edited, plus the pending
/// text of the "new step" input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepList {
    steps: Vec<Step>,
    pending: String,
}

impl StepList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a list from already-validated steps, renumbered.
    pub fn from_steps(steps: Vec<Step>) -> Self {
        let mut list = StepList::new();
        list.replace_all(steps);
        list
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    /// Owned, renumbered copy for submission to the store.
    pub fn snapshot(&self) -> Vec<Step> {
        let mut steps = self.steps.clone();
        renumber(&mut steps);
        steps
    }

    pub fn pending(&self) -> &str {
        &self.pending
    }

    pub fn set_pending(&mut self, text: impl Into<String>) {
        self.pending = text.into();
    }

    /// Append a step with a fresh id. Blank titles are rejected.
    /// Returns the new step's id and clears the pending input.
    pub fn add(&mut self, title: &str) -> Result<String, StepError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(StepError::BlankTitle);
        }
        let id = new_step_id();
        self.steps.push(Step::new(Some(id.clone()), title));
        renumber(&mut self.steps);
        self.pending.clear();
        tracing::debug!(%id, len = self.steps.len(), "step added");
        Ok(id)
    }

    /// Add whatever is in the pending input.
    pub fn commit_pending(&mut self) -> Result<String, StepError> {
        let pending = std::mem::take(&mut self.pending);
        let result = self.add(&pending);
        if result.is_err() {
            self.pending = pending;
        }
        result
    }

    /// Remove the step at `index`, returning it.
    pub fn remove(&mut self, index: usize) -> Result<Step, StepError> {
        self.check_index(index)?;
        let removed = self.steps.remove(index);
        renumber(&mut self.steps);
        tracing::debug!(index, len = self.steps.len(), "step removed");
        Ok(removed)
    }

    /// Replace one field of the step at `index`. Id and order are untouched
    /// unless the update is itself an `Order`.
    pub fn update(&mut self, index: usize, update: StepUpdate) -> Result<(), StepError> {
        self.check_index(index)?;
        let step = &mut self.steps[index];
        match update {
            StepUpdate::Title(title) => step.title = title,
            StepUpdate::Completed(done) => step.completed = done,
            StepUpdate::Order(order) => step.order = order,
        }
        Ok(())
    }

    /// Flip the completion flag of the step at `index`, returning the new value.
    pub fn toggle(&mut self, index: usize) -> Result<bool, StepError> {
        self.check_index(index)?;
        let done = !self.steps[index].completed;
        self.update(index, StepUpdate::Completed(done))?;
        Ok(done)
    }

    /// Splice the step at `from` out and back in at `to`, then renumber.
    pub fn move_step(&mut self, from: usize, to: usize) -> Result<(), StepError> {
        self.check_index(from)?;
        self.check_index(to)?;
        if from != to {
            let step = self.steps.remove(from);
            self.steps.insert(to, step);
        }
        renumber(&mut self.steps);
        tracing::debug!(from, to, "step moved");
        Ok(())
    }

    /// Discard every step and take `steps` (already validated) in their place.
    pub fn replace_all(&mut self, steps: Vec<Step>) {
        self.steps = steps;
        renumber(&mut self.steps);
        self.pending.clear();
    }

    fn check_index(&self, index: usize) -> Result<(), StepError> {
        if index < self.steps.len() {
            Ok(())
        } else {
            Err(StepError::IndexOutOfRange {
                index,
                len: self.steps.len(),
            })
        }
    }
}
