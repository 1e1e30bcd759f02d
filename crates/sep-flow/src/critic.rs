use crate::flowsheet::Flowsheet;

/// Cheap structural precondition gate run before every execution attempt.
///
/// The critic never fails hard; it reports `(false, message)` naming the first
/// offending unit and leaves the decision to the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Critic;

impl Critic {
    /// Requires every unit to declare at least one input and one output.
    pub fn check(&self, flowsheet: &Flowsheet) -> (bool, String) {
        for unit in &flowsheet.units {
            if unit.inputs.is_empty() || unit.outputs.is_empty() {
                return (false, format!("Unit {} missing inputs/outputs", unit.id));
            }
        }
        (true, "ok".to_string())
    }
}
