/// Classification for how the batch loop reacts to a backend failure.
///
/// | Class | Record produced? | Loop continues? |
/// |-------|------------------|-----------------|
/// | `SkipPrompt` | No | Yes |
/// | `AbortBatch` | No | No (collected records are still saved) |
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FaultClass {
    /// The backend answered but refused this prompt.
    /// Drop the prompt and move on to the next one.
    SkipPrompt,

    /// The backend cannot be talked to any more.
    /// Stop issuing calls and go straight to persistence.
    AbortBatch,
}
