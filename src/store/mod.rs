pub mod kv;

/// Store key holding the serialized form state.
pub const FORM_STATE_KEY: &str = "form_state";
/// Store key holding the ATR history sequence.
pub const HISTORY_KEY: &str = "atr_history";
