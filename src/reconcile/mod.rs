pub mod fingerprint;
pub mod reconciler;
