//! Domain model of the client review: raw records, card view models, the
//! transformer that links them and the review session state machine.

pub mod client;
pub mod format;
pub mod gesture;
pub mod labels;
pub mod rules;
pub mod session;
pub mod transform;
pub mod types;
pub mod view_model;
