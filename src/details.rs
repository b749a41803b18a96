//! Header snapshot.
//!
//! Convenience view of the routing and identification fields every
//! message carries in MSH-3 through MSH-12.

/// The common MSH header fields, captured at the moment of the call.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MessageDetails {
    /// MSH-3.
    pub sending_application: Option<String>,
    /// MSH-4.
    pub sending_facility: Option<String>,
    /// MSH-5.
    pub receiving_application: Option<String>,
    /// MSH-6.
    pub receiving_facility: Option<String>,
    /// MSH-7.
    pub timestamp: Option<String>,
    /// MSH-9, e.g. `ADT^A01`.
    pub message_type: Option<String>,
    /// MSH-10.
    pub control_id: Option<String>,
    /// MSH-11.
    pub processing_id: Option<String>,
    /// MSH-12.
    pub version: Option<String>,
}

impl MessageDetails {
    /// Build the snapshot from a field lookup on the MSH segment.
    pub(crate) fn from_lookup<F>(field: F) -> MessageDetails
    where
        F: Fn(usize) -> Option<String>,
    {
        MessageDetails {
            sending_application: field(3),
            sending_facility: field(4),
            receiving_application: field(5),
            receiving_facility: field(6),
            timestamp: field(7),
            message_type: field(9),
            control_id: field(10),
            processing_id: field(11),
            version: field(12),
        }
    }
}
