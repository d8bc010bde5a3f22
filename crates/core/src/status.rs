//! Lifecycle status enums mapping to SMALLSERIAL/SMALLINT lookup tables.
//!
//! Each enum variant's discriminant matches the seed data order (1-based)
//! in the corresponding `*_statuses` database table, and each variant
//! carries the canonical kebab-case name exposed through the API.

/// Status ID type matching SMALLINT/SMALLSERIAL in the database.
pub type StatusId = i16;

macro_rules! define_status_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $val:expr => $label:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[repr(i16)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant = $val ),+
        }

        impl $name {
            /// Return the database status ID.
            pub fn id(self) -> StatusId {
                self as StatusId
            }

            /// Canonical kebab-case name, as stored in the lookup table
            /// and exposed through the API.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( Self::$variant => $label ),+
                }
            }

            /// Resolve a database status ID back to the enum.
            pub fn from_id(id: StatusId) -> Option<Self> {
                match id {
                    $( $val => Some(Self::$variant), )+
                    _ => None,
                }
            }

            /// Parse the canonical name (as accepted from API input).
            pub fn parse(name: &str) -> Option<Self> {
                match name {
                    $( $label => Some(Self::$variant), )+
                    _ => None,
                }
            }
        }

        impl From<$name> for StatusId {
            fn from(value: $name) -> Self {
                value as StatusId
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

define_status_enum! {
    /// Mandate lifecycle status.
    MandateStatus {
        Open = 1 => "open",
        InProgress = 2 => "in-progress",
        Completed = 3 => "completed",
        Cancelled = 4 => "cancelled",
        Expired = 5 => "expired",
    }
}

define_status_enum! {
    /// Candidature resolution status.
    CandidatureStatus {
        Interested = 1 => "interested",
        Accepted = 2 => "accepted",
        Rejected = 3 => "rejected",
    }
}

define_status_enum! {
    /// Investigator availability status.
    AvailabilityStatus {
        Available = 1 => "available",
        Busy = 2 => "busy",
        Unavailable = 3 => "unavailable",
    }
}

define_status_enum! {
    /// Agency license verification status.
    LicenseStatus {
        Pending = 1 => "pending",
        Verified = 2 => "verified",
        Rejected = 3 => "rejected",
    }
}
